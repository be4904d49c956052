//! Hover and drill-down state machines.
//!
//! Charts never hold interaction state themselves. A view owns an
//! [`Interaction`], feeds it pointer events, and passes it to `render`.

use crate::scene::{Element, Group, Label, Scene, Shape, ShapeKind, Style};
use serde::Serialize;

/// Pointer position in scene coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Pointer {
    pub x: f64,
    pub y: f64,
}

impl Pointer {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// idle → hovered(shape, pointer) on enter, back to idle on leave.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub enum Hover {
    #[default]
    Idle,
    Hovered { shape: String, pointer: Pointer },
}

impl Hover {
    pub fn enter(&mut self, shape: impl Into<String>, pointer: Pointer) {
        *self = Hover::Hovered {
            shape: shape.into(),
            pointer,
        };
    }

    /// Reposition the tooltip; ignored while idle.
    pub fn moved(&mut self, to: Pointer) {
        if let Hover::Hovered { pointer, .. } = self {
            *pointer = to;
        }
    }

    pub fn leave(&mut self) {
        *self = Hover::Idle;
    }

    #[must_use]
    pub fn target(&self) -> Option<&str> {
        match self {
            Hover::Idle => None,
            Hover::Hovered { shape, .. } => Some(shape.as_str()),
        }
    }
}

/// overview → focused(entities) on click, back to overview on reset.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub enum Drill {
    #[default]
    Overview,
    Focused(Vec<String>),
}

impl Drill {
    /// In the overview a click focuses the entity. While focused a click
    /// toggles it; removing the last one returns to the overview.
    pub fn click(&mut self, entity: &str) {
        match self {
            Drill::Overview => *self = Drill::Focused(vec![entity.to_string()]),
            Drill::Focused(entities) => {
                if let Some(index) = entities.iter().position(|e| e == entity) {
                    entities.remove(index);
                } else {
                    entities.push(entity.to_string());
                }
                if entities.is_empty() {
                    *self = Drill::Overview;
                }
            }
        }
    }

    pub fn reset(&mut self) {
        *self = Drill::Overview;
    }

    /// Focused entities in click order; empty in the overview.
    #[must_use]
    pub fn focused(&self) -> &[String] {
        match self {
            Drill::Overview => &[],
            Drill::Focused(entities) => entities.as_slice(),
        }
    }

    #[must_use]
    pub fn is_focused(&self) -> bool {
        matches!(self, Drill::Focused(_))
    }
}

/// Interaction state of one chart view.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Interaction {
    pub hover: Hover,
    pub drill: Drill,
}

impl Interaction {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop both hover and focus.
    pub fn reset(&mut self) {
        self.hover.leave();
        self.drill.reset();
    }
}

const HIGHLIGHT_STROKE: &str = "#4a90e2";
const TOOLTIP_WIDTH: f64 = 180.0;
const TOOLTIP_LINE: f64 = 16.0;

/// Outline the hovered shape and draw its tooltip next to the pointer.
///
/// The tooltip keeps inside the scene: it sits 15px right of and 30px
/// above the pointer, pulled back from the right and bottom edges.
pub fn apply_hover(scene: &mut Scene, hover: &Hover) {
    let Hover::Hovered { shape: id, pointer } = hover else {
        return;
    };
    let Some(shape) = scene.shape_mut(id) else {
        return;
    };
    shape.style.stroke = Some(HIGHLIGHT_STROKE.to_string());
    shape.style.stroke_width = Some(3.0);

    let Some(datum) = shape.datum.clone() else {
        return;
    };
    if datum.lines.is_empty() {
        return;
    }

    let height = TOOLTIP_LINE * datum.lines.len() as f64 + 12.0;
    let x = (pointer.x + 15.0).min(scene.width - TOOLTIP_WIDTH).max(0.0);
    let y = (pointer.y - 30.0).min(scene.height - height).max(0.0);

    let mut tooltip = Group::new((x, y)).with_class("tooltip");
    tooltip.push(Shape::new(
        "",
        ShapeKind::Rect {
            x: 0.0,
            y: 0.0,
            width: TOOLTIP_WIDTH,
            height,
            rx: 8.0,
        },
        Style::fill("rgba(0, 0, 0, 0.9)").with_stroke(HIGHLIGHT_STROKE, 2.0),
    ));
    for (index, line) in datum.lines.iter().enumerate() {
        let mut label = Label::new(10.0, 20.0 + TOOLTIP_LINE * index as f64, line.as_str())
            .size(12.0)
            .fill("#fff");
        if index == 0 {
            label = label.bold();
        }
        tooltip.push(label);
    }
    scene.push(Element::Group(tooltip));
}
