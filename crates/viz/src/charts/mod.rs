//! The chart renderers and what they share.
//!
//! Every chart owns its extracted data and draws a [`Scene`] for a
//! [`View`]: a size, a selection and the current interaction state.

pub mod bubble;
pub mod choropleth;
pub mod diverging;
pub mod pyramid;
pub mod radar;
pub mod revenue;
pub mod sankey;

use crate::interaction::{apply_hover, Drill, Hover, Interaction};
use crate::scale::LinearScale;
use crate::scene::{Anchor, Element, Group, Label, Scene, Shape, ShapeKind, Style};
use crate::svg::num;
use eurochart_fetch::LoadState;

pub use bubble::{BubbleChart, BubblePoint};
pub use choropleth::Choropleth;
pub use diverging::DivergingBars;
pub use pyramid::Pyramid;
pub use radar::RadarChart;
pub use revenue::RevenueChart;
pub use sankey::{Ribbon, SankeyChart, SankeyGraph, SankeyLayout, SankeyLink, SankeyNode};

static IDLE: Interaction = Interaction {
    hover: Hover::Idle,
    drill: Drill::Overview,
};

/// What a chart is asked to draw.
#[derive(Debug, Clone)]
pub struct View<'a> {
    pub width: f64,
    pub height: f64,
    /// Selected year; charts fall back to their latest year.
    pub year: Option<i32>,
    /// Selected entity for charts with a country selector.
    pub entity: Option<String>,
    pub interaction: &'a Interaction,
}

impl View<'static> {
    /// A view with nothing selected and no interaction.
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            year: None,
            entity: None,
            interaction: &IDLE,
        }
    }
}

impl<'a> View<'a> {
    #[must_use]
    pub fn with_year(mut self, year: Option<i32>) -> Self {
        self.year = year;
        self
    }

    #[must_use]
    pub fn with_entity(mut self, entity: Option<String>) -> Self {
        self.entity = entity;
        self
    }

    #[must_use]
    pub fn with_interaction<'b>(self, interaction: &'b Interaction) -> View<'b> {
        View {
            width: self.width,
            height: self.height,
            year: self.year,
            entity: self.entity,
            interaction,
        }
    }

    /// The selected year when it is one of `years`, else the latest of them.
    #[must_use]
    pub fn resolve_year(&self, years: &[i32]) -> Option<i32> {
        match self.year {
            Some(year) if years.contains(&year) => Some(year),
            _ => years.iter().copied().max(),
        }
    }
}

/// A chart over data that has finished loading.
pub trait Chart {
    fn title(&self) -> &str;

    /// Whether there is nothing to draw.
    fn is_empty(&self) -> bool;

    /// Years the year selector offers, ascending.
    fn years(&self) -> Vec<i32> {
        Vec::new()
    }

    /// Entities the entity selector offers.
    fn entities(&self) -> Vec<String> {
        Vec::new()
    }

    fn render(&self, view: &View) -> Scene;
}

impl<C: Chart + ?Sized> Chart for Box<C> {
    fn title(&self) -> &str {
        (**self).title()
    }

    fn is_empty(&self) -> bool {
        (**self).is_empty()
    }

    fn years(&self) -> Vec<i32> {
        (**self).years()
    }

    fn entities(&self) -> Vec<String> {
        (**self).entities()
    }

    fn render(&self, view: &View) -> Scene {
        (**self).render(view)
    }
}

/// Draw a chart, or the placeholder for where its data stands.
pub fn render_state<C: Chart>(state: &LoadState<C>, view: &View) -> Scene {
    match state {
        LoadState::Loading => placeholder(view, "Loading data..."),
        LoadState::Failed(message) => placeholder(view, &format!("Failed to load data: {message}")),
        LoadState::Ready(chart) if chart.is_empty() => {
            placeholder(view, &format!("{}: no data available", chart.title()))
        }
        LoadState::Ready(chart) => chart.render(view),
    }
}

/// A scene holding one centred message.
#[must_use]
pub fn placeholder(view: &View, message: &str) -> Scene {
    let mut scene = Scene::new(view.width, view.height);
    scene.push(
        Label::new(view.width / 2.0, view.height / 2.0, message)
            .anchor(Anchor::Middle)
            .size(14.0)
            .fill("#666"),
    );
    scene
}

/// The empty state for a year the selector offers but nothing has a value in.
pub(crate) fn no_data_for(view: &View, year: i32) -> Scene {
    placeholder(view, &format!("No data available for {year}"))
}

/// Space around a plot area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Margin {
    pub(crate) fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Plot width and height inside a `width` x `height` view, never negative.
    pub(crate) fn inner(&self, width: f64, height: f64) -> (f64, f64) {
        (
            (width - self.left - self.right).max(0.0),
            (height - self.top - self.bottom).max(0.0),
        )
    }

    pub(crate) fn origin(&self) -> (f64, f64) {
        (self.left, self.top)
    }
}

pub(crate) fn title(view: &View, text: &str, y: f64) -> Label {
    Label::new(view.width / 2.0, y, text)
        .anchor(Anchor::Middle)
        .size(16.0)
        .bold()
}

/// Horizontal axis at `y`: a baseline, a tick and label per value.
pub(crate) fn x_axis(
    scale: &LinearScale,
    ticks: &[f64],
    y: f64,
    format: impl Fn(f64) -> String,
) -> Group {
    let mut axis = Group::new((0.0, y)).with_class("x-axis");
    axis.push(axis_line(scale.range.0, 0.0, scale.range.1, 0.0));
    for tick in ticks {
        let x = scale.scale(*tick);
        axis.push(axis_line(x, 0.0, x, 6.0));
        axis.push(
            Label::new(x, 20.0, format(*tick))
                .anchor(Anchor::Middle)
                .size(11.0),
        );
    }
    axis
}

/// Vertical axis at `x` with labels on the left.
pub(crate) fn y_axis(
    scale: &LinearScale,
    ticks: &[f64],
    x: f64,
    format: impl Fn(f64) -> String,
) -> Group {
    let mut axis = Group::new((x, 0.0)).with_class("y-axis");
    axis.push(axis_line(0.0, scale.range.0, 0.0, scale.range.1));
    for tick in ticks {
        let y = scale.scale(*tick);
        axis.push(axis_line(-6.0, y, 0.0, y));
        axis.push(
            Label::new(-9.0, y + 4.0, format(*tick))
                .anchor(Anchor::End)
                .size(11.0),
        );
    }
    axis
}

pub(crate) fn axis_line(x1: f64, y1: f64, x2: f64, y2: f64) -> Shape {
    Shape::new("", ShapeKind::line(x1, y1, x2, y2), Style::stroke("#333", 1.0))
}

/// Whole-number tick labels with a percent sign.
pub(crate) fn tick_percent(value: f64) -> String {
    format!("{}%", num(value))
}

/// Hover highlighting and tooltip, drawn last so they sit on top.
pub(crate) fn finish(mut scene: Scene, view: &View) -> Scene {
    apply_hover(&mut scene, &view.interaction.hover);
    scene
}

/// A legend row: a swatch and its caption.
pub(crate) fn legend_entry(y: f64, color: &str, text: &str) -> [Element; 2] {
    [
        Shape::new("", ShapeKind::rect(0.0, y, 18.0, 18.0), Style::fill(color)).into(),
        Label::new(24.0, y + 13.0, text).size(12.0).into(),
    ]
}
