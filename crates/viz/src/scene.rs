//! Drawable output of a chart.
//!
//! A [`Scene`] is a tree of shapes, labels and groups. Shapes that stand for
//! data carry a [`Datum`] with their tooltip lines, which [`Scene::to_svg`]
//! writes as an SVG `<title>` so static output still reports values on hover.

use crate::svg::{escape_text, num};
use serde::Serialize;
use std::fmt::Write as _;

/// Paint attributes of a shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Style {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dash: Option<String>,
}

impl Style {
    #[must_use]
    pub fn fill(color: impl Into<String>) -> Self {
        Self {
            fill: Some(color.into()),
            ..Self::default()
        }
    }

    /// Outline only.
    #[must_use]
    pub fn stroke(color: impl Into<String>, width: f64) -> Self {
        Self {
            fill: Some("none".to_string()),
            stroke: Some(color.into()),
            stroke_width: Some(width),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_stroke(mut self, color: impl Into<String>, width: f64) -> Self {
        self.stroke = Some(color.into());
        self.stroke_width = Some(width);
        self
    }

    #[must_use]
    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = Some(opacity);
        self
    }

    #[must_use]
    pub fn with_dash(mut self, dash: impl Into<String>) -> Self {
        self.dash = Some(dash.into());
        self
    }

    fn write_attrs(&self, out: &mut String) {
        if let Some(fill) = &self.fill {
            let _ = write!(out, " fill='{}'", escape_text(fill));
        }
        if let Some(stroke) = &self.stroke {
            let _ = write!(out, " stroke='{}'", escape_text(stroke));
        }
        if let Some(width) = self.stroke_width {
            let _ = write!(out, " stroke-width='{}'", num(width));
        }
        if let Some(opacity) = self.opacity {
            let _ = write!(out, " opacity='{}'", num(opacity));
        }
        if let Some(dash) = &self.dash {
            let _ = write!(out, " stroke-dasharray='{}'", escape_text(dash));
        }
    }
}

/// Geometry of a shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ShapeKind {
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        rx: f64,
    },
    Circle {
        cx: f64,
        cy: f64,
        r: f64,
    },
    Path {
        d: String,
    },
    Polygon {
        points: Vec<(f64, f64)>,
    },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
    },
}

impl ShapeKind {
    #[must_use]
    pub fn rect(x: f64, y: f64, width: f64, height: f64) -> Self {
        ShapeKind::Rect {
            x,
            y,
            width: width.max(0.0),
            height: height.max(0.0),
            rx: 0.0,
        }
    }

    #[must_use]
    pub fn circle(cx: f64, cy: f64, r: f64) -> Self {
        ShapeKind::Circle {
            cx,
            cy,
            r: r.max(0.0),
        }
    }

    #[must_use]
    pub fn line(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        ShapeKind::Line { x1, y1, x2, y2 }
    }

    /// A point near the middle of the shape, used to anchor tooltips.
    #[must_use]
    pub fn anchor(&self) -> (f64, f64) {
        match self {
            ShapeKind::Rect {
                x,
                y,
                width,
                height,
                ..
            } => (x + width / 2.0, y + height / 2.0),
            ShapeKind::Circle { cx, cy, .. } => (*cx, *cy),
            ShapeKind::Line { x1, y1, x2, y2 } => ((x1 + x2) / 2.0, (y1 + y2) / 2.0),
            ShapeKind::Polygon { points } => {
                if points.is_empty() {
                    return (0.0, 0.0);
                }
                let n = points.len() as f64;
                let (sx, sy) = points
                    .iter()
                    .fold((0.0, 0.0), |(sx, sy), (x, y)| (sx + x, sy + y));
                (sx / n, sy / n)
            }
            ShapeKind::Path { d } => first_point(d).unwrap_or((0.0, 0.0)),
        }
    }
}

fn first_point(d: &str) -> Option<(f64, f64)> {
    let mut numbers = d
        .split(|c: char| c.is_ascii_alphabetic() || c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(str::parse::<f64>);
    let x = numbers.next()?.ok()?;
    let y = numbers.next()?.ok()?;
    Some((x, y))
}

/// Tooltip content of a data shape, one entry per line.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Datum {
    pub lines: Vec<String>,
}

impl Datum {
    #[must_use]
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    #[must_use]
    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|line| line.contains(needle))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Shape {
    pub id: String,
    pub kind: ShapeKind,
    pub style: Style,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datum: Option<Datum>,
}

impl Shape {
    #[must_use]
    pub fn new(id: impl Into<String>, kind: ShapeKind, style: Style) -> Self {
        Self {
            id: id.into(),
            kind,
            style,
            datum: None,
        }
    }

    #[must_use]
    pub fn with_datum(mut self, datum: Datum) -> Self {
        self.datum = Some(datum);
        self
    }

    fn write_svg(&self, out: &mut String, indent: usize) {
        let pad = "  ".repeat(indent);
        let mut attrs = String::new();
        if !self.id.is_empty() {
            let _ = write!(attrs, " id='{}'", escape_text(&self.id));
        }

        let tag = match &self.kind {
            ShapeKind::Rect {
                x,
                y,
                width,
                height,
                rx,
            } => {
                let _ = write!(
                    attrs,
                    " x='{}' y='{}' width='{}' height='{}'",
                    num(*x),
                    num(*y),
                    num(*width),
                    num(*height)
                );
                if *rx > 0.0 {
                    let _ = write!(attrs, " rx='{}'", num(*rx));
                }
                "rect"
            }
            ShapeKind::Circle { cx, cy, r } => {
                let _ = write!(attrs, " cx='{}' cy='{}' r='{}'", num(*cx), num(*cy), num(*r));
                "circle"
            }
            ShapeKind::Path { d } => {
                let _ = write!(attrs, " d='{}'", escape_text(d));
                "path"
            }
            ShapeKind::Polygon { points } => {
                let points: Vec<String> = points
                    .iter()
                    .map(|(x, y)| format!("{},{}", num(*x), num(*y)))
                    .collect();
                let _ = write!(attrs, " points='{}'", points.join(" "));
                "polygon"
            }
            ShapeKind::Line { x1, y1, x2, y2 } => {
                let _ = write!(
                    attrs,
                    " x1='{}' y1='{}' x2='{}' y2='{}'",
                    num(*x1),
                    num(*y1),
                    num(*x2),
                    num(*y2)
                );
                "line"
            }
        };
        self.style.write_attrs(&mut attrs);

        match &self.datum {
            Some(datum) => {
                let _ = writeln!(
                    out,
                    "{pad}<{tag}{attrs}><title>{}</title></{tag}>",
                    escape_text(&datum.text())
                );
            }
            None => {
                let _ = writeln!(out, "{pad}<{tag}{attrs}/>");
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Anchor {
    #[default]
    Start,
    Middle,
    End,
}

impl Anchor {
    fn as_str(self) -> &'static str {
        match self {
            Anchor::Start => "start",
            Anchor::Middle => "middle",
            Anchor::End => "end",
        }
    }
}

/// A text element.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Label {
    pub x: f64,
    pub y: f64,
    pub text: String,
    pub anchor: Anchor,
    pub size: f64,
    pub bold: bool,
    pub fill: String,
    /// Rotation in degrees around the label's own position.
    pub rotate: f64,
}

impl Label {
    #[must_use]
    pub fn new(x: f64, y: f64, text: impl Into<String>) -> Self {
        Self {
            x,
            y,
            text: text.into(),
            anchor: Anchor::Start,
            size: 12.0,
            bold: false,
            fill: "#333".to_string(),
            rotate: 0.0,
        }
    }

    #[must_use]
    pub fn anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    #[must_use]
    pub fn size(mut self, size: f64) -> Self {
        self.size = size;
        self
    }

    #[must_use]
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    #[must_use]
    pub fn fill(mut self, color: impl Into<String>) -> Self {
        self.fill = color.into();
        self
    }

    #[must_use]
    pub fn rotate(mut self, degrees: f64) -> Self {
        self.rotate = degrees;
        self
    }

    fn write_svg(&self, out: &mut String, indent: usize) {
        let pad = "  ".repeat(indent);
        let mut attrs = format!(
            " x='{}' y='{}' text-anchor='{}' font-size='{}' fill='{}'",
            num(self.x),
            num(self.y),
            self.anchor.as_str(),
            num(self.size),
            escape_text(&self.fill)
        );
        if self.bold {
            attrs.push_str(" font-weight='600'");
        }
        if self.rotate != 0.0 {
            let _ = write!(
                attrs,
                " transform='rotate({} {} {})'",
                num(self.rotate),
                num(self.x),
                num(self.y)
            );
        }
        let _ = writeln!(out, "{pad}<text{attrs}>{}</text>", escape_text(&self.text));
    }
}

/// Elements sharing an offset.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Group {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    pub translate: (f64, f64),
    pub elements: Vec<Element>,
}

impl Group {
    #[must_use]
    pub fn new(translate: (f64, f64)) -> Self {
        Self {
            class: None,
            translate,
            elements: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    pub fn push(&mut self, element: impl Into<Element>) {
        self.elements.push(element.into());
    }

    fn write_svg(&self, out: &mut String, indent: usize) {
        let pad = "  ".repeat(indent);
        let mut attrs = String::new();
        if let Some(class) = &self.class {
            let _ = write!(attrs, " class='{}'", escape_text(class));
        }
        if self.translate != (0.0, 0.0) {
            let _ = write!(
                attrs,
                " transform='translate({} {})'",
                num(self.translate.0),
                num(self.translate.1)
            );
        }
        let _ = writeln!(out, "{pad}<g{attrs}>");
        for element in &self.elements {
            element.write_svg(out, indent + 1);
        }
        let _ = writeln!(out, "{pad}</g>");
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "element", rename_all = "lowercase")]
pub enum Element {
    Shape(Shape),
    Text(Label),
    Group(Group),
}

impl Element {
    fn write_svg(&self, out: &mut String, indent: usize) {
        match self {
            Element::Shape(shape) => shape.write_svg(out, indent),
            Element::Text(label) => label.write_svg(out, indent),
            Element::Group(group) => group.write_svg(out, indent),
        }
    }
}

impl From<Shape> for Element {
    fn from(shape: Shape) -> Self {
        Element::Shape(shape)
    }
}

impl From<Label> for Element {
    fn from(label: Label) -> Self {
        Element::Text(label)
    }
}

impl From<Group> for Element {
    fn from(group: Group) -> Self {
        Element::Group(group)
    }
}

/// A linear gradient referenced by `url(#id)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Gradient {
    pub id: String,
    /// Bottom to top when set, left to right otherwise.
    pub vertical: bool,
    /// (offset in `[0, 1]`, colour)
    pub stops: Vec<(f64, String)>,
}

/// Everything one chart draws for one state.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Scene {
    pub width: f64,
    pub height: f64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub gradients: Vec<Gradient>,
    pub elements: Vec<Element>,
}

impl Scene {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            gradients: Vec::new(),
            elements: Vec::new(),
        }
    }

    pub fn push(&mut self, element: impl Into<Element>) {
        self.elements.push(element.into());
    }

    pub fn add_gradient(&mut self, gradient: Gradient) {
        self.gradients.push(gradient);
    }

    /// Every shape, depth first.
    #[must_use]
    pub fn shapes(&self) -> Vec<&Shape> {
        fn walk<'a>(elements: &'a [Element], out: &mut Vec<&'a Shape>) {
            for element in elements {
                match element {
                    Element::Shape(shape) => out.push(shape),
                    Element::Group(group) => walk(&group.elements, out),
                    Element::Text(_) => {}
                }
            }
        }
        let mut out = Vec::new();
        walk(&self.elements, &mut out);
        out
    }

    /// Every label, depth first.
    #[must_use]
    pub fn labels(&self) -> Vec<&Label> {
        fn walk<'a>(elements: &'a [Element], out: &mut Vec<&'a Label>) {
            for element in elements {
                match element {
                    Element::Text(label) => out.push(label),
                    Element::Group(group) => walk(&group.elements, out),
                    Element::Shape(_) => {}
                }
            }
        }
        let mut out = Vec::new();
        walk(&self.elements, &mut out);
        out
    }

    /// Whether any label reads exactly `text`.
    #[must_use]
    pub fn has_text(&self, text: &str) -> bool {
        self.labels().iter().any(|label| label.text == text)
    }

    #[must_use]
    pub fn shape(&self, id: &str) -> Option<&Shape> {
        self.shapes().into_iter().find(|shape| shape.id == id)
    }

    /// The shape with `id` and the offset of the groups around it.
    #[must_use]
    pub fn locate(&self, id: &str) -> Option<(&Shape, (f64, f64))> {
        fn walk<'a>(
            elements: &'a [Element],
            offset: (f64, f64),
            id: &str,
        ) -> Option<(&'a Shape, (f64, f64))> {
            elements.iter().find_map(|element| match element {
                Element::Shape(shape) if shape.id == id => Some((shape, offset)),
                Element::Group(group) => walk(
                    &group.elements,
                    (offset.0 + group.translate.0, offset.1 + group.translate.1),
                    id,
                ),
                Element::Shape(_) | Element::Text(_) => None,
            })
        }
        walk(&self.elements, (0.0, 0.0), id)
    }

    pub fn shape_mut(&mut self, id: &str) -> Option<&mut Shape> {
        fn walk<'a>(elements: &'a mut [Element], id: &str) -> Option<&'a mut Shape> {
            for element in elements {
                let found = match element {
                    Element::Shape(shape) if shape.id == id => Some(shape),
                    Element::Group(group) => walk(&mut group.elements, id),
                    Element::Shape(_) | Element::Text(_) => None,
                };
                if found.is_some() {
                    return found;
                }
            }
            None
        }
        walk(&mut self.elements, id)
    }

    /// Serialize as a standalone SVG document.
    #[must_use]
    pub fn to_svg(&self) -> String {
        let mut svg = String::new();
        let _ = writeln!(
            svg,
            "<svg xmlns='http://www.w3.org/2000/svg' width='{w}' height='{h}' viewBox='0 0 {w} {h}' font-family='Arial, sans-serif' role='img'>",
            w = num(self.width),
            h = num(self.height)
        );

        if !self.gradients.is_empty() {
            let _ = writeln!(svg, "  <defs>");
            for gradient in &self.gradients {
                let (x2, y1) = if gradient.vertical {
                    ("0%", "100%")
                } else {
                    ("100%", "0%")
                };
                let _ = writeln!(
                    svg,
                    "    <linearGradient id='{}' x1='0%' y1='{y1}' x2='{x2}' y2='0%'>",
                    escape_text(&gradient.id)
                );
                for (offset, color) in &gradient.stops {
                    let _ = writeln!(
                        svg,
                        "      <stop offset='{}%' stop-color='{}'/>",
                        num(offset * 100.0),
                        escape_text(color)
                    );
                }
                let _ = writeln!(svg, "    </linearGradient>");
            }
            let _ = writeln!(svg, "  </defs>");
        }

        for element in &self.elements {
            element.write_svg(&mut svg, 1);
        }
        let _ = writeln!(svg, "</svg>");
        svg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Scene {
        let mut scene = Scene::new(200.0, 100.0);
        let mut group = Group::new((10.0, 20.0)).with_class("bars");
        group.push(
            Shape::new(
                "bar:Malta",
                ShapeKind::rect(0.0, 0.0, 50.5, 10.0),
                Style::fill("#1f77b4"),
            )
            .with_datum(Datum::new(["Malta", "Value: 88.00%"])),
        );
        group.push(Label::new(55.0, 5.0, "88.00%"));
        scene.push(group);
        scene.push(Label::new(100.0, 12.0, "R&D <spend>").anchor(Anchor::Middle));
        scene
    }

    #[test]
    fn test_lookup() {
        let scene = sample();
        assert_eq!(scene.shapes().len(), 1);
        assert!(scene.shape("bar:Malta").is_some());
        assert!(scene.shape("bar:Spain").is_none());
        assert!(scene.has_text("88.00%"));

        let (_, offset) = scene.locate("bar:Malta").unwrap();
        assert_eq!(offset, (10.0, 20.0));
    }

    #[test]
    fn test_to_svg() {
        let svg = sample().to_svg();
        assert!(svg.starts_with("<svg xmlns='http://www.w3.org/2000/svg' width='200'"));
        assert!(svg.contains("<g class='bars' transform='translate(10 20)'>"));
        assert!(svg.contains("width='50.5'"));
        assert!(svg.contains("<title>Malta\nValue: 88.00%</title>"));
        assert!(svg.contains("R&amp;D &lt;spend&gt;"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_shape_mut() {
        let mut scene = sample();
        scene.shape_mut("bar:Malta").unwrap().style.stroke = Some("#333".to_string());
        assert_eq!(
            scene.shape("bar:Malta").unwrap().style.stroke.as_deref(),
            Some("#333")
        );
    }

    #[test]
    fn test_anchor() {
        assert_eq!(ShapeKind::rect(0.0, 0.0, 10.0, 4.0).anchor(), (5.0, 2.0));
        let path = ShapeKind::Path {
            d: "M10,20L30,40Z".to_string(),
        };
        assert_eq!(path.anchor(), (10.0, 20.0));
    }
}
