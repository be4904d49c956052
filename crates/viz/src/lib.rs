//! # eurochart-viz
//!
//! SVG charts for extracted Eurostat series.
//!
//! Each chart turns its data plus a [`View`] (size, selected year and
//! entity, interaction state) into a [`Scene`] of shapes and labels. Data
//! shapes carry their tooltip lines, so a scene can be hit-tested, checked
//! in tests, or written out as a standalone SVG.
//!
//! ```
//! use eurochart_series::EntitySeries;
//! use eurochart_viz::{Chart, DivergingBars, View};
//!
//! let mut series = EntitySeries::new();
//! series.insert("Bulgaria", 2024, 14.0);
//! series.insert("Spain", 2024, 4.0);
//!
//! let scene = DivergingBars::new(series).render(&View::new(900.0, 600.0));
//! assert!(scene.shape("bar:Bulgaria").is_some());
//! assert!(scene.to_svg().starts_with("<svg"));
//! ```

pub mod animation;
pub mod charts;
pub mod color;
pub mod error;
pub mod geo;
pub mod interaction;
pub mod page;
pub mod scale;
pub mod scene;
pub mod svg;

pub use animation::YearPlayer;
pub use charts::{
    placeholder, render_state, BubbleChart, BubblePoint, Chart, Choropleth, DivergingBars,
    Pyramid, RadarChart, RevenueChart, Ribbon, SankeyChart, SankeyGraph, SankeyLayout, SankeyLink,
    SankeyNode, View,
};
pub use color::{OrdinalScale, SequentialScale, NO_DATA_FILL};
pub use error::{VizError, VizResult};
pub use geo::{parse_regions, Projection, Region};
pub use interaction::{apply_hover, Drill, Hover, Interaction, Pointer};
pub use page::{Page, Section};
pub use scale::{BandScale, LinearScale};
pub use scene::{Anchor, Datum, Element, Gradient, Group, Label, Scene, Shape, ShapeKind, Style};
