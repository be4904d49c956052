//! E-commerce adoption: buyers against selling enterprises, sized by turnover.

use super::{finish, tick_percent, title, x_axis, y_axis, Chart, Margin, View};
use crate::color::SequentialScale;
use crate::scale::LinearScale;
use crate::scene::{Anchor, Datum, Group, Label, Scene, Shape, ShapeKind, Style};
use crate::svg::percent;
use eurochart_series::EntitySeries;
use serde::Serialize;
use std::collections::BTreeSet;

const MIN_RADIUS: f64 = 5.0;
const MAX_RADIUS: f64 = 30.0;
const SIZE_LEGEND: [f64; 4] = [10.0, 20.0, 30.0, 40.0];
const COLOR_LEGEND: [f64; 5] = [0.0, 25.0, 50.0, 75.0, 100.0];

/// One country in one year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BubblePoint {
    pub country: String,
    pub buyers: f64,
    pub enterprises: f64,
    pub turnover: f64,
}

pub struct BubbleChart {
    title: String,
    buyers: EntitySeries,
    enterprises: EntitySeries,
    turnover: EntitySeries,
    years: BTreeSet<i32>,
}

impl BubbleChart {
    #[must_use]
    pub fn new(buyers: EntitySeries, enterprises: EntitySeries, turnover: EntitySeries) -> Self {
        let mut years = buyers.years();
        years.extend(enterprises.years());
        years.extend(turnover.years());
        Self {
            title: "E-commerce Adoption Correlation".to_string(),
            buyers,
            enterprises,
            turnover,
            years,
        }
    }

    /// Offer `years` too, even where no country has a value.
    #[must_use]
    pub fn with_years(mut self, years: impl IntoIterator<Item = i32>) -> Self {
        self.years.extend(years);
        self
    }

    /// Countries with at least two of the three metrics for `year`.
    /// A missing metric reads as 0.
    #[must_use]
    pub fn points(&self, year: i32) -> Vec<BubblePoint> {
        let countries: BTreeSet<&str> = self
            .buyers
            .entities()
            .chain(self.enterprises.entities())
            .chain(self.turnover.entities())
            .collect();

        countries
            .into_iter()
            .filter_map(|country| {
                let metrics = [
                    self.buyers.value(country, year),
                    self.enterprises.value(country, year),
                    self.turnover.value(country, year),
                ];
                if metrics.iter().flatten().count() < 2 {
                    return None;
                }
                let [buyers, enterprises, turnover] = metrics.map(|m| m.unwrap_or(0.0));
                Some(BubblePoint {
                    country: country.to_string(),
                    buyers,
                    enterprises,
                    turnover,
                })
            })
            .collect()
    }
}

fn max_of(points: &[BubblePoint], metric: impl Fn(&BubblePoint) -> f64) -> f64 {
    points.iter().map(metric).fold(0.0, f64::max)
}

impl Chart for BubbleChart {
    fn title(&self) -> &str {
        &self.title
    }

    fn is_empty(&self) -> bool {
        self.years().iter().all(|year| self.points(*year).is_empty())
    }

    fn years(&self) -> Vec<i32> {
        self.years.iter().copied().collect()
    }

    fn render(&self, view: &View) -> Scene {
        let margin = Margin::new(60.0, 200.0, 80.0, 80.0);
        let (width, height) = margin.inner(view.width, view.height);
        let Some(year) = view.resolve_year(&self.years()) else {
            return super::placeholder(view, "No data for the selected year");
        };
        let points = self.points(year);
        if points.is_empty() {
            return super::no_data_for(view, year);
        }
        let mut scene = Scene::new(view.width, view.height);
        scene.push(title(view, &format!("{} ({year})", self.title), margin.top / 2.0));

        let x = LinearScale::new((0.0, max_of(&points, |p| p.buyers) * 1.1), (0.0, width));
        let y = LinearScale::new(
            (0.0, max_of(&points, |p| p.enterprises) * 1.1),
            (height, 0.0),
        );
        let max_turnover = max_of(&points, |p| p.turnover);
        let size = LinearScale::new((0.0, max_turnover), (MIN_RADIUS, MAX_RADIUS));
        let colors = SequentialScale::blues((0.0, max_turnover));

        let mut plot = Group::new(margin.origin()).with_class("plot");
        plot.push(x_axis(&x, &x.ticks(10), height, tick_percent));
        plot.push(y_axis(&y, &y.ticks(10), 0.0, tick_percent));
        plot.push(
            Label::new(
                width / 2.0,
                height + 50.0,
                "Individuals using internet for buying goods or services (%)",
            )
            .anchor(Anchor::Middle),
        );
        plot.push(
            Label::new(-height / 2.0, -50.0, "Enterprises having received orders online (%)")
                .anchor(Anchor::Middle)
                .rotate(-90.0),
        );

        // Larger bubbles first so small ones stay hoverable
        let mut ordered: Vec<&BubblePoint> = points.iter().collect();
        ordered.sort_by(|a, b| b.turnover.total_cmp(&a.turnover));
        for point in ordered {
            plot.push(
                Shape::new(
                    format!("bubble:{}", point.country),
                    ShapeKind::circle(
                        x.scale(point.buyers),
                        y.scale(point.enterprises),
                        size.scale_clamped(point.turnover),
                    ),
                    Style::fill(colors.color(point.turnover))
                        .with_stroke("#fff", 1.0)
                        .with_opacity(0.8),
                )
                .with_datum(Datum::new([
                    point.country.clone(),
                    format!("Online Buyers: {}", percent(point.buyers)),
                    format!("Enterprises with Online Orders: {}", percent(point.enterprises)),
                    format!("E-commerce Turnover: {}", percent(point.turnover)),
                ])),
            );
        }
        scene.push(plot);

        let legend_x = margin.left + width + 40.0;
        scene.push(size_legend(&size, (legend_x, margin.top)));
        scene.push(color_legend(&colors, (legend_x, margin.top + 200.0)));
        finish(scene, view)
    }
}

fn size_legend(size: &LinearScale, at: (f64, f64)) -> Group {
    let mut legend = Group::new(at).with_class("size-legend");
    legend.push(Label::new(0.0, 0.0, "Bubble Size = Turnover %").bold());
    let mut y = 20.0;
    for value in SIZE_LEGEND {
        let r = size.scale_clamped(value);
        y += r;
        legend.push(Shape::new(
            "",
            ShapeKind::circle(MAX_RADIUS, y, r),
            Style::stroke("#333", 1.0),
        ));
        legend.push(Label::new(MAX_RADIUS * 2.0 + 10.0, y + 4.0, tick_percent(value)).size(11.0));
        y += r + 5.0;
    }
    legend
}

fn color_legend(colors: &SequentialScale, at: (f64, f64)) -> Group {
    let mut legend = Group::new(at).with_class("color-legend");
    legend.push(Label::new(0.0, 0.0, "Color = Turnover %").bold());
    for (index, value) in COLOR_LEGEND.iter().enumerate() {
        let y = 12.0 + 22.0 * index as f64;
        legend.push(Shape::new(
            "",
            ShapeKind::rect(0.0, y, 18.0, 18.0),
            Style::fill(colors.color(*value)),
        ));
        legend.push(Label::new(24.0, y + 13.0, tick_percent(*value)).size(11.0));
    }
    legend
}
