//! Enterprises' e-commerce turnover: a ranked bar chart that drills down
//! into the focused countries' trends.

use super::{finish, tick_percent, title, x_axis, y_axis, Chart, Margin, View};
use crate::color::{OrdinalScale, CATEGORY10};
use crate::scale::{BandScale, LinearScale};
use crate::scene::{Anchor, Datum, Group, Label, Scene, Shape, ShapeKind, Style};
use crate::svg::num;
use eurochart_series::EntitySeries;
use std::collections::BTreeSet;
use std::fmt::Write as _;

const MARGIN: Margin = Margin {
    top: 40.0,
    right: 30.0,
    bottom: 50.0,
    left: 160.0,
};
const HEADER: f64 = 40.0;

pub struct RevenueChart {
    title: String,
    series: EntitySeries,
    years: BTreeSet<i32>,
    colors: OrdinalScale,
}

impl RevenueChart {
    #[must_use]
    pub fn new(series: EntitySeries) -> Self {
        let colors = OrdinalScale::with_domain(&CATEGORY10, series.entities());
        Self {
            title: "Share of Enterprises' Turnover on E-commerce".to_string(),
            years: series.years(),
            series,
            colors,
        }
    }

    /// Offer `years` too, even where no country has a value.
    #[must_use]
    pub fn with_years(mut self, years: impl IntoIterator<Item = i32>) -> Self {
        self.years.extend(years);
        self
    }

    /// Countries with a value in `year`, highest first.
    #[must_use]
    pub fn ranking(&self, year: i32) -> Vec<(String, f64)> {
        let mut ranking: Vec<(String, f64)> = self.series.for_year(year).into_iter().collect();
        ranking.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranking
    }

    fn color(&self, country: &str) -> &'static str {
        self.colors.lookup(country).unwrap_or(CATEGORY10[0])
    }

    /// Horizontal bars for `year` in a `width` x `height` panel.
    fn bars(&self, year: i32, width: f64, height: f64, focused: &[String]) -> Group {
        let ranking = self.ranking(year);
        let (plot_w, plot_h) = MARGIN.inner(width, height);
        let max = ranking.iter().map(|(_, v)| *v).fold(0.0, f64::max);
        let x = LinearScale::new((0.0, max * 1.1), (0.0, plot_w));
        let y = BandScale::new(
            ranking.iter().map(|(c, _)| c.clone()).collect(),
            (0.0, plot_h),
            0.1,
        );

        let mut panel = Group::new(MARGIN.origin()).with_class("bars");
        for (country, value) in &ranking {
            let Some(top) = y.position(country) else {
                continue;
            };
            let dimmed = !focused.is_empty() && !focused.contains(country);
            let bar_width = x.scale(*value);
            panel.push(
                Shape::new(
                    format!("bar:{country}"),
                    ShapeKind::rect(0.0, top, bar_width, y.bandwidth()),
                    Style::fill(self.color(country))
                        .with_opacity(if dimmed { 0.3 } else { 1.0 }),
                )
                .with_datum(Datum::new([
                    country.clone(),
                    format!("Year: {year}"),
                    format!("Value: {value:.2}%"),
                ])),
            );
            let middle = top + y.bandwidth() / 2.0 + 4.0;
            panel.push(Label::new(bar_width + 5.0, middle, format!("{value:.2}%")).size(11.0));
            panel.push(
                Label::new(-10.0, middle, country.as_str())
                    .anchor(Anchor::End)
                    .size(11.0),
            );
        }
        panel.push(x_axis(&x, &x.ticks(5), plot_h, tick_percent));
        panel.push(
            Label::new(
                plot_w / 2.0,
                plot_h + 40.0,
                "Share of enterprises' turnover on e-commerce (%)",
            )
            .anchor(Anchor::Middle),
        );
        panel
    }

    /// One line per focused country over every year it has data.
    fn trends(&self, focused: &[String], width: f64, height: f64) -> Group {
        let lines: Vec<(&String, Vec<(i32, f64)>)> = focused
            .iter()
            .filter_map(|country| {
                let values = self.series.get(country)?;
                Some((country, values.iter().map(|(y, v)| (*y, *v)).collect()))
            })
            .collect();

        let years = lines.iter().flat_map(|(_, points)| points.iter().map(|(y, _)| *y));
        let first = years.clone().min().unwrap_or_default();
        let last = years.max().unwrap_or_default();
        let max = lines
            .iter()
            .flat_map(|(_, points)| points.iter().map(|(_, v)| *v))
            .fold(0.0, f64::max);

        let margin = Margin::new(MARGIN.top, MARGIN.right, MARGIN.bottom, 60.0);
        let (plot_w, plot_h) = margin.inner(width, height);
        let x = LinearScale::new((f64::from(first), f64::from(last)), (0.0, plot_w));
        let y = LinearScale::new((0.0, max * 1.1), (plot_h, 0.0));

        let mut panel = Group::new(margin.origin()).with_class("trends");
        panel.push(x_axis(&x, &year_ticks(first, last), plot_h, num));
        panel.push(y_axis(&y, &y.ticks(5), 0.0, tick_percent));

        for (country, points) in &lines {
            let color = self.color(country);
            let mut d = String::new();
            for (index, (year, value)) in points.iter().enumerate() {
                let command = if index == 0 { 'M' } else { 'L' };
                let _ = write!(
                    d,
                    "{command}{},{}",
                    num(x.scale(f64::from(*year))),
                    num(y.scale(*value))
                );
            }
            panel.push(Shape::new(
                format!("line:{country}"),
                ShapeKind::Path { d },
                Style::stroke(color, 2.0),
            ));
            for (year, value) in points {
                panel.push(
                    Shape::new(
                        format!("point:{country}:{year}"),
                        ShapeKind::circle(x.scale(f64::from(*year)), y.scale(*value), 5.0),
                        Style::fill(color).with_stroke("#fff", 1.0),
                    )
                    .with_datum(Datum::new([
                        (*country).clone(),
                        format!("Year: {year}"),
                        format!("Value: {value:.2}%"),
                    ])),
                );
            }
        }
        panel
    }
}

/// Whole years between `first` and `last`, thinned to at most about eight.
fn year_ticks(first: i32, last: i32) -> Vec<f64> {
    let span = (last - first).max(0);
    let step = (span / 8 + 1).max(1);
    (first..=last)
        .step_by(usize::try_from(step).unwrap_or(1))
        .map(f64::from)
        .collect()
}

impl Chart for RevenueChart {
    fn title(&self) -> &str {
        &self.title
    }

    fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    fn years(&self) -> Vec<i32> {
        self.years.iter().copied().collect()
    }

    fn entities(&self) -> Vec<String> {
        self.series.entities().map(str::to_string).collect()
    }

    fn render(&self, view: &View) -> Scene {
        let Some(year) = view.resolve_year(&self.years()) else {
            return super::placeholder(view, "No data for the selected year");
        };
        let focused = view.interaction.drill.focused();
        if focused.is_empty() && self.ranking(year).is_empty() {
            return super::no_data_for(view, year);
        }
        let mut scene = Scene::new(view.width, view.height);
        let body_height = (view.height - HEADER).max(0.0);

        if focused.is_empty() {
            scene.push(title(view, &format!("All Countries - {year}"), 24.0));
            let mut body = Group::new((0.0, HEADER));
            body.push(self.bars(year, view.width, body_height, focused));
            scene.push(body);
        } else {
            let half = view.width / 2.0;
            scene.push(
                Label::new(half / 2.0, 24.0, format!("All Countries - {year}"))
                    .anchor(Anchor::Middle)
                    .size(16.0)
                    .bold(),
            );
            scene.push(
                Label::new(
                    half + half / 2.0,
                    24.0,
                    format!("{} Countries Selected - Over Time", focused.len()),
                )
                .anchor(Anchor::Middle)
                .size(16.0)
                .bold(),
            );
            let mut left = Group::new((0.0, HEADER));
            left.push(self.bars(year, half, body_height, focused));
            scene.push(left);
            let mut right = Group::new((half, HEADER));
            right.push(self.trends(focused, half, body_height));
            scene.push(right);
        }

        finish(scene, view)
    }
}
