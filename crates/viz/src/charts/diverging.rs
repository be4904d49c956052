//! Share of people who never used the internet, as divergence from the
//! average of the countries shown.

use super::{finish, legend_entry, tick_percent, title, x_axis, Chart, Margin, View};
use crate::scale::{BandScale, LinearScale};
use crate::scene::{Anchor, Datum, Group, Label, Scene, Shape, ShapeKind, Style};
use crate::svg::{percent, signed_percent};
use eurochart_series::{EntitySeries, EU27};
use std::collections::BTreeSet;

pub const ABOVE_FILL: &str = "#d32f2f";
pub const BELOW_FILL: &str = "#1976d2";

/// Rows that are aggregates or header residue rather than countries.
pub const EXCLUDED_ROWS: [&str; 4] = [EU27, "European Union", "GEO", "GEO (Labels)"];

pub struct DivergingBars {
    title: String,
    series: EntitySeries,
    years: BTreeSet<i32>,
}

impl DivergingBars {
    #[must_use]
    pub fn new(series: EntitySeries) -> Self {
        Self {
            title: "Digital Exclusion: Never Used Internet (Divergence from EU Average)"
                .to_string(),
            years: series.years(),
            series,
        }
    }

    /// Offer `years` too, even where no country has a value.
    #[must_use]
    pub fn with_years(mut self, years: impl IntoIterator<Item = i32>) -> Self {
        self.years.extend(years);
        self
    }

    /// Values for `year` in alphabetical order and their mean.
    #[must_use]
    pub fn divergence(&self, year: i32) -> (Vec<(String, f64)>, f64) {
        let values: Vec<(String, f64)> = self.series.for_year(year).into_iter().collect();
        if values.is_empty() {
            return (values, 0.0);
        }
        let average = values.iter().map(|(_, v)| v).sum::<f64>() / values.len() as f64;
        (values, average)
    }
}

impl Chart for DivergingBars {
    fn title(&self) -> &str {
        &self.title
    }

    fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    fn years(&self) -> Vec<i32> {
        self.years.iter().copied().collect()
    }

    fn render(&self, view: &View) -> Scene {
        let Some(year) = view.resolve_year(&self.years()) else {
            return super::placeholder(view, "No data for the selected year");
        };
        let (values, average) = self.divergence(year);
        if values.is_empty() {
            return super::no_data_for(view, year);
        }

        let margin = Margin::new(60.0, 200.0, 120.0, 180.0);
        let (width, height) = margin.inner(view.width, view.height);
        let mut scene = Scene::new(view.width, view.height);
        scene.push(title(view, &format!("{} {year}", self.title), margin.top / 2.0));

        let lowest = values.iter().map(|(_, v)| v - average).fold(0.0, f64::min);
        let highest = values.iter().map(|(_, v)| v - average).fold(0.0, f64::max);
        let x = LinearScale::new((lowest * 1.1, highest * 1.1), (0.0, width));
        let countries: Vec<String> = values.iter().map(|(c, _)| c.clone()).collect();
        let y = BandScale::new(countries, (0.0, height), 0.1);
        let zero = x.scale(0.0);

        let mut chart = Group::new(margin.origin()).with_class("bars");
        for (country, value) in &values {
            let Some(top) = y.position(country) else {
                continue;
            };
            let difference = value - average;
            let end = x.scale(difference);
            let fill = if difference > 0.0 { ABOVE_FILL } else { BELOW_FILL };
            chart.push(
                Shape::new(
                    format!("bar:{country}"),
                    ShapeKind::rect(zero.min(end), top, (end - zero).abs(), y.bandwidth()),
                    Style::fill(fill),
                )
                .with_datum(Datum::new([
                    country.clone(),
                    format!("Never Used Internet: {}", percent(*value)),
                    format!("EU Average: {}", percent(average)),
                    format!("Divergence: {}", signed_percent(difference)),
                ])),
            );
            chart.push(
                Label::new(-10.0, top + y.bandwidth() / 2.0 + 4.0, country.as_str())
                    .anchor(Anchor::End)
                    .size(11.0),
            );
        }

        chart.push(Shape::new(
            "average",
            ShapeKind::line(zero, 0.0, zero, height),
            Style::stroke("#333", 2.0).with_dash("5,5"),
        ));
        chart.push(
            Label::new(zero, -10.0, "EU Average")
                .anchor(Anchor::Middle)
                .size(12.0)
                .bold(),
        );
        chart.push(x_axis(&x, &x.ticks(8), height, tick_percent));
        chart.push(
            Label::new(width / 2.0, height + 50.0, "Divergence from EU Average (%)")
                .anchor(Anchor::Middle),
        );
        chart.push(
            Label::new(-height / 2.0, -margin.left + 20.0, "Country")
                .anchor(Anchor::Middle)
                .rotate(-90.0),
        );
        scene.push(chart);

        let mut legend =
            Group::new((margin.left + width + 30.0, margin.top)).with_class("legend");
        for element in legend_entry(0.0, ABOVE_FILL, "Above EU Average") {
            legend.push(element);
        }
        for element in legend_entry(25.0, BELOW_FILL, "Below EU Average") {
            legend.push(element);
        }
        scene.push(legend);

        finish(scene, view)
    }
}
