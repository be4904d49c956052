//! Internet access by region on a map.

use super::{finish, tick_percent, title, Chart, View};
use crate::color::{blues, SequentialScale, NO_DATA_FILL};
use crate::geo::{Projection, Region};
use crate::scale::LinearScale;
use crate::scene::{Anchor, Datum, Gradient, Group, Label, Scene, Shape, ShapeKind, Style};
use crate::svg::percent;
use eurochart_series::{EntitySeries, NameCorrections};
use std::collections::BTreeSet;

/// Access shares are drawn on a fixed scale so years compare.
pub const ACCESS_DOMAIN: (f64, f64) = (50.0, 100.0);

const LEGEND_ID: &str = "choropleth-legend";
const LEGEND_WIDTH: f64 = 20.0;
const LEGEND_HEIGHT: f64 = 200.0;
const LEGEND_SPACE: f64 = 90.0;
const TOP: f64 = 40.0;

pub struct Choropleth {
    title: String,
    regions: Vec<Region>,
    series: EntitySeries,
    years: BTreeSet<i32>,
}

impl Choropleth {
    /// Region names go through `corrections` so they match the sheet's
    /// corrected entity names.
    #[must_use]
    pub fn new(
        mut regions: Vec<Region>,
        series: EntitySeries,
        corrections: &NameCorrections,
    ) -> Self {
        for region in &mut regions {
            let corrected = corrections.correct(&region.name).to_string();
            region.name = corrected;
        }
        Self {
            title: "Internet Access in Europe".to_string(),
            regions,
            years: series.years(),
            series,
        }
    }

    /// Offer `years` too, even where no region has a value.
    #[must_use]
    pub fn with_years(mut self, years: impl IntoIterator<Item = i32>) -> Self {
        self.years.extend(years);
        self
    }

    #[must_use]
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    fn region_shape(
        &self,
        region: &Region,
        projection: &Projection,
        year: Option<i32>,
        scale: &SequentialScale,
    ) -> Shape {
        let value = year.and_then(|year| self.series.value(&region.name, year));
        let fill = value.map_or_else(|| NO_DATA_FILL.to_string(), |v| scale.color(v));
        let year_line = year.map_or_else(|| "Year: -".to_string(), |y| format!("Year: {y}"));
        let value_line = value.map_or_else(
            || "No Data Available".to_string(),
            |v| format!("Access: {}", percent(v)),
        );

        Shape::new(
            format!("region:{}", region.name),
            ShapeKind::Path {
                d: projection.path(region),
            },
            Style::fill(fill).with_stroke("#fff", 0.5),
        )
        .with_datum(Datum::new([region.name.clone(), year_line, value_line]))
    }
}

impl Chart for Choropleth {
    fn title(&self) -> &str {
        &self.title
    }

    fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    fn years(&self) -> Vec<i32> {
        self.years.iter().copied().collect()
    }

    fn entities(&self) -> Vec<String> {
        self.regions.iter().map(|r| r.name.clone()).collect()
    }

    fn render(&self, view: &View) -> Scene {
        let year = view.resolve_year(&self.years());
        let mut scene = Scene::new(view.width, view.height);
        let heading = match year {
            Some(year) => format!("{} ({year})", self.title),
            None => self.title.clone(),
        };
        scene.push(title(view, &heading, 24.0));

        let map_width = (view.width - LEGEND_SPACE).max(0.0);
        let map_height = (view.height - TOP).max(0.0);
        let projection = Projection::fit(&self.regions, map_width, map_height, 10.0);
        let colors = SequentialScale::blues(ACCESS_DOMAIN);

        let mut map = Group::new((0.0, TOP)).with_class("regions");
        for region in &self.regions {
            map.push(self.region_shape(region, &projection, year, &colors));
        }
        scene.push(map);

        let legend_y = TOP + ((map_height - LEGEND_HEIGHT) / 2.0).max(20.0);
        legend(&mut scene, map_width + 10.0, legend_y);

        if year.is_none() {
            scene.push(
                Label::new(view.width / 2.0, view.height - 10.0, "No yearly data available")
                    .anchor(Anchor::Middle)
                    .fill("#666"),
            );
        }
        finish(scene, view)
    }
}

fn legend(scene: &mut Scene, x: f64, y: f64) {
    scene.add_gradient(Gradient {
        id: LEGEND_ID.to_string(),
        vertical: true,
        stops: (0..=10_u8)
            .map(|i| {
                let t = f64::from(i) / 10.0;
                (t, blues(t))
            })
            .collect(),
    });

    let mut legend = Group::new((x, y)).with_class("legend");
    legend.push(
        Label::new(0.0, -10.0, "Access (%)")
            .size(12.0)
            .bold(),
    );
    legend.push(Shape::new(
        "",
        ShapeKind::rect(0.0, 0.0, LEGEND_WIDTH, LEGEND_HEIGHT),
        Style::fill(format!("url(#{LEGEND_ID})")).with_stroke("#333", 0.5),
    ));

    let axis = LinearScale::new(ACCESS_DOMAIN, (LEGEND_HEIGHT, 0.0));
    for tick in axis.ticks(5) {
        let ty = axis.scale(tick);
        legend.push(Shape::new(
            "",
            ShapeKind::line(LEGEND_WIDTH, ty, LEGEND_WIDTH + 5.0, ty),
            Style::stroke("#333", 1.0),
        ));
        legend.push(Label::new(LEGEND_WIDTH + 8.0, ty + 4.0, tick_percent(tick)).size(11.0));
    }
    scene.push(legend);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::parse_regions;

    const MAP: &str = r#"{"type":"FeatureCollection","features":[
        {"type":"Feature","properties":{"NAME":"Westland"},
         "geometry":{"type":"Polygon","coordinates":[[[0,40],[10,40],[10,50],[0,50],[0,40]]]}},
        {"type":"Feature","properties":{"NAME":"Czech Republic"},
         "geometry":{"type":"Polygon","coordinates":[[[10,40],[20,40],[20,50],[10,50],[10,40]]]}}
    ]}"#;

    fn chart() -> Choropleth {
        let regions = parse_regions(MAP.as_bytes(), "NAME").unwrap();
        let mut series = EntitySeries::new();
        series.insert("Westland", 2023, 60.0);
        series.insert("Westland", 2024, 100.0);
        series.insert("Czechia", 2024, 75.0);
        Choropleth::new(regions, series, &NameCorrections::eurostat())
    }

    #[test]
    fn test_region_names_corrected() {
        let chart = chart();
        assert_eq!(chart.entities(), vec!["Westland", "Czechia"]);
        assert_eq!(chart.years(), vec![2023, 2024]);
    }

    #[test]
    fn test_fill_and_tooltip() {
        let scene = chart().render(&View::new(600.0, 400.0));
        let westland = scene.shape("region:Westland").unwrap();
        assert_eq!(westland.style.fill.as_deref(), Some("#08306b"));
        let datum = westland.datum.as_ref().unwrap();
        assert_eq!(datum.lines, vec!["Westland", "Year: 2024", "Access: 100.0%"]);
        assert!(scene.has_text("Internet Access in Europe (2024)"));
        assert_eq!(scene.gradients[0].stops.len(), 11);
    }

    #[test]
    fn test_missing_year_gets_no_data_fill() {
        let scene = chart().render(&View::new(600.0, 400.0).with_year(Some(2023)));
        let czechia = scene.shape("region:Czechia").unwrap();
        assert_eq!(czechia.style.fill.as_deref(), Some(NO_DATA_FILL));
        assert!(czechia.datum.as_ref().unwrap().contains("No Data Available"));
    }

    #[test]
    fn test_header_year_without_values() {
        let chart = chart().with_years([2022, 2023]);
        assert_eq!(chart.years(), vec![2022, 2023, 2024]);

        let scene = chart.render(&View::new(600.0, 400.0).with_year(Some(2022)));
        assert!(scene.has_text("Internet Access in Europe (2022)"));
        let westland = scene.shape("region:Westland").unwrap();
        assert_eq!(westland.style.fill.as_deref(), Some(NO_DATA_FILL));
        assert_eq!(
            westland.datum.as_ref().unwrap().lines,
            vec!["Westland", "Year: 2022", "No Data Available"]
        );
    }
}
