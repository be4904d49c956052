//! Daily internet use by gender and age band for one country.

use super::{axis_line, finish, legend_entry, title, Chart, Margin, View};
use crate::scale::{BandScale, LinearScale};
use crate::scene::{Anchor, Datum, Group, Label, Scene, Shape, ShapeKind, Style};
use crate::svg::percent;
use eurochart_series::{Cohort, CohortTable, Gender};

pub const MALE_FILL: &str = "#3498db";
pub const FEMALE_FILL: &str = "#e74c3c";

const TICK_CANDIDATES: [f64; 9] = [-100.0, -80.0, -50.0, -20.0, 0.0, 20.0, 50.0, 80.0, 100.0];

pub struct Pyramid {
    title: String,
    table: CohortTable,
}

impl Pyramid {
    #[must_use]
    pub fn new(table: CohortTable) -> Self {
        Self {
            title: "Daily Internet Usage by Gender and Age Group".to_string(),
            table,
        }
    }

    /// The selected entity when known, else the first selectable one.
    fn entity<'a>(&'a self, view: &'a View) -> Option<&'a str> {
        match view.entity.as_deref() {
            Some(entity) if self.table.contains(entity) => Some(entity),
            _ => self.table.entities().first().copied(),
        }
    }

    /// Years the year selector offers for `entity`.
    #[must_use]
    pub fn years_for(&self, entity: &str) -> Vec<i32> {
        self.table.years_with_data(entity)
    }
}

/// Age band labels ordered from the oldest down to the youngest, so the
/// youngest band sits at the bottom.
fn age_bands(cohorts: &[Cohort]) -> Vec<String> {
    let mut bands: Vec<(u32, String)> = cohorts
        .iter()
        .map(|c| (c.age_start, c.age_group()))
        .collect();
    bands.sort();
    bands.dedup();
    bands.into_iter().rev().map(|(_, label)| label).collect()
}

fn cohort_bar(cohort: &Cohort, x: &LinearScale, bands: &BandScale) -> Option<Shape> {
    let band = cohort.age_group();
    let y = bands.position(&band)?;
    let (id, fill, left, right) = match cohort.gender {
        Gender::Male => ("male", MALE_FILL, x.scale(-cohort.value), x.scale(0.0)),
        Gender::Female => ("female", FEMALE_FILL, x.scale(0.0), x.scale(cohort.value)),
    };
    Some(
        Shape::new(
            format!("{id}:{band}"),
            ShapeKind::rect(left, y, right - left, bands.bandwidth()),
            Style::fill(fill).with_opacity(0.85),
        )
        .with_datum(Datum::new([
            format!("Age Group: {band}"),
            format!("Gender: {}", cohort.gender),
            format!("Daily Internet Usage: {}", percent(cohort.value)),
        ])),
    )
}

impl Chart for Pyramid {
    fn title(&self) -> &str {
        &self.title
    }

    fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    fn years(&self) -> Vec<i32> {
        self.table.years()
    }

    fn entities(&self) -> Vec<String> {
        self.table.entities().into_iter().map(str::to_string).collect()
    }

    fn render(&self, view: &View) -> Scene {
        let Some(entity) = self.entity(view) else {
            return super::placeholder(view, "No country selected");
        };
        let Some(year) = view.resolve_year(&self.years_for(entity)) else {
            return super::placeholder(view, &format!("No data for {entity}"));
        };
        let cohorts = self.table.cohorts(entity, year);

        let margin = Margin::new(60.0, 120.0, 80.0, 120.0);
        let (width, height) = margin.inner(view.width, view.height);
        let mut scene = Scene::new(view.width, view.height);
        scene.push(title(
            view,
            &format!("{} ({entity}, {year})", self.title),
            margin.top / 2.0,
        ));

        let max = cohorts.iter().map(|c| c.value).fold(0.0, f64::max);
        let x = LinearScale::new((-max, max), (0.0, width));
        let bands = BandScale::new(age_bands(cohorts), (0.0, height), 0.3);

        let mut chart = Group::new(margin.origin()).with_class("pyramid");
        for cohort in cohorts {
            if let Some(bar) = cohort_bar(cohort, &x, &bands) {
                chart.push(bar);
            }
        }

        // Axes
        chart.push(axis_line(0.0, height, width, height));
        for tick in TICK_CANDIDATES.iter().filter(|t| t.abs() <= max) {
            let tx = x.scale(*tick);
            chart.push(axis_line(tx, height, tx, height + 6.0));
            chart.push(
                Label::new(tx, height + 20.0, format!("{}%", tick.abs()))
                    .anchor(Anchor::Middle)
                    .size(11.0),
            );
        }
        for band in bands.keys() {
            if let Some(center) = bands.center(band) {
                chart.push(
                    Label::new(-10.0, center + 4.0, band)
                        .anchor(Anchor::End)
                        .size(11.0),
                );
            }
        }
        chart.push(Shape::new(
            "",
            ShapeKind::line(x.scale(0.0), 0.0, x.scale(0.0), height),
            Style::stroke("#333", 1.0).with_dash("3,3"),
        ));
        chart.push(
            Label::new(-height / 2.0, -margin.left + 20.0, "Age Groups")
                .anchor(Anchor::Middle)
                .rotate(-90.0),
        );
        chart.push(
            Label::new(width / 2.0, height + margin.bottom - 10.0, "Daily Internet Usage (%)")
                .anchor(Anchor::Middle),
        );
        scene.push(chart);

        let mut legend =
            Group::new((margin.left + width + 40.0, margin.top)).with_class("legend");
        for element in legend_entry(0.0, MALE_FILL, "Male") {
            legend.push(element);
        }
        for element in legend_entry(25.0, FEMALE_FILL, "Female") {
            legend.push(element);
        }
        scene.push(legend);

        finish(scene, view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eurochart_series::{cohort_options, YearRange, EU27};
    use eurochart_sheet::{Book, CellValue, Sheet};

    fn cohort_sheet(description: &str, rows: &[(&str, &str, &str)]) -> Sheet {
        let mut data: Vec<Vec<CellValue>> = vec![
            vec!["Individual type".into(), description.into()],
            vec!["TIME".into(), "2023".into(), "2024".into()],
        ];
        for (geo, a, b) in rows {
            data.push(vec![(*geo).into(), (*a).into(), (*b).into()]);
        }
        Sheet::from_rows("cohort", data)
    }

    fn pyramid() -> Pyramid {
        let mut book = Book::new();
        let sheets = [
            ("Males 16 to 24 years old", "96", "40"),
            ("Females 16 to 24 years old", "97", "42"),
            ("Males 65 to 74 years old", "60", "30"),
            ("Females 65 to 74 years old", "55", ":"),
        ];
        for (index, (description, eu, belgium)) in sheets.iter().enumerate() {
            book.add_sheet(
                &format!("Sheet {index}"),
                cohort_sheet(description, &[(EU27, eu, eu), ("Belgium", belgium, ":")]),
            )
            .unwrap();
        }
        Pyramid::new(CohortTable::from_book(&book, &cohort_options(YearRange::default())))
    }

    #[test]
    fn test_defaults_to_eu_aggregate() {
        let pyramid = pyramid();
        assert_eq!(pyramid.entities()[0], EU27);
        let scene = pyramid.render(&View::new(800.0, 500.0));
        assert!(scene.has_text(&format!("{} ({EU27}, 2024)", pyramid.title())));
        assert_eq!(scene.shapes().iter().filter(|s| s.id.contains(':')).count(), 4);
    }

    #[test]
    fn test_bars_extend_from_centre() {
        let scene = pyramid().render(&View::new(800.0, 500.0));
        let ShapeKind::Rect { x: male_x, width: male_w, y: young_y, .. } =
            scene.shape("male:16-24").unwrap().kind
        else {
            panic!("bar is a rect");
        };
        let ShapeKind::Rect { x: female_x, y: old_y, .. } = scene.shape("female:65-74").unwrap().kind
        else {
            panic!("bar is a rect");
        };
        assert!((male_x + male_w - female_x).abs() < 1e-9);
        assert!(young_y > old_y, "youngest band sits at the bottom");
        assert!(scene.has_text("80%"));
        assert!(!scene.has_text("100%"));
    }

    #[test]
    fn test_country_years() {
        let pyramid = pyramid();
        assert_eq!(pyramid.years_for("Belgium"), vec![2023]);

        let view = View::new(800.0, 500.0)
            .with_entity(Some("Belgium".to_string()))
            .with_year(Some(2024));
        let scene = pyramid.render(&view);
        assert!(scene.has_text(&format!("{} (Belgium, 2023)", pyramid.title())));
        let female = scene.shape("female:16-24").unwrap();
        assert!(female
            .datum
            .as_ref()
            .unwrap()
            .contains("Daily Internet Usage: 42.0%"));
    }
}
