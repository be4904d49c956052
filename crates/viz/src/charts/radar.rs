//! Online activities per age group, one radar per group.

use super::{finish, title, Chart, View};
use crate::color::RADAR_PALETTE;
use crate::scale::LinearScale;
use crate::scene::{Anchor, Datum, Group, Label, Scene, Shape, ShapeKind, Style};
use crate::svg::num;
use eurochart_series::{CategoryGroup, CategoryTable};
use std::f64::consts::{FRAC_PI_2, TAU};

const CELL: f64 = 320.0;
const CELL_MARGIN: f64 = 56.0;
const PER_ROW: usize = 4;
const LEVELS: u8 = 5;
const HEADER: f64 = 50.0;
const GRID_STROKE: &str = "#4a90e2";

pub struct RadarChart {
    title: String,
    table: CategoryTable,
}

impl RadarChart {
    /// `entity` names whose rows the table holds, for the heading.
    #[must_use]
    pub fn new(table: CategoryTable, entity: &str) -> Self {
        Self {
            title: format!("Internet Activities by Age Group ({entity})"),
            table,
        }
    }

    /// Top-left corner of the cell for the `index`-th group. Rows hold four
    /// cells; a short last row is centred.
    fn cell_origin(&self, index: usize) -> (f64, f64) {
        let total = self.table.groups.len();
        let row = index / PER_ROW;
        let col = index % PER_ROW;
        let in_row = (total - row * PER_ROW).min(PER_ROW);
        let offset = (PER_ROW - in_row) / 2;
        ((col + offset) as f64 * CELL, HEADER + row as f64 * (CELL + 30.0))
    }

    fn radar(&self, index: usize, group: &CategoryGroup) -> Group {
        let color = RADAR_PALETTE[index % RADAR_PALETTE.len()];
        let radius = CELL / 2.0 - CELL_MARGIN;
        let count = self.table.categories.len();
        let slice = TAU / count.max(1) as f64;
        let angle = |i: usize| i as f64 * slice - FRAC_PI_2;
        let at = |r: f64, i: usize| (r * angle(i).cos(), r * angle(i).sin());
        let r = LinearScale::new((0.0, group.max()), (0.0, radius));

        let (x, y) = self.cell_origin(index);
        let mut cell = Group::new((x + CELL / 2.0, y + CELL / 2.0)).with_class("radar");
        cell.push(
            Label::new(0.0, -CELL / 2.0 + 16.0, group.label.as_str())
                .anchor(Anchor::Middle)
                .size(16.0)
                .bold()
                .fill(color),
        );

        for level in 1..=LEVELS {
            let level_radius = radius / f64::from(LEVELS) * f64::from(level);
            cell.push(Shape::new(
                "",
                ShapeKind::Polygon {
                    points: (0..count).map(|i| at(level_radius, i)).collect(),
                },
                Style::fill("#23272e")
                    .with_stroke(GRID_STROKE, 0.5)
                    .with_opacity(0.3),
            ));
        }

        for (i, category) in self.table.categories.iter().enumerate() {
            let (ax, ay) = at(radius, i);
            cell.push(Shape::new(
                "",
                ShapeKind::line(0.0, 0.0, ax, ay),
                Style::stroke(GRID_STROKE, 1.2).with_opacity(0.7),
            ));
            let (lx, ly) = at(radius + 16.0, i);
            let cos = angle(i).cos();
            let rotation = if cos.abs() > 0.95 {
                90.0
            } else if cos.abs() > 0.85 && cos < 0.0 {
                -90.0
            } else {
                0.0
            };
            cell.push(
                Label::new(lx, ly, category.as_str())
                    .anchor(Anchor::Middle)
                    .size(11.0)
                    .bold()
                    .rotate(rotation),
            );
        }

        let points: Vec<(f64, f64)> = group
            .values
            .iter()
            .enumerate()
            .map(|(i, value)| at(r.scale(*value), i))
            .collect();
        cell.push(Shape::new(
            format!("area:{}", group.label),
            ShapeKind::Polygon {
                points: points.clone(),
            },
            Style::fill(format!("{color}22")).with_stroke(color, 3.5),
        ));

        let readings = self.table.categories.iter().zip(&group.values);
        for ((category, value), (px, py)) in readings.zip(points) {
            cell.push(
                Shape::new(
                    format!("point:{}:{category}", group.label),
                    ShapeKind::circle(px, py, 4.0),
                    Style::fill(color).with_stroke("#fff", 1.5),
                )
                .with_datum(Datum::new([
                    group.label.clone(),
                    format!("{category}: {}%", num(*value)),
                ])),
            );
        }
        cell
    }
}

impl Chart for RadarChart {
    fn title(&self) -> &str {
        &self.title
    }

    fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    fn entities(&self) -> Vec<String> {
        self.table.groups.iter().map(|g| g.label.clone()).collect()
    }

    fn render(&self, view: &View) -> Scene {
        let rows = self.table.groups.len().div_ceil(PER_ROW);
        let height = view.height.max(HEADER + rows as f64 * (CELL + 30.0));
        let width = view.width.max(PER_ROW as f64 * CELL);
        let mut scene = Scene::new(width, height);
        scene.push(title(view, &self.title, 28.0));

        for (index, group) in self.table.groups.iter().enumerate() {
            scene.push(self.radar(index, group));
        }
        finish(scene, view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(groups: usize) -> CategoryTable {
        CategoryTable {
            categories: vec![
                "Internet Banking".to_string(),
                "Online Learning".to_string(),
                "e-mail".to_string(),
                "social media".to_string(),
            ],
            groups: (0..groups)
                .map(|i| CategoryGroup {
                    label: format!("Group {i}"),
                    values: vec![80.0, 20.0, 90.0, 60.0 + i as f64],
                })
                .collect(),
        }
    }

    #[test]
    fn test_one_radar_per_group() {
        let scene = RadarChart::new(table(6), "Belgium").render(&View::new(1280.0, 800.0));
        assert!(scene.has_text("Internet Activities by Age Group (Belgium)"));
        for i in 0..6 {
            assert!(scene.shape(&format!("area:Group {i}")).is_some());
        }
        let point = scene.shape("point:Group 0:e-mail").unwrap();
        assert_eq!(point.datum.as_ref().unwrap().lines, vec!["Group 0", "e-mail: 90%"]);
        assert_eq!(point.style.fill.as_deref(), Some(RADAR_PALETTE[0]));
    }

    #[test]
    fn test_largest_value_reaches_the_rim() {
        let scene = RadarChart::new(table(1), "Belgium").render(&View::new(1280.0, 400.0));
        // e-mail is the third of four axes, pointing straight down
        let ShapeKind::Circle { cx, cy, .. } = scene.shape("point:Group 0:e-mail").unwrap().kind
        else {
            panic!("point is a circle");
        };
        assert!(cx.abs() < 1e-9);
        assert!((cy - (CELL / 2.0 - CELL_MARGIN)).abs() < 1e-9);
    }

    #[test]
    fn test_short_last_row_is_centred() {
        let chart = RadarChart::new(table(6), "Belgium");
        assert_eq!(chart.cell_origin(3), (3.0 * CELL, HEADER));
        assert_eq!(chart.cell_origin(4), (CELL, HEADER + CELL + 30.0));
        assert_eq!(chart.cell_origin(5), (2.0 * CELL, HEADER + CELL + 30.0));
    }

    #[test]
    fn test_polygon_is_translucent() {
        let scene = RadarChart::new(table(2), "Belgium").render(&View::new(1280.0, 800.0));
        let area = scene.shape("area:Group 1").unwrap();
        assert_eq!(area.style.fill.as_deref(), Some("#F7B32B22"));
        assert_eq!(area.style.stroke_width, Some(3.5));
    }
}
