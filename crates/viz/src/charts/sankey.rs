//! Flows from age groups to online activities.
//!
//! The layout places nodes in columns by their longest path from a source,
//! sizes them by the larger of their inflow and outflow, stacks each column
//! with fixed padding and joins them with horizontal cubic ribbons.

use super::{finish, placeholder, Chart, View};
use crate::error::{VizError, VizResult};
use crate::scene::{Anchor, Datum, Group, Label, Scene, Shape, ShapeKind, Style};
use crate::svg::num;
use eurochart_series::CategoryTable;
use serde::Serialize;
use std::collections::{HashMap, VecDeque};
use tracing::warn;

pub const NODE_WIDTH: f64 = 15.0;
pub const NODE_PADDING: f64 = 20.0;
const NODE_FILL: &str = "#007acc";
const LINK_STROKE: &str = "#69b3a2";

/// A weighted edge between two named nodes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SankeyLink {
    pub source: String,
    pub target: String,
    pub value: f64,
}

/// Nodes and links before layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SankeyGraph {
    pub nodes: Vec<String>,
    pub links: Vec<SankeyLink>,
}

impl SankeyGraph {
    pub fn link(&mut self, source: &str, target: &str, value: f64) {
        for name in [source, target] {
            if !self.nodes.iter().any(|n| n == name) {
                self.nodes.push(name.to_string());
            }
        }
        self.links.push(SankeyLink {
            source: source.to_string(),
            target: target.to_string(),
            value,
        });
    }

    /// Share of each age group doing each activity.
    #[must_use]
    pub fn digital_activities() -> Self {
        const FLOWS: [(&str, [f64; 3]); 6] = [
            ("16–24", [88.0, 91.0, 35.0]),
            ("25–34", [90.0, 85.0, 30.0]),
            ("35–44", [85.0, 72.0, 22.0]),
            ("45–54", [80.0, 60.0, 18.0]),
            ("55–64", [70.0, 45.0, 12.0]),
            ("65–74", [55.0, 25.0, 6.0]),
        ];
        const ACTIVITIES: [&str; 3] = ["Emails", "Social Media", "Online Courses"];

        let mut graph = Self::default();
        for (group, values) in FLOWS {
            for (activity, value) in ACTIVITIES.iter().zip(values) {
                graph.link(group, activity, value);
            }
        }
        graph
    }

    /// One link per (group, category) cell with a positive value.
    #[must_use]
    pub fn from_categories(table: &CategoryTable) -> Self {
        let mut graph = Self::default();
        for (group, category, value) in table.flows() {
            if value > 0.0 {
                graph.link(group, category, value);
            }
        }
        graph
    }

    /// Lay the graph out in `width` x `height`.
    pub fn layout(&self, width: f64, height: f64) -> VizResult<SankeyLayout> {
        let index: HashMap<&str, usize> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, name)| (name.as_str(), i))
            .collect();
        let mut edges = Vec::with_capacity(self.links.len());
        for link in &self.links {
            let source = *index
                .get(link.source.as_str())
                .ok_or_else(|| VizError::UnknownNode(link.source.clone()))?;
            let target = *index
                .get(link.target.as_str())
                .ok_or_else(|| VizError::UnknownNode(link.target.clone()))?;
            edges.push((source, target, link.value.max(0.0)));
        }

        let columns = self.columns(&edges)?;
        let last_column = columns.iter().copied().max().unwrap_or(0);

        let mut inflow = vec![0.0_f64; self.nodes.len()];
        let mut outflow = vec![0.0_f64; self.nodes.len()];
        for (source, target, value) in &edges {
            outflow[*source] += value;
            inflow[*target] += value;
        }
        let values: Vec<f64> = inflow
            .iter()
            .zip(&outflow)
            .map(|(i, o)| i.max(*o))
            .collect();

        // One vertical scale for all columns, fitted to the fullest one
        let mut per_column: Vec<Vec<usize>> = vec![Vec::new(); last_column + 1];
        for (node, column) in columns.iter().enumerate() {
            per_column[*column].push(node);
        }
        let ky = per_column
            .iter()
            .filter(|nodes| !nodes.is_empty())
            .map(|nodes| {
                let total: f64 = nodes.iter().map(|n| values[*n]).sum();
                let room = height - (nodes.len() - 1) as f64 * NODE_PADDING;
                if total > 0.0 {
                    (room / total).max(0.0)
                } else {
                    f64::INFINITY
                }
            })
            .fold(f64::INFINITY, f64::min);
        let ky = if ky.is_finite() { ky } else { 0.0 };

        let step = if last_column == 0 {
            0.0
        } else {
            (width - NODE_WIDTH) / last_column as f64
        };
        let mut nodes: Vec<SankeyNode> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, name)| SankeyNode {
                name: name.clone(),
                column: columns[i],
                value: values[i],
                x0: columns[i] as f64 * step,
                x1: columns[i] as f64 * step + NODE_WIDTH,
                y0: 0.0,
                y1: 0.0,
            })
            .collect();

        for members in &per_column {
            let used: f64 = members.iter().map(|n| values[*n] * ky).sum::<f64>()
                + members.len().saturating_sub(1) as f64 * NODE_PADDING;
            let mut y = ((height - used) / 2.0).max(0.0);
            for node in members {
                nodes[*node].y0 = y;
                nodes[*node].y1 = y + values[*node] * ky;
                y = nodes[*node].y1 + NODE_PADDING;
            }
        }

        let links = self.ribbons(&edges, &nodes, ky);
        Ok(SankeyLayout { nodes, links })
    }

    /// Longest path from any source, by Kahn's topological order.
    fn columns(&self, edges: &[(usize, usize, f64)]) -> VizResult<Vec<usize>> {
        let mut incoming = vec![0usize; self.nodes.len()];
        for (_, target, _) in edges {
            incoming[*target] += 1;
        }
        let mut queue: VecDeque<usize> = (0..self.nodes.len())
            .filter(|n| incoming[*n] == 0)
            .collect();
        let mut columns = vec![0usize; self.nodes.len()];
        let mut visited = 0;

        while let Some(node) = queue.pop_front() {
            visited += 1;
            for (source, target, _) in edges.iter().filter(|(s, _, _)| *s == node) {
                columns[*target] = columns[*target].max(columns[*source] + 1);
                incoming[*target] -= 1;
                if incoming[*target] == 0 {
                    queue.push_back(*target);
                }
            }
        }

        if visited < self.nodes.len() {
            let stuck = incoming
                .iter()
                .position(|count| *count > 0)
                .map(|n| self.nodes[n].clone())
                .unwrap_or_default();
            return Err(VizError::Cycle(stuck));
        }
        Ok(columns)
    }

    /// Link ends stacked inside their nodes: outgoing links in the order of
    /// their targets, incoming links in the order of their sources.
    fn ribbons(
        &self,
        edges: &[(usize, usize, f64)],
        nodes: &[SankeyNode],
        ky: f64,
    ) -> Vec<Ribbon> {
        let mut order: Vec<usize> = (0..edges.len()).collect();

        let mut source_y: Vec<f64> = nodes.iter().map(|n| n.y0).collect();
        order.sort_by(|a, b| nodes[edges[*a].1].y0.total_cmp(&nodes[edges[*b].1].y0));
        let mut starts = vec![0.0; edges.len()];
        for link in &order {
            let (source, _, value) = edges[*link];
            let width = value * ky;
            starts[*link] = source_y[source] + width / 2.0;
            source_y[source] += width;
        }

        let mut target_y: Vec<f64> = nodes.iter().map(|n| n.y0).collect();
        order.sort_by(|a, b| nodes[edges[*a].0].y0.total_cmp(&nodes[edges[*b].0].y0));
        let mut ends = vec![0.0; edges.len()];
        for link in &order {
            let (_, target, value) = edges[*link];
            let width = value * ky;
            ends[*link] = target_y[target] + width / 2.0;
            target_y[target] += width;
        }

        edges
            .iter()
            .enumerate()
            .map(|(i, (source, target, value))| Ribbon {
                source: self.nodes[*source].clone(),
                target: self.nodes[*target].clone(),
                value: *value,
                width: value * ky,
                x0: nodes[*source].x1,
                y0: starts[i],
                x1: nodes[*target].x0,
                y1: ends[i],
            })
            .collect()
    }
}

/// A placed node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SankeyNode {
    pub name: String,
    pub column: usize,
    pub value: f64,
    pub x0: f64,
    pub x1: f64,
    pub y0: f64,
    pub y1: f64,
}

/// A placed link: a stroke of `width` along the centre line from
/// (`x0`, `y0`) to (`x1`, `y1`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ribbon {
    pub source: String,
    pub target: String,
    pub value: f64,
    pub width: f64,
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl Ribbon {
    /// Cubic curve with both control points halfway across.
    #[must_use]
    pub fn path(&self) -> String {
        let mid = (self.x0 + self.x1) / 2.0;
        format!(
            "M{},{}C{},{} {},{} {},{}",
            num(self.x0),
            num(self.y0),
            num(mid),
            num(self.y0),
            num(mid),
            num(self.y1),
            num(self.x1),
            num(self.y1)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SankeyLayout {
    pub nodes: Vec<SankeyNode>,
    pub links: Vec<Ribbon>,
}

impl SankeyLayout {
    #[must_use]
    pub fn node(&self, name: &str) -> Option<&SankeyNode> {
        self.nodes.iter().find(|n| n.name == name)
    }
}

pub struct SankeyChart {
    title: String,
    graph: SankeyGraph,
}

impl SankeyChart {
    #[must_use]
    pub fn new(graph: SankeyGraph) -> Self {
        Self {
            title: "Digital Activity by Age Group".to_string(),
            graph,
        }
    }
}

impl Chart for SankeyChart {
    fn title(&self) -> &str {
        &self.title
    }

    fn is_empty(&self) -> bool {
        self.graph.links.is_empty()
    }

    fn render(&self, view: &View) -> Scene {
        let (inner_w, inner_h) = ((view.width - 2.0).max(0.0), (view.height - 7.0).max(0.0));
        let layout = match self.graph.layout(inner_w, inner_h) {
            Ok(layout) => layout,
            Err(e) => {
                warn!(error = %e, "sankey layout failed");
                return placeholder(view, &format!("Cannot lay out diagram: {e}"));
            }
        };

        let mut scene = Scene::new(view.width, view.height);
        let mut links = Group::new((1.0, 1.0)).with_class("links");
        for link in &layout.links {
            links.push(
                Shape::new(
                    format!("link:{}->{}", link.source, link.target),
                    ShapeKind::Path { d: link.path() },
                    Style::stroke(LINK_STROKE, link.width.max(1.0)).with_opacity(0.6),
                )
                .with_datum(Datum::new([
                    format!("{} → {}", link.source, link.target),
                    format!("{}%", num(link.value)),
                ])),
            );
        }
        scene.push(links);

        let mut nodes = Group::new((1.0, 1.0)).with_class("nodes");
        for node in &layout.nodes {
            nodes.push(
                Shape::new(
                    format!("node:{}", node.name),
                    ShapeKind::Rect {
                        x: node.x0,
                        y: node.y0,
                        width: node.x1 - node.x0,
                        height: node.y1 - node.y0,
                        rx: 4.0,
                    },
                    Style::fill(NODE_FILL),
                )
                .with_datum(Datum::new([
                    node.name.clone(),
                    format!("Total flow: {}", num(node.value)),
                ])),
            );
            let middle = (node.y0 + node.y1) / 2.0 + 5.0;
            let label = if node.x0 < view.width / 2.0 {
                Label::new(node.x1 + 6.0, middle, node.name.as_str())
            } else {
                Label::new(node.x0 - 6.0, middle, node.name.as_str()).anchor(Anchor::End)
            };
            nodes.push(label.size(14.0));
        }
        scene.push(nodes);

        finish(scene, view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eurochart_series::CategoryGroup;

    #[test]
    fn test_builtin_layout() {
        let graph = SankeyGraph::digital_activities();
        assert_eq!(graph.nodes.len(), 9);
        assert_eq!(graph.links.len(), 18);

        let layout = graph.layout(798.0, 493.0).unwrap();
        let young = layout.node("16–24").unwrap();
        let emails = layout.node("Emails").unwrap();
        assert_eq!(young.column, 0);
        assert_eq!(emails.column, 1);
        assert_eq!(young.value, 214.0);
        assert_eq!(emails.value, 468.0);
        assert_eq!(young.x0, 0.0);
        assert_eq!(emails.x1, 798.0);

        // Nodes in a column do not overlap and keep the padding
        let second = layout.node("25–34").unwrap();
        assert!((second.y0 - young.y1 - NODE_PADDING).abs() < 1e-9);
    }

    #[test]
    fn test_link_widths_fill_nodes() {
        let layout = SankeyGraph::digital_activities().layout(798.0, 493.0).unwrap();
        let young = layout.node("16–24").unwrap();
        let total: f64 = layout
            .links
            .iter()
            .filter(|l| l.source == "16–24")
            .map(|l| l.width)
            .sum();
        assert!((total - (young.y1 - young.y0)).abs() < 1e-9);
        let first = layout.links.iter().find(|l| l.source == "16–24").unwrap();
        assert!(first.y0 >= young.y0 && first.y0 <= young.y1);
    }

    #[test]
    fn test_longest_path_columns() {
        let mut graph = SankeyGraph::default();
        graph.link("a", "b", 1.0);
        graph.link("b", "c", 1.0);
        graph.link("a", "c", 1.0);
        let layout = graph.layout(100.0, 100.0).unwrap();
        assert_eq!(layout.node("c").unwrap().column, 2);
    }

    #[test]
    fn test_layout_errors() {
        let mut graph = SankeyGraph::default();
        graph.link("a", "b", 1.0);
        graph.link("b", "a", 1.0);
        assert!(matches!(graph.layout(100.0, 100.0), Err(VizError::Cycle(_))));

        let graph = SankeyGraph {
            nodes: vec!["a".to_string()],
            links: vec![SankeyLink {
                source: "a".to_string(),
                target: "z".to_string(),
                value: 1.0,
            }],
        };
        assert!(matches!(
            graph.layout(100.0, 100.0),
            Err(VizError::UnknownNode(name)) if name == "z"
        ));
    }

    #[test]
    fn test_from_categories() {
        let table = CategoryTable {
            categories: vec!["Emails".to_string(), "Banking".to_string()],
            groups: vec![CategoryGroup {
                label: "16-24".to_string(),
                values: vec![80.0, 0.0],
            }],
        };
        let graph = SankeyGraph::from_categories(&table);
        assert_eq!(graph.links.len(), 1);
        assert_eq!(graph.nodes, vec!["16-24", "Emails"]);
    }

    #[test]
    fn test_render_titles() {
        let chart = SankeyChart::new(SankeyGraph::digital_activities());
        let scene = chart.render(&View::new(800.0, 500.0));
        let link = scene.shape("link:16–24->Emails").unwrap();
        assert_eq!(link.datum.as_ref().unwrap().text(), "16–24 → Emails\n88%");
        let node = scene.shape("node:16–24").unwrap();
        assert!(node.datum.as_ref().unwrap().contains("Total flow: 214"));
        assert!(scene.has_text("Online Courses"));
    }
}
