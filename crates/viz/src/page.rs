//! One self-contained HTML document holding every rendered chart.

use crate::scene::Scene;
use crate::svg::escape_text;
use serde::Serialize;
use std::fmt::Write as _;

/// A rendered chart and what it was drawn for.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub id: String,
    pub heading: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    /// Years a viewer can step through.
    pub years: Vec<i32>,
    #[serde(skip)]
    pub svg: String,
}

impl Section {
    #[must_use]
    pub fn new(id: impl Into<String>, heading: impl Into<String>, scene: &Scene) -> Self {
        Self {
            id: id.into(),
            heading: heading.into(),
            caption: None,
            years: Vec::new(),
            svg: scene.to_svg(),
        }
    }

    #[must_use]
    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    #[must_use]
    pub fn with_years(mut self, years: Vec<i32>) -> Self {
        self.years = years;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Page {
    pub title: String,
    pub sections: Vec<Section>,
}

impl Page {
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            sections: Vec::new(),
        }
    }

    pub fn push(&mut self, section: Section) {
        self.sections.push(section);
    }

    /// Generate the HTML document with the SVGs inline.
    #[must_use]
    pub fn to_html(&self) -> String {
        let title = escape_text(&self.title);
        // Section metadata for scripts; `</` is escaped so it cannot close the tag
        let json = serde_json::to_string(&self.sections)
            .unwrap_or_default()
            .replace("</", "<\\/");

        let mut body = String::new();
        for section in &self.sections {
            let _ = writeln!(body, "<section id=\"{}\">", escape_text(&section.id));
            let _ = writeln!(body, "  <h2>{}</h2>", escape_text(&section.heading));
            if let Some(caption) = &section.caption {
                let _ = writeln!(body, "  <p class=\"caption\">{}</p>", escape_text(caption));
            }
            let _ = writeln!(body, "  <figure>\n{}  </figure>", section.svg);
            let _ = writeln!(body, "</section>");
        }

        format!(
            r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>{title}</title>
</head>
<body>
<h1>{title}</h1>
{body}<script type="application/json" id="sections">{json}</script>
</body>
</html>"#
        )
    }
}
