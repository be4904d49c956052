//! Loading each chart's assets into a drawable chart.

use crate::config::Config;
use anyhow::{Context, Result};
use clap::ValueEnum;
use eurochart_fetch::{AssetClient, AssetSource, LoadState};
use eurochart_series::{
    cohort_options, extract, extract_categories, CategoryLayout, CohortTable, NameCorrections,
    YearRange, EU27,
};
use eurochart_sheet::Sheet;
use eurochart_viz::charts::diverging::EXCLUDED_ROWS;
use eurochart_viz::{
    parse_regions, BubbleChart, Chart, Choropleth, DivergingBars, Pyramid, RadarChart,
    RevenueChart, SankeyChart, SankeyGraph, View,
};
use futures::future::{join_all, try_join_all};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{info, warn};

/// GeoJSON property holding the region name.
const REGION_NAME_PROPERTY: &str = "NAME";

/// Country whose rows the activity charts read.
const DEFAULT_ACTIVITY_ENTITY: &str = "Belgium";

/// A loaded chart of any kind.
pub type LoadedChart = Box<dyn Chart + Send + Sync>;

/// The dashboard's charts, in page order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    /// Internet access by country on a map
    Choropleth,
    /// Buyers, enterprises and turnover per country
    Bubble,
    /// Daily use by gender and age
    Pyramid,
    /// Difference from the EU average
    Diverging,
    /// E-commerce turnover ranking with drill-down
    Revenue,
    /// Flows from age groups to activities
    Sankey,
    /// Activities per age group
    Radar,
}

impl ChartKind {
    pub const ALL: [ChartKind; 7] = [
        ChartKind::Choropleth,
        ChartKind::Bubble,
        ChartKind::Pyramid,
        ChartKind::Diverging,
        ChartKind::Revenue,
        ChartKind::Sankey,
        ChartKind::Radar,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            ChartKind::Choropleth => "choropleth",
            ChartKind::Bubble => "bubble",
            ChartKind::Pyramid => "pyramid",
            ChartKind::Diverging => "diverging",
            ChartKind::Revenue => "revenue",
            ChartKind::Sankey => "sankey",
            ChartKind::Radar => "radar",
        }
    }

    /// Section heading on the generated page.
    #[must_use]
    pub fn heading(self) -> &'static str {
        match self {
            ChartKind::Choropleth => "Internet access across Europe",
            ChartKind::Bubble => "E-commerce: buyers, sellers and turnover",
            ChartKind::Pyramid => "Daily internet use by age and gender",
            ChartKind::Diverging => "Never used the internet",
            ChartKind::Revenue => "Enterprise e-commerce turnover",
            ChartKind::Sankey => "What each age group does online",
            ChartKind::Radar => "Internet activities by age group",
        }
    }

    /// Assets read when the manifest names none.
    #[must_use]
    pub fn default_files(self) -> &'static [&'static str] {
        match self {
            ChartKind::Choropleth => &["tin00134_page_spreadsheet.xlsx", "europe.geojson"],
            ChartKind::Bubble => &["tin00096.xlsx", "tin00111.xlsx", "tin00110.xlsx"],
            ChartKind::Pyramid => &["internet_population.xlsx"],
            ChartKind::Diverging => &["tin00093_page_spreadsheet.xlsx"],
            ChartKind::Revenue => &["tin00110.xlsx"],
            ChartKind::Sankey => &[],
            ChartKind::Radar => &["internet_activities_2024.xlsx"],
        }
    }

    /// Charts that only offer recent years.
    #[must_use]
    pub fn default_years(self) -> Option<YearRange> {
        match self {
            ChartKind::Bubble | ChartKind::Diverging => Some(YearRange {
                first: 2020,
                last: 2024,
            }),
            _ => None,
        }
    }

    #[must_use]
    pub fn default_entity(self) -> Option<&'static str> {
        match self {
            ChartKind::Pyramid => Some(EU27),
            ChartKind::Radar => Some(DEFAULT_ACTIVITY_ENTITY),
            _ => None,
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Loads charts from the configured assets.
pub struct Dashboard {
    config: Config,
    client: AssetClient,
}

impl Dashboard {
    /// `assets` overrides the manifest's asset location.
    pub fn new(config: Config, assets: Option<&str>) -> Result<Self> {
        let source = AssetSource::parse(assets.unwrap_or(&config.assets));
        let client = AssetClient::new(source).context("Failed to create asset client")?;
        Ok(Self { config, client })
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The chart's initial view: configured size, year and entity.
    #[must_use]
    pub fn view(&self, kind: ChartKind) -> View<'static> {
        let chart = self.config.chart(kind);
        View::new(self.config.width, self.config.height)
            .with_year(chart.year)
            .with_entity(chart.entity)
    }

    /// Load one chart. Failures end up in the state, never in the caller.
    pub async fn load(&self, kind: ChartKind) -> LoadState<LoadedChart> {
        let result = self.try_load(kind).await.map_err(|e| format!("{e:#}"));
        match &result {
            Ok(chart) => info!(chart = kind.name(), empty = chart.is_empty(), "chart loaded"),
            Err(message) => warn!(chart = kind.name(), error = %message, "chart failed to load"),
        }
        LoadState::from_result(result)
    }

    /// Load several charts concurrently, in the order given.
    pub async fn load_all(&self, kinds: &[ChartKind]) -> Vec<(ChartKind, LoadState<LoadedChart>)> {
        let states = join_all(kinds.iter().map(|kind| self.load(*kind))).await;
        kinds.iter().copied().zip(states).collect()
    }

    async fn try_load(&self, kind: ChartKind) -> Result<LoadedChart> {
        let chart = self.config.chart(kind);
        let files = &chart.files;
        let options = self.config.extract_options(kind)?;

        let loaded: LoadedChart = match kind {
            ChartKind::Choropleth => {
                let (table, shapes) = (file(files, 0)?, file(files, 1)?);
                let (sheet, geojson) =
                    futures::join!(self.first_sheet(table), self.client.fetch(shapes));
                let extraction = extract(&sheet?, &options);
                let geojson = geojson.context("Failed to load region shapes")?;
                let regions = parse_regions(&geojson, REGION_NAME_PROPERTY)?;
                Box::new(
                    Choropleth::new(regions, extraction.series, &options.corrections)
                        .with_years(extraction.years),
                )
            }
            ChartKind::Bubble => {
                let names = [file(files, 0)?, file(files, 1)?, file(files, 2)?];
                let sheets = try_join_all(names.iter().map(|name| self.first_sheet(name))).await?;
                let [buyers, enterprises, turnover] =
                    [0, 1, 2].map(|i| extract(&sheets[i], &options));
                let years: Vec<i32> = [&buyers, &enterprises, &turnover]
                    .iter()
                    .flat_map(|extraction| extraction.years.iter().copied())
                    .collect();
                Box::new(
                    BubbleChart::new(buyers.series, enterprises.series, turnover.series)
                        .with_years(years),
                )
            }
            ChartKind::Pyramid => {
                let name = file(files, 0)?;
                let book = self
                    .client
                    .fetch_book(name)
                    .await
                    .with_context(|| format!("Failed to load {name}"))?;
                let cohorts = cohort_options(options.years)
                    .exclude_all(&self.config.exclude)
                    .with_corrections(options.corrections);
                Box::new(Pyramid::new(CohortTable::from_book(&book, &cohorts)))
            }
            ChartKind::Diverging => {
                let sheet = self.first_sheet(file(files, 0)?).await?;
                let extraction = extract(&sheet, &options.exclude_all(EXCLUDED_ROWS));
                Box::new(DivergingBars::new(extraction.series).with_years(extraction.years))
            }
            ChartKind::Revenue => {
                let sheet = self.first_sheet(file(files, 0)?).await?;
                let extraction = extract(&sheet, &options.exclude_all(EXCLUDED_ROWS));
                Box::new(RevenueChart::new(extraction.series).with_years(extraction.years))
            }
            ChartKind::Sankey => {
                // Without a sheet the chart shows the built-in 2024 figures
                let graph = match files.first() {
                    Some(name) => {
                        let entity = chart.entity.as_deref().unwrap_or(DEFAULT_ACTIVITY_ENTITY);
                        let sheet = self.first_sheet(name).await?;
                        let table = extract_categories(
                            &sheet,
                            entity,
                            &CategoryLayout::default(),
                            &NameCorrections::activity_labels(),
                        );
                        SankeyGraph::from_categories(&table)
                    }
                    None => SankeyGraph::digital_activities(),
                };
                Box::new(SankeyChart::new(graph))
            }
            ChartKind::Radar => {
                let entity = chart.entity.as_deref().unwrap_or(DEFAULT_ACTIVITY_ENTITY);
                let sheet = self.first_sheet(file(files, 0)?).await?;
                let table = extract_categories(
                    &sheet,
                    entity,
                    &CategoryLayout::default(),
                    &NameCorrections::activity_labels(),
                );
                Box::new(RadarChart::new(table, entity))
            }
        };
        Ok(loaded)
    }

    /// Fetch a workbook and take its first sheet.
    async fn first_sheet(&self, name: &str) -> Result<Sheet> {
        let book = self
            .client
            .fetch_book(name)
            .await
            .with_context(|| format!("Failed to load {name}"))?;
        book.first_sheet()
            .cloned()
            .with_context(|| format!("{name} has no sheets"))
    }
}

fn file(files: &[String], index: usize) -> Result<&str> {
    files
        .get(index)
        .map(String::as_str)
        .with_context(|| format!("Expected at least {} asset files", index + 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use eurochart_viz::NO_DATA_FILL;
    use rust_xlsxwriter::Workbook;
    use std::path::Path;

    const EUROPE: &str = r#"{"type": "FeatureCollection", "features": [
        {"type": "Feature", "properties": {"NAME": "Czech Republic"},
         "geometry": {"type": "Polygon", "coordinates": [[[12.1,48.5],[18.9,48.5],[18.9,51.1],[12.1,51.1],[12.1,48.5]]]}},
        {"type": "Feature", "properties": {"NAME": "Norway"},
         "geometry": {"type": "Polygon", "coordinates": [[[4.6,58.0],[31.0,58.0],[31.0,71.2],[4.6,71.2],[4.6,58.0]]]}}
    ]}"#;

    /// A one-table workbook: years across, countries down.
    fn write_table(dir: &Path, name: &str, years: &[i32], rows: &[(&str, &[f64])]) {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.write_string(0, 0, "GEO (Labels)").unwrap();
        for (col, year) in years.iter().enumerate() {
            worksheet
                .write_number(0, col as u16 + 1, f64::from(*year))
                .unwrap();
        }
        for (row, (country, values)) in rows.iter().enumerate() {
            let row = row as u32 + 1;
            worksheet.write_string(row, 0, *country).unwrap();
            for (col, value) in values.iter().enumerate() {
                worksheet.write_number(row, col as u16 + 1, *value).unwrap();
            }
        }
        workbook.save(dir.join(name)).unwrap();
    }

    fn dashboard(dir: &Path) -> Dashboard {
        let assets = dir.display().to_string();
        Dashboard::new(Config::default(), Some(&assets)).unwrap()
    }

    #[test]
    fn test_kind_names_match_value_enum() {
        for kind in ChartKind::ALL {
            let parsed = ChartKind::from_str(kind.name(), true).unwrap();
            assert_eq!(parsed, kind);
        }
    }

    #[tokio::test]
    async fn test_load_choropleth() {
        let dir = tempfile::tempdir().unwrap();
        write_table(
            dir.path(),
            "tin00134_page_spreadsheet.xlsx",
            &[2023, 2024],
            &[("Czechia", &[90.0, 92.0])],
        );
        std::fs::write(dir.path().join("europe.geojson"), EUROPE).unwrap();

        let state = dashboard(dir.path()).load(ChartKind::Choropleth).await;
        let chart = state.ready().unwrap();
        assert_eq!(chart.years(), vec![2023, 2024]);

        let scene = chart.render(&View::new(960.0, 600.0));
        let czechia = scene.shape("region:Czechia").unwrap();
        assert_ne!(czechia.style.fill.as_deref(), Some(NO_DATA_FILL));
        let norway = scene.shape("region:Norway").unwrap();
        assert_eq!(norway.style.fill.as_deref(), Some(NO_DATA_FILL));
    }

    #[tokio::test]
    async fn test_header_year_without_values_stays_selectable() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["tin00134_page_spreadsheet.xlsx", "tin00093_page_spreadsheet.xlsx"] {
            let mut workbook = Workbook::new();
            let worksheet = workbook.add_worksheet();
            worksheet.write_string(0, 0, "Country").unwrap();
            worksheet.write_number(0, 1, 2023.0).unwrap();
            worksheet.write_number(0, 2, 2024.0).unwrap();
            worksheet.write_string(1, 0, "Czechia").unwrap();
            worksheet.write_number(1, 1, 60.0).unwrap();
            worksheet.write_string(1, 2, ":").unwrap();
            workbook.save(dir.path().join(name)).unwrap();
        }
        std::fs::write(dir.path().join("europe.geojson"), EUROPE).unwrap();

        let dashboard = dashboard(dir.path());
        let view = View::new(960.0, 600.0).with_year(Some(2024));

        let choropleth = dashboard.load(ChartKind::Choropleth).await;
        let choropleth = choropleth.ready().unwrap();
        assert_eq!(choropleth.years(), vec![2023, 2024]);
        let scene = choropleth.render(&view);
        let czechia = scene.shape("region:Czechia").unwrap();
        assert_eq!(czechia.style.fill.as_deref(), Some(NO_DATA_FILL));
        assert_eq!(
            czechia.datum.as_ref().unwrap().lines,
            vec!["Czechia", "Year: 2024", "No Data Available"]
        );

        let diverging = dashboard.load(ChartKind::Diverging).await;
        let diverging = diverging.ready().unwrap();
        assert_eq!(diverging.years(), vec![2023, 2024]);
        assert!(diverging
            .render(&view)
            .has_text("No data available for 2024"));
    }

    #[tokio::test]
    async fn test_missing_asset_fails_only_its_chart() {
        let dir = tempfile::tempdir().unwrap();
        write_table(
            dir.path(),
            "tin00093_page_spreadsheet.xlsx",
            &[2023, 2024],
            &[
                ("European Union - 27 countries (from 2020)", &[6.0, 5.0]),
                ("Bulgaria", &[14.0, 12.0]),
                ("Spain", &[4.0, 3.0]),
            ],
        );

        let states = dashboard(dir.path())
            .load_all(&[ChartKind::Revenue, ChartKind::Diverging, ChartKind::Sankey])
            .await;

        let LoadState::Failed(message) = &states[0].1 else {
            panic!("revenue has no asset");
        };
        assert!(message.contains("tin00110.xlsx"));

        let diverging = states[1].1.ready().unwrap();
        let scene = diverging.render(&View::new(900.0, 600.0));
        assert!(scene.shape("bar:Bulgaria").is_some());
        assert!(scene
            .shape("bar:European Union - 27 countries (from 2020)")
            .is_none());

        assert!(states[2].1.is_ready());
    }

    #[tokio::test]
    async fn test_load_bubble_needs_all_three_sheets() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["tin00096.xlsx", "tin00111.xlsx"] {
            write_table(dir.path(), name, &[2024], &[("Malta", &[50.0])]);
        }
        let board = dashboard(dir.path());
        assert!(matches!(
            board.load(ChartKind::Bubble).await,
            LoadState::Failed(_)
        ));

        write_table(dir.path(), "tin00110.xlsx", &[2024], &[("Malta", &[12.0])]);
        let state = board.load(ChartKind::Bubble).await;
        assert_eq!(state.ready().unwrap().years(), vec![2024]);
    }

    #[test]
    fn test_view_uses_chart_settings() {
        let config = Config::from_yaml("charts:\n  diverging:\n    year: 2022\n").unwrap();
        let board = Dashboard::new(config, Some("assets")).unwrap();
        let view = board.view(ChartKind::Diverging);
        assert_eq!(view.year, Some(2022));
        assert_eq!(view.width, 960.0);
        assert_eq!(
            board.view(ChartKind::Pyramid).entity.as_deref(),
            Some(EU27)
        );
    }
}
