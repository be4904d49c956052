//! # eurochart-cli
//!
//! Command-line interface for eurochart: inspect what the extractor reads
//! from a sheet, render single charts, or build the whole dashboard page.

mod config;
mod dashboard;
mod output;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use config::Config;
use dashboard::{ChartKind, Dashboard, LoadedChart};
use eurochart_fetch::LoadState;
use eurochart_series::{available_years, extract, ExtractOptions, HeaderLocator, YearRange};
use eurochart_sheet::{Book, Sheet};
use eurochart_viz::{render_state, Interaction, Page, Pointer, Scene, Section, View, YearPlayer};
use output::{format_extraction, OutputFormat};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// eurochart - charts from Eurostat spreadsheet exports
#[derive(Parser)]
#[command(name = "eurochart")]
#[command(author, version, about = "Charts from Eurostat spreadsheet exports", long_about = None)]
struct Cli {
    /// Config manifest (default: ./eurochart.yaml when present)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Asset directory or base URL, overriding the manifest
    #[arg(long, global = true, value_name = "DIR|URL")]
    assets: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the series extracted from a sheet
    Extract(ExtractArgs),
    /// List the year columns of a sheet
    Years(SheetArgs),
    /// Render one chart to SVG
    Render(RenderArgs),
    /// Render every chart into one HTML page
    Site {
        /// Output directory
        #[arg(short, long, default_value = "site")]
        output: PathBuf,
    },
}

#[derive(Args)]
struct SheetArgs {
    /// XLSX, CSV or TSV file
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Sheet name (default: the first sheet)
    #[arg(long)]
    sheet: Option<String>,

    /// First accepted year
    #[arg(long)]
    from: Option<i32>,

    /// Last accepted year
    #[arg(long)]
    to: Option<i32>,

    /// Take the first row containing this text as the header
    #[arg(long, value_name = "TEXT")]
    header_marker: Option<String>,
}

#[derive(Args)]
struct ExtractArgs {
    #[command(flatten)]
    sheet: SheetArgs,

    /// Only this year
    #[arg(long, conflicts_with_all = ["from", "to"])]
    year: Option<i32>,

    /// Drop rows with this label
    #[arg(short = 'x', long)]
    exclude: Vec<String>,

    /// Output format (json, csv, table)
    #[arg(short, long, default_value = "table")]
    format: OutputFormat,
}

#[derive(Args)]
struct RenderArgs {
    #[arg(value_enum)]
    chart: ChartKind,

    /// Year to show (default: the latest)
    #[arg(long)]
    year: Option<i32>,

    /// Country to show, for charts with a country selector
    #[arg(long)]
    entity: Option<String>,

    /// Click these countries to drill down
    #[arg(long, value_name = "ENTITY")]
    focus: Vec<String>,

    /// Hover this shape, e.g. `region:Malta`
    #[arg(long, value_name = "SHAPE")]
    hover: Option<String>,

    /// Write one SVG per year
    #[arg(long)]
    animate: bool,

    #[arg(long)]
    width: Option<f64>,

    #[arg(long)]
    height: Option<f64>,

    /// Output file (default: <CHART>.svg)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_writer(std::io::stderr)
            .init();
    }

    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Command::Extract(args) => run_extract(&config, &args),
        Command::Years(args) => run_years(&config, &args),
        Command::Render(args) => {
            let dashboard = Dashboard::new(config, cli.assets.as_deref())?;
            run_render(&dashboard, &args).await
        }
        Command::Site { output } => {
            let dashboard = Dashboard::new(config, cli.assets.as_deref())?;
            run_site(&dashboard, &output).await
        }
    }
}

/// Open a local workbook and pick the requested sheet.
fn open_sheet(args: &SheetArgs) -> Result<Sheet> {
    let book = Book::open(&args.file)
        .with_context(|| format!("Failed to read file: {}", args.file.display()))?;
    let sheet = match &args.sheet {
        Some(name) => book.get_sheet(name)?,
        None => book
            .first_sheet()
            .with_context(|| format!("{} has no sheets", args.file.display()))?,
    };
    Ok(sheet.clone())
}

fn sheet_options(config: &Config, args: &SheetArgs) -> Result<ExtractOptions> {
    let years = YearRange::new(
        args.from.unwrap_or(config.years.first),
        args.to.unwrap_or(config.years.last),
    )?;
    let mut options = ExtractOptions::new()
        .with_years(years)
        .exclude_all(&config.exclude)
        .with_corrections(config.corrections()?);
    if let Some(marker) = &args.header_marker {
        options = options.with_header(HeaderLocator::Containing(marker.clone()));
    }
    Ok(options)
}

fn run_extract(config: &Config, args: &ExtractArgs) -> Result<()> {
    let sheet = open_sheet(&args.sheet)?;
    let mut options = sheet_options(config, &args.sheet)?.exclude_all(&args.exclude);
    if let Some(year) = args.year {
        options = options.with_years(YearRange::single(year));
    }

    let extraction = extract(&sheet, &options);
    for entity in &extraction.duplicates {
        eprintln!(
            "{} {entity} appears on more than one row; the last one was kept",
            "Warning:".yellow().bold()
        );
    }
    println!("{}", format_extraction(&extraction, args.format)?.trim_end());
    Ok(())
}

fn run_years(config: &Config, args: &SheetArgs) -> Result<()> {
    let sheet = open_sheet(args)?;
    let years = available_years(&sheet, &sheet_options(config, args)?);
    if years.is_empty() {
        eprintln!("{}", "No year columns found".yellow());
    }
    for year in years {
        println!("{year}");
    }
    Ok(())
}

/// Draw a chart for the given drill-down and hover.
///
/// The hover pointer sits on the shape's anchor, as if the mouse were there.
fn render_scene(
    state: &LoadState<LoadedChart>,
    view: &View<'static>,
    focus: &[String],
    hover: Option<&str>,
) -> Result<Scene> {
    let mut interaction = Interaction::new();
    for entity in focus {
        interaction.drill.click(entity);
    }

    if let Some(id) = hover {
        let scene = render_state(state, &view.clone().with_interaction(&interaction));
        let (shape, (dx, dy)) = scene
            .locate(id)
            .with_context(|| format!("No shape `{id}` in the chart"))?;
        let (x, y) = shape.kind.anchor();
        let pointer = Pointer::new(dx + x, dy + y);
        interaction.hover.enter(id, pointer);
    }

    Ok(render_state(state, &view.clone().with_interaction(&interaction)))
}

/// `chart.svg` becomes `chart-2024.svg`.
fn frame_path(output: &Path, year: i32) -> PathBuf {
    let stem = output
        .file_stem()
        .map_or_else(|| "chart".to_string(), |s| s.to_string_lossy().to_string());
    output.with_file_name(format!("{stem}-{year}.svg"))
}

fn write_svg(path: &Path, scene: &Scene) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    std::fs::write(path, scene.to_svg())
        .with_context(|| format!("Failed to write file: {}", path.display()))?;
    println!("{} {}", "Wrote".green().bold(), path.display());
    Ok(())
}

async fn run_render(dashboard: &Dashboard, args: &RenderArgs) -> Result<()> {
    let state = dashboard.load(args.chart).await;
    if let LoadState::Failed(message) = &state {
        eprintln!("{} {message}", "Error:".red().bold());
    }

    let mut view = dashboard.view(args.chart);
    view.width = args.width.unwrap_or(view.width);
    view.height = args.height.unwrap_or(view.height);
    if args.year.is_some() {
        view.year = args.year;
    }
    if args.entity.is_some() {
        view.entity.clone_from(&args.entity);
    }

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("{}.svg", args.chart)));

    if !args.animate {
        let scene = render_scene(&state, &view, &args.focus, args.hover.as_deref())?;
        return write_svg(&output, &scene);
    }

    let years = state.ready().map(|chart| chart.years()).unwrap_or_default();
    if years.is_empty() {
        bail!("The {} chart has no years to animate", args.chart);
    }
    let player = YearPlayer::new(years);
    for year in player.frames() {
        view.year = Some(year);
        let scene = render_scene(&state, &view, &args.focus, args.hover.as_deref())?;
        write_svg(&frame_path(&output, year), &scene)?;
    }
    Ok(())
}

async fn run_site(dashboard: &Dashboard, output: &Path) -> Result<()> {
    std::fs::create_dir_all(output)
        .with_context(|| format!("Failed to create directory: {}", output.display()))?;

    let mut page = Page::new(dashboard.config().title.clone());
    let mut rendered = 0;
    for (kind, state) in dashboard.load_all(&ChartKind::ALL).await {
        let view = dashboard.view(kind);
        let scene = render_state(&state, &view);
        std::fs::write(output.join(format!("{kind}.svg")), scene.to_svg())
            .with_context(|| format!("Failed to write {kind}.svg"))?;

        let mut section = Section::new(kind.name(), kind.heading(), &scene);
        match &state {
            LoadState::Ready(chart) => {
                rendered += 1;
                let years = chart.years();
                let caption: Vec<String> = view
                    .resolve_year(&years)
                    .map(|year| format!("Year: {year}"))
                    .into_iter()
                    .chain(view.entity.as_ref().map(|e| format!("Country: {e}")))
                    .collect();
                if !caption.is_empty() {
                    section = section.with_caption(caption.join(" · "));
                }
                section = section.with_years(years);
                println!("{} {kind}", "✓".green().bold());
            }
            LoadState::Failed(message) => {
                println!("{} {kind}: {message}", "✗".red().bold());
            }
            LoadState::Loading => {}
        }
        page.push(section);
    }

    let index = output.join("index.html");
    std::fs::write(&index, page.to_html())
        .with_context(|| format!("Failed to write file: {}", index.display()))?;
    println!(
        "{} {rendered} of {} charts into {}",
        "Rendered".cyan().bold(),
        ChartKind::ALL.len(),
        index.display()
    );
    Ok(())
}
