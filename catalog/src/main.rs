// Terminal front end for the candle catalog
use anyhow::{Context, Result};
use catalog::config::settings::CatalogSettings;
use catalog::data::export::ExportFormat;
use catalog::CandleCatalog;
use clap::{Parser, Subcommand, ValueEnum};
use shared::models::{CandleRecord, CandleType, Language, Trend};
use shared::utils::{format_card, format_row};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "candle-catalog")]
#[command(version, about = "Browse the Japanese candlestick pattern reference catalog")]
struct Args {
    /// Settings file (JSON)
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Catalog data file, overrides the settings
    #[arg(long)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List every pattern in catalog order
    List,
    /// Patterns of one category: Reversal, Continuation or Indecision
    Category { candle_type: String },
    /// Patterns with one trend: Bullish, Bearish or Neutral
    Trend { trend: String },
    /// Bullish reversal patterns
    BullishReversal,
    /// Bearish reversal patterns
    BearishReversal,
    /// Full details of one pattern, with its image locations
    Show { id: i64 },
    /// Patterns whose name contains QUERY
    Name {
        query: String,
        /// Name to match against (ar or en); defaults to the configured language
        #[arg(long)]
        lang: Option<Language>,
    },
    /// Patterns mentioning KEYWORD in a name, the description or the rules
    Search { keyword: String },
    /// Pattern counts per category and per trend
    Stats,
    /// Save patterns to a new file
    Export {
        out: PathBuf,
        #[arg(long, value_enum, default_value = "json")]
        format: FormatArg,
        #[arg(long)]
        category: Option<CandleType>,
        #[arg(long)]
        trend: Option<Trend>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Json,
    Csv,
}

impl From<FormatArg> for ExportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Json => ExportFormat::Json,
            FormatArg::Csv => ExportFormat::Csv,
        }
    }
}

fn main() -> Result<()> {
    // Diagnostics go to stderr so listings on stdout stay clean.
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let args = Args::parse();

    let mut settings = match &args.config {
        Some(path) => CatalogSettings::from_file(path)
            .with_context(|| format!("failed to load settings from {}", path.display()))?,
        None => CatalogSettings::default(),
    };
    if let Some(data) = args.data {
        settings.data_file = data;
    }

    info!(path = %settings.data_file.display(), "Opening candle catalog");
    let catalog = CandleCatalog::from_settings(&settings)
        .context("the candle catalog could not be opened")?;

    match args.command {
        Command::List => print_rows(catalog.all().iter()),
        Command::Category { candle_type } => print_rows(catalog.by_category(&candle_type)),
        Command::Trend { trend } => print_rows(catalog.by_trend(&trend)),
        Command::BullishReversal => print_rows(catalog.bullish_reversal()),
        Command::BearishReversal => print_rows(catalog.bearish_reversal()),
        Command::Show { id } => match catalog.by_id(id) {
            Some(candle) => print_details(candle, &settings),
            None => println!("No candle with id {}", id),
        },
        Command::Name { query, lang } => {
            let language = lang.unwrap_or(settings.default_language);
            print_rows(catalog.by_name(&query, language))
        }
        Command::Search { keyword } => {
            let results = catalog.search(&keyword);
            println!("{} result(s) for '{}'", results.len(), keyword);
            print_rows(results)
        }
        Command::Stats => {
            println!("Total: {}", catalog.len());
            println!("By type:");
            for (candle_type, count) in catalog.count_by_category() {
                println!("  {}: {}", candle_type, count);
            }
            println!("By trend:");
            for (trend, count) in catalog.count_by_trend() {
                println!("  {}: {}", trend, count);
            }
        }
        Command::Export {
            out,
            format,
            category,
            trend,
        } => {
            let selection: Vec<&CandleRecord> = catalog
                .all()
                .iter()
                .filter(|c| category.map_or(true, |t| c.is_a(t)))
                .filter(|c| trend.map_or(true, |t| c.trends(t)))
                .collect();
            let written = catalog
                .export(&selection, &out, format.into())
                .with_context(|| format!("failed to export to {}", out.display()))?;
            println!("Saved {} candle(s) to {}", written, out.display());
        }
    }

    Ok(())
}

fn print_rows<'a>(records: impl IntoIterator<Item = &'a CandleRecord>) {
    let mut shown = 0;
    for record in records {
        println!("{}", format_row(record));
        shown += 1;
    }
    if shown == 0 {
        println!("(no candles)");
    }
}

fn print_details(candle: &CandleRecord, settings: &CatalogSettings) {
    println!("{}", format_card(candle));
    for (label, path) in [
        ("Candle image", candle.image_candle_path.as_deref()),
        ("Example image", candle.image_example_path.as_deref()),
    ] {
        match path {
            Some(relative) => println!("{}: {}", label, settings.resolve_image(relative).display()),
            None => println!("{}: -", label),
        }
    }
}
