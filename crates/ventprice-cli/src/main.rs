//! ventprice CLI - price lookups and quote lines from a catalog database

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use ventprice::prelude::*;
use ventprice::resolver::canonicalize;
use ventprice::size::parse_size_string;

#[derive(Parser)]
#[command(name = "ventprice")]
#[command(author, version, about = "Price ventilation products from a catalog database")]
struct Cli {
    /// Price database produced by the catalog importer
    #[arg(long, global = true, default_value = "prices.db")]
    db: PathBuf,

    /// Engine options (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every model in the catalog
    Models,

    /// List the finishes offered for a model
    Finishes {
        model: String,
    },

    /// Price one item
    Price {
        model: String,

        /// Size: `12" x 8"`, `8" diameter`, or a length for slot products
        #[arg(short, long)]
        size: Option<String>,

        /// Finish name, e.g. "Anodized Aluminum"
        #[arg(short, long)]
        finish: Option<String>,

        /// Price with a damper
        #[arg(long)]
        damper: bool,

        /// Multiplier applied for Special Color
        #[arg(long)]
        special_color_multiplier: Option<f64>,

        /// Show TB, WD, BP and MWD
        #[arg(long)]
        breakdown: bool,
    },

    /// Build a quote line from a product code such as `ABC(WD)+F.Nylon`
    Quote {
        product_code: String,

        #[arg(long)]
        width: Option<String>,

        #[arg(long)]
        height: Option<String>,

        /// Diameter for round products
        #[arg(long)]
        size: Option<String>,

        /// Unit for values written without one
        #[arg(long, default_value = "inches")]
        unit: String,

        #[arg(short, long)]
        finish: Option<String>,

        #[arg(short, long, default_value = "1")]
        quantity: u32,

        /// Discount percentage (0-100)
        #[arg(short, long, default_value = "0")]
        discount: Decimal,

        #[arg(long)]
        special_color_multiplier: Option<f64>,

        /// Print the line as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            debug!(error = ?err, "command failed");
            eprintln!("N/A: {}", reason(&err));
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ventprice=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let engine = open_engine(&cli.db, cli.config.as_deref())?;

    match cli.command {
        Commands::Models => {
            for model in engine.available_models()? {
                println!("{model}");
            }
            Ok(())
        }
        Commands::Finishes { model } => {
            for finish in engine.available_finishes(&model)? {
                println!("{finish}");
            }
            Ok(())
        }
        Commands::Price {
            model,
            size,
            finish,
            damper,
            special_color_multiplier,
            breakdown,
        } => {
            let item = ItemOptions {
                finish: finish.as_deref().map(Finish::parse),
                with_damper: damper,
                special_color_multiplier,
            };
            let priced = price(&engine, &model, &item, size.as_deref())?;
            if breakdown {
                println!(
                    "TB {}  WD {}  BP {}  MWD {}  surcharge {}",
                    priced.tb, priced.wd, priced.bp, priced.mwd, priced.surcharge
                );
            }
            println!("{}", priced.price);
            Ok(())
        }
        Commands::Quote {
            product_code,
            width,
            height,
            size,
            unit,
            finish,
            quantity,
            discount,
            special_color_multiplier,
            json,
        } => {
            let unit: LengthUnit = unit.parse()?;
            let length = |text: &str| Length::parse(text, unit);

            let dimensions = match (width, height, size) {
                (_, _, Some(size)) => QuoteDimensions::Diameter(length(&size)?),
                (Some(width), Some(height), None) => QuoteDimensions::Rectangular {
                    width: length(&width)?,
                    height: length(&height)?,
                },
                (None, Some(height), None) => QuoteDimensions::Height(length(&height)?),
                (Some(_), None, None) => bail!("--height is required with --width"),
                (None, None, None) => QuoteDimensions::None,
            };

            let mut request = QuoteRequest::from_product_code(&product_code, dimensions)
                .with_quantity(quantity)
                .with_discount(discount);
            request.finish = finish.as_deref().map(Finish::parse);
            request.special_color_multiplier = special_color_multiplier;

            let item = engine.build_quote_item(&request)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&item)?);
            } else {
                print_quote_item(&item);
            }
            Ok(())
        }
    }
}

fn open_engine(db: &Path, config: Option<&Path>) -> Result<PricingEngine> {
    let options = match config {
        Some(path) => EngineOptions::load(path)
            .with_context(|| format!("Failed to load options from '{}'", path.display()))?,
        None => EngineOptions::default(),
    };
    PricingEngine::open(db, options)
        .with_context(|| format!("Failed to open price database '{}'", db.display()))
}

/// Price by the model's shape.
fn price(
    engine: &PricingEngine,
    model: &str,
    item: &ItemOptions,
    size: Option<&str>,
) -> Result<PriceBreakdown> {
    let shape = engine.shape(model)?;
    let breakdown = match (shape, size) {
        (Shape::Rectangular, Some(size)) => engine.breakdown_for_default_table(model, item, size)?,
        (Shape::Diameter, Some(size)) => engine.breakdown_for_other_table(model, item, size)?,
        (Shape::PricePerFoot, Some(size)) => {
            let dims = parse_size_string(size)?;
            let (dims, _) = canonicalize(dims);
            let match_dimension = engine
                .find_rounded_price_per_foot_width(model, dims.height.round())?
                .ok_or_else(|| PricingError::SizeNotFound {
                    model: model.to_string(),
                    size: size.to_string(),
                })?;
            engine.breakdown_for_price_per_foot(model, item, match_dimension, dims.width)?
        }
        (Shape::Dimensionless { .. }, size) => {
            let length = size
                .map(|s| Length::parse(s, LengthUnit::Inches))
                .transpose()?
                .map(|l| l.to_inches());
            engine.breakdown_for_no_dimensions(model, item, length)?
        }
        (_, None) => bail!("--size is required for {model}"),
    };
    Ok(breakdown)
}

fn print_quote_item(item: &QuoteItem) {
    println!("Product:     {}", item.product_code);
    println!("Size:        {}", item.size);
    if let Some(rounded) = &item.rounded_size {
        println!("Priced at:   {}", rounded);
    }
    if let Some(finish) = &item.finish {
        println!("Finish:      {}", finish);
    }
    println!("Table price: {}", item.table_price);
    println!("With finish: {}", item.price_after_finish);
    if !item.filter_price.is_zero() {
        println!("Filter:      {}", item.filter_price);
    }
    if !item.accessory_price.is_zero() {
        println!("Screen:      {}", item.accessory_price);
    }
    println!("Unit price:  {}", item.unit_price);
    if !item.discount_percent.is_zero() {
        println!("Discount:    {}%", item.discount_percent);
        println!("Discounted:  {}", item.discounted_unit_price);
    }
    println!("Quantity:    {}", item.quantity);
    println!("Total:       {}", item.total);
    for warning in &item.warnings {
        eprintln!("Warning: {}", warning);
    }
}

/// Short reason shown after `N/A:`.
fn reason(err: &anyhow::Error) -> String {
    if let Some(pricing) = err.downcast_ref::<PricingError>() {
        return pricing.label().to_string();
    }
    if let Some(QuoteError::Pricing(pricing)) = err.downcast_ref::<QuoteError>() {
        return pricing.label().to_string();
    }
    format!("{err:#}")
}
