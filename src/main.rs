//! # Cardgen CLI
//!
//! Command-line interface for batch card rendering.
//!
//! ## Usage
//!
//! ```bash
//! # Render loan, EMI and bank cards for every row
//! cardgen generate --rows data/customers.json
//!
//! # Custom assets root and output dir, 4 worker threads
//! cardgen generate --rows rows.json --assets ./assets --out ./out --jobs 4
//!
//! # Machine-readable summary
//! cardgen generate --rows rows.json --json
//!
//! # Show field boxes while tuning a layout
//! cardgen generate --rows rows.json --debug-boxes
//!
//! # (Re)write the gradient background templates
//! cardgen templates --force
//!
//! # Print resolved box geometry for the bank card at 1080p
//! cardgen layout bank --width 1920 --height 1080
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use cardgen::{
    CardConfig, CardError, CardKind, RunContext,
    config::AssetPaths,
    layout::{Canvas, Layout},
    logging,
    row::load_rows,
    templates::ensure_templates,
};

/// Cardgen - customer card renderer
#[derive(Parser, Debug)]
#[command(name = "cardgen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose logging (fit decisions, resolver hits)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Also append logs to this file
    #[arg(long, value_name = "FILE", global = true)]
    log_file: Option<PathBuf>,

    /// JSON config file (all keys optional)
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Assets root containing fonts/, logos/, templates/ and generated/
    #[arg(long, value_name = "DIR", global = true)]
    assets: Option<PathBuf>,

    /// Canvas width in pixels
    #[arg(long, global = true, requires = "height")]
    width: Option<u32>,

    /// Canvas height in pixels
    #[arg(long, global = true, requires = "width")]
    height: Option<u32>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render cards for every row in a JSON file
    Generate {
        /// JSON array of customer rows
        #[arg(long, value_name = "FILE")]
        rows: PathBuf,

        /// Output directory (defaults to <assets>/generated)
        #[arg(long, value_name = "DIR")]
        out: Option<PathBuf>,

        /// Render rows on this many threads
        #[arg(long, default_value = "1")]
        jobs: usize,

        /// Rewrite background templates before rendering
        #[arg(long)]
        force_templates: bool,

        /// Draw field boxes under the text
        #[arg(long)]
        debug_boxes: bool,

        /// Font family looked up in the fonts dir
        #[arg(long, value_name = "FAMILY")]
        font: Option<String>,

        /// Print the run summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write background templates
    Templates {
        /// Overwrite existing templates
        #[arg(long)]
        force: bool,
    },

    /// Print resolved field boxes
    Layout {
        /// Card kind (loan, emi, bank); omit for all
        kind: Option<CardKind>,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), CardError> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.log_file.as_deref())?;

    let mut config = match &cli.config {
        Some(path) => CardConfig::load(path)?,
        None => CardConfig::default(),
    };
    if let Some(root) = &cli.assets {
        config.paths = AssetPaths::under(root);
    }
    if let (Some(width), Some(height)) = (cli.width, cli.height) {
        config.canvas = Canvas { width, height };
    }

    match cli.command {
        Commands::Generate {
            rows,
            out,
            jobs,
            force_templates,
            debug_boxes,
            font,
            json,
        } => {
            if let Some(out) = out {
                config.paths.generated = out;
            }
            if let Some(font) = font {
                config.font_family = font;
            }
            config.debug_boxes |= debug_boxes;
            config.validate()?;

            ensure_templates(&config.paths.templates, config.canvas, force_templates)?;
            let rows = load_rows(&rows)?;

            let ctx = RunContext::new(config);
            let summary = ctx.run(&rows, jobs)?;
            if json {
                let out = serde_json::to_string(&summary)
                    .map_err(|e| CardError::Input(format!("Failed to encode summary: {}", e)))?;
                println!("{}", out);
            } else {
                println!(
                    "Done. Total: {}, Success: {}, Failures: {}",
                    summary.total, summary.succeeded, summary.failed
                );
            }
        }

        Commands::Templates { force } => {
            config.validate()?;
            let written = ensure_templates(&config.paths.templates, config.canvas, force)?;
            if written.is_empty() {
                println!("Templates already present in {}", config.paths.templates.display());
            }
            for path in written {
                println!("Wrote {}", path.display());
            }
        }

        Commands::Layout { kind } => {
            config.validate()?;
            let kinds = match kind {
                Some(kind) => vec![kind],
                None => CardKind::ALL.to_vec(),
            };
            for kind in kinds {
                print_layout(kind, &config);
            }
        }
    }

    Ok(())
}

fn print_layout(kind: CardKind, config: &CardConfig) {
    let canvas = config.canvas;
    println!("{} ({}x{})", kind, canvas.width, canvas.height);
    println!("  {:<16} {:>6} {:>6} {:>6} {:>6}  {:<7} {:>5}", "field", "x", "y", "w", "h", "align", "size");
    for spec in Layout::for_kind(kind).fields {
        let area = spec.area.resolve(canvas);
        println!(
            "  {:<16} {:>6} {:>6} {:>6} {:>6}  {:<7} {:>5}",
            spec.key.name(),
            area.x,
            area.y,
            area.width,
            area.height,
            format!("{:?}", spec.align).to_lowercase(),
            spec.start_size_for(canvas)
        );
    }
}
