//! # Lanyard CLI
//!
//! Command-line interface for badge layouts and printing.
//!
//! ## Usage
//!
//! ```bash
//! # Run the HTTP API
//! lanyard serve --listen 0.0.0.0:8080 --data-dir ./data --records seed.json
//!
//! # Render a badge request to PDF offline
//! lanyard badge --request badge.json --out badge.pdf
//!
//! # Check a lookup barcode, optionally saving its Code 128 image
//! lanyard barcode EVT1-HALL2-ROW3-7 --png code.png
//!
//! # Show the stored layout, or reset it
//! lanyard layout --data-dir ./data --reset
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use lanyard::{
    LanyardError,
    barcode::{SymbologyOptions, parse_barcode, render_code128},
    compose::{BadgeGenerationRequest, compose},
    layout::{
        BadgeLayoutConfig, FileStore, load_layout_config, load_layout_config_or_default,
        save_layout_config,
    },
    render::render_pdf,
    server::{self, ServerConfig},
};

/// Lanyard - Event badge designer and printer
#[derive(Parser, Debug)]
#[command(name = "lanyard")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API
    Serve {
        /// Address to listen on
        #[arg(long, default_value = "0.0.0.0:8080")]
        listen: String,

        /// Directory for the stored badge layout
        #[arg(long, default_value = "./data")]
        data_dir: PathBuf,

        /// JSON file of records and event layouts to preload
        #[arg(long, value_name = "FILE")]
        records: Option<PathBuf>,
    },

    /// Render a badge request file to PDF
    Badge {
        /// Badge request JSON
        #[arg(long, value_name = "FILE")]
        request: PathBuf,

        /// Output PDF path
        #[arg(long, value_name = "FILE", default_value = "badge.pdf")]
        out: PathBuf,

        /// Take the layout from this data directory when the request has none
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Print the composed draw list as JSON instead of writing a PDF
        #[arg(long)]
        draw_list: bool,
    },

    /// Validate and parse a lookup barcode
    Barcode {
        code: String,

        /// Also save the Code 128 symbol as PNG
        #[arg(long, value_name = "FILE")]
        png: Option<PathBuf>,
    },

    /// Show the effective badge layout
    Layout {
        #[arg(long, default_value = "./data")]
        data_dir: PathBuf,

        /// Overwrite the stored layout with the default
        #[arg(long)]
        reset: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("lanyard=info,tower_http=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), LanyardError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            listen,
            data_dir,
            records,
        } => {
            let config = ServerConfig {
                listen_addr: listen,
                data_dir,
                records_path: records,
            };
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(server::serve(config))?;
        }

        Commands::Badge {
            request,
            out,
            data_dir,
            draw_list,
        } => {
            let raw = std::fs::read_to_string(&request)?;
            let mut request: BadgeGenerationRequest = serde_json::from_str(&raw)?;
            if request.layout.is_none()
                && let Some(dir) = data_dir
            {
                request.layout = Some(load_layout_config_or_default(&FileStore::new(dir)));
            }

            let list = compose(&request)?;
            if draw_list {
                println!("{}", serde_json::to_string_pretty(&list)?);
                return Ok(());
            }

            let pdf = render_pdf(&list)?;
            std::fs::write(&out, &pdf)?;
            println!(
                "Badge for {} ({}) saved to {}",
                request.name,
                request.barcode,
                out.display()
            );
        }

        Commands::Barcode { code, png } => {
            match parse_barcode(&code) {
                Some(parsed) => println!("valid: {}", parsed.segments.join(" / ")),
                None => println!("not a lookup barcode: {}", code),
            }

            if let Some(path) = png {
                let image = render_code128(&code, &SymbologyOptions::default())?;
                image
                    .save(&path)
                    .map_err(|e| LanyardError::Render(format!("Failed to save PNG: {}", e)))?;
                println!("Saved to {}", path.display());
            }
        }

        Commands::Layout { data_dir, reset } => {
            let store = FileStore::new(data_dir);
            let layout = if reset {
                std::fs::create_dir_all(store.dir())?;
                let layout = BadgeLayoutConfig::default();
                save_layout_config(&store, &layout)?;
                layout
            } else {
                load_layout_config(&store)?
            };

            for id in layout.out_of_bounds() {
                tracing::warn!(element = id, "layout element lies outside the page");
            }
            println!("{}", serde_json::to_string_pretty(&layout)?);
        }
    }

    Ok(())
}
