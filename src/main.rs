mod cli;
mod commands;
mod error;
mod mcp;
mod page_range;
mod pdf;
mod pipeline;
mod validate;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use pipeline::{Pacing, RasterOptions};
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // stdout carries MCP traffic, so logs always go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Mcp => {
            mcp::run_server().await?;
        }
        Commands::Info { path } => {
            commands::info::run(&path)?;
        }
        Commands::Ranges { pages, path } => {
            commands::ranges::run(&pages, path.as_deref())?;
        }
        Commands::Extract {
            path,
            pages,
            output,
        } => {
            commands::extract::run(&path, &pages, output.as_deref())?;
        }
        Commands::Rasterize {
            path,
            pages,
            output_dir,
            format,
            quality,
            scale,
            pace_ms,
        } => {
            let options = RasterOptions {
                scale,
                quality,
                format,
            };
            commands::rasterize::run(
                &path,
                pages.as_deref(),
                &output_dir,
                options,
                Pacing::from_millis(pace_ms),
            )
            .await?;
        }
    }

    Ok(())
}
