use crate::pipeline::RasterFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pdfpages")]
#[command(about = "Extract page ranges from PDFs and convert pages to images, with MCP server support")]
#[command(version)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run as MCP server
    Mcp,

    /// Show file size and page count
    Info {
        /// PDF file to inspect
        path: PathBuf,
    },

    /// Preview how a page selection is understood
    Ranges {
        /// Page ranges (e.g., "1-3, 4, 6-8")
        pages: String,

        /// Also check the selection against this PDF
        #[arg(short, long)]
        path: Option<PathBuf>,
    },

    /// Extract page ranges, in the given order, into a new PDF
    #[command(alias = "split")]
    Extract {
        /// PDF file to extract from
        path: PathBuf,

        /// Page ranges (e.g., "1-3, 4, 6-8"); repeated pages are repeated
        pages: String,

        /// Output file [default: split_<name>.pdf next to the input]
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Convert selected pages to one image file per page
    #[command(alias = "to-images")]
    Rasterize {
        /// PDF file to convert
        path: PathBuf,

        /// Page ranges (e.g., "1-3, 4"); all pages when omitted
        pages: Option<String>,

        /// Output directory
        #[arg(short, long)]
        output_dir: PathBuf,

        /// Image format (jpeg or png)
        #[arg(short, long, default_value = "jpeg")]
        format: RasterFormat,

        /// JPEG quality between 0 and 1
        #[arg(short, long, default_value = "0.8")]
        quality: f32,

        /// Pixels per PDF point
        #[arg(short, long, default_value = "2.0")]
        scale: f32,

        /// Minimum delay between writing consecutive images, in milliseconds
        #[arg(long, default_value = "100")]
        pace_ms: u64,
    },
}
