use anyhow::Result;
use rmcp::{
    ServerHandler, ServiceExt,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{ServerCapabilities, ServerInfo},
    schemars, tool, tool_handler, tool_router,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::commands::extract::{default_output, extract_to_file};
use crate::commands::rasterize::convert;
use crate::page_range::parse_page_ranges;
use crate::pdf::{PageContainer, PdfDocument};
use crate::pipeline::{Pacing, RasterFormat, RasterOptions};
use crate::validate::validate;

// Request structs for tools

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PathRequest {
    #[schemars(description = "Path to the PDF file")]
    pub path: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ParseRangesRequest {
    #[schemars(description = "Page ranges (e.g., '1-3, 5, 8-10')")]
    pub pages: String,
    #[schemars(description = "Optional PDF to validate the ranges against")]
    #[serde(default)]
    pub path: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PdfExtractRequest {
    #[schemars(description = "Path to the source PDF file")]
    pub path: String,
    #[schemars(description = "Page ranges (e.g., '1-3, 5, 8-10')")]
    pub pages: String,
    #[schemars(description = "Output file path (default: split_<name>.pdf next to the source)")]
    #[serde(default)]
    pub output: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PdfRasterizeRequest {
    #[schemars(description = "Path to the source PDF file")]
    pub path: String,
    #[schemars(description = "Page ranges (default: all pages)")]
    #[serde(default)]
    pub pages: Option<String>,
    #[schemars(description = "Directory to write page images into")]
    pub output_dir: String,
    #[schemars(description = "Image format: jpeg or png (default: jpeg)")]
    #[serde(default = "default_format")]
    pub format: String,
    #[schemars(description = "JPEG quality between 0 and 1 (default: 0.8)")]
    #[serde(default = "default_quality")]
    pub quality: f32,
    #[schemars(description = "Pixels per PDF point (default: 2.0)")]
    #[serde(default = "default_scale")]
    pub scale: f32,
    #[schemars(description = "Delay between written images in milliseconds (default: 0)")]
    #[serde(default)]
    pub pace_ms: u64,
}

fn default_format() -> String {
    RasterFormat::default().to_string()
}

fn default_quality() -> f32 {
    RasterOptions::default().quality
}

fn default_scale() -> f32 {
    RasterOptions::default().scale
}

#[derive(Debug, Clone)]
pub struct PdfServer {
    tool_router: ToolRouter<Self>,
}

impl PdfServer {
    pub fn new() -> Self {
        Self {
            tool_router: Self::tool_router(),
        }
    }
}

impl Default for PdfServer {
    fn default() -> Self {
        Self::new()
    }
}

fn to_json<T: Serialize>(result: &T) -> String {
    serde_json::to_string_pretty(result).unwrap_or_else(|e| format!("Error: {}", e))
}

fn info(path: &str) -> Result<PdfInfoResult> {
    let size_bytes = std::fs::metadata(path)?.len();
    let doc = PdfDocument::open(path)?;
    Ok(PdfInfoResult {
        path: path.to_string(),
        size_bytes,
        page_count: doc.page_count(),
    })
}

fn parse_ranges(pages: &str, path: Option<&str>) -> Result<ParseRangesResult> {
    let ranges = parse_page_ranges(pages);
    let document_pages = match path {
        Some(path) => Some(PdfDocument::open(path)?.page_count()),
        None => None,
    };
    let error = match document_pages {
        Some(total) => validate(&ranges, Some(total)).err().map(|e| e.to_string()),
        None if ranges.is_empty() => Some("no valid page ranges".to_string()),
        None => None,
    };

    Ok(ParseRangesResult {
        ranges: ranges
            .iter()
            .map(|range| RangeResult {
                start: range.start,
                end: range.end,
                description: range.describe(),
            })
            .collect(),
        canonical: ranges.to_string(),
        total_pages: ranges.page_count(),
        document_pages,
        valid: error.is_none(),
        error,
    })
}

async fn rasterize(req: PdfRasterizeRequest) -> Result<RasterizeResult> {
    let format: RasterFormat = req.format.parse().map_err(anyhow::Error::msg)?;
    let options = RasterOptions {
        scale: req.scale,
        quality: req.quality,
        format,
    };
    let output_dir = PathBuf::from(&req.output_dir);
    let conversion = convert(
        Path::new(&req.path),
        req.pages.as_deref(),
        &output_dir,
        options,
        Pacing::from_millis(req.pace_ms),
    )
    .await?;

    let report = &conversion.report;
    Ok(RasterizeResult {
        output_dir: req.output_dir,
        summary: report.summary(),
        converted: report.artifacts.len(),
        requested: report.requested(),
        artifacts: conversion
            .written
            .iter()
            .map(|w| ArtifactResult {
                page_number: w.page_number,
                source_page: w.source_page,
                mime_type: w.mime_type.to_string(),
                file: w.path.display().to_string(),
            })
            .collect(),
        failures: report
            .failures
            .iter()
            .map(|f| PageFailureResult {
                page_number: f.page_number,
                source_page: f.source_page,
                error: f.error.to_string(),
            })
            .collect(),
    })
}

#[tool_router]
impl PdfServer {
    #[tool(description = "Get the file size and page count of a PDF")]
    fn pdf_info(&self, Parameters(PathRequest { path }): Parameters<PathRequest>) -> String {
        match info(&path) {
            Ok(result) => to_json(&result),
            Err(e) => format!("Error: {:#}", e),
        }
    }

    #[tool(description = "Parse a page range string like '1-3, 5' and optionally validate it against a PDF. Invalid tokens are ignored.")]
    fn pdf_parse_ranges(&self, Parameters(req): Parameters<ParseRangesRequest>) -> String {
        match parse_ranges(&req.pages, req.path.as_deref()) {
            Ok(result) => to_json(&result),
            Err(e) => format!("Error: {:#}", e),
        }
    }

    #[tool(description = "Extract page ranges from a PDF into a new PDF, in the order given. Duplicated pages are kept.")]
    fn pdf_extract(&self, Parameters(req): Parameters<PdfExtractRequest>) -> String {
        let input = PathBuf::from(&req.path);
        let output = req
            .output
            .map(PathBuf::from)
            .unwrap_or_else(|| default_output(&input));

        match extract_to_file(&input, &req.pages, &output) {
            Ok(page_count) => to_json(&ExtractResult {
                output_path: output.display().to_string(),
                page_count,
            }),
            Err(e) => format!("Error: {:#}", e),
        }
    }

    #[tool(description = "Render page ranges of a PDF to one JPEG or PNG file per page, named page_<source page>.<ext> (repeats get a _2, _3 suffix). Pages that fail to render are reported and skipped.")]
    async fn pdf_rasterize(&self, Parameters(req): Parameters<PdfRasterizeRequest>) -> String {
        match rasterize(req).await {
            Ok(result) => to_json(&result),
            Err(e) => format!("Error: {:#}", e),
        }
    }
}

// Result types for MCP tools

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct PdfInfoResult {
    pub path: String,
    pub size_bytes: u64,
    pub page_count: u32,
}

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct RangeResult {
    pub start: u32,
    pub end: u32,
    pub description: String,
}

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ParseRangesResult {
    pub ranges: Vec<RangeResult>,
    pub canonical: String,
    pub total_pages: u64,
    pub document_pages: Option<u32>,
    pub valid: bool,
    pub error: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ExtractResult {
    pub output_path: String,
    pub page_count: u32,
}

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct PageFailureResult {
    pub page_number: u32,
    pub source_page: u32,
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ArtifactResult {
    pub page_number: u32,
    pub source_page: u32,
    pub mime_type: String,
    pub file: String,
}

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct RasterizeResult {
    pub output_dir: String,
    pub summary: String,
    pub converted: usize,
    pub requested: usize,
    pub artifacts: Vec<ArtifactResult>,
    pub failures: Vec<PageFailureResult>,
}

#[tool_handler]
impl ServerHandler for PdfServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "PDF page range tools. Use pdf_info for the page count, pdf_parse_ranges to \
                 preview a selection such as '1-3, 5', pdf_extract to build a new PDF from \
                 page ranges, and pdf_rasterize to render pages to JPEG or PNG images."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

pub async fn run_server() -> Result<()> {
    let server = PdfServer::new();

    let service = server.serve((tokio::io::stdin(), tokio::io::stdout())).await?;

    service.waiting().await?;

    Ok(())
}
