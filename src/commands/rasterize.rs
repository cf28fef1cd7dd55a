use crate::pdf::{PageContainer, PdfDocument};
use crate::pipeline::{
    self, deliver, ArtifactSink, OutputMode, Pacing, PageArtifact, RasterOptions, RasterReport,
};
use anyhow::{bail, Context, Result};
use std::io;
use std::path::{Path, PathBuf};

/// An image written to disk.
#[derive(Debug, Clone, PartialEq)]
pub struct WrittenImage {
    pub page_number: u32,
    pub source_page: u32,
    pub mime_type: &'static str,
    pub path: PathBuf,
}

/// Writes each artifact to its own file in a directory.
pub struct DirectorySink {
    dir: PathBuf,
    pub written: Vec<WrittenImage>,
}

impl DirectorySink {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        DirectorySink {
            dir: dir.into(),
            written: Vec::new(),
        }
    }
}

impl ArtifactSink for DirectorySink {
    fn emit(&mut self, artifact: &PageArtifact) -> io::Result<()> {
        let path = self.dir.join(artifact.file_name());
        std::fs::write(&path, &artifact.bytes)?;
        self.written.push(WrittenImage {
            page_number: artifact.page_number,
            source_page: artifact.source_page,
            mime_type: artifact.mime_type(),
            path,
        });
        Ok(())
    }
}

pub struct Conversion {
    pub report: RasterReport,
    /// Files in the order they were written.
    pub written: Vec<WrittenImage>,
}

/// Load `input` and rasterize the selection. Blocking.
fn render_selection(
    input: &Path,
    pages: Option<&str>,
    options: RasterOptions,
) -> Result<RasterReport> {
    let doc = PdfDocument::open(input)?;
    let selection = match pages {
        Some(pages) => pages.to_string(),
        None if doc.page_count() == 0 => bail!("{} has no pages", input.display()),
        None => format!("1-{}", doc.page_count()),
    };
    pipeline::run(Some(&doc), &selection, &OutputMode::Images(options))?
        .into_report()
        .context("Rasterization produced a document instead of images")
}

/// Rasterize `pages` (all pages when `None`) and write them into `output_dir`.
pub async fn convert(
    input: &Path,
    pages: Option<&str>,
    output_dir: &Path,
    options: RasterOptions,
    pacing: Pacing,
) -> Result<Conversion> {
    let report = {
        let input = input.to_path_buf();
        let pages = pages.map(str::to_string);
        tokio::task::spawn_blocking(move || render_selection(&input, pages.as_deref(), options))
            .await
            .context("Rasterization task panicked")??
    };

    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create directory: {}", output_dir.display()))?;
    let mut sink = DirectorySink::new(output_dir);
    deliver(&report.artifacts, pacing, &mut sink)
        .await
        .with_context(|| format!("Failed to write images to {}", output_dir.display()))?;

    Ok(Conversion {
        report,
        written: sink.written,
    })
}

pub async fn run(
    input: &Path,
    pages: Option<&str>,
    output_dir: &Path,
    options: RasterOptions,
    pacing: Pacing,
) -> Result<()> {
    let conversion = convert(input, pages, output_dir, options, pacing).await?;
    let report = &conversion.report;

    if report.is_partial() {
        for failure in &report.failures {
            eprintln!(
                "Page {} (source page {}) failed: {}",
                failure.page_number, failure.source_page, failure.error
            );
        }
    }
    println!("{} to {}", report.summary(), output_dir.display());

    Ok(())
}
