use crate::pdf::{PageContainer, PdfDocument};
use anyhow::{Context, Result};
use std::path::Path;

pub fn run<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    let size = std::fs::metadata(path)
        .with_context(|| format!("Failed to read PDF: {}", path.display()))?
        .len();
    let doc = PdfDocument::open(path)?;

    println!("File: {}", path.display());
    println!("Size: {}", format_megabytes(size));
    println!("Pages: {}", doc.page_count());

    Ok(())
}

fn format_megabytes(bytes: u64) -> String {
    format!("{:.2} MB", bytes as f64 / 1024.0 / 1024.0)
}
