use crate::pdf::PdfDocument;
use crate::pipeline::{self, OutputMode};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// `split_<stem>.pdf` next to the input.
pub fn default_output(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("document");
    input.with_file_name(format!("split_{}.pdf", stem))
}

/// Extract `pages` from `input` into `output`, returning the page count.
pub fn extract_to_file(input: &Path, pages: &str, output: &Path) -> Result<u32> {
    let doc = PdfDocument::open(input)?;
    let extracted = pipeline::run(Some(&doc), pages, &OutputMode::Document)?
        .into_document()
        .context("Extraction produced images instead of a document")?;

    std::fs::write(output, &extracted.bytes)
        .with_context(|| format!("Failed to save PDF: {}", output.display()))?;

    Ok(extracted.page_count)
}

pub fn run(input: &Path, pages: &str, output: Option<&Path>) -> Result<()> {
    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_output(input));

    let page_count = extract_to_file(input, pages, &output)?;
    println!("Extracted {} page(s) to {}", page_count, output.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::fixtures;

    #[test]
    fn test_default_output_name() {
        assert_eq!(
            default_output(Path::new("/tmp/report.pdf")),
            PathBuf::from("/tmp/split_report.pdf")
        );
    }

    #[test]
    fn test_writes_selected_pages() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.pdf");
        std::fs::write(&input, fixtures::numbered_pdf(6)).unwrap();

        run(&input, "6, 1-2", None).unwrap();

        let bytes = std::fs::read(dir.path().join("split_in.pdf")).unwrap();
        assert_eq!(fixtures::page_numbers(&bytes), vec![6, 1, 2]);
    }

    #[test]
    fn test_out_of_bounds_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.pdf");
        let output = dir.path().join("out.pdf");
        std::fs::write(&input, fixtures::numbered_pdf(3)).unwrap();

        let err = run(&input, "2-4", Some(&output)).unwrap_err();
        assert!(err.to_string().contains("exceeds total pages (3)"));
        assert!(!output.exists());
    }
}
