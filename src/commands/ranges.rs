use crate::page_range::{parse_page_ranges, RangeSet};
use crate::pdf::{PageContainer, PdfDocument};
use crate::validate::validate;
use anyhow::Result;
use std::path::Path;

/// One line per range, e.g. "Pages 1-3, Page 5".
pub fn describe(ranges: &RangeSet) -> String {
    ranges
        .iter()
        .map(|range| range.describe())
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn run(pages: &str, path: Option<&Path>) -> Result<()> {
    let ranges = parse_page_ranges(pages);

    if ranges.is_empty() {
        println!("No valid page ranges. Use a format like: 1-3, 4, 6-8");
    } else {
        println!("Selected ranges: {}", describe(&ranges));
        println!("Canonical: {}", ranges);
        println!("Total pages to extract: {}", ranges.page_count());
    }

    if let Some(path) = path {
        let doc = PdfDocument::open(path)?;
        println!("Document pages: {}", doc.page_count());
        validate(&ranges, Some(doc.page_count()))?;
        println!("Selection is valid for {}", path.display());
    }

    Ok(())
}
