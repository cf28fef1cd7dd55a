use crate::error::ValidationError;
use crate::page_range::RangeSet;

/// Check a parsed selection against the loaded document.
///
/// `total_pages` is `None` when no document is loaded. The first range (in
/// selection order) that ends past the last page rejects the whole request.
pub fn validate(ranges: &RangeSet, total_pages: Option<u32>) -> Result<(), ValidationError> {
    let total_pages = total_pages.ok_or(ValidationError::EmptyInput)?;

    if ranges.is_empty() {
        return Err(ValidationError::EmptySelection);
    }

    match ranges.iter().find(|range| range.end > total_pages) {
        Some(&range) => Err(ValidationError::RangeOutOfBounds { range, total_pages }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page_range::{parse_page_ranges, PageRange};

    #[test]
    fn test_within_bounds() {
        let ranges = parse_page_ranges("1-5, 6-10");
        assert_eq!(validate(&ranges, Some(10)), Ok(()));
    }

    #[test]
    fn test_first_out_of_bounds_range_reported() {
        let ranges = parse_page_ranges("1-5, 8-12, 20");
        assert_eq!(
            validate(&ranges, Some(10)),
            Err(ValidationError::RangeOutOfBounds {
                range: PageRange { start: 8, end: 12 },
                total_pages: 10,
            })
        );
    }

    #[test]
    fn test_no_document() {
        let ranges = parse_page_ranges("1");
        assert_eq!(validate(&ranges, None), Err(ValidationError::EmptyInput));
    }

    #[test]
    fn test_empty_selection() {
        let ranges = parse_page_ranges("abc, 0");
        assert_eq!(
            validate(&ranges, Some(3)),
            Err(ValidationError::EmptySelection)
        );
    }

    #[test]
    fn test_no_document_checked_before_selection() {
        assert_eq!(
            validate(&RangeSet::default(), None),
            Err(ValidationError::EmptyInput)
        );
    }

    #[test]
    fn test_error_message_names_range() {
        let err = validate(&parse_page_ranges("8-12"), Some(10)).unwrap_err();
        assert_eq!(err.to_string(), "range 8-12 exceeds total pages (10)");
    }
}
