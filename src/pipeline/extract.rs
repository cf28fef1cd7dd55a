use crate::error::CodecError;
use crate::page_range::RangeSet;
use crate::pdf::PageContainer;
use tracing::trace;

/// Build a new document holding the selected pages in selection order.
///
/// No deduplication: a page selected twice appears twice. The output has
/// exactly `ranges.page_count()` pages. Ranges must already be validated
/// against `source`.
pub fn extract<C: PageContainer>(source: &C, ranges: &RangeSet) -> Result<C, CodecError> {
    let mut output = C::create();
    for page in ranges.page_numbers() {
        trace!(page, "copying page");
        output.copy_page(source, page - 1)?;
    }
    Ok(output)
}
