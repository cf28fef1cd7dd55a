//! Parse, validate, extract and optionally rasterize a page selection.

pub mod extract;
pub mod rasterize;
pub mod sequencer;

pub use extract::extract;
pub use rasterize::{rasterize, PageArtifact, PageFailure, RasterFormat, RasterOptions};
pub use sequencer::{deliver, ArtifactSink, Pacing};

use crate::error::{PipelineError, ValidationError};
use crate::page_range::{parse_page_ranges, RangeSet};
use crate::pdf::PageContainer;
use crate::validate::validate;
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// What a run produces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputMode {
    /// One merged document.
    Document,
    /// One image per selected page.
    Images(RasterOptions),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    ParseEmpty,
    ValidationFailed,
    ExtractionFailed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Parsed,
    Validated,
    Extracted,
    Rasterizing,
    Done,
    Failed(Failure),
}

#[derive(Debug)]
pub struct ExtractedDocument {
    pub bytes: Vec<u8>,
    pub page_count: u32,
}

/// Per-page outcome of a rasterizing run, in page order.
#[derive(Debug, Default)]
pub struct RasterReport {
    pub artifacts: Vec<PageArtifact>,
    pub failures: Vec<PageFailure>,
}

impl RasterReport {
    pub fn requested(&self) -> usize {
        self.artifacts.len() + self.failures.len()
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// Done, but some pages did not render.
    pub fn is_partial(&self) -> bool {
        !self.failures.is_empty()
    }

    pub fn summary(&self) -> String {
        format!(
            "Converted {} of {} page(s)",
            self.artifacts.len(),
            self.requested()
        )
    }
}

#[derive(Debug)]
pub enum ExtractionResult {
    Document(ExtractedDocument),
    Images(RasterReport),
}

impl ExtractionResult {
    pub fn into_document(self) -> Option<ExtractedDocument> {
        match self {
            ExtractionResult::Document(doc) => Some(doc),
            ExtractionResult::Images(_) => None,
        }
    }

    pub fn into_report(self) -> Option<RasterReport> {
        match self {
            ExtractionResult::Images(report) => Some(report),
            ExtractionResult::Document(_) => None,
        }
    }
}

/// Rasterize every page of `doc` in order, collecting failures instead of
/// stopping. `sources[i]` is the source page number of page `i`.
fn rasterize_pages<C: PageContainer>(
    doc: &C,
    sources: &[u32],
    options: &RasterOptions,
) -> RasterReport {
    let mut report = RasterReport::default();
    let mut seen: HashMap<u32, u32> = HashMap::new();
    for index in 0..doc.page_count() {
        let Some(page) = doc.page(index) else {
            continue;
        };
        let source_page = sources
            .get(index as usize)
            .copied()
            .unwrap_or(page.number());
        let occurrence = seen.entry(source_page).or_insert(0);
        *occurrence += 1;
        match rasterize(page, options) {
            Ok(mut artifact) => {
                artifact.source_page = source_page;
                artifact.occurrence = *occurrence;
                debug!(
                    page = artifact.page_number,
                    source_page,
                    bytes = artifact.bytes.len(),
                    "rasterized page"
                );
                report.artifacts.push(artifact);
            }
            Err(error) => {
                warn!(page = page.number(), source_page, %error, "failed to rasterize page");
                report.failures.push(PageFailure {
                    page_number: page.number(),
                    source_page,
                    error,
                });
            }
        }
    }
    report
}

/// One pipeline run against an optionally loaded document.
pub struct PipelineRun<'a, C> {
    source: Option<&'a C>,
    state: RunState,
    ranges: RangeSet,
}

impl<'a, C: PageContainer> PipelineRun<'a, C> {
    pub fn new(source: Option<&'a C>) -> Self {
        PipelineRun {
            source,
            state: RunState::Idle,
            ranges: RangeSet::default(),
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// The selection as parsed by the last call to [`execute`](Self::execute).
    pub fn ranges(&self) -> &RangeSet {
        &self.ranges
    }

    fn transition(&mut self, next: RunState) {
        debug!(from = ?self.state, to = ?next, "pipeline state");
        self.state = next;
    }

    pub fn execute(
        &mut self,
        selection: &str,
        mode: &OutputMode,
    ) -> Result<ExtractionResult, PipelineError> {
        let result = self.try_execute(selection, mode);
        if let Err(err) = &result {
            let failure = match err {
                PipelineError::Validation(ValidationError::EmptySelection) => Failure::ParseEmpty,
                PipelineError::Validation(_) | PipelineError::Options(_) => {
                    Failure::ValidationFailed
                }
                PipelineError::Codec(_) => Failure::ExtractionFailed,
            };
            self.transition(RunState::Failed(failure));
        }
        result
    }

    fn try_execute(
        &mut self,
        selection: &str,
        mode: &OutputMode,
    ) -> Result<ExtractionResult, PipelineError> {
        self.ranges = parse_page_ranges(selection);
        self.transition(RunState::Parsed);

        validate(&self.ranges, self.source.map(|doc| doc.page_count()))?;
        if let OutputMode::Images(options) = mode {
            options.validate()?;
        }
        let Some(source) = self.source else {
            return Err(ValidationError::EmptyInput.into());
        };
        self.transition(RunState::Validated);

        let mut extracted = extract(source, &self.ranges)?;
        self.transition(RunState::Extracted);

        let result = match mode {
            OutputMode::Document => {
                let page_count = extracted.page_count();
                let bytes = extracted.to_bytes()?;
                info!(pages = page_count, bytes = bytes.len(), "extracted document");
                ExtractionResult::Document(ExtractedDocument { bytes, page_count })
            }
            OutputMode::Images(options) => {
                self.transition(RunState::Rasterizing);
                let sources: Vec<u32> = self.ranges.page_numbers().collect();
                let report = rasterize_pages(&extracted, &sources, options);
                info!(
                    converted = report.artifacts.len(),
                    failed = report.failed(),
                    "rasterized selection"
                );
                ExtractionResult::Images(report)
            }
        };

        self.transition(RunState::Done);
        Ok(result)
    }
}

/// Run the whole pipeline once.
pub fn run<C: PageContainer>(
    source: Option<&C>,
    selection: &str,
    mode: &OutputMode,
) -> Result<ExtractionResult, PipelineError> {
    let mut run = PipelineRun::new(source);
    let result = run.execute(selection, mode);
    debug!(selection = %run.ranges(), state = ?run.state(), "pipeline finished");
    result
}
