use super::rasterize::PageArtifact;
use std::io;
use std::time::Duration;
use tracing::debug;

/// Minimum gap between two consecutive artifact emissions.
///
/// Consumers that treat each artifact as a separate download may silently
/// drop deliveries that arrive in a burst.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    pub delay: Duration,
}

impl Pacing {
    pub const fn from_millis(ms: u64) -> Self {
        Pacing {
            delay: Duration::from_millis(ms),
        }
    }
}

impl Default for Pacing {
    fn default() -> Self {
        Pacing::from_millis(100)
    }
}

/// Where artifacts go, one at a time.
pub trait ArtifactSink {
    fn emit(&mut self, artifact: &PageArtifact) -> io::Result<()>;
}

impl ArtifactSink for Vec<PageArtifact> {
    fn emit(&mut self, artifact: &PageArtifact) -> io::Result<()> {
        self.push(artifact.clone());
        Ok(())
    }
}

/// Hand `artifacts` to `sink` in order, waiting `pacing.delay` between
/// emissions. The first artifact goes out immediately.
///
/// Stops at the first sink error; artifacts already emitted stay emitted.
pub async fn deliver<S: ArtifactSink + ?Sized>(
    artifacts: &[PageArtifact],
    pacing: Pacing,
    sink: &mut S,
) -> io::Result<usize> {
    for (i, artifact) in artifacts.iter().enumerate() {
        if i > 0 && !pacing.delay.is_zero() {
            tokio::time::sleep(pacing.delay).await;
        }
        debug!(page = artifact.page_number, "emitting artifact");
        sink.emit(artifact)?;
    }
    Ok(artifacts.len())
}
