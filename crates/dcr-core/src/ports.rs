//! Port trait definitions
//!
//! These traits define the interfaces that adapters must implement.

use crate::error::Result;
use crate::models::{ExportKind, Report};

/// Port for rendering a report into a formatted document.
///
/// Implementations are pure functions of a fully populated report: same
/// input, same layout (modulo embedded timestamps). Failures here must
/// never invalidate the underlying record; callers degrade by leaving the
/// report's generated-file pointers absent or stale.
pub trait DocumentExporter: Send + Sync {
    /// Render the report into document bytes of the given kind
    fn generate(&self, report: &Report, kind: ExportKind) -> Result<Vec<u8>>;

    /// Whether this exporter can render the given kind
    fn supports(&self, kind: ExportKind) -> bool;
}
