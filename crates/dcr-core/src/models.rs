pub mod filter;
pub mod index;
pub mod location;
pub mod metadata;
pub mod report;

pub use filter::ReportFilter;
pub use index::ReportIndex;
pub use location::{GeoPoint, GpsTrack, REGIONS};
pub use metadata::{StoreMetadata, STORE_SCHEMA_VERSION};
pub use report::{ExportKind, GeneratedFile, MediaRefs, Report, ReportStatus};
