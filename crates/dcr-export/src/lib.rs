//! DCR Export - Document rendering adapters
//!
//! Implementations of the [`dcr_core::ports::DocumentExporter`] port. Word
//! rendering ships here; PDF and Excel layout are produced by an external
//! collaborator and are not rendered by this crate.

pub mod docx;

pub use docx::DocxExporter;
