//! DCR Store - Local persistence, remote mirror, and synchronization
//!
//! This crate contains the storage adapters for the DCR field-reporting
//! system: the key-value-backed local record store with its secondary
//! index, the remote document-store adapter, and the service that applies
//! the remote-first / local-fallback policy on top of both.

pub mod kv;
pub mod legacy;
pub mod local;
pub mod ports;
pub mod remote;
pub mod service;

pub use local::{DatabaseExport, LocalStore};
pub use ports::{QueryField, RemoteStore};
pub use service::{
    DeleteReceipt, ExportReceipt, NewReport, RemoteOutcome, ReportChanges, ReportService,
    SaveReceipt,
};
