//! Application services built on top of the state store.

pub mod export;

pub use export::{export_state, import_state, ExportBundle, ExportError, ImportSummary};
