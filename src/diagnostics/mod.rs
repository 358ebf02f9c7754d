//! Structured diagnostics for repindex scan operations.
//!
//! Provides deterministic, sortable diagnostic types for skip reasons and
//! per-file errors. Nothing in here aborts a run.

pub mod scan_diagnostics;

pub use scan_diagnostics::{DiagnosticStage, ScanDiagnostic, SkipReason};
