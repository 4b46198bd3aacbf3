//! Bloomin8 folder sync
//!
//! Reconciles a local image folder with one gallery on a Bloomin8 frame:
//! wake the frame if needed, diff by file name, confirm, apply, and put the
//! frame back to sleep.

pub mod config;
pub mod errors;
pub mod orchestrator;
pub mod reconcile;
pub mod report;

#[cfg(test)]
pub(crate) mod testing;

pub use config::SyncConfig;
pub use errors::SyncError;
pub use orchestrator::{run, RunOutcome, RunReport, SyncOptions};
pub use reconcile::{execute, plan, SyncPlan, SyncResult};
