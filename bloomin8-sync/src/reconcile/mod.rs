//! Reconciliation: diff a local folder against a device gallery and apply
//! the difference.

pub mod apply;
pub mod plan;

pub use apply::{execute, SyncGateway, SyncResult};
pub use plan::{orphans, plan, RemoteImage, SyncPlan};
