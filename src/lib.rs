//! workman — fixed-priority worker lifecycle scheduler.
//!
//! Callers build named [`Worker`]s exposing optional init/run/end handlers
//! and register them with a [`WorkerManager`] at a priority level. Each
//! priority bucket is serviced by its own long-lived task that walks the
//! bucket's worker list on a configurable cadence until shutdown.

pub mod config;
pub mod error;
pub mod list;
pub mod manager;
pub mod worker;

pub use config::ManagerConfig;
pub use error::ManagerError;
pub use manager::WorkerManager;
pub use worker::{Worker, WorkerBuilder, WorkerStatus};
