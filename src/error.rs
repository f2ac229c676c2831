//! Error types for the worker manager.
//!
//! The original design of these paths was to degrade silently; here bad
//! input is reported as a typed error instead, but still never panics.

/// Errors returned by [`WorkerManager`](crate::manager::WorkerManager)
/// operations.
#[derive(Debug, thiserror::Error)]
pub enum ManagerError {
    #[error("priority {priority} out of range ({levels} bucket levels)")]
    PriorityOutOfRange { priority: usize, levels: usize },

    #[error("manager already started")]
    AlreadyStarted,

    #[error("manager is not running")]
    NotRunning,

    #[error("manager was already shut down")]
    ShutDown,

    #[error("worker '{name}' is not registered in any bucket")]
    WorkerNotFound { name: String },
}
