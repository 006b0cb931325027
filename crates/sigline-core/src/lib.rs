//! Sigline Core - stage-agnostic concurrent pipeline engine
//!
//! Stages are chained by conduits and each runs on its own thread.
//! Per-item work inside a stage goes to a shared, bounded worker pool.

pub mod conduit;
pub mod error;
pub mod gate;
pub mod logging;
pub mod pipeline;
pub mod pool;
pub mod stage;
pub mod value;

// Re-exports for convenience
pub use conduit::{Inlet, Outlet, conduit, drain, emit, preloaded};
pub use error::StageError;
pub use gate::{Gate, GateGuard};
pub use logging::init_logging;
pub use pipeline::{Pipeline, RunReport};
pub use pool::{SharedPool, build_pool, default_workers};
pub use stage::{Feed, FnStage, Stage};
pub use value::Value;
