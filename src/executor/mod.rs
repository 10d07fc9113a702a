// Executor module - parallel dispatch engine

pub mod controller;
pub mod notifier;
pub mod pool;
pub mod result;
pub mod store;

pub use controller::{Executor, NodeAction};
pub use notifier::{EventSink, ExecutionEvent, Notifier, ProgressCallback};
pub use pool::WorkerPool;
pub use result::{FaultKind, NodeResult};
pub use store::{ResultSet, ResultStore};
