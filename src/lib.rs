// Convoy - parallel remote execution core
//
// Dispatches an action (command, script, task, or file upload) to a set of
// nodes in parallel under a concurrency cap, returning one result per node
// with strict per-node failure isolation. Transports, CLI parsing, and log
// subscribers belong to the embedding application.

pub mod config;
pub mod errors;
pub mod executor;
pub mod node;
pub mod transport;

pub use config::ExecutorConfig;
pub use errors::ExecutorError;
pub use executor::{
    Executor, ExecutionEvent, FaultKind, NodeAction, NodeResult, ProgressCallback, ResultSet,
};
pub use node::{Node, NodeId};
pub use transport::{
    ActionOptions, InitRegistry, InputMethod, Transport, TransportError, TransportKind,
};

/// Version of the convoy crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::ExecutorConfig;
    pub use crate::errors::ExecutorError;
    pub use crate::executor::{Executor, ExecutionEvent, NodeResult, ProgressCallback, ResultSet};
    pub use crate::node::{Node, NodeId};
    pub use crate::transport::{
        ActionOptions, InitRegistry, InputMethod, Transport, TransportError, TransportKind,
    };
}
