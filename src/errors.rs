// Executor-level errors

use thiserror::Error;

use crate::transport::{TransportError, TransportKind};

/// Errors surfaced by `Executor::execute` itself.
///
/// Per-node faults never appear here; they are converted to `NodeResult`
/// values at the point of detection. Only a systemic precondition failure
/// (transport setup before the pool starts) aborts an execution.
#[derive(Debug, Error)]
pub enum ExecutorError {
    #[error("transport initialization failed for {kind}: {source}")]
    Initialization {
        kind: TransportKind,
        #[source]
        source: TransportError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initialization_error_names_the_kind() {
        let err = ExecutorError::Initialization {
            kind: TransportKind::WinRm,
            source: TransportError::Auth("prompt cancelled".to_string()),
        };
        let message = err.to_string();
        assert!(message.contains("winrm"));
        assert!(message.contains("prompt cancelled"));
    }
}
