// Transport capability interface and per-kind setup hooks

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;
use serde_json::Value;
use thiserror::Error;

/// Category of connection mechanism a node uses.
///
/// Grouping by kind lets the executor run one-time setup (e.g. prompting for
/// credentials) once per kind instead of racing it across nodes.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TransportKind {
    Ssh,
    WinRm,
    Local,
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransportKind::Ssh => "ssh",
            TransportKind::WinRm => "winrm",
            TransportKind::Local => "local",
        };
        write!(f, "{}", name)
    }
}

/// How task parameters are handed to the remote task process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMethod {
    #[default]
    Both,
    Stdin,
    Environment,
}

impl fmt::Display for InputMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InputMethod::Both => "both",
            InputMethod::Stdin => "stdin",
            InputMethod::Environment => "environment",
        };
        write!(f, "{}", name)
    }
}

/// Options threaded from configuration into every node action.
///
/// `noop` is uninterpreted by the execution core; transports and tasks
/// decide what a dry run means for them.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActionOptions {
    pub noop: bool,
}

/// Errors produced by transport implementations.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("connection failed: {0}")]
    Connect(String),

    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("{0}")]
    Action(String),

    #[error("failed to close connection: {0}")]
    Disconnect(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Common trait for all transport types (SSH, WinRM, local, etc.)
///
/// Any implementation of this capability set is interchangeable to the
/// executor. Implementations own their session state internally; the
/// executor only drives connect, one action, and disconnect per node.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Open the connection to the target.
    async fn connect(&self) -> Result<(), TransportError>;

    /// Close the connection. Called exactly once per node per execution,
    /// on every exit path.
    async fn disconnect(&self) -> Result<(), TransportError>;

    /// Execute a shell command and return its result payload.
    async fn run_command(
        &self,
        command: &str,
        options: &ActionOptions,
    ) -> Result<Value, TransportError>;

    /// Ship a local script to the target and run it with the given arguments.
    async fn run_script(
        &self,
        script: &Path,
        arguments: &[String],
        options: &ActionOptions,
    ) -> Result<Value, TransportError>;

    /// Run a named task on the target.
    async fn run_task(
        &self,
        task: &str,
        input_method: InputMethod,
        arguments: &Value,
        options: &ActionOptions,
    ) -> Result<Value, TransportError>;

    /// Copy a local file or directory to the target.
    async fn upload(
        &self,
        source: &Path,
        destination: &str,
        options: &ActionOptions,
    ) -> Result<Value, TransportError>;
}

type InitHook = Arc<dyn Fn() -> BoxFuture<'static, Result<(), TransportError>> + Send + Sync>;

/// Registry of one-time transport setup hooks, keyed by kind.
///
/// The executor runs the hook for each distinct kind present in a node set
/// before the worker pool admits any node work, so steady-state execution
/// needs no per-kind locking.
#[derive(Default)]
pub struct InitRegistry {
    hooks: HashMap<TransportKind, InitHook>,
}

impl InitRegistry {
    pub fn new() -> Self {
        InitRegistry {
            hooks: HashMap::new(),
        }
    }

    /// Register the setup hook for a transport kind, replacing any previous
    /// hook for that kind.
    pub fn register<F, Fut>(&mut self, kind: TransportKind, hook: F)
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Result<(), TransportError>> + Send + 'static,
    {
        self.hooks.insert(kind, Arc::new(move || Box::pin(hook())));
    }

    /// Run the hook for a kind, if one is registered.
    pub async fn run(&self, kind: TransportKind) -> Result<(), TransportError> {
        match self.hooks.get(&kind) {
            Some(hook) => hook().await,
            None => Ok(()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_registry_runs_registered_hook() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut registry = InitRegistry::new();

        let counter = calls.clone();
        registry.register(TransportKind::Ssh, move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        });

        registry.run(TransportKind::Ssh).await.unwrap();
        registry.run(TransportKind::Ssh).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_registry_without_hook_is_a_no_op() {
        let registry = InitRegistry::new();
        assert!(registry.run(TransportKind::WinRm).await.is_ok());
    }

    #[tokio::test]
    async fn test_registry_surfaces_hook_failure() {
        let mut registry = InitRegistry::new();
        registry.register(TransportKind::WinRm, || async {
            Err(TransportError::Auth("no credentials available".to_string()))
        });

        let err = registry.run(TransportKind::WinRm).await.unwrap_err();
        assert!(err.to_string().contains("no credentials available"));
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(TransportKind::Ssh.to_string(), "ssh");
        assert_eq!(TransportKind::WinRm.to_string(), "winrm");
        assert_eq!(TransportKind::Local.to_string(), "local");
    }
}
