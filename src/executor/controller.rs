// Parallel execution controller

use std::collections::BTreeSet;
use std::panic::AssertUnwindSafe;
use std::path::Path;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use serde_json::Value;

use super::notifier::{ExecutionEvent, Notifier, ProgressCallback};
use super::pool::WorkerPool;
use super::result::NodeResult;
use super::store::{ResultSet, ResultStore};
use crate::config::ExecutorConfig;
use crate::errors::ExecutorError;
use crate::node::Node;
use crate::transport::{ActionOptions, InitRegistry, InputMethod, TransportError, TransportKind};

/// An action to run against one node. Built by the convenience entry points
/// or supplied directly by the caller.
pub type NodeAction =
    Arc<dyn Fn(Arc<Node>) -> BoxFuture<'static, Result<Value, TransportError>> + Send + Sync>;

/// Dispatches one action to a set of nodes in parallel, bounded by the
/// configured concurrency, and aggregates a per-node result map.
///
/// Failure on one node never aborts or corrupts the outcome for others:
/// per-node faults become `NodeResult::Err` entries, and the only error
/// `execute` itself returns is a transport initialization failure.
pub struct Executor {
    config: ExecutorConfig,
    init_registry: InitRegistry,
}

impl Executor {
    pub fn new(config: ExecutorConfig) -> Self {
        Executor {
            config,
            init_registry: InitRegistry::new(),
        }
    }

    /// Attach one-time setup hooks, run once per transport kind present in
    /// a node set before any node work begins.
    pub fn with_init_registry(mut self, registry: InitRegistry) -> Self {
        self.init_registry = registry;
        self
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Run `action` against every node, returning one result per node.
    ///
    /// Each node's unit of work notifies `NodeStart`, performs
    /// connect -> action -> disconnect with failure containment, writes its
    /// result, and notifies `NodeFinished`. Disconnect is attempted exactly
    /// once per node on every exit path; a disconnect failure is logged and
    /// never rewrites the already-computed result.
    pub async fn execute(
        &self,
        nodes: &[Arc<Node>],
        action: NodeAction,
        callback: Option<Arc<dyn ProgressCallback>>,
    ) -> Result<ResultSet, ExecutorError> {
        let workers = nodes.len().min(self.config.concurrency.max(1));

        // One-time transport setup runs to completion before the pool
        // admits any node work. This is the only failure that aborts the
        // whole execution.
        let kinds: BTreeSet<TransportKind> = nodes.iter().map(|node| node.kind()).collect();
        for kind in kinds {
            self.init_registry
                .run(kind)
                .await
                .map_err(|source| ExecutorError::Initialization { kind, source })?;
        }

        let store = Arc::new(ResultStore::new());
        let notifier = Notifier::new(callback);
        let mut pool = WorkerPool::new(workers);

        for node in nodes {
            let node = Arc::clone(node);
            let action = Arc::clone(&action);
            let store = Arc::clone(&store);
            let sink = notifier.sink();

            pool.submit(async move {
                sink.notify(ExecutionEvent::NodeStart { node: node.clone() });

                let result = match node.transport().connect().await {
                    Err(e) => NodeResult::connect_error(e.to_string()),
                    Ok(()) => match AssertUnwindSafe(action(node.clone())).catch_unwind().await {
                        Ok(Ok(value)) => NodeResult::ok(value),
                        Ok(Err(e)) => NodeResult::execution_error(e.to_string()),
                        Err(_) => NodeResult::execution_error("action panicked"),
                    },
                };

                if let Err(e) = node.transport().disconnect().await {
                    tracing::info!(node = %node.uri(), error = %e, "failed to close connection");
                }

                store.insert(node.id(), result.clone());
                sink.notify(ExecutionEvent::NodeFinished {
                    node: node.clone(),
                    result,
                });
            });
        }

        let panicked = pool.drain().await;
        if panicked > 0 {
            for node in nodes {
                if !store.contains(node.id()) {
                    store.insert(
                        node.id(),
                        NodeResult::execution_error("unit of work did not complete"),
                    );
                }
            }
        }

        notifier.shutdown().await;
        Ok(store.snapshot(nodes))
    }

    /// Run a shell command on every node.
    pub async fn run_command(
        &self,
        nodes: &[Arc<Node>],
        command: &str,
        callback: Option<Arc<dyn ProgressCallback>>,
    ) -> Result<ResultSet, ExecutorError> {
        tracing::info!(
            "Running command '{}' on {}",
            command,
            describe_targets(nodes)
        );

        let options = self.action_options();
        let command_owned = command.to_string();
        let action: NodeAction = Arc::new(move |node: Arc<Node>| {
            let command = command_owned.clone();
            async move { node.transport().run_command(&command, &options).await }.boxed()
        });

        let results = self.execute(nodes, action, callback).await?;
        tracing::info!(
            "{}",
            summary_line("command", command, results.len(), results.failure_count())
        );
        Ok(results)
    }

    /// Ship a local script to every node and run it.
    pub async fn run_script(
        &self,
        nodes: &[Arc<Node>],
        script: &Path,
        arguments: &[String],
        callback: Option<Arc<dyn ProgressCallback>>,
    ) -> Result<ResultSet, ExecutorError> {
        tracing::info!(
            "Running script {} on {}",
            script.display(),
            describe_targets(nodes)
        );

        let options = self.action_options();
        let script_owned = script.to_path_buf();
        let arguments_owned = arguments.to_vec();
        let action: NodeAction = Arc::new(move |node: Arc<Node>| {
            let script = script_owned.clone();
            let arguments = arguments_owned.clone();
            async move {
                node.transport()
                    .run_script(&script, &arguments, &options)
                    .await
            }
            .boxed()
        });

        let results = self.execute(nodes, action, callback).await?;
        tracing::info!(
            "{}",
            summary_line(
                "script",
                &script.display().to_string(),
                results.len(),
                results.failure_count()
            )
        );
        Ok(results)
    }

    /// Run a named task on every node.
    pub async fn run_task(
        &self,
        nodes: &[Arc<Node>],
        task: &str,
        input_method: InputMethod,
        arguments: &Value,
        callback: Option<Arc<dyn ProgressCallback>>,
    ) -> Result<ResultSet, ExecutorError> {
        tracing::info!("Running task {} on {}", task, describe_targets(nodes));

        let options = self.action_options();
        let task_owned = task.to_string();
        let arguments_owned = arguments.clone();
        let action: NodeAction = Arc::new(move |node: Arc<Node>| {
            let task = task_owned.clone();
            let arguments = arguments_owned.clone();
            async move {
                node.transport()
                    .run_task(&task, input_method, &arguments, &options)
                    .await
            }
            .boxed()
        });

        let results = self.execute(nodes, action, callback).await?;
        tracing::info!(
            "{}",
            summary_line("task", task, results.len(), results.failure_count())
        );
        Ok(results)
    }

    /// Copy a local file or directory to every node.
    pub async fn file_upload(
        &self,
        nodes: &[Arc<Node>],
        source: &Path,
        destination: &str,
        callback: Option<Arc<dyn ProgressCallback>>,
    ) -> Result<ResultSet, ExecutorError> {
        tracing::info!(
            "Uploading {} to {} on {}",
            source.display(),
            destination,
            describe_targets(nodes)
        );

        let options = self.action_options();
        let source_owned = source.to_path_buf();
        let destination_owned = destination.to_string();
        let action: NodeAction = Arc::new(move |node: Arc<Node>| {
            let source = source_owned.clone();
            let destination = destination_owned.clone();
            async move {
                node.transport()
                    .upload(&source, &destination, &options)
                    .await
            }
            .boxed()
        });

        let results = self.execute(nodes, action, callback).await?;
        tracing::info!(
            "{}",
            summary_line(
                "upload",
                &source.display().to_string(),
                results.len(),
                results.failure_count()
            )
        );
        Ok(results)
    }

    fn action_options(&self) -> ActionOptions {
        ActionOptions {
            noop: self.config.noop,
        }
    }
}

fn describe_targets(nodes: &[Arc<Node>]) -> String {
    nodes
        .iter()
        .map(|node| node.uri())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Closing summary line. Pluralization depends only on the counts.
fn summary_line(verb: &str, object: &str, node_count: usize, failure_count: usize) -> String {
    format!(
        "Ran {verb} '{object}' on {node_count} node{} with {failure_count} failure{}",
        if node_count == 1 { "" } else { "s" },
        if failure_count == 1 { "" } else { "s" },
    )
}
