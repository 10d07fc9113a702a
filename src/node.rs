// Node handles for remote execution targets

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::transport::{Transport, TransportKind};

static NEXT_NODE_ID: AtomicUsize = AtomicUsize::new(0);

/// Stable identity for a node handle.
///
/// Results are keyed by this id rather than by URI: two nodes may share a
/// URI (e.g. the same host under different credentials) and must still get
/// separate results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node-{}", self.0)
    }
}

/// A handle to one remote target.
///
/// Nodes are built by an external factory from a connection URI and carry
/// the transport that knows how to reach them. The execution core treats
/// the transport as an opaque capability set.
#[derive(Clone)]
pub struct Node {
    id: NodeId,
    uri: String,
    kind: TransportKind,
    transport: Arc<dyn Transport>,
}

impl Node {
    pub fn new(
        uri: impl Into<String>,
        kind: TransportKind,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Node {
            id: NodeId(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed)),
            uri: uri.into(),
            kind,
            transport,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn kind(&self) -> TransportKind {
        self.kind
    }

    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.uri)
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("uri", &self.uri)
            .field("kind", &self.kind)
            .finish()
    }
}
