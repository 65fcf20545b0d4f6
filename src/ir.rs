use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GraphError {
    #[error("connection {index} references unknown node `{key}`")]
    UnknownNode { index: usize, key: String },

    #[error("connection {index} has no node on either end")]
    DetachedConnection { index: usize },

    #[error("connection {index} loops from `{key}` back to itself")]
    SelfLoop { index: usize, key: String },

    #[error("node `{key}` is declared more than once")]
    DuplicateNode { key: String },

    #[error("node `{key}` has invalid radius {radius}")]
    InvalidRadius { key: String, radius: f64 },
}

/// One end of a connection: either a node of the graph or the world outside it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Endpoint {
    Node(String),
    External,
}

impl Endpoint {
    pub fn node(key: impl Into<String>) -> Self {
        Self::Node(key.into())
    }

    pub fn key(&self) -> Option<&str> {
        match self {
            Self::Node(key) => Some(key.as_str()),
            Self::External => None,
        }
    }

    pub fn is_external(&self) -> bool {
        matches!(self, Self::External)
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    pub key: String,
    pub label: String,
    pub fill: Option<String>,
    /// Falls back to the layout's default radius when unset.
    pub radius: Option<f64>,
}

impl Node {
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            label: key.clone(),
            key,
            fill: None,
            radius: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub src: Endpoint,
    pub dst: Endpoint,
}

impl Connection {
    pub fn new(src: Endpoint, dst: Endpoint) -> Self {
        Self { src, dst }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Graph {
    pub nodes: BTreeMap<String, Node>,
    pub connections: Vec<Connection>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts the node if missing and applies whichever attributes are given.
    pub fn ensure_node(
        &mut self,
        key: &str,
        label: Option<String>,
        fill: Option<String>,
        radius: Option<f64>,
    ) {
        let entry = self
            .nodes
            .entry(key.to_string())
            .or_insert_with(|| Node::new(key));
        if let Some(label) = label {
            entry.label = label;
        }
        if let Some(fill) = fill {
            entry.fill = Some(fill);
        }
        if radius.is_some() {
            entry.radius = radius;
        }
    }

    pub fn connect(&mut self, src: &str, dst: &str) {
        self.ensure_node(src, None, None, None);
        self.ensure_node(dst, None, None, None);
        self.connections
            .push(Connection::new(Endpoint::node(src), Endpoint::node(dst)));
    }

    pub fn add_input(&mut self, key: &str) {
        self.ensure_node(key, None, None, None);
        self.connections
            .push(Connection::new(Endpoint::External, Endpoint::node(key)));
    }

    pub fn add_output(&mut self, key: &str) {
        self.ensure_node(key, None, None, None);
        self.connections
            .push(Connection::new(Endpoint::node(key), Endpoint::External));
    }

    /// Nodes fed from outside the graph.
    pub fn inputs(&self) -> BTreeSet<&str> {
        self.connections
            .iter()
            .filter(|conn| conn.src.is_external())
            .filter_map(|conn| conn.dst.key())
            .collect()
    }

    /// Nodes that feed something outside the graph.
    pub fn outputs(&self) -> BTreeSet<&str> {
        self.connections
            .iter()
            .filter(|conn| conn.dst.is_external())
            .filter_map(|conn| conn.src.key())
            .collect()
    }

    /// Connections whose both ends are nodes.
    pub fn internal_connections(&self) -> impl Iterator<Item = (&str, &str)> {
        self.connections
            .iter()
            .filter_map(|conn| Some((conn.src.key()?, conn.dst.key()?)))
    }

    pub fn validate(&self) -> Result<(), GraphError> {
        for node in self.nodes.values() {
            if let Some(radius) = node.radius {
                if !radius.is_finite() || radius <= 0.0 {
                    return Err(GraphError::InvalidRadius {
                        key: node.key.clone(),
                        radius,
                    });
                }
            }
        }
        for (index, conn) in self.connections.iter().enumerate() {
            if conn.src.is_external() && conn.dst.is_external() {
                return Err(GraphError::DetachedConnection { index });
            }
            if let (Some(src), Some(dst)) = (conn.src.key(), conn.dst.key()) {
                if src == dst {
                    return Err(GraphError::SelfLoop {
                        index,
                        key: src.to_string(),
                    });
                }
            }
            for key in [conn.src.key(), conn.dst.key()].into_iter().flatten() {
                if !self.nodes.contains_key(key) {
                    return Err(GraphError::UnknownNode {
                        index,
                        key: key.to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}
