//! Attack Path - Directed graph from an entry point to a target asset
//!
//! Edges reference nodes by id. A path is validated on construction and on
//! deserialization, so every `AttackPath` value has edges that resolve.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Role of a node in an attack path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Entry,
    Asset,
    Vulnerability,
    Target,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Entry => "entry",
            NodeKind::Asset => "asset",
            NodeKind::Vulnerability => "vulnerability",
            NodeKind::Target => "target",
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackPathNode {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
}

impl AttackPathNode {
    pub fn new(id: impl Into<String>, label: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackPathEdge {
    pub from: String,
    pub to: String,
}

impl AttackPathEdge {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Structural errors in an attack path
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AttackPathError {
    #[error("attack path '{path}' has an edge {from} -> {to} referencing unknown node '{missing}'")]
    DanglingEdge {
        path: String,
        from: String,
        to: String,
        missing: String,
    },

    #[error("attack path '{path}' declares node '{node}' more than once")]
    DuplicateNode { path: String, node: String },
}

/// Unvalidated wire form of an attack path
#[derive(Deserialize)]
struct RawAttackPath {
    id: String,
    name: String,
    #[serde(default)]
    nodes: Vec<AttackPathNode>,
    #[serde(default)]
    edges: Vec<AttackPathEdge>,
}

impl TryFrom<RawAttackPath> for AttackPath {
    type Error = AttackPathError;

    fn try_from(raw: RawAttackPath) -> Result<Self, Self::Error> {
        AttackPath::new(raw.id, raw.name, raw.nodes, raw.edges)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawAttackPath")]
pub struct AttackPath {
    id: String,
    name: String,
    nodes: Vec<AttackPathNode>,
    edges: Vec<AttackPathEdge>,
}

impl AttackPath {
    /// Build a path, rejecting duplicate node ids and edges to unknown nodes
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        nodes: Vec<AttackPathNode>,
        edges: Vec<AttackPathEdge>,
    ) -> Result<Self, AttackPathError> {
        let path = Self {
            id: id.into(),
            name: name.into(),
            nodes,
            edges,
        };
        path.validate()?;
        Ok(path)
    }

    fn validate(&self) -> Result<(), AttackPathError> {
        let mut seen = HashSet::with_capacity(self.nodes.len());
        for node in &self.nodes {
            if !seen.insert(node.id.as_str()) {
                return Err(AttackPathError::DuplicateNode {
                    path: self.id.clone(),
                    node: node.id.clone(),
                });
            }
        }

        for edge in &self.edges {
            for end in [&edge.from, &edge.to] {
                if !seen.contains(end.as_str()) {
                    return Err(AttackPathError::DanglingEdge {
                        path: self.id.clone(),
                        from: edge.from.clone(),
                        to: edge.to.clone(),
                        missing: end.clone(),
                    });
                }
            }
        }

        Ok(())
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn nodes(&self) -> &[AttackPathNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[AttackPathEdge] {
        &self.edges
    }

    pub fn node(&self, id: &str) -> Option<&AttackPathNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Nodes directly reachable from `id`, in edge order
    pub fn successors(&self, id: &str) -> Vec<&AttackPathNode> {
        self.edges
            .iter()
            .filter(|e| e.from == id)
            .filter_map(|e| self.node(&e.to))
            .collect()
    }

    pub fn entry_points(&self) -> Vec<&AttackPathNode> {
        self.nodes_of_kind(NodeKind::Entry)
    }

    pub fn targets(&self) -> Vec<&AttackPathNode> {
        self.nodes_of_kind(NodeKind::Target)
    }

    fn nodes_of_kind(&self, kind: NodeKind) -> Vec<&AttackPathNode> {
        self.nodes.iter().filter(|n| n.kind == kind).collect()
    }

    /// Node labels in declared order, joined with arrows
    pub fn route(&self) -> String {
        self.nodes
            .iter()
            .map(|n| n.label.as_str())
            .collect::<Vec<_>>()
            .join(" -> ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain() -> AttackPath {
        AttackPath::new(
            "ap-1",
            "Chain",
            vec![
                AttackPathNode::new("a", "Internet", NodeKind::Entry),
                AttackPathNode::new("b", "Gateway", NodeKind::Asset),
                AttackPathNode::new("c", "DB", NodeKind::Target),
            ],
            vec![AttackPathEdge::new("a", "b"), AttackPathEdge::new("b", "c")],
        )
        .unwrap()
    }

    #[test]
    fn valid_path_queries() {
        let path = chain();
        assert_eq!(path.route(), "Internet -> Gateway -> DB");
        assert_eq!(path.successors("a")[0].id, "b");
        assert!(path.successors("c").is_empty());
        assert_eq!(path.entry_points().len(), 1);
        assert_eq!(path.targets()[0].label, "DB");
        assert!(path.node("zzz").is_none());
    }

    #[test]
    fn rejects_dangling_edge() {
        let err = AttackPath::new(
            "ap-2",
            "Broken",
            vec![AttackPathNode::new("a", "A", NodeKind::Entry)],
            vec![AttackPathEdge::new("a", "ghost")],
        )
        .unwrap_err();

        match err {
            AttackPathError::DanglingEdge { missing, .. } => assert_eq!(missing, "ghost"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_duplicate_nodes() {
        let result = AttackPath::new(
            "ap-3",
            "Dup",
            vec![
                AttackPathNode::new("a", "A", NodeKind::Entry),
                AttackPathNode::new("a", "A again", NodeKind::Asset),
            ],
            vec![],
        );
        assert!(matches!(result, Err(AttackPathError::DuplicateNode { .. })));
    }

    #[test]
    fn deserialization_validates_edges() {
        let ok = r#"{"id":"p","name":"n","nodes":[{"id":"x","label":"X","type":"entry"}],"edges":[]}"#;
        let path: AttackPath = serde_json::from_str(ok).unwrap();
        assert_eq!(path.nodes()[0].kind, NodeKind::Entry);

        let bad = r#"{"id":"p","name":"n","nodes":[],"edges":[{"from":"x","to":"y"}]}"#;
        assert!(serde_json::from_str::<AttackPath>(bad).is_err());
    }

    #[test]
    fn node_kind_serializes_as_type_field() {
        let json = serde_json::to_value(chain()).unwrap();
        assert_eq!(json["nodes"][2]["type"], "target");
    }
}
