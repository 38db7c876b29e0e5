use crate::error::{ModelError, Result};
use crate::relations::{qualified, CONTAINS, IMPLEMENTS, IMPORTS};
use crate::types::ProjectModel;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// What a graph node stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Package,
    Type,
    Function,
    Method,
}

/// Type of relationship between nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    /// A contains B (package contains type, type contains method)
    Contains,

    /// Package A imports package B
    Imports,

    /// Type A satisfies interface B
    Implements,

    /// A field of type A mentions type B
    References,
}

/// Node in relation graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    /// Qualified name: `pkg`, `pkg.Type`, `pkg.func`, `pkg.Type.Method`
    pub name: String,
    pub kind: NodeKind,
}

/// Edge in relation graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub relation: RelationKind,
}

/// Graph view over a `ProjectModel`.
///
/// Import, implements and reference edges come from the model's relation
/// groups, so run `RelationDetector` first if you need them.
pub struct RelationGraph {
    /// Directed graph (node -> node with relationships)
    pub graph: DiGraph<GraphNode, GraphEdge>,

    /// (kind, qualified name) -> NodeIndex mapping for fast lookup
    pub node_index: HashMap<(NodeKind, String), NodeIndex>,
}

impl RelationGraph {
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            node_index: HashMap::new(),
        }
    }

    /// Build graph from a finished model
    pub fn from_model(model: &ProjectModel) -> Self {
        let mut graph = Self::new();

        for package in model.packages() {
            let package_idx = graph.add_node(NodeKind::Package, &package.name);

            for ty in package.types.values() {
                let type_name = qualified(&package.name, &ty.name);
                let type_idx = graph.add_node(NodeKind::Type, &type_name);
                graph.add_edge(package_idx, type_idx, RelationKind::Contains);

                for method in ty.methods.values() {
                    let method_idx =
                        graph.add_node(NodeKind::Method, &qualified(&type_name, &method.name));
                    graph.add_edge(type_idx, method_idx, RelationKind::Contains);
                }
            }

            for function in package.functions.values() {
                let function_idx =
                    graph.add_node(NodeKind::Function, &qualified(&package.name, &function.name));
                graph.add_edge(package_idx, function_idx, RelationKind::Contains);
            }
        }

        let grouped = [
            (IMPORTS, NodeKind::Package, RelationKind::Imports),
            (IMPLEMENTS, NodeKind::Type, RelationKind::Implements),
            (CONTAINS, NodeKind::Type, RelationKind::References),
        ];
        for (group, kind, relation) in grouped {
            for (from, to) in model.relation_pairs(group) {
                if let (Some(from_idx), Some(to_idx)) =
                    (graph.find_node(kind, from), graph.find_node(kind, to))
                {
                    graph.add_edge(from_idx, to_idx, relation);
                }
            }
        }

        log::debug!(
            "Built relation graph: {} nodes, {} edges",
            graph.node_count(),
            graph.edge_count()
        );

        graph
    }

    /// Add node to graph
    pub fn add_node(&mut self, kind: NodeKind, name: &str) -> NodeIndex {
        if let Some(&idx) = self.node_index.get(&(kind, name.to_string())) {
            return idx;
        }
        let idx = self.graph.add_node(GraphNode {
            name: name.to_string(),
            kind,
        });
        self.node_index.insert((kind, name.to_string()), idx);
        idx
    }

    /// Add edge between nodes
    pub fn add_edge(&mut self, from: NodeIndex, to: NodeIndex, relation: RelationKind) {
        self.graph.add_edge(from, to, GraphEdge { relation });
    }

    /// Find node by kind and qualified name
    pub fn find_node(&self, kind: NodeKind, name: &str) -> Option<NodeIndex> {
        self.node_index.get(&(kind, name.to_string())).copied()
    }

    /// Get node data
    pub fn get_node(&self, idx: NodeIndex) -> Option<&GraphNode> {
        self.graph.node_weight(idx)
    }

    /// Nodes reached from `name` over outgoing `relation` edges
    pub fn neighbors(
        &self,
        kind: NodeKind,
        name: &str,
        relation: RelationKind,
    ) -> Result<Vec<&GraphNode>> {
        self.adjacent(kind, name, relation, Direction::Outgoing)
    }

    /// Nodes pointing at `name` over incoming `relation` edges
    pub fn dependents(
        &self,
        kind: NodeKind,
        name: &str,
        relation: RelationKind,
    ) -> Result<Vec<&GraphNode>> {
        self.adjacent(kind, name, relation, Direction::Incoming)
    }

    fn adjacent(
        &self,
        kind: NodeKind,
        name: &str,
        relation: RelationKind,
        direction: Direction,
    ) -> Result<Vec<&GraphNode>> {
        let node = self
            .find_node(kind, name)
            .ok_or_else(|| ModelError::NodeNotFound(name.to_string()))?;

        let mut nodes: Vec<&GraphNode> = self
            .graph
            .edges_directed(node, direction)
            .filter(|edge| edge.weight().relation == relation)
            .filter_map(|edge| {
                let other = match direction {
                    Direction::Outgoing => edge.target(),
                    Direction::Incoming => edge.source(),
                };
                self.get_node(other)
            })
            .collect();
        nodes.sort_by(|a, b| a.name.cmp(&b.name));
        nodes.dedup();
        Ok(nodes)
    }

    /// Package names ordered so that every package comes after the packages it imports
    pub fn package_order(&self) -> Result<Vec<String>> {
        let mut imports: DiGraph<&str, ()> = DiGraph::new();
        let mut index: HashMap<NodeIndex, NodeIndex> = HashMap::new();

        for idx in self.graph.node_indices() {
            if let Some(node) = self.get_node(idx) {
                if node.kind == NodeKind::Package {
                    index.insert(idx, imports.add_node(node.name.as_str()));
                }
            }
        }

        for edge in self.graph.edge_references() {
            if edge.weight().relation != RelationKind::Imports {
                continue;
            }
            if let (Some(&from), Some(&to)) =
                (index.get(&edge.source()), index.get(&edge.target()))
            {
                // dependency first: imported package -> importer
                imports.add_edge(to, from, ());
            }
        }

        let order = toposort(&imports, None).map_err(|cycle| {
            ModelError::DependencyCycle(imports[cycle.node_id()].to_string())
        })?;

        Ok(order.into_iter().map(|idx| imports[idx].to_string()).collect())
    }

    /// Get node count
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Get edge count
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}

impl Default for RelationGraph {
    fn default() -> Self {
        Self::new()
    }
}
