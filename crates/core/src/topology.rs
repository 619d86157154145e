//! Topology graph exposed for display.
//!
//! The model itself never needs the graph: frames travel through direct
//! references. This module records which nodes exist and which pairs are
//! wired together so a presentation layer can draw the network, and derives
//! the classic collision/broadcast domain counts from that wiring.
//!
//! Every node carries a [`NodeKind`] fixed when it is built, so consumers
//! pick colours or categories by matching on the tag.

use std::collections::HashMap;
use std::fmt;

/// Closed set of node categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    EndDevice,
    Hub,
    Switch,
    Bridge,
}

impl NodeKind {
    /// Does a node of this kind give every attached link its own collision domain?
    pub fn splits_collision_domain(self) -> bool {
        matches!(self, NodeKind::Switch | NodeKind::Bridge)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            NodeKind::EndDevice => "end device",
            NodeKind::Hub => "hub",
            NodeKind::Switch => "switch",
            NodeKind::Bridge => "bridge",
        };
        f.write_str(label)
    }
}

/// Anything that can appear in a topology.
pub trait Node {
    fn name(&self) -> &str;
    fn kind(&self) -> NodeKind;
}

/// Index of a node inside a [`Topology`].
pub type NodeId = usize;

/// A node as recorded in the topology.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeInfo {
    pub name: String,
    pub kind: NodeKind,
}

/// Nodes plus undirected links between them.
#[derive(Debug, Clone, Default)]
pub struct Topology {
    nodes: Vec<NodeInfo>,
    links: Vec<(NodeId, NodeId)>,
}

impl Topology {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a node and return its id.
    pub fn add(&mut self, node: &dyn Node) -> NodeId {
        self.nodes.push(NodeInfo {
            name: node.name().to_string(),
            kind: node.kind(),
        });
        self.nodes.len() - 1
    }

    /// Record an undirected link. Links to unknown ids and self-loops are ignored.
    pub fn link(&mut self, a: NodeId, b: NodeId) {
        if a == b || a >= self.nodes.len() || b >= self.nodes.len() {
            return;
        }
        if !self.links.contains(&(a, b)) && !self.links.contains(&(b, a)) {
            self.links.push((a, b));
        }
    }

    pub fn nodes(&self) -> &[NodeInfo] {
        &self.nodes
    }

    /// Links as (name, name) pairs, in insertion order.
    pub fn links(&self) -> Vec<(&str, &str)> {
        self.links
            .iter()
            .map(|&(a, b)| (self.nodes[a].name.as_str(), self.nodes[b].name.as_str()))
            .collect()
    }

    /// Number of collision domains.
    ///
    /// Links that meet at a hub or an end device share a medium; links that
    /// meet at a switch or bridge port do not.
    pub fn collision_domains(&self) -> usize {
        let mut sets = DisjointSets::new(self.links.len());
        let mut shared_by: HashMap<NodeId, usize> = HashMap::new();

        for (idx, &(a, b)) in self.links.iter().enumerate() {
            for node in [a, b] {
                if self.nodes[node].kind.splits_collision_domain() {
                    continue;
                }
                match shared_by.get(&node) {
                    Some(&first) => sets.union(first, idx),
                    None => {
                        shared_by.insert(node, idx);
                    }
                }
            }
        }

        sets.count()
    }

    /// Number of broadcast domains: connected components of the whole graph.
    ///
    /// No layer-3 device exists in the model, so switches and bridges extend a
    /// broadcast domain rather than splitting it.
    pub fn broadcast_domains(&self) -> usize {
        let mut sets = DisjointSets::new(self.nodes.len());
        for &(a, b) in &self.links {
            sets.union(a, b);
        }
        sets.count()
    }
}

/// Union-find over `0..n`.
struct DisjointSets {
    parent: Vec<usize>,
}

impl DisjointSets {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra != rb {
            self.parent[ra] = rb;
        }
    }

    fn count(&mut self) -> usize {
        (0..self.parent.len()).filter(|&x| self.find(x) == x).count()
    }
}
