use crate::codec::{Decoder, Encoder};
use crate::path::Path;
use crate::symbol::Symbol;
use std::collections::BTreeMap;

/// Index of a node inside its [`CodeTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node<S> {
    Leaf { symbol: S, weight: u64 },
    Internal { weight: u64, left: NodeId, right: NodeId },
}

impl<S> Node<S> {
    pub fn weight(&self) -> u64 {
        match self {
            Node::Leaf { weight, .. } | Node::Internal { weight, .. } => *weight,
        }
    }

    pub fn symbol(&self) -> Option<&S> {
        match self {
            Node::Leaf { symbol, .. } => Some(symbol),
            Node::Internal { .. } => None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }
}

/// A full binary code tree: every node is a leaf or has exactly two
/// children. Nodes live in one arena and refer to their children by index,
/// so the tree can be walked without recursion.
///
/// The tree never changes after construction; any number of decoders may
/// share it, each with its own cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTree<S> {
    nodes: Vec<Node<S>>,
    root: NodeId,
}

impl<S: Symbol> CodeTree<S> {
    /// Caller guarantees every child index is in bounds and the nodes form
    /// a full binary tree under `root`.
    pub(crate) fn from_parts(nodes: Vec<Node<S>>, root: NodeId) -> Self {
        debug_assert!(root.0 < nodes.len());
        Self { nodes, root }
    }

    /// A tree made of one bare leaf.
    pub fn single(symbol: S, weight: u64) -> Self {
        Self::from_parts(vec![Node::Leaf { symbol, weight }], NodeId(0))
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &Node<S> {
        &self.nodes[id.0]
    }

    /// Aggregate frequency of the whole tree.
    pub fn weight(&self) -> u64 {
        self.node(self.root).weight()
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// True for the degenerate one-symbol tree whose root is a leaf.
    pub fn is_single_leaf(&self) -> bool {
        self.node(self.root).is_leaf()
    }

    /// Child reached from `id` by taking `bit` (`false` = left). `None` at a leaf.
    pub fn step(&self, id: NodeId, bit: bool) -> Option<NodeId> {
        match self.node(id) {
            Node::Leaf { .. } => None,
            Node::Internal { left, right, .. } => Some(if bit { *right } else { *left }),
        }
    }

    /// Longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        let mut max = 0;
        let mut stack = vec![(self.root, 0)];
        while let Some((id, d)) = stack.pop() {
            match self.node(id) {
                Node::Leaf { .. } => max = max.max(d),
                Node::Internal { left, right, .. } => {
                    stack.push((*left, d + 1));
                    stack.push((*right, d + 1));
                }
            }
        }

        max
    }

    /// Every leaf with its path, pre-order, left before right.
    ///
    /// A bare leaf root is reported with an empty path.
    pub fn leaves(&self) -> Leaves<'_, S> {
        Leaves {
            tree: self,
            stack: vec![(self.root, Path::new())],
        }
    }

    /// Symbol to code, derived once for encoding.
    ///
    /// A bare leaf root gets the one-bit code `0` so it can still be
    /// written and read back.
    pub fn path_table(&self) -> BTreeMap<S, Path> {
        self.leaves()
            .map(|(s, mut p)| {
                if p.is_empty() {
                    p.push(false);
                }
                (s.clone(), p)
            })
            .collect()
    }

    pub fn into_encoder_decoder_pair(self) -> (Encoder<S>, Decoder<S>) {
        let enc = Encoder::new(self.path_table());
        (enc, Decoder::new(self))
    }
}

pub struct Leaves<'a, S> {
    tree: &'a CodeTree<S>,
    stack: Vec<(NodeId, Path)>,
}

impl<'a, S: Symbol> Iterator for Leaves<'a, S> {
    type Item = (&'a S, Path);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((id, path)) = self.stack.pop() {
            match self.tree.node(id) {
                Node::Leaf { symbol, .. } => return Some((symbol, path)),
                Node::Internal { left, right, .. } => {
                    // right first so left is popped first
                    let mut rpath = path.clone();
                    rpath.push(true);
                    self.stack.push((*right, rpath));

                    let mut lpath = path;
                    lpath.push(false);
                    self.stack.push((*left, lpath));
                }
            }
        }

        None
    }
}
