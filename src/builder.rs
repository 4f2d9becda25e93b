use crate::config::{CodecOptions, SingleSymbolPolicy};
use crate::error::{Error, Result};
use crate::frequency::FrequencyTable;
use crate::symbol::Symbol;
use crate::tree::{CodeTree, Node, NodeId};
use derivative::Derivative;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Heap entry ordered by `(weight, rank)` only.
///
/// Leaves are ranked `0..n` by ascending symbol, merged nodes get the next
/// rank in creation order. Ranks are unique, so the order is total.
#[derive(Debug, Clone, Copy, Derivative)]
#[derivative(PartialEq, Eq, PartialOrd, Ord)]
struct Pending {
    weight: u64,
    rank: usize,

    #[derivative(PartialEq = "ignore")]
    #[derivative(PartialOrd = "ignore")]
    #[derivative(Ord = "ignore")]
    id: NodeId,
}

/// Greedy Huffman merge over a [`FrequencyTable`].
///
/// The two lowest entries are popped; the first one popped becomes the left
/// child. Equal weights resolve leaves before merged nodes, smaller symbols
/// before larger ones and older merges before newer ones, so the same table
/// always yields the same tree.
#[derive(Debug, Clone, Default)]
pub struct TreeBuilder {
    options: CodecOptions,
}

impl TreeBuilder {
    pub fn new(options: CodecOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CodecOptions {
        &self.options
    }

    pub fn build<S: Symbol>(&self, table: &FrequencyTable<S>) -> Result<CodeTree<S>> {
        log::debug!("building code tree from {} symbols", table.len());

        match table.len() {
            0 => return Err(Error::EmptyFrequencyTable),
            1 if self.options.single_symbol == SingleSymbolPolicy::Reject => {
                return Err(Error::SingleSymbol)
            }
            _ => {}
        }

        // a full binary tree with n leaves has 2n - 1 nodes
        let mut nodes = Vec::with_capacity(2 * table.len() - 1);
        let mut pq: BinaryHeap<Reverse<Pending>> = BinaryHeap::with_capacity(table.len());

        for (s, count) in table.iter() {
            let id = NodeId(nodes.len());
            nodes.push(Node::Leaf {
                symbol: s.clone(),
                weight: count,
            });
            pq.push(Reverse(Pending {
                weight: count,
                rank: id.0,
                id,
            }));
        }

        let root = loop {
            let Reverse(left) = pq.pop().ok_or(Error::EmptyFrequencyTable)?;
            let Some(Reverse(right)) = pq.pop() else {
                break left;
            };

            let weight = left
                .weight
                .checked_add(right.weight)
                .ok_or(Error::WeightOverflow)?;
            let id = NodeId(nodes.len());
            log::trace!(
                "merge {:?} ({}) + {:?} ({}) -> {:?}",
                left.id,
                left.weight,
                right.id,
                right.weight,
                id
            );

            nodes.push(Node::Internal {
                weight,
                left: left.id,
                right: right.id,
            });
            pq.push(Reverse(Pending {
                weight,
                rank: id.0,
                id,
            }));
        };

        let tree = CodeTree::from_parts(nodes, root.id);
        log::debug!(
            "built code tree: {} leaves, depth {}",
            tree.leaf_count(),
            tree.depth()
        );

        Ok(tree)
    }
}

/// Tallies `symbols` and builds a tree with default options.
pub fn huffman<S: Symbol>(symbols: impl IntoIterator<Item = S>) -> Result<CodeTree<S>> {
    TreeBuilder::default().build(&FrequencyTable::tally(symbols)?)
}
