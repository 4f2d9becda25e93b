//! Flat, persistable form of a [`CodeTree`].
//!
//! The text form holds two lines per record: the symbol's decimal ordinal,
//! then its path as `0`/`1` characters (`0` = left). A single-symbol tree
//! is stored as one record with an empty path line.

use crate::error::{CodebookError, Error, Result};
use crate::path::Path;
use crate::symbol::Symbol;
use crate::tree::{CodeTree, Node, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::io::{BufRead, Write};
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodebookRecord<S> {
    pub symbol: S,
    pub path: Path,
}

impl<S> CodebookRecord<S> {
    pub fn new(symbol: S, path: Path) -> Self {
        Self { symbol, path }
    }
}

/// Ordered (symbol, path) records. Order carries no meaning when read back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Codebook<S> {
    records: Vec<CodebookRecord<S>>,
}

impl<S: Symbol> Codebook<S> {
    /// Every leaf of `tree`, pre-order, left before right.
    pub fn from_tree(tree: &CodeTree<S>) -> Self {
        tree.leaves()
            .map(|(s, path)| CodebookRecord::new(s.clone(), path))
            .collect()
    }

    pub fn records(&self) -> &[CodebookRecord<S>] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CodebookRecord<S>> {
        self.records.iter()
    }

    /// Rebuilds the tree the records describe.
    ///
    /// Rejects duplicate symbols, paths that are a prefix of (or equal to)
    /// another path, an empty path next to other records, and record sets
    /// that leave an internal node with a single child. Reconstructed nodes
    /// carry a weight of zero.
    pub fn to_tree(&self) -> Result<CodeTree<S>> {
        let tree = Reconstruction::run(&self.records)?;
        log::debug!(
            "rebuilt code tree from {} records, depth {}",
            self.records.len(),
            tree.depth()
        );

        Ok(tree)
    }

    pub fn into_tree(self) -> Result<CodeTree<S>> {
        self.to_tree()
    }

    pub fn write_to(&self, mut w: impl Write) -> Result<()> {
        for r in &self.records {
            writeln!(w, "{}", r.symbol.ordinal())?;
            writeln!(w, "{}", r.path)?;
        }
        w.flush()?;

        Ok(())
    }

    /// Parses the two-line-per-record text form. Only the syntax is checked
    /// here; [`Codebook::to_tree`] checks the structure.
    pub fn read_from(reader: impl BufRead) -> Result<Self> {
        let mut records = Vec::new();
        let mut lines = reader.lines().enumerate();

        while let Some((idx, line)) = lines.next() {
            let symbol_line = idx + 1;
            let line = line?;
            let text = line.strip_suffix('\r').unwrap_or(&line);

            let bad_ordinal =
                || Error::codebook_at(symbol_line, CodebookError::BadOrdinal(text.to_string()));
            if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
                return Err(bad_ordinal());
            }
            let ordinal = text.parse::<u32>().map_err(|_| bad_ordinal())?;
            let symbol = S::from_ordinal(ordinal).ok_or_else(|| {
                Error::codebook_at(symbol_line, CodebookError::UnknownOrdinal(ordinal))
            })?;

            let Some((_, path_line)) = lines.next() else {
                return Err(Error::codebook_at(symbol_line, CodebookError::MissingPath));
            };
            let path_line = path_line?;
            let path = path_line
                .strip_suffix('\r')
                .unwrap_or(&path_line)
                .parse::<Path>()
                .map_err(|e| Error::codebook_at(symbol_line + 1, e))?;

            records.push(CodebookRecord::new(symbol, path));
        }

        log::debug!("read {} codebook records", records.len());

        Ok(Self { records })
    }
}

impl<S: Symbol> FromStr for Codebook<S> {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::read_from(s.as_bytes())
    }
}

impl<S: Symbol> fmt::Display for Codebook<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in &self.records {
            writeln!(f, "{}", r.symbol.ordinal())?;
            writeln!(f, "{}", r.path)?;
        }

        Ok(())
    }
}

impl<S> FromIterator<CodebookRecord<S>> for Codebook<S> {
    fn from_iter<I: IntoIterator<Item = CodebookRecord<S>>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl<S> IntoIterator for Codebook<S> {
    type Item = CodebookRecord<S>;
    type IntoIter = std::vec::IntoIter<CodebookRecord<S>>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<S: Symbol> From<&CodeTree<S>> for Codebook<S> {
    fn from(tree: &CodeTree<S>) -> Self {
        Self::from_tree(tree)
    }
}

/// Arena slot while records are being placed.
enum Slot<S> {
    Open {
        left: Option<usize>,
        right: Option<usize>,
    },
    Leaf(S),
}

struct Reconstruction<S> {
    slots: Vec<Slot<S>>,
}

impl<S: Symbol> Reconstruction<S> {
    fn run(records: &[CodebookRecord<S>]) -> Result<CodeTree<S>> {
        let Some(first) = records.first() else {
            return Err(Error::codebook(CodebookError::Empty));
        };

        if records.iter().any(|r| r.path.is_empty()) {
            if records.len() > 1 {
                return Err(Error::codebook(CodebookError::MixedEmptyPath));
            }
            return Ok(CodeTree::single(first.symbol.clone(), 0));
        }

        let mut seen = BTreeSet::new();
        let mut this = Self {
            slots: vec![Slot::Open {
                left: None,
                right: None,
            }],
        };

        for r in records {
            if !seen.insert(&r.symbol) {
                return Err(Error::codebook(CodebookError::DuplicateSymbol(
                    r.symbol.ordinal(),
                )));
            }
            this.place(r)?;
        }

        this.finish()
    }

    fn place(&mut self, record: &CodebookRecord<S>) -> Result<()> {
        let collision = |other: &S| {
            Error::codebook(CodebookError::PrefixCollision {
                symbol: record.symbol.ordinal(),
                other: other.ordinal(),
            })
        };

        let mut cur = 0;
        for bit in record.path.iter() {
            let next = self.slots.len();
            let child = match &mut self.slots[cur] {
                Slot::Leaf(other) => return Err(collision(&*other)),
                Slot::Open { left, right } => {
                    let side = if bit { right } else { left };
                    *side.get_or_insert(next)
                }
            };

            if child == next {
                self.slots.push(Slot::Open {
                    left: None,
                    right: None,
                });
            }
            cur = child;
        }

        if let Some(other) = self.leaf_below(cur) {
            return Err(collision(other));
        }
        self.slots[cur] = Slot::Leaf(record.symbol.clone());

        Ok(())
    }

    /// First leaf at or under `id`. Only a freshly opened slot has none.
    fn leaf_below(&self, mut id: usize) -> Option<&S> {
        loop {
            match &self.slots[id] {
                Slot::Leaf(s) => return Some(s),
                Slot::Open { left, right } => id = left.or(*right)?,
            }
        }
    }

    fn finish(self) -> Result<CodeTree<S>> {
        let nodes = self
            .slots
            .into_iter()
            .map(|slot| match slot {
                Slot::Leaf(symbol) => Ok(Node::Leaf { symbol, weight: 0 }),
                Slot::Open {
                    left: Some(l),
                    right: Some(r),
                } => Ok(Node::Internal {
                    weight: 0,
                    left: NodeId(l),
                    right: NodeId(r),
                }),
                Slot::Open { .. } => Err(Error::codebook(CodebookError::IncompleteTree)),
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(CodeTree::from_parts(nodes, NodeId(0)))
    }
}
