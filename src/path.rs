use crate::error::CodebookError;
use bitvec::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const LEFT: char = '0';
const RIGHT: char = '1';

/// Branch choices from the root to a leaf; `false` is left (`0`), `true` is
/// right (`1`). Doubles as the leaf's code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Path(BitVec<u8, Msb0>);

impl Path {
    pub fn new() -> Self {
        Self(BitVec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn push(&mut self, bit: bool) {
        self.0.push(bit);
    }

    pub fn pop(&mut self) -> Option<bool> {
        self.0.pop()
    }

    pub fn bits(&self) -> &BitSlice<u8, Msb0> {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.0.iter().by_vals()
    }

    /// Whether `self` is a prefix of `other`. Equal paths count.
    pub fn is_prefix_of(&self, other: &Path) -> bool {
        other.0.starts_with(self.0.as_bitslice())
    }
}

impl From<&BitSlice<u8, Msb0>> for Path {
    fn from(bits: &BitSlice<u8, Msb0>) -> Self {
        Self(bits.to_bitvec())
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in self.iter() {
            f.write_str(if b { "1" } else { "0" })?;
        }

        Ok(())
    }
}

impl FromStr for Path {
    type Err = CodebookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut path = Path::new();
        for c in s.chars() {
            match c {
                LEFT => path.push(false),
                RIGHT => path.push(true),
                other => return Err(CodebookError::BadPathChar(other)),
            }
        }

        Ok(path)
    }
}

impl From<Path> for String {
    fn from(path: Path) -> Self {
        path.to_string()
    }
}

impl TryFrom<String> for Path {
    type Error = CodebookError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}
