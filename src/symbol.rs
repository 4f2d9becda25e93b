use std::fmt::Debug;
use std::hash::Hash;

/// One element of a finite, totally ordered alphabet.
///
/// The ordinal is what a persisted codebook stores for the symbol.
pub trait Symbol: Ord + Clone + Hash + Debug {
    fn ordinal(&self) -> u32;

    fn from_ordinal(ordinal: u32) -> Option<Self>;
}

impl Symbol for u8 {
    fn ordinal(&self) -> u32 {
        u32::from(*self)
    }

    fn from_ordinal(ordinal: u32) -> Option<Self> {
        u8::try_from(ordinal).ok()
    }
}

impl Symbol for u16 {
    fn ordinal(&self) -> u32 {
        u32::from(*self)
    }

    fn from_ordinal(ordinal: u32) -> Option<Self> {
        u16::try_from(ordinal).ok()
    }
}

impl Symbol for u32 {
    fn ordinal(&self) -> u32 {
        *self
    }

    fn from_ordinal(ordinal: u32) -> Option<Self> {
        Some(ordinal)
    }
}

impl Symbol for char {
    fn ordinal(&self) -> u32 {
        u32::from(*self)
    }

    fn from_ordinal(ordinal: u32) -> Option<Self> {
        char::from_u32(ordinal)
    }
}
