//! Huffman coding over a finite, ordered alphabet.
//!
//! A [`FrequencyTable`] goes through a [`TreeBuilder`] to become a
//! [`CodeTree`]. The tree flattens into a [`Codebook`] for storage and is
//! rebuilt from one, and an [`Encoder`]/[`Decoder`] pair turns symbols into
//! bits and back.
//!
//! ```
//! use huffman_codebook::{huffman, Codebook};
//!
//! let text = "abracadabra";
//! let tree = huffman(text.chars())?;
//! let book = Codebook::from_tree(&tree).to_string();
//!
//! let (enc, _) = tree.into_encoder_decoder_pair();
//! let bits = enc.encode(text.chars())?;
//!
//! let (_, dec) = book.parse::<Codebook<char>>()?.into_tree()?.into_encoder_decoder_pair();
//! let out: String = dec.decode_bits(&bits)?.into_iter().collect();
//! assert_eq!(out, text);
//! # Ok::<(), huffman_codebook::Error>(())
//! ```

pub mod bits;
pub mod builder;
pub mod codebook;
pub mod codec;
pub mod config;
pub mod error;
pub mod frequency;
pub mod path;
pub mod symbol;
pub mod tree;

pub use builder::{huffman, TreeBuilder};
pub use codebook::{Codebook, CodebookRecord};
pub use codec::{Decoder, Encoder};
pub use config::{CodecOptions, SingleSymbolPolicy};
pub use error::{CodebookError, Error, Result};
pub use frequency::FrequencyTable;
pub use path::Path;
pub use symbol::Symbol;
pub use tree::{CodeTree, Node, NodeId};
