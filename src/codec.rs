use crate::bits::{BitSink, BitSliceSource, BitSource};
use crate::error::{Error, Result};
use crate::path::Path;
use crate::symbol::Symbol;
use crate::tree::{CodeTree, Node};
use bitvec::prelude::*;
use std::collections::BTreeMap;

/// Symbol to bits, through a path table derived once from a tree.
#[derive(Debug, Clone)]
pub struct Encoder<S> {
    encode_table: BTreeMap<S, Path>,
}

impl<S: Symbol> Encoder<S> {
    pub fn new(encode_table: BTreeMap<S, Path>) -> Self {
        Self { encode_table }
    }

    pub fn code(&self, symbol: &S) -> Option<&Path> {
        self.encode_table.get(symbol)
    }

    /// Writes the code of every symbol of `stream` to `sink`. Nothing reaches
    /// the sink unless every symbol has a code.
    pub fn encode_into<K: BitSink>(
        &self,
        stream: impl IntoIterator<Item = S>,
        mut sink: K,
    ) -> Result<()> {
        let bits = self.encode(stream)?;
        sink.write_bits(&bits)
    }

    pub fn encode(&self, stream: impl IntoIterator<Item = S>) -> Result<BitVec<u8, Msb0>> {
        let mut out = BitVec::new();
        for s in stream {
            let code = self.code(&s).ok_or(Error::UnknownSymbol {
                ordinal: s.ordinal(),
            })?;
            out.extend_from_bitslice(code.bits());
        }

        Ok(out)
    }
}

impl<S: Symbol> From<&CodeTree<S>> for Encoder<S> {
    fn from(tree: &CodeTree<S>) -> Self {
        Self::new(tree.path_table())
    }
}

/// Bits to symbols, by repeated descent from the root of a tree.
#[derive(Debug, Clone)]
pub struct Decoder<S> {
    tree: CodeTree<S>,
}

impl<S: Symbol> Decoder<S> {
    pub fn new(tree: CodeTree<S>) -> Self {
        Self { tree }
    }

    pub fn tree(&self) -> &CodeTree<S> {
        &self.tree
    }

    pub fn into_tree(self) -> CodeTree<S> {
        self.tree
    }

    /// Decodes until `source` runs dry. The input must end exactly on a
    /// symbol boundary.
    pub fn decode(&self, mut source: impl BitSource) -> Result<Vec<S>> {
        let tree = &self.tree;
        let root = tree.root();
        let mut out = Vec::new();
        let mut consumed = 0;

        if let Node::Leaf { symbol, .. } = tree.node(root) {
            // bare leaf: every 0 bit is one occurrence
            while let Some(bit) = source.read_bit()? {
                if bit {
                    return Err(Error::InvalidBit { position: consumed });
                }
                consumed += 1;
                out.push(symbol.clone());
            }

            return Ok(out);
        }

        let mut cursor = root;
        while let Some(bit) = source.read_bit()? {
            cursor = tree
                .step(cursor, bit)
                .ok_or(Error::InvalidBit { position: consumed })?;
            consumed += 1;

            if let Node::Leaf { symbol, .. } = tree.node(cursor) {
                out.push(symbol.clone());
                cursor = root;
            }
        }

        log::trace!("decoded {} symbols from {} bits", out.len(), consumed);

        if cursor != root {
            return Err(Error::Truncated {
                consumed_bits: consumed,
            });
        }

        Ok(out)
    }

    pub fn decode_bits(&self, input: &BitSlice<u8, Msb0>) -> Result<Vec<S>> {
        self.decode(BitSliceSource::new(input))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bits::BitWriter;
    use crate::builder::{huffman, TreeBuilder};
    use crate::frequency::FrequencyTable;
    use crate::tree::CodeTree;

    fn abcd() -> CodeTree<char> {
        let t = FrequencyTable::try_from_iter([('A', 5), ('B', 2), ('C', 1), ('D', 1)]).unwrap();
        TreeBuilder::default().build(&t).unwrap()
    }

    #[test]
    fn test_encode_decode() {
        let s = String::from(
            "This is a really long message, I sure do hope it encodes and decodes properly.",
        );
        let tree = huffman(s.bytes()).unwrap();
        let (e, d) = tree.into_encoder_decoder_pair();

        let out = e.encode(s.bytes()).unwrap();
        let dec = String::from_utf8(d.decode_bits(&out).unwrap()).unwrap();

        assert_eq!(dec, s);
    }

    #[test]
    fn decodes_concatenated_paths() {
        let (_, d) = abcd().into_encoder_decoder_pair();
        // A=1 B=00 C=010 D=011
        let bits = bitvec![u8, Msb0; 1, 0, 0, 0, 1, 0, 0, 1, 1];
        assert_eq!(d.decode_bits(&bits).unwrap(), vec!['A', 'B', 'C', 'D']);
    }

    #[test]
    fn empty_input_decodes_to_nothing() {
        let (_, d) = abcd().into_encoder_decoder_pair();
        assert_eq!(d.decode_bits(BitSlice::empty()).unwrap(), Vec::<char>::new());
    }

    #[test]
    fn truncated_input_is_reported() {
        let (_, d) = abcd().into_encoder_decoder_pair();
        // A then the first two bits of C
        let bits = bitvec![u8, Msb0; 1, 0, 1];
        match d.decode_bits(&bits) {
            Err(Error::Truncated { consumed_bits }) => assert_eq!(consumed_bits, 3),
            other => panic!("expected truncation, got {other:?}"),
        }
    }

    #[test]
    fn unknown_symbol_is_reported() {
        let (e, _) = abcd().into_encoder_decoder_pair();
        match e.encode("ABZ".chars()) {
            Err(Error::UnknownSymbol { ordinal }) => assert_eq!(ordinal, 'Z' as u32),
            other => panic!("expected unknown symbol, got {other:?}"),
        }
    }

    #[test]
    fn unknown_symbol_writes_nothing_to_sink() {
        let (e, _) = abcd().into_encoder_decoder_pair();
        let mut writer = BitWriter::new(Vec::new());
        let input = "B".repeat(16) + "Z";

        assert!(matches!(
            e.encode_into(input.chars(), &mut writer),
            Err(Error::UnknownSymbol { .. })
        ));
        assert_eq!(writer.bits_written(), 0);
        let (bytes, n) = writer.finish().unwrap();
        assert_eq!((bytes.len(), n), (0, 0));
    }

    #[test]
    fn single_symbol_uses_one_bit() {
        let tree = huffman("aaaa".chars()).unwrap();
        let (e, d) = tree.into_encoder_decoder_pair();

        let bits = e.encode("aaa".chars()).unwrap();
        assert_eq!(bits, bitvec![u8, Msb0; 0, 0, 0]);
        assert_eq!(d.decode_bits(&bits).unwrap(), vec!['a', 'a', 'a']);
    }

    #[test]
    fn single_symbol_rejects_one_bits() {
        let (_, d) = huffman("x".chars()).unwrap().into_encoder_decoder_pair();
        let bits = bitvec![u8, Msb0; 0, 1];
        assert!(matches!(
            d.decode_bits(&bits),
            Err(Error::InvalidBit { position: 1 })
        ));
    }

    #[test]
    fn encoder_from_tree_matches_pair() {
        let tree = abcd();
        let e = Encoder::from(&tree);
        assert_eq!(e.code(&'A').map(|p| p.to_string()), Some("1".to_string()));
        assert_eq!(e.code(&'Z'), None);
    }

    #[test]
    fn shared_tree_decodes_concurrently() {
        let text = "concurrent readers share one immutable tree";
        let tree = huffman(text.chars()).unwrap();
        let (e, d) = tree.into_encoder_decoder_pair();
        let bits = e.encode(text.chars()).unwrap();

        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    let out: String = d.decode_bits(&bits).unwrap().into_iter().collect();
                    assert_eq!(out, text);
                });
            }
        });
    }
}
