use serde::{Deserialize, Serialize};

/// What to do when the frequency table holds exactly one symbol.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SingleSymbolPolicy {
    /// Build a bare-leaf tree. Its code is the one-bit `0`, and the
    /// persisted codebook records it with an empty path.
    #[default]
    SyntheticBit,
    /// Fail with [`Error::SingleSymbol`](crate::Error::SingleSymbol).
    Reject,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecOptions {
    pub single_symbol: SingleSymbolPolicy,
}

impl CodecOptions {
    pub fn single_symbol(mut self, policy: SingleSymbolPolicy) -> Self {
        self.single_symbol = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_synthetic_bit() {
        assert_eq!(CodecOptions::default().single_symbol, SingleSymbolPolicy::SyntheticBit);
    }

    #[test]
    fn serde_roundtrip() {
        let opts = CodecOptions::default().single_symbol(SingleSymbolPolicy::Reject);
        let bytes = rmp_serde::to_vec_named(&opts).unwrap();
        let back: CodecOptions = rmp_serde::from_slice(&bytes).unwrap();
        assert_eq!(back, opts);
    }
}
