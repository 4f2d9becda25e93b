//! Bit-level input and output.
//!
//! Bits are produced and consumed strictly in order, most significant bit
//! first within each byte. End of input is only ever signalled by
//! [`BitSource::read_bit`] returning `None`, never by an in-band marker.

use crate::error::Result;
use bitvec::prelude::*;
use std::io::{self, Read, Write};

pub trait BitSource {
    /// Next bit, or `None` once the source is exhausted.
    fn read_bit(&mut self) -> Result<Option<bool>>;
}

pub trait BitSink {
    fn write_bit(&mut self, bit: bool) -> Result<()>;

    fn write_bits(&mut self, bits: &BitSlice<u8, Msb0>) -> Result<()> {
        for b in bits.iter().by_vals() {
            self.write_bit(b)?;
        }

        Ok(())
    }
}

impl<S: BitSource + ?Sized> BitSource for &mut S {
    fn read_bit(&mut self) -> Result<Option<bool>> {
        (**self).read_bit()
    }
}

impl<S: BitSink + ?Sized> BitSink for &mut S {
    fn write_bit(&mut self, bit: bool) -> Result<()> {
        (**self).write_bit(bit)
    }
}

impl BitSink for BitVec<u8, Msb0> {
    fn write_bit(&mut self, bit: bool) -> Result<()> {
        self.push(bit);
        Ok(())
    }

    fn write_bits(&mut self, bits: &BitSlice<u8, Msb0>) -> Result<()> {
        self.extend_from_bitslice(bits);
        Ok(())
    }
}

/// Reads an in-memory bit slice front to back.
#[derive(Debug, Clone)]
pub struct BitSliceSource<'a> {
    bits: &'a BitSlice<u8, Msb0>,
    pos: usize,
}

impl<'a> BitSliceSource<'a> {
    pub fn new(bits: &'a BitSlice<u8, Msb0>) -> Self {
        Self { bits, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }
}

impl BitSource for BitSliceSource<'_> {
    fn read_bit(&mut self) -> Result<Option<bool>> {
        let bit = self.bits.get(self.pos).map(|b| *b);
        if bit.is_some() {
            self.pos += 1;
        }

        Ok(bit)
    }
}

/// Packs bits into bytes, MSB first, and writes them to `W`.
#[derive(Debug)]
pub struct BitWriter<W: Write> {
    inner: W,
    current: u8,
    filled: u8,
    written: u64,
}

impl<W: Write> BitWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            current: 0,
            filled: 0,
            written: 0,
        }
    }

    /// Bits written so far, excluding padding.
    pub fn bits_written(&self) -> u64 {
        self.written
    }

    /// Pads the last byte with zero bits, flushes, and returns the writer
    /// together with the number of meaningful bits.
    pub fn finish(mut self) -> Result<(W, u64)> {
        if self.filled > 0 {
            self.current <<= 8 - self.filled;
            self.inner.write_all(&[self.current])?;
        }
        self.inner.flush()?;

        Ok((self.inner, self.written))
    }
}

impl<W: Write> BitSink for BitWriter<W> {
    fn write_bit(&mut self, bit: bool) -> Result<()> {
        self.current = (self.current << 1) | u8::from(bit);
        self.filled += 1;
        self.written += 1;

        if self.filled == 8 {
            self.inner.write_all(&[self.current])?;
            self.current = 0;
            self.filled = 0;
        }

        Ok(())
    }
}

/// Unpacks bytes read from `R` into bits, MSB first.
///
/// Without a length limit every bit of every byte is produced, padding
/// included; use [`BitReader::with_len`] when the bit count is known.
#[derive(Debug)]
pub struct BitReader<R: Read> {
    inner: R,
    current: u8,
    left_in_byte: u8,
    remaining: Option<u64>,
}

impl<R: Read> BitReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            current: 0,
            left_in_byte: 0,
            remaining: None,
        }
    }

    /// Stops after `bits` bits even if more bytes follow.
    pub fn with_len(inner: R, bits: u64) -> Self {
        Self {
            remaining: Some(bits),
            ..Self::new(inner)
        }
    }

    fn fill(&mut self) -> io::Result<bool> {
        let mut buf = [0u8; 1];
        loop {
            match self.inner.read(&mut buf) {
                Ok(0) => return Ok(false),
                Ok(_) => {
                    self.current = buf[0];
                    self.left_in_byte = 8;
                    return Ok(true);
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }
}

impl<R: Read> BitSource for BitReader<R> {
    fn read_bit(&mut self) -> Result<Option<bool>> {
        if self.remaining == Some(0) {
            return Ok(None);
        }

        if self.left_in_byte == 0 && !self.fill()? {
            return Ok(None);
        }

        self.left_in_byte -= 1;
        if let Some(r) = self.remaining.as_mut() {
            *r -= 1;
        }

        Ok(Some((self.current >> self.left_in_byte) & 1 == 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn drain(mut src: impl BitSource) -> Vec<bool> {
        let mut out = Vec::new();
        while let Some(b) = src.read_bit().unwrap() {
            out.push(b);
        }

        out
    }

    #[test]
    fn slice_source_reads_in_order() {
        let bits = bitvec![u8, Msb0; 1, 0, 1, 1];
        let mut src = BitSliceSource::new(&bits);
        assert_eq!(src.read_bit().unwrap(), Some(true));
        assert_eq!(src.position(), 1);
        assert_eq!(drain(&mut src), vec![false, true, true]);
        assert_eq!(src.read_bit().unwrap(), None);
    }

    #[test]
    fn writer_packs_msb_first() {
        let mut w = BitWriter::new(Vec::new());
        for b in [true, false, true, false, false, false, false, false, true, true] {
            w.write_bit(b).unwrap();
        }
        assert_eq!(w.bits_written(), 10);
        let (bytes, n) = w.finish().unwrap();
        assert_eq!(n, 10);
        assert_eq!(bytes, vec![0b1010_0000, 0b1100_0000]);
    }

    #[test]
    fn reader_unpacks_msb_first() {
        let data = [0b1000_0001u8];
        let bits = drain(BitReader::new(&data[..]));
        assert_eq!(
            bits,
            vec![true, false, false, false, false, false, false, true]
        );
    }

    #[test]
    fn reader_respects_length() {
        let data = [0b1100_0000u8, 0xFF];
        let bits = drain(BitReader::with_len(&data[..], 3));
        assert_eq!(bits, vec![true, true, false]);
    }

    #[test]
    fn writer_reader_agree() {
        let input = bitvec![u8, Msb0; 0, 1, 1, 0, 1, 0, 0, 1, 1, 1, 0];
        let mut w = BitWriter::new(Vec::new());
        w.write_bits(&input).unwrap();
        let (bytes, n) = w.finish().unwrap();

        let out = drain(BitReader::with_len(&bytes[..], n));
        assert_eq!(out, input.iter().by_vals().collect::<Vec<_>>());
    }

    struct Broken;

    impl Read for Broken {
        fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "disk on fire"))
        }
    }

    #[test]
    fn reader_surfaces_io_errors() {
        let mut r = BitReader::new(Broken);
        assert!(matches!(r.read_bit(), Err(Error::Io(_))));
    }
}
