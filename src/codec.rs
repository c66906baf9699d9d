//! Byte ↔ DTMF symbol-pair codec
//!
//! Every byte becomes two symbols, high nibble first. [`Decoder`] is the
//! incremental inverse and is what the file transcoder drives; [`encode`] and
//! [`decode`] are whole-buffer conveniences.

use crate::alphabet::Symbol;
use crate::{DtmfError, Result};

/// Symbols for one byte, high nibble first.
#[inline]
pub fn encode_byte(byte: u8) -> [u8; 2] {
    [
        Symbol::from_nibble(byte >> 4).as_ascii(),
        Symbol::from_nibble(byte & 0x0F).as_ascii(),
    ]
}

/// Append the symbols for `data` to `out`.
pub fn encode_into(data: &[u8], out: &mut Vec<u8>) {
    out.reserve(data.len() * 2);
    for &byte in data {
        out.extend_from_slice(&encode_byte(byte));
    }
}

/// Encode `data` into a symbol string of twice its length.
pub fn encode(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len() * 2);
    encode_into(data, &mut out);
    out
}

/// Decode a complete symbol stream.
///
/// Fails with [`DtmfError::InvalidSymbol`] on a byte outside the alphabet and
/// with [`DtmfError::TruncatedStream`] when the stream has an odd length.
pub fn decode(symbols: &[u8]) -> Result<Vec<u8>> {
    let mut decoder = Decoder::new();
    let mut out = Vec::with_capacity(symbols.len() / 2);
    decoder.feed(symbols, &mut out)?;
    decoder.finish()?;
    Ok(out)
}

/// Incremental symbol-pair decoder.
///
/// Odd-positioned symbols are held as the pending high nibble; each
/// even-positioned symbol completes a byte. Input may be split anywhere,
/// including between the two symbols of a pair.
#[derive(Debug, Default, Clone)]
pub struct Decoder {
    pending_high: Option<u8>,
    position: u64,
}

impl Decoder {
    /// Create a decoder at the start of a stream.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of symbols consumed so far.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Decode `symbols`, appending completed bytes to `out`.
    ///
    /// On error, bytes completed before the offending symbol are already in `out`.
    pub fn feed(&mut self, symbols: &[u8], out: &mut Vec<u8>) -> Result<()> {
        for &value in symbols {
            let nibble = Symbol::from_ascii(value)
                .ok_or(DtmfError::InvalidSymbol {
                    value,
                    offset: self.position,
                })?
                .nibble();
            self.position += 1;

            match self.pending_high.take() {
                None => self.pending_high = Some(nibble << 4),
                Some(high) => out.push(high | nibble),
            }
        }
        Ok(())
    }

    /// Check that the stream ended on a pair boundary.
    pub fn finish(&self) -> Result<()> {
        if self.pending_high.is_some() {
            return Err(DtmfError::TruncatedStream {
                length: self.position,
            });
        }
        Ok(())
    }
}
