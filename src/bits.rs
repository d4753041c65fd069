//! Hex expansion and fixed-width reads over the resulting bit stream.
//!
//! Every read takes an explicit cursor and hands back the advanced one; the stream itself is
//! never consumed or mutated, so any number of windows can look at it at once.

use std::fmt;

use bitvec::prelude::*;

use crate::error::{DecodeError, Result};

/// Widest field [`BitWindow::read_bits`] can return in one go.
pub const MAX_READ_WIDTH: usize = u64::BITS as usize;

/// Result is only meaningful for `0-9` and uppercase `A-F`, everything else is rejected.
fn nibble(digit: char) -> Option<u8> {
    match digit {
        '0'..='9' => Some(digit as u8 - b'0'),
        'A'..='F' => Some(digit as u8 - b'A' + 10),
        _ => None,
    }
}

/// Immutable MSB-first bit stream expanded from hexadecimal text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitSource {
    bits: BitVec<u8, Msb0>,
}

impl BitSource {
    /// Expands each hex digit into exactly four bits, most significant first.
    pub fn from_hex(hex: &str) -> Result<Self> {
        let mut bits = BitVec::with_capacity(hex.len() * 4);
        for (position, digit) in hex.chars().enumerate() {
            let value = nibble(digit).ok_or(DecodeError::InvalidHexDigit { position, digit })?;
            for shift in (0..4).rev() {
                bits.push((value >> shift) & 1 == 1);
            }
        }
        Ok(Self { bits })
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// A window over the whole stream.
    pub fn window(&self) -> BitWindow<'_> {
        BitWindow { bits: &self.bits }
    }

    pub fn read_bits(&self, cursor: usize, width: usize) -> Result<(u64, usize)> {
        self.window().read_bits(cursor, width)
    }
}

impl fmt::Display for BitSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.bits.iter().by_vals() {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Read-only view of a prefix of a [`BitSource`].
///
/// Cursors stay absolute: a window produced by [`BitWindow::limit`] starts at the same bit as
/// its parent and only moves the end, so offsets can be passed freely between the two.
#[derive(Debug, Clone, Copy)]
pub struct BitWindow<'a> {
    bits: &'a BitSlice<u8, Msb0>,
}

impl<'a> BitWindow<'a> {
    pub fn len(self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(self) -> bool {
        self.bits.is_empty()
    }

    pub fn remaining(self, cursor: usize) -> usize {
        self.bits.len().saturating_sub(cursor)
    }

    /// Reads `width` bits at `cursor` as an unsigned MSB-first integer.
    ///
    /// A zero `width` is rejected like a read past the end. `width` must not exceed
    /// [`MAX_READ_WIDTH`].
    pub fn read_bits(self, cursor: usize, width: usize) -> Result<(u64, usize)> {
        assert!(width <= MAX_READ_WIDTH, "cannot read {width} bits into a u64");
        if width == 0 {
            return Err(DecodeError::Truncated {
                offset: cursor,
                requested: 0,
                available: self.remaining(cursor),
            });
        }
        self.ensure(cursor, width)?;
        let end = cursor + width;
        Ok((self.bits[cursor..end].load_be::<u64>(), end))
    }

    pub fn read_flag(self, cursor: usize) -> Result<(bool, usize)> {
        self.ensure(cursor, 1)?;
        Ok((self.bits[cursor], cursor + 1))
    }

    /// Fails with [`DecodeError::Truncated`] unless `width` bits are available at `cursor`.
    pub fn ensure(self, cursor: usize, width: usize) -> Result<()> {
        let available = self.remaining(cursor);
        if width > available {
            return Err(DecodeError::Truncated {
                offset: cursor,
                requested: width,
                available,
            });
        }
        Ok(())
    }

    /// Narrows the window so that it ends at `end`.
    pub fn limit(self, end: usize) -> Result<BitWindow<'a>> {
        if end > self.bits.len() {
            return Err(DecodeError::Truncated {
                offset: self.bits.len(),
                requested: end - self.bits.len(),
                available: 0,
            });
        }
        Ok(BitWindow {
            bits: &self.bits[..end],
        })
    }

    /// True if no bit from `cursor` to the end of the window is set.
    pub fn is_zero_from(self, cursor: usize) -> bool {
        cursor >= self.bits.len() || self.bits[cursor..].not_any()
    }
}
