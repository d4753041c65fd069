//! Decoder and evaluator for BITS transmissions: hex-encoded, bit-packed trees of literal and
//! operator packets.
//!
//! ```
//! let transmission = aoc2021::decode("C200B40A82").unwrap();
//! assert_eq!(transmission.version_sum(), 14);
//! assert_eq!(transmission.root().unwrap().value(), num::BigUint::from(3u32));
//! ```

pub mod bits;
pub mod decoder;
pub mod error;
pub mod eval;
pub mod packet;
pub mod trace;

pub use decoder::{decode, Decoder, Transmission};
pub use error::DecodeError;
pub use packet::{LengthType, Operator, Packet, PacketHeader};

/// Joins the lines of a puzzle input into one hex string, dropping surrounding whitespace.
pub fn read_transmission(input: &str) -> String {
    input.lines().map(str::trim).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_trimmed_lines() {
        assert_eq!(read_transmission("  D2FE\r\n28 \n\n"), "D2FE28");
        assert_eq!(read_transmission(""), "");
    }
}
