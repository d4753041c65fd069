//! Read-only walks over a decoded packet tree.

use num::{BigUint, One, Zero};

use crate::decoder::Transmission;
use crate::packet::{Operator, OperatorPacket, Packet};

/// Depth-first pre-order walk over a packet and all of its descendants.
pub struct Packets<'a> {
    stack: Vec<&'a Packet>,
}

impl<'a> Iterator for Packets<'a> {
    type Item = &'a Packet;

    fn next(&mut self) -> Option<Self::Item> {
        let packet = self.stack.pop()?;
        self.stack.extend(packet.sub_packets().iter().rev());
        Some(packet)
    }
}

impl Packet {
    pub fn iter(&self) -> Packets<'_> {
        Packets { stack: vec![self] }
    }

    /// Sum of the version field of this packet and every packet below it.
    pub fn version_sum(&self) -> u64 {
        self.iter().map(|packet| u64::from(packet.version())).sum()
    }

    pub fn value(&self) -> BigUint {
        match self {
            Packet::Literal(literal) => literal.value().clone(),
            Packet::Operator(operator) => operator.value(),
        }
    }
}

impl OperatorPacket {
    /// Applies the operator to the values of the sub-packets, in order.
    ///
    /// # Panics
    ///
    /// If the operator's arity does not match its sub-packets. The decoder rejects such
    /// packets, so this only fires on trees assembled by hand.
    pub fn value(&self) -> BigUint {
        let operator = self.operator();
        let sub_packets = self.sub_packets();
        assert!(
            operator.accepts(sub_packets.len()),
            "{operator:?} packet with {} sub-packets",
            sub_packets.len()
        );

        let mut values = sub_packets.iter().map(Packet::value);
        match operator {
            Operator::Sum => values.sum(),
            Operator::Product => values.product(),
            Operator::Minimum => values.min().unwrap_or_else(BigUint::zero),
            Operator::Maximum => values.max().unwrap_or_else(BigUint::zero),
            Operator::GreaterThan | Operator::LessThan | Operator::EqualTo => {
                let (Some(left), Some(right)) = (values.next(), values.next()) else {
                    unreachable!("comparison arity checked above");
                };
                let holds = match operator {
                    Operator::GreaterThan => left > right,
                    Operator::LessThan => left < right,
                    _ => left == right,
                };
                if holds {
                    BigUint::one()
                } else {
                    BigUint::zero()
                }
            }
        }
    }
}

impl Transmission {
    /// Version sum over every top-level packet.
    pub fn version_sum(&self) -> u64 {
        self.packets().iter().map(Packet::version_sum).sum()
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use proptest::prelude::*;

    use super::*;
    use crate::decoder::decode;
    use crate::packet::build::{literal, operator};

    fn evaluate(hex: &str) -> Result<BigUint> {
        Ok(decode(hex)?.root()?.value())
    }

    #[test]
    fn sample_values() -> Result<()> {
        let samples = [
            ("C200B40A82", 3u32),
            ("04005AC33890", 54),
            ("880086C3E88112", 7),
            ("CE00C43D881120", 9),
            ("D8005AC2A8F0", 1),
            ("F600BC2D8F", 0),
            ("9C005AC2F8F0", 0),
            ("9C0141080250320F1802104A08", 1),
        ];
        for (hex, expected) in samples {
            assert_eq!(evaluate(hex)?, BigUint::from(expected), "{hex}");
        }
        Ok(())
    }

    #[test]
    fn sample_version_sums() -> Result<()> {
        let samples = [
            ("D2FE28", 6),
            ("38006F45291200", 9),
            ("EE00D40C823060", 14),
            ("8A004A801A8002F478", 16),
            ("620080001611562C8802118E34", 12),
            ("C0015000016115A2E0802F182340", 23),
            ("A0016C880162017C3686B18A3D4780", 31),
        ];
        for (hex, expected) in samples {
            assert_eq!(decode(hex)?.version_sum(), expected, "{hex}");
        }
        Ok(())
    }

    #[test]
    fn values_beyond_u64() -> Result<()> {
        assert_eq!(
            evaluate("620094FFFFFFFFFFFFFFFFFFFF7881")?,
            BigUint::from(1u8) << 68u32
        );
        assert_eq!(
            evaluate("0600848C210842108400246108421084200")?,
            BigUint::from(1u8) << 80u32
        );
        Ok(())
    }

    #[test]
    fn iterator_visits_pre_order() -> Result<()> {
        let transmission = decode("8A004A801A8002F478")?;
        let versions: Vec<u8> = transmission.root()?.iter().map(Packet::version).collect();
        assert_eq!(versions, [4, 1, 5, 6]);
        Ok(())
    }

    #[test]
    fn top_level_packets_all_count() -> Result<()> {
        assert_eq!(decode("D2FE298A")?.version_sum(), 7);
        Ok(())
    }

    #[test]
    #[should_panic(expected = "EqualTo packet with 1 sub-packets")]
    fn comparison_arity_is_an_invariant() {
        operator(0, 7, vec![literal(0, 1)]).value();
    }

    proptest! {
        #[test]
        fn reordering_keeps_version_sum(
            leaves in prop::collection::vec((0u8..8, 0u64..1000), 1..8),
            rotate in 0usize..8,
        ) {
            let build = |leaves: &[(u8, u64)]| {
                operator(3, 0, leaves.iter().map(|&(v, n)| literal(v, n)).collect())
            };
            let mut rotated = leaves.clone();
            rotated.rotate_left(rotate % leaves.len());

            let in_order = build(leaves.as_slice());
            let reordered = build(rotated.as_slice());
            prop_assert_eq!(in_order.version_sum(), reordered.version_sum());
            prop_assert_eq!(in_order.value(), reordered.value());
            prop_assert_eq!(in_order.iter().count(), leaves.len() + 1);
        }

        #[test]
        fn swapping_comparison_operands(
            (left, right) in (0u64..1000, 0u64..1000).prop_filter("distinct", |(l, r)| l != r),
            left_version in 0u8..8,
            right_version in 0u8..8,
        ) {
            let forward = operator(
                5, 5, vec![literal(left_version, left), literal(right_version, right)],
            );
            let backward = operator(
                5, 5, vec![literal(right_version, right), literal(left_version, left)],
            );
            prop_assert_eq!(forward.version_sum(), backward.version_sum());
            prop_assert_ne!(forward.value(), backward.value());
        }
    }
}
