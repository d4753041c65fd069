//! The decoded packet tree.
//!
//! A [`Packet`] is either a literal leaf or an operator owning its sub-packets. Trees are built
//! once by the decoder and only read afterwards.

use num::BigUint;

use crate::bits::BitWindow;
use crate::error::Result;

/// Type id reserved for literal packets; every other id is an [`Operator`].
pub const LITERAL_TYPE_ID: u8 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PacketHeader {
    pub version: u8,
    pub type_id: u8,
}

impl PacketHeader {
    pub const VERSION_WIDTH: usize = 3;
    pub const TYPE_ID_WIDTH: usize = 3;
    pub const WIDTH: usize = Self::VERSION_WIDTH + Self::TYPE_ID_WIDTH;

    pub fn is_literal(&self) -> bool {
        self.type_id == LITERAL_TYPE_ID
    }
}

/// Reads the 3-bit version and 3-bit type id at `cursor`.
pub fn parse_header(bits: BitWindow<'_>, cursor: usize) -> Result<(PacketHeader, usize)> {
    bits.ensure(cursor, PacketHeader::WIDTH)?;
    let (version, cursor) = bits.read_bits(cursor, PacketHeader::VERSION_WIDTH)?;
    let (type_id, cursor) = bits.read_bits(cursor, PacketHeader::TYPE_ID_WIDTH)?;
    let header = PacketHeader {
        version: version as u8,
        type_id: type_id as u8,
    };
    Ok((header, cursor))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Sum,
    Product,
    Minimum,
    Maximum,
    GreaterThan,
    LessThan,
    EqualTo,
}

impl Operator {
    /// `None` for the literal type id.
    pub fn from_type_id(type_id: u8) -> Option<Self> {
        match type_id {
            0 => Some(Self::Sum),
            1 => Some(Self::Product),
            2 => Some(Self::Minimum),
            3 => Some(Self::Maximum),
            5 => Some(Self::GreaterThan),
            6 => Some(Self::LessThan),
            7 => Some(Self::EqualTo),
            _ => None,
        }
    }

    pub fn is_comparison(self) -> bool {
        matches!(self, Self::GreaterThan | Self::LessThan | Self::EqualTo)
    }

    pub fn accepts(self, sub_packets: usize) -> bool {
        if self.is_comparison() {
            sub_packets == 2
        } else {
            sub_packets >= 1
        }
    }
}

/// How an operator packet bounds its sub-packets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LengthType {
    /// A 15-bit field gives the number of bits the sub-packets occupy.
    TotalLengthInBits,
    /// An 11-bit field gives the number of sub-packets.
    NumberOfSubPackets,
}

impl LengthType {
    pub fn from_flag(flag: bool) -> Self {
        if flag {
            Self::NumberOfSubPackets
        } else {
            Self::TotalLengthInBits
        }
    }

    pub fn field_width(self) -> usize {
        match self {
            Self::TotalLengthInBits => 15,
            Self::NumberOfSubPackets => 11,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiteralPacket {
    pub(crate) header: PacketHeader,
    pub(crate) value: BigUint,
}

impl LiteralPacket {
    pub fn header(&self) -> PacketHeader {
        self.header
    }

    pub fn value(&self) -> &BigUint {
        &self.value
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatorPacket {
    pub(crate) header: PacketHeader,
    pub(crate) operator: Operator,
    pub(crate) length_type: LengthType,
    pub(crate) sub_packets: Vec<Packet>,
}

impl OperatorPacket {
    pub fn header(&self) -> PacketHeader {
        self.header
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn length_type(&self) -> LengthType {
        self.length_type
    }

    pub fn sub_packets(&self) -> &[Packet] {
        &self.sub_packets
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Packet {
    Literal(LiteralPacket),
    Operator(OperatorPacket),
}

impl Packet {
    pub fn header(&self) -> PacketHeader {
        match self {
            Packet::Literal(literal) => literal.header,
            Packet::Operator(operator) => operator.header,
        }
    }

    pub fn version(&self) -> u8 {
        self.header().version
    }

    /// Empty for literals.
    pub fn sub_packets(&self) -> &[Packet] {
        match self {
            Packet::Literal(_) => &[],
            Packet::Operator(operator) => &operator.sub_packets,
        }
    }
}

#[cfg(test)]
pub(crate) mod build {
    //! Hand-built trees for evaluator tests.

    use super::*;

    pub fn literal(version: u8, value: u64) -> Packet {
        Packet::Literal(LiteralPacket {
            header: PacketHeader {
                version,
                type_id: LITERAL_TYPE_ID,
            },
            value: BigUint::from(value),
        })
    }

    pub fn operator(version: u8, type_id: u8, sub_packets: Vec<Packet>) -> Packet {
        let operator = Operator::from_type_id(type_id).expect("operator type id");
        Packet::Operator(OperatorPacket {
            header: PacketHeader { version, type_id },
            operator,
            length_type: LengthType::NumberOfSubPackets,
            sub_packets,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bits::BitSource;
    use crate::error::DecodeError;

    #[test]
    fn parses_header_fields() -> Result<()> {
        let source = BitSource::from_hex("D2FE28")?;
        let (header, cursor) = parse_header(source.window(), 0)?;
        assert_eq!(
            header,
            PacketHeader {
                version: 6,
                type_id: 4
            }
        );
        assert!(header.is_literal());
        assert_eq!(cursor, 6);

        let source = BitSource::from_hex("38006F45291200")?;
        let (header, cursor) = parse_header(source.window(), 0)?;
        assert_eq!((header.version, header.type_id), (1, 6));
        assert_eq!(cursor, PacketHeader::WIDTH);
        Ok(())
    }

    #[test]
    fn short_header_is_truncated() -> Result<()> {
        let source = BitSource::from_hex("D2")?;
        assert_eq!(
            parse_header(source.window(), 3),
            Err(DecodeError::Truncated {
                offset: 3,
                requested: 6,
                available: 5
            })
        );
        Ok(())
    }

    #[test]
    fn type_ids_map_to_operators() {
        assert_eq!(Operator::from_type_id(LITERAL_TYPE_ID), None);
        assert_eq!(Operator::from_type_id(0), Some(Operator::Sum));
        assert_eq!(Operator::from_type_id(7), Some(Operator::EqualTo));
        assert!(Operator::Sum.accepts(1));
        assert!(!Operator::Maximum.accepts(0));
        assert!(Operator::LessThan.accepts(2));
        assert!(!Operator::EqualTo.accepts(3));
    }
}
