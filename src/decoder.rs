//! Recursive-descent decoding of BITS transmissions.
//!
//! [`Decoder::parse_packet`] reads a header and dispatches on its type id; operator packets
//! call back into it for each sub-packet. Sub-packets of a length-delimited operator are
//! parsed through a window that ends at the declared region boundary, so a sub-packet that
//! would cross it fails to read instead of silently consuming the bits that follow.
//!
//! At the top level a transmission may carry several packets followed by padding. Parsing
//! stops once fewer than a header's worth of bits remain or every remaining bit is zero.

use num::{BigUint, Zero};

use crate::bits::{BitSource, BitWindow};
use crate::error::{DecodeError, Result};
use crate::packet::{
    parse_header, LengthType, LiteralPacket, Operator, OperatorPacket, Packet, PacketHeader,
};
use crate::trace::{PacketObserver, TraceEvent};

pub const DEFAULT_MAX_DEPTH: usize = 256;

const LITERAL_GROUP_WIDTH: usize = 5;
const LITERAL_CONTINUE: u64 = 0b1_0000;
const LITERAL_NIBBLE: u64 = 0b0_1111;

/// Bits needed to pad a packet of `length` bits out to a whole number of hex digits.
pub fn padding_for_length(length: usize) -> usize {
    (4 - length % 4) % 4
}

/// Decodes `hex` with default settings and no observer.
pub fn decode(hex: &str) -> Result<Transmission> {
    Decoder::new().decode(hex)
}

/// Every top-level packet of a transmission plus what was left over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transmission {
    packets: Vec<Packet>,
    end: usize,
    padding: usize,
}

impl Transmission {
    pub fn packets(&self) -> &[Packet] {
        &self.packets
    }

    /// Bit offset just past the last packet.
    pub fn end(&self) -> usize {
        self.end
    }

    /// Trailing bits that were skipped as padding.
    pub fn padding(&self) -> usize {
        self.padding
    }

    /// The outermost packet, if the transmission holds exactly one.
    pub fn root(&self) -> Result<&Packet> {
        match self.packets.as_slice() {
            [root] => Ok(root),
            packets => Err(DecodeError::RootCount {
                found: packets.len(),
            }),
        }
    }
}

pub struct Decoder<'o> {
    max_depth: usize,
    observer: Option<&'o mut dyn PacketObserver>,
}

impl Default for Decoder<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'o> Decoder<'o> {
    pub fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            observer: None,
        }
    }

    /// Deepest nesting level accepted; the root packet sits at depth 0.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_observer(mut self, observer: &'o mut dyn PacketObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    fn emit(&mut self, event: TraceEvent<'_>) {
        if let Some(observer) = &mut self.observer {
            observer.observe(event);
        }
    }

    pub fn decode(&mut self, hex: &str) -> Result<Transmission> {
        let source = BitSource::from_hex(hex)?;
        self.decode_bits(&source)
    }

    pub fn decode_bits(&mut self, source: &BitSource) -> Result<Transmission> {
        let bits = source.window();
        let mut packets = Vec::new();
        let mut cursor = 0;
        while bits.remaining(cursor) >= PacketHeader::WIDTH && !bits.is_zero_from(cursor) {
            let (packet, next) = self.parse_packet(bits, cursor, 0)?;
            packets.push(packet);
            cursor = next;
        }

        let padding = bits.remaining(cursor);
        if padding > 0 {
            self.emit(TraceEvent::Padding {
                offset: cursor,
                bits: padding,
            });
        }
        Ok(Transmission {
            packets,
            end: cursor,
            padding,
        })
    }

    /// Parses one packet, including all of its sub-packets, starting at `cursor`.
    pub fn parse_packet(
        &mut self,
        bits: BitWindow<'_>,
        cursor: usize,
        depth: usize,
    ) -> Result<(Packet, usize)> {
        if depth > self.max_depth {
            return Err(DecodeError::TooDeep {
                offset: cursor,
                limit: self.max_depth,
            });
        }

        let offset = cursor;
        let (header, cursor) = parse_header(bits, cursor)?;
        self.emit(TraceEvent::Header {
            offset,
            depth,
            header,
        });

        match Operator::from_type_id(header.type_id) {
            None => {
                let (literal, cursor) = self.parse_literal(bits, cursor, header)?;
                Ok((Packet::Literal(literal), cursor))
            }
            Some(operator) => {
                let (packet, cursor) =
                    self.parse_operator(bits, offset, cursor, header, operator, depth)?;
                Ok((Packet::Operator(packet), cursor))
            }
        }
    }

    fn parse_literal(
        &mut self,
        bits: BitWindow<'_>,
        cursor: usize,
        header: PacketHeader,
    ) -> Result<(LiteralPacket, usize)> {
        let offset = cursor;
        let mut cursor = cursor;
        let mut value = BigUint::zero();
        loop {
            let (group, next) = bits.read_bits(cursor, LITERAL_GROUP_WIDTH)?;
            value = (value << 4u32) + (group & LITERAL_NIBBLE);
            cursor = next;
            if group & LITERAL_CONTINUE == 0 {
                break;
            }
        }

        self.emit(TraceEvent::Literal {
            offset,
            value: &value,
        });
        Ok((LiteralPacket { header, value }, cursor))
    }

    fn parse_operator(
        &mut self,
        bits: BitWindow<'_>,
        offset: usize,
        cursor: usize,
        header: PacketHeader,
        operator: Operator,
        depth: usize,
    ) -> Result<(OperatorPacket, usize)> {
        let (flag, cursor) = bits.read_flag(cursor)?;
        let length_type = LengthType::from_flag(flag);
        let (length, cursor) = bits.read_bits(cursor, length_type.field_width())?;
        let length = length as usize;
        self.emit(TraceEvent::SubPackets {
            offset: cursor,
            length_type,
            length,
        });

        let (sub_packets, cursor) = match length_type {
            LengthType::TotalLengthInBits => self.parse_region(bits, cursor, length, depth)?,
            LengthType::NumberOfSubPackets => self.parse_counted(bits, cursor, length, depth)?,
        };
        if !operator.accepts(sub_packets.len()) {
            return Err(DecodeError::InvalidArity {
                offset,
                operator,
                found: sub_packets.len(),
            });
        }

        self.emit(TraceEvent::OperatorEnd {
            offset: cursor,
            sub_packets: sub_packets.len(),
        });
        let packet = OperatorPacket {
            header,
            operator,
            length_type,
            sub_packets,
        };
        Ok((packet, cursor))
    }

    /// Sub-packets filling exactly `length` bits from `cursor`.
    fn parse_region(
        &mut self,
        bits: BitWindow<'_>,
        cursor: usize,
        length: usize,
        depth: usize,
    ) -> Result<(Vec<Packet>, usize)> {
        let start = cursor;
        let end = start + length;
        let region = bits.limit(end)?;

        let mut sub_packets = Vec::new();
        let mut cursor = start;
        while cursor < end {
            let (packet, next) =
                self.parse_packet(region, cursor, depth + 1)
                    .map_err(|err| match err {
                        DecodeError::Truncated { .. } => DecodeError::MalformedLength {
                            offset: start,
                            declared: length,
                        },
                        err => err,
                    })?;
            sub_packets.push(packet);
            cursor = next;
        }
        Ok((sub_packets, cursor))
    }

    fn parse_counted(
        &mut self,
        bits: BitWindow<'_>,
        cursor: usize,
        count: usize,
        depth: usize,
    ) -> Result<(Vec<Packet>, usize)> {
        let mut sub_packets = Vec::with_capacity(count);
        let mut cursor = cursor;
        for _ in 0..count {
            let (packet, next) = self.parse_packet(bits, cursor, depth + 1)?;
            sub_packets.push(packet);
            cursor = next;
        }
        Ok((sub_packets, cursor))
    }
}
