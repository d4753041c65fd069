//! Parse-time observation.
//!
//! The decoder reports what it reads to an optional [`PacketObserver`] handed to it by the
//! caller. [`TracingObserver`] forwards everything to `tracing`.

use num::BigUint;

use crate::packet::{LengthType, PacketHeader};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceEvent<'a> {
    Header {
        offset: usize,
        depth: usize,
        header: PacketHeader,
    },
    Literal {
        offset: usize,
        value: &'a BigUint,
    },
    /// `length` is the decoded 15-bit size or 11-bit count.
    SubPackets {
        offset: usize,
        length_type: LengthType,
        length: usize,
    },
    OperatorEnd {
        offset: usize,
        sub_packets: usize,
    },
    Padding {
        offset: usize,
        bits: usize,
    },
}

pub trait PacketObserver {
    fn observe(&mut self, event: TraceEvent<'_>);
}

impl<F> PacketObserver for F
where
    F: FnMut(TraceEvent<'_>),
{
    fn observe(&mut self, event: TraceEvent<'_>) {
        self(event)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl PacketObserver for TracingObserver {
    fn observe(&mut self, event: TraceEvent<'_>) {
        match event {
            TraceEvent::Header {
                offset,
                depth,
                header,
            } => tracing::trace!(
                offset,
                depth,
                version = header.version,
                type_id = header.type_id,
                "header"
            ),
            TraceEvent::Literal { offset, value } => {
                tracing::trace!(offset, %value, "literal")
            }
            TraceEvent::SubPackets {
                offset,
                length_type,
                length,
            } => tracing::trace!(offset, ?length_type, length, "sub-packets"),
            TraceEvent::OperatorEnd {
                offset,
                sub_packets,
            } => tracing::trace!(offset, sub_packets, "operator done"),
            TraceEvent::Padding { offset, bits } => {
                tracing::debug!(offset, bits, "ignoring trailing padding")
            }
        }
    }
}
