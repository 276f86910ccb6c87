//! Crate for exchanging packets with VEXnet joysticks and VEX LCDs over serial.
//! Not affiliated with Innovation First Inc.
//!
//! Every frame on the wire is a [`Packet`](packet::Packet): a sync header, a type
//! code, and an optional size-prefixed payload with a trailing checksum. Known
//! packet types are listed in the [`registry`].
//!
//! A [`Codec`](codec::Codec) sends packets through any [`Port`](connection::Port)
//! and parses them back out of its byte stream. Typed payloads, such as the
//! [`ControllerState`](controller::ControllerState) a partner joystick reports,
//! implement [`Encode`](encode::Encode) and [`Decode`](decode::Decode).

pub mod codec;
pub mod connection;
pub mod controller;
pub mod decode;
pub mod encode;
pub mod lcd;
pub mod packet;
pub mod reader;
pub mod registry;
pub mod version;

/// Starting byte sequence of every VEXnet frame.
pub const SYNC_HEADER: [u8; 2] = [0xAA, 0x55];
