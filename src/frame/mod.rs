//! # Wire Frame Module
//!
//! Implementation of the line-oriented text protocol spoken over the serial
//! link.
//!
//! This module handles:
//! - Encoding sampled controller state into outbound frames
//!   (`a0,a1,...,b0,b1,...\n`, axes as two-decimal fixed point, buttons as
//!   `0`/`1`)
//! - Decoding inbound telemetry lines into numeric vectors
//! - Stripping the legacy `b'...'` wrapper some peers still emit

pub mod decoder;
pub mod encoder;

pub use decoder::decode_telemetry;
pub use encoder::encode_frame;
