//! # JoyLink Library
//!
//! Relay game controller state to a microcontroller over a serial link.
//!
//! This library provides the core functionality for polling a gamepad at a
//! fixed cadence, visualizing its state in a terminal canvas, encoding the
//! state as line-oriented text frames for a serial peer, and parsing the
//! comma-separated telemetry lines the peer sends back.

pub mod config;
pub mod controller;
pub mod error;
pub mod frame;
pub mod ports;
pub mod serial;
pub mod telemetry;
pub mod tui;
