//! Room-based real-time message relay.
//!
//! This library implements the stateful room coordinator of a chat relay:
//! clients join named rooms, exchange text/image messages, and receive
//! membership, presence, read-receipt, and active-room updates over
//! WebSockets.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

// shared library
pub mod common;
