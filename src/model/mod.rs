//! Data models for the signaling relay
//!
//! This module contains the wire message carried between browser peers and the
//! per-peer connection record kept by the registry.

pub mod connection;
pub mod signal;
