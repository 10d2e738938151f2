//! WebRTC signaling relay
//!
//! Browsers connect over a WebSocket and exchange `offer`, `answer` and
//! `ice-candidate` events. Each event is forwarded unchanged to every other
//! connected browser so they can negotiate a direct peer-to-peer session.
//! The relay never touches media.

pub mod config;
pub mod model;
pub mod registry;
pub mod server;
pub mod util;
