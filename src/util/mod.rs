use std::net::IpAddr;

use systemstat::{Platform, System};
use tracing::debug;

pub fn init_log() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();
}

/// Pick an IPv4 address other machines on the LAN can reach us on.
///
/// Iterates over all network interfaces provided by `systemstat`, skipping any
/// loopback, link-local or broadcast addresses. Returns `None` if the host has
/// no such interface or the interfaces cannot be listed.
pub fn select_host_address() -> Option<IpAddr> {
    let system = System::new();
    let networks = match system.networks() {
        Ok(networks) => networks,
        Err(e) => {
            debug!("Listing network interfaces failed: {e}");
            return None;
        }
    };

    networks
        .values()
        .flat_map(|net| net.addrs.iter())
        .find_map(|n| match n.addr {
            systemstat::IpAddr::V4(v)
                if !v.is_loopback() && !v.is_link_local() && !v.is_broadcast() =>
            {
                Some(IpAddr::V4(v))
            }
            _ => None,
        })
}
