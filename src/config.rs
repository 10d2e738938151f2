use std::net::{Ipv4Addr, SocketAddr};

use clap::Parser;

/// Port the relay listens on unless told otherwise.
pub const DEFAULT_PORT: u16 = 3000;

/// Directory the browser client is served from, relative to the working directory.
pub const PUBLIC_DIR: &str = "public";

#[derive(Debug, Parser)]
#[command(name = "rover-signal", version, about = "WebRTC signaling relay")]
pub struct Args {
    /// Port for both the static client and the signaling socket
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    pub port: u16,
}

impl Args {
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_port_3000() {
        let args = Args::try_parse_from(["rover-signal"]).unwrap();
        assert_eq!(args.port, 3000);
        assert_eq!(args.listen_addr().to_string(), "0.0.0.0:3000");
    }

    #[test]
    fn port_can_be_overridden() {
        let args = Args::try_parse_from(["rover-signal", "--port", "8080"]).unwrap();
        assert_eq!(args.listen_addr().port(), 8080);

        let args = Args::try_parse_from(["rover-signal", "-p", "9000"]).unwrap();
        assert_eq!(args.port, 9000);
    }

    #[test]
    fn rejects_invalid_port() {
        assert!(Args::try_parse_from(["rover-signal", "--port", "seventy"]).is_err());
        assert!(Args::try_parse_from(["rover-signal", "--port", "70000"]).is_err());
    }
}
