use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;

use rover_signal::{
    config::{Args, PUBLIC_DIR},
    server::{shutdown_signal, RelayServer, SOCKET_PATH},
    util::{init_log, select_host_address},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_log();

    let listener = TcpListener::bind(args.listen_addr()).await?;
    let port = listener.local_addr()?.port();

    match select_host_address() {
        Some(ip) => info!("Connect a browser to http://{ip}:{port}"),
        None => info!("Connect a browser to http://localhost:{port}"),
    }
    info!("Peers signal over ws://<host>:{port}{SOCKET_PATH}");

    RelayServer::new(PUBLIC_DIR)
        .serve(listener, shutdown_signal())
        .await
}
