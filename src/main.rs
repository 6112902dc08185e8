use chrono::Utc;
use jsonrpc_hop::{
    build_app,
    config::Config,
    logging,
    rpc::registry::{Module, Registry},
    AppState,
};
use serde_json::Value;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_logging();

    let config = Config::from_env()?;

    let mut registry = Registry::new();
    registry.expose_module(
        "system",
        Module::new()
            .handler_fn("echo", |params| Ok(Value::Array(params.to_vec())))
            .handler_fn("time", |_| Ok(Value::String(Utc::now().to_rfc3339()))),
    );

    let bind_socket = config.bind_socket()?;
    let state = AppState::new(registry, config.max_body_bytes);
    let app = build_app(state);
    let listener = tokio::net::TcpListener::bind(bind_socket).await?;

    info!(
        bind_addr = %config.bind_addr,
        bind_port = config.bind_port,
        "server starting"
    );

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
