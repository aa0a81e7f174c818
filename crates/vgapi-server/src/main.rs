use vgapi_server::{
    config::ServerConfig,
    run::{build_state, run_with_state},
    Result,
};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = ServerConfig::load()?;
    let state = build_state(&args).await?;
    run_with_state(args, state).await
}
