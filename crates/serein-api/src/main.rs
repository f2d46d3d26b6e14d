mod api_doc;
mod error;
mod handlers;
mod setup;
mod state;
mod telemetry;

use serein_core::Config;

// Use mimalloc as the global allocator for lower fragmentation, especially when
// running on musl-based systems inside containers.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    telemetry::init_telemetry();

    let config = Config::from_env()?;

    let (_state, router) = setup::initialize_app(config.clone()).await?;

    setup::server::start_server(&config, router).await?;

    Ok(())
}
