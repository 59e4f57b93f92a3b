use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    stint_core::init_logging();
    stint_host::run(stint_host::Args::parse()).await
}
