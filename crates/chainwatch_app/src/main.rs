mod platform;

use clap::Parser;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = platform::config::Cli::parse();
    platform::run_app(cli).await
}
