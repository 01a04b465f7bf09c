use clap::Parser;
use hvtools_lib::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    hvtools_lib::run(Cli::parse()).await
}
