use clap::Parser;
use owm_collector::cli::{run, Cli};
use owm_collector::error::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    run(cli).await
}
