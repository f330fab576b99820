use anyhow::Result;
use clap::Parser;

mod args;
mod cmd;
mod output;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = args::Cli::parse();
    output::init(cli.json);

    cmd::dispatch(cli).await
}
