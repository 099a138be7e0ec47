use clap::Parser;
use wx_pipeline::cli::{run, Cli};
use wx_pipeline::error::Result;

fn main() -> Result<()> {
    let cli = Cli::parse();
    run(cli)
}
