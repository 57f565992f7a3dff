use anyhow::Result;
use clap::Parser;
use scorer::{run, Args};
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(std::io::stderr).init();
    let args = Args::parse();
    run(&args)?;
    Ok(())
}
