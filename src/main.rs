mod args;
mod axis;
mod config;
mod data;
mod error;
mod output;
mod pipeline;

use anyhow::Result;
use clap::Parser;

use args::Args;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let (config, output_options) = Args::parse().into_config()?;
    let payload = pipeline::run(&config)?;
    output::emit(&payload, &output_options)
}
