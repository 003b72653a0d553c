//! polypod CLI - render, play and inspect the polypod synthesizer.

mod commands;
mod score;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "polypod")]
#[command(author, version, about = "Polyphonic synthesizer CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a score to a WAV file
    Render(commands::render::RenderArgs),

    /// Play a score on an audio device
    Play(commands::play::PlayArgs),

    /// Print, list and check engine configurations
    Config(commands::config::ConfigArgs),

    /// List routable parameters, controller numbers and knob bindings
    Params(commands::params::ParamsArgs),

    /// List audio output devices
    Devices(commands::devices::DevicesArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render(args) => commands::render::run(args),
        Commands::Play(args) => commands::play::run(args),
        Commands::Config(args) => commands::config::run(args),
        Commands::Params(args) => commands::params::run(args),
        Commands::Devices(args) => commands::devices::run(args),
    }
}
