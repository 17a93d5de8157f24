mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "halo",
    version,
    about = "Draws live outline overlays around desktop windows"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the default configuration file
    Init,
    /// Outline windows on the active virtual desktop until Ctrl+C
    Run,
    /// List the windows the engine would track
    List,
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Init => commands::init::execute(),
        Commands::Run => commands::run::execute(),
        Commands::List => commands::list::execute(),
    }
}
