use clap::{CommandFactory, Parser, Subcommand};

mod commands;
mod logging;

#[derive(Parser)]
#[command(name = "undo-cue", version, about = "Plays a cue when you keep hitting undo")]
struct Cli {
    /// Log accumulator activity to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Set the playback volume (0 to 1)
    SetVolume {
        /// New volume; clamped into range
        #[arg(allow_hyphen_values = true)]
        value: String,
    },
    /// Set the assistance delay in seconds (0 to 5)
    SetDelay {
        /// New delay; clamped into range
        #[arg(allow_hyphen_values = true)]
        value: String,
    },
    /// Replay undo presses at fixed offsets and print the resulting events
    Simulate(commands::simulate::SimulateArgs),
    /// Interactive session driven by stdin
    Watch,
    /// Play the cue once
    Play {
        /// Override the configured volume
        #[arg(long)]
        volume: Option<f64>,
    },
    /// Print shell completions
    Completions {
        shell: clap_complete::Shell,
    },
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = match cli.command {
        Commands::Config { action } => commands::config::run(action),
        Commands::SetVolume { value } => commands::settings::set_volume(&value),
        Commands::SetDelay { value } => commands::settings::set_delay(&value),
        Commands::Simulate(args) => commands::simulate::run(args),
        Commands::Watch => commands::watch::run(),
        Commands::Play { volume } => commands::play::run(volume),
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "undo-cue", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
