use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::Result;
use ecmo_core::{Config, FieldKind};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "ecmo")]
#[command(about = "Drug pharmacokinetics during ECMO, answered from your papers", long_about = None)]
struct Cli {
    /// Config file (default: ./ecmo.toml, then ~/.config/ecmo/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Show debug logs
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the analysis fields
    Fields,
    /// Show the questions and prompts that would be sent, without asking
    Question {
        /// Drug name, e.g. meropenem
        drug: String,
        /// Only this field (name or alias such as `vd`, `logp`)
        #[arg(short, long)]
        field: Option<FieldKind>,
        /// Paper directory (default: {drugs_dir}/{drug})
        #[arg(long)]
        papers: Option<PathBuf>,
    },
    /// Analyze a drug against one, several or all fields
    Analyze {
        /// Drug name, e.g. meropenem
        drug: String,
        /// Field to analyze; repeat for several, omit for all
        #[arg(short, long = "field")]
        fields: Vec<FieldKind>,
        /// Paper directory (default: {drugs_dir}/{drug})
        #[arg(long)]
        papers: Option<PathBuf>,
        /// Output JSON file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the default configuration
    Config,
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "ecmo=debug,ecmo_core=debug"
    } else {
        "ecmo=info,ecmo_core=warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    let config = match path {
        Some(path) => Config::from_file(path)?,
        None => Config::load()?,
    };
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Fields => commands::list_fields(),
        Commands::Config => {
            print!("{}", Config::default_config_string());
            Ok(())
        }
        Commands::Question { drug, field, papers } => {
            let config = load_config(cli.config.as_ref())?;
            commands::show_questions(&config, &drug, field, papers)
        }
        Commands::Analyze {
            drug,
            fields,
            papers,
            output,
        } => {
            let config = load_config(cli.config.as_ref())?;
            commands::analyze(&config, &drug, &fields, papers, output).await
        }
    }
}
