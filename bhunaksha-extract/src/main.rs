//! Point d'entrée CLI pour bhunaksha-extract

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::{fmt, EnvFilter};

// Charger .env au démarrage
fn load_env() {
    if dotenvy::dotenv().is_err() {
        // Essayer depuis le répertoire du binaire
        if let Ok(exe) = std::env::current_exe() {
            if let Some(dir) = exe.parent() {
                let _ = dotenvy::from_path(dir.join(".env"));
            }
        }
    }
}

mod cli;

use cli::{Commands, ExtractArgs};

/// Extraire les parcelles Bhunaksha vers un GeoJSON par village
#[derive(Parser)]
#[command(name = "bhunaksha-extract")]
#[command(author, version)]
#[command(about = "Extraire les parcelles cadastrales Bhunaksha vers GeoJSON (reprise automatique)")]
#[command(long_about = "Parcourt district → taluk → village et écrit un fichier GeoJSON par village.\n\nUn run interrompu reprend là où il s'est arrêté : les parcelles déjà écrites ne sont pas redemandées.")]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    /// Augmenter la verbosité (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Mode silencieux
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Sous-commande (défaut: extract)
    #[command(subcommand)]
    command: Option<Commands>,

    /// Arguments pour l'extraction (commande par défaut)
    #[command(flatten)]
    extract: ExtractArgs,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Charger .env avant tout
    load_env();

    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Some(Commands::Extract(args)) => cli::cmd_extract(args).await?,
        Some(Commands::Districts { config }) => cli::cmd_districts(config.as_deref()).await?,
        Some(Commands::Reproject {
            wkt,
            source_epsg,
            target_epsg,
        }) => {
            info!(source_epsg, target_epsg, "Reproject WKT");
            cli::cmd_reproject(&wkt, source_epsg, target_epsg)?;
        }
        None => cli::cmd_extract(cli.extract).await?,
    }

    Ok(())
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => Level::WARN,
        (_, 0) => Level::INFO,
        (_, 1) => Level::DEBUG,
        (_, _) => Level::TRACE,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .init();
}
