//! Définition et implémentation des commandes CLI
//!
//! - `extract` (défaut) : hiérarchie → un fichier GeoJSON par village
//! - `districts` : liste des districts de l'état
//! - `reproject` : WKT → GeoJSON, sans réseau

use std::path::PathBuf;

use anyhow::{Context, Result};
use bhunaksha::{ClientConfig, HierarchyClient, HierarchyLevel, HttpHierarchyClient};
use bhunaksha_extract::config::{ExtractConfig, DEFAULT_PRESET};
use bhunaksha_extract::export::GeoJsonFileStore;
use bhunaksha_extract::geometry::CoordinateReprojector;
use bhunaksha_extract::report::RunStatus;
use bhunaksha_extract::{HierarchyWalker, VillageExtractor};
use clap::{Args, Subcommand};
use tracing::{info, warn};

#[derive(Subcommand)]
pub enum Commands {
    /// Extract plots of the configured districts (default command)
    Extract(ExtractArgs),

    /// List the districts available for the configured state
    Districts {
        /// Config preset name (maharashtra) or path to a JSON config
        #[arg(long)]
        config: Option<String>,
    },

    /// Reproject a WKT geometry and print it as GeoJSON
    Reproject {
        /// WKT geometry in the source CRS
        wkt: String,

        /// Source EPSG code (default: UTM 43N)
        #[arg(long, default_value_t = 32643)]
        source_epsg: u32,

        /// Target EPSG code (default: WGS84)
        #[arg(long, default_value_t = 4326)]
        target_epsg: u32,
    },
}

#[derive(Args, Debug, Default, Clone)]
pub struct ExtractArgs {
    /// Config preset name (maharashtra) or path to a JSON config
    #[arg(long)]
    pub config: Option<String>,

    /// District to extract (repeatable, overrides the config list)
    #[arg(long = "district")]
    pub districts: Vec<String>,

    /// Root directory for the data_<district> folders
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Minimum pause between plot requests, in seconds
    #[arg(long)]
    pub delay_min: Option<f64>,

    /// Maximum pause between plot requests, in seconds
    #[arg(long)]
    pub delay_max: Option<f64>,

    /// Write the run report as JSON to this path
    #[arg(long)]
    pub report: Option<PathBuf>,
}

/// Configuration effective : preset ou fichier, puis environnement, puis options
fn load_config(spec: Option<&str>) -> Result<ExtractConfig> {
    let spec = spec.unwrap_or(DEFAULT_PRESET);
    let mut config = ExtractConfig::resolve(spec).context(format!("Failed to load config '{}'", spec))?;
    config.apply_env();
    Ok(config)
}

async fn connect(config: &ExtractConfig) -> Result<HttpHierarchyClient> {
    HttpHierarchyClient::connect(ClientConfig::new(&config.base_url, &config.state))
        .await
        .context("Failed to create HTTP client")
}

/// Exécute la commande extract
pub async fn cmd_extract(args: ExtractArgs) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    if !args.districts.is_empty() {
        config.districts = args.districts;
    }
    if let Some(output) = args.output {
        config.output_root = output;
    }
    if let Some(min) = args.delay_min {
        config.delay_min_secs = min;
    }
    if let Some(max) = args.delay_max {
        config.delay_max_secs = max;
    }
    config.validate().context("Invalid configuration")?;

    info!(
        state = %config.state,
        category = %config.category,
        districts = ?config.districts,
        output = %config.output_root.display(),
        "Starting extraction"
    );

    let reprojector = config.reprojector()?;
    info!(
        "Reprojection EPSG:{} -> EPSG:{} ({})",
        reprojector.source_epsg(),
        reprojector.target_epsg(),
        reprojector.description()
    );

    let client = connect(&config).await?;
    let extractor = VillageExtractor::new(client, GeoJsonFileStore, config.delay()?, reprojector, &config.state);
    let walker = HierarchyWalker::new(extractor, &config.category);

    let report = walker
        .walk(&config.districts, &config.output_root)
        .await
        .context("Extraction aborted")?;

    report.display();
    info!("{}", report.summary());

    if let Some(path) = &args.report {
        report
            .save_to_file(path)
            .context(format!("Failed to write report: {}", path.display()))?;
        info!(path = %path.display(), "Report saved");
    }

    if report.status == Some(RunStatus::Failed) {
        anyhow::bail!("Extraction failed: {}", report.summary());
    }
    if report.status == Some(RunStatus::PartialSuccess) {
        warn!("Extraction finished with skipped plots or branches, rerun to resume");
    }

    Ok(())
}

/// Exécute la commande districts
pub async fn cmd_districts(config_spec: Option<&str>) -> Result<()> {
    let config = load_config(config_spec)?;
    let client = connect(&config).await?;

    let districts = client
        .list_children(HierarchyLevel::District, &[config.category.clone()])
        .await
        .context("Failed to fetch district list")?;

    for node in &districts.nodes {
        println!("{}\t{}", node.code, node.name);
    }
    info!(state = %config.state, "{} districts", districts.nodes.len());
    Ok(())
}

/// Exécute la commande reproject
pub fn cmd_reproject(wkt: &str, source_epsg: u32, target_epsg: u32) -> Result<()> {
    let reprojector = CoordinateReprojector::new(source_epsg, target_epsg)?;
    let geometry = reprojector
        .reproject_wkt(wkt)
        .context("Failed to reproject geometry")?;
    println!("{}", serde_json::to_string_pretty(&geometry)?);
    Ok(())
}
