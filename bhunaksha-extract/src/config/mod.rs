//! Configuration de l'extraction
//!
//! Priorité croissante : preset embarqué ou fichier JSON, variables
//! d'environnement, options de la ligne de commande.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bhunaksha::DEFAULT_BASE_URL;
use serde::{Deserialize, Serialize};

use crate::delay::UniformDelay;
use crate::geometry::{CoordinateReprojector, DEFAULT_SOURCE_EPSG, DEFAULT_TARGET_EPSG};

pub const ENV_BASE_URL: &str = "BHUNAKSHA_BASE_URL";
pub const ENV_STATE: &str = "BHUNAKSHA_STATE";
pub const ENV_CATEGORY: &str = "BHUNAKSHA_CATEGORY";

/// Preset utilisé quand aucune configuration n'est donnée
pub const DEFAULT_PRESET: &str = "maharashtra";

/// Paramètres d'un run
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ExtractConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Code d'état (ex: "27" pour le Maharashtra)
    pub state: String,

    /// Catégorie de carte, premier segment de l'identifiant (ex: "U")
    pub category: String,

    /// Districts à extraire, par nom affiché
    #[serde(default)]
    pub districts: Vec<String>,

    #[serde(default = "default_delay_min")]
    pub delay_min_secs: f64,

    #[serde(default = "default_delay_max")]
    pub delay_max_secs: f64,

    #[serde(default = "default_source_epsg")]
    pub source_epsg: u32,

    #[serde(default = "default_target_epsg")]
    pub target_epsg: u32,

    /// Racine des répertoires `data_<district>`
    #[serde(default = "default_output_root")]
    pub output_root: PathBuf,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_delay_min() -> f64 {
    1.0
}

fn default_delay_max() -> f64 {
    3.0
}

fn default_source_epsg() -> u32 {
    DEFAULT_SOURCE_EPSG
}

fn default_target_epsg() -> u32 {
    DEFAULT_TARGET_EPSG
}

fn default_output_root() -> PathBuf {
    PathBuf::from(".")
}

impl ExtractConfig {
    /// Charge une configuration depuis un fichier
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        serde_json::from_str(&content).context("Failed to parse config JSON")
    }

    /// Charge une configuration depuis un preset embarqué
    pub fn from_preset(preset: &str) -> Result<Self> {
        match preset {
            "maharashtra" => Self::load_embedded(include_str!("presets/maharashtra.json")),
            _ => anyhow::bail!("Unknown preset: {}. Use: maharashtra", preset),
        }
    }

    /// Nom de preset, ou chemin vers un fichier JSON
    pub fn resolve(spec: &str) -> Result<Self> {
        let path = Path::new(spec);
        if path.extension().is_some_and(|ext| ext == "json") || path.exists() {
            Self::load(path)
        } else {
            Self::from_preset(spec)
        }
    }

    fn load_embedded(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse embedded config")
    }

    /// Applique les variables d'environnement `BHUNAKSHA_*`
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(url) = non_empty(ENV_BASE_URL) {
            self.base_url = url;
        }
        if let Some(state) = non_empty(ENV_STATE) {
            self.state = state;
        }
        if let Some(category) = non_empty(ENV_CATEGORY) {
            self.category = category;
        }
    }

    /// Vérifie la cohérence avant de lancer un run
    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            anyhow::bail!("base_url must not be empty");
        }
        if self.state.trim().is_empty() {
            anyhow::bail!("state must not be empty");
        }
        if self.category.trim().is_empty() {
            anyhow::bail!("category must not be empty");
        }
        if self.districts.is_empty() {
            anyhow::bail!("at least one district is required");
        }
        self.delay()?;
        self.reprojector()?;
        Ok(())
    }

    pub fn delay(&self) -> Result<UniformDelay> {
        Ok(UniformDelay::new(self.delay_min_secs, self.delay_max_secs)?)
    }

    pub fn reprojector(&self) -> Result<CoordinateReprojector> {
        Ok(CoordinateReprojector::new(self.source_epsg, self.target_epsg)?)
    }
}
