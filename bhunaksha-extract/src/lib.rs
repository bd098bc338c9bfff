//! # bhunaksha-extract
//!
//! Extraction reprenable des parcelles cadastrales Bhunaksha vers un fichier
//! GeoJSON par village, reprojetées de la grille UTM vers WGS84.
//!
//! ## Features
//!
//! - Parcours district → taluk → village, échecs limités à leur branche
//! - Reprise : les parcelles déjà écrites ne sont pas redemandées
//! - Écriture atomique après chaque parcelle
//! - Reprojection pure Rust (UTM → WGS84 / Web Mercator), PROJ en option
//!
//! ## Usage CLI
//!
//! ```bash
//! # Preset Maharashtra, districts par défaut
//! bhunaksha-extract --output ./out
//!
//! # Un seul district, rapport JSON
//! bhunaksha-extract extract --district Pune --report run.json
//!
//! # Vérifier une reprojection
//! bhunaksha-extract reproject "POINT (276689.33 2110588.84)"
//! ```

pub mod config;
pub mod delay;
pub mod error;
pub mod export;
pub mod extractor;
pub mod geometry;
pub mod report;
pub mod reproject_lite;
pub mod walker;

pub use config::ExtractConfig;
pub use delay::{DelayPolicy, NoDelay, UniformDelay};
pub use error::{ExtractError, GeometryError};
pub use extractor::{VillageExtractor, VillageOutcome, VillageStats};
pub use geometry::CoordinateReprojector;
pub use report::{RunReport, RunStatus};
pub use walker::HierarchyWalker;
