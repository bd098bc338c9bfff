//! Types d'erreurs de l'extraction

use std::path::PathBuf;

use bhunaksha::HierarchyLevel;
use thiserror::Error;

/// Erreurs de géométrie (portée : une parcelle)
#[derive(Debug, Error)]
pub enum GeometryError {
    /// WKT illisible
    #[error("Invalid WKT: {0}")]
    Parse(String),

    /// Géométrie sans coordonnées
    #[error("Empty geometry")]
    Empty,

    /// Couple de systèmes de coordonnées non supporté
    #[error("Reprojection EPSG:{source_epsg} -> EPSG:{target_epsg} not supported")]
    UnsupportedCrs { source_epsg: u32, target_epsg: u32 },

    /// Échec de transformation d'une coordonnée
    #[error("Coordinate transformation failed at ({x}, {y}): {reason}")]
    Transform { x: f64, y: f64, reason: String },
}

/// Erreurs du pipeline d'extraction
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Liste hiérarchique indisponible ou vide (portée : la branche)
    #[error("Could not fetch {level} list for codes '{codes}': {reason}")]
    HierarchyFetch {
        level: HierarchyLevel,
        codes: String,
        reason: String,
    },

    /// Parcelle indisponible ou sans géométrie (portée : la parcelle)
    #[error("Could not fetch plot {plot}: {reason}")]
    PlotFetch { plot: String, reason: String },

    /// Géométrie illisible ou non reprojetable (portée : la parcelle)
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// Fichier de sortie illisible ou non inscriptible
    #[error("Persistence error on {}: {reason}", path.display())]
    Persistence { path: PathBuf, reason: String },

    /// Code manquant pour construire l'identifiant (portée : le village)
    #[error("Cannot build identifier for village '{village}'")]
    Identifier { village: String },

    /// Configuration invalide
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ExtractError {
    pub fn persistence(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Persistence {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn hierarchy(level: HierarchyLevel, codes: &[String], reason: impl ToString) -> Self {
        Self::HierarchyFetch {
            level,
            codes: codes.join(","),
            reason: reason.to_string(),
        }
    }
}
