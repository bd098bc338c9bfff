//! Persistance de la progression : le fichier GeoJSON du village sert de point de reprise

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use super::geojson::VillageOutput;
use crate::error::ExtractError;

/// Stockage des documents de village
pub trait ProgressStore {
    /// Charge un document ; `Ok(None)` s'il n'existe pas encore
    fn load(&self, path: &Path) -> Result<Option<VillageOutput>, ExtractError>;

    /// Remplace le document complet
    fn save(&self, path: &Path, output: &VillageOutput) -> Result<(), ExtractError>;
}

/// Stockage sur disque, écriture atomique (fichier temporaire + rename)
#[derive(Debug, Clone, Copy, Default)]
pub struct GeoJsonFileStore;

impl ProgressStore for GeoJsonFileStore {
    fn load(&self, path: &Path) -> Result<Option<VillageOutput>, ExtractError> {
        let content = match fs::read(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(ExtractError::persistence(path, e)),
        };

        let output: VillageOutput =
            serde_json::from_slice(&content).map_err(|e| ExtractError::persistence(path, e))?;
        if !output.is_feature_collection() {
            return Err(ExtractError::persistence(
                path,
                format!("unexpected document type '{}'", output.kind),
            ));
        }
        Ok(Some(output))
    }

    fn save(&self, path: &Path, output: &VillageOutput) -> Result<(), ExtractError> {
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(dir).map_err(|e| ExtractError::persistence(dir, e))?;

        let tmp = NamedTempFile::new_in(dir).map_err(|e| ExtractError::persistence(path, e))?;
        {
            let mut writer = BufWriter::new(tmp.as_file());
            serde_json::to_writer_pretty(&mut writer, output)
                .map_err(|e| ExtractError::persistence(path, e))?;
            writer
                .write_all(b"\n")
                .and_then(|_| writer.flush())
                .map_err(|e| ExtractError::persistence(path, e))?;
        }
        tmp.as_file()
            .sync_all()
            .map_err(|e| ExtractError::persistence(path, e))?;
        tmp.persist(path)
            .map_err(|e| ExtractError::persistence(path, e.error))?;
        Ok(())
    }
}

/// Remplace espaces et séparateurs de chemin par `_`
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_whitespace() || c == '/' || c == '\\' {
                '_'
            } else {
                c
            }
        })
        .collect()
}

/// Répertoire d'un district : `<racine>/data_<district>`
pub fn district_dir(output_root: &Path, district: &str) -> PathBuf {
    output_root.join(format!("data_{}", sanitize_name(district)))
}

/// Chemin du fichier d'un village : `<racine>/<taluk>/<village>.geojson`
pub fn village_path(output_root: &Path, taluk: &str, village: &str) -> PathBuf {
    output_root
        .join(sanitize_name(taluk))
        .join(format!("{}.geojson", sanitize_name(village)))
}
