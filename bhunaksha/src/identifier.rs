//! Construction de l'identifiant composite d'une zone (`giscode`)
//!
//! Format : catégorie ‖ type de carte ‖ district ‖ taluk ‖ village, sans séparateur.
//! Exemple : `U` + `1` + `25` + `03` + `270001` → `U12503270001`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifiant composite d'un village dans la hiérarchie distante
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AreaIdentifier(String);

impl AreaIdentifier {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AreaIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Construit l'identifiant d'un village.
///
/// Retourne `None` dès qu'un des cinq codes est absent ou vide : le village
/// ne peut pas être traité et doit être ignoré (sans nouvelle tentative).
pub fn build_identifier(
    category: Option<&str>,
    map_type: Option<&str>,
    district: Option<&str>,
    taluk: Option<&str>,
    village: Option<&str>,
) -> Option<AreaIdentifier> {
    let parts = [category?, map_type?, district?, taluk?, village?];
    if parts.iter().any(|p| p.is_empty()) {
        return None;
    }
    Some(AreaIdentifier(parts.concat()))
}
