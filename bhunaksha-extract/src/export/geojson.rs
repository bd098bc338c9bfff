//! Document GeoJSON par village (FeatureCollection + métadonnées de progression)
//!
//! Les noms de champs reprennent le format déjà présent sur disque
//! (`village_info`, `total_plots`, `gis_code`...) pour que les fichiers
//! existants restent reprenables.

use std::collections::HashSet;

use bhunaksha::{AttrValue, RawAttributes};
use geojson::{Feature, JsonObject, JsonValue};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Clé des propriétés identifiant une parcelle (clé de reprise)
pub const PLOT_KEY: &str = "plotno";

const FEATURE_COLLECTION: &str = "FeatureCollection";

/// Contexte hiérarchique d'un village
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VillageContext {
    pub district: String,
    pub taluk: String,
    pub village: String,
}

impl VillageContext {
    pub fn new(district: impl Into<String>, taluk: impl Into<String>, village: impl Into<String>) -> Self {
        Self {
            district: district.into(),
            taluk: taluk.into(),
            village: village.into(),
        }
    }
}

/// Métadonnées de progression d'un village
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VillageMetadata {
    pub district: String,
    pub taluk: String,
    pub village: String,
    /// Métadonnées descriptives renvoyées par le service
    pub village_info: JsonValue,
    pub total_plots: usize,
    pub successful_plots: usize,
    pub failed_plots: usize,
    pub gis_code: String,
    pub state: String,
}

impl VillageMetadata {
    /// `village_info` exploitable (ni absent, ni null, ni objet vide)
    pub fn has_village_info(&self) -> bool {
        match &self.village_info {
            JsonValue::Null => false,
            JsonValue::Object(o) => !o.is_empty(),
            _ => true,
        }
    }
}

/// Fichier de sortie d'un village
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VillageOutput {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub metadata: VillageMetadata,
    pub features: Vec<Feature>,
}

impl VillageOutput {
    pub fn new(metadata: VillageMetadata) -> Self {
        Self {
            kind: FEATURE_COLLECTION.to_string(),
            metadata,
            features: Vec::new(),
        }
    }

    /// Vrai si le document est bien une FeatureCollection
    pub fn is_feature_collection(&self) -> bool {
        self.kind == FEATURE_COLLECTION
    }

    /// Numéros des parcelles déjà présentes
    pub fn plot_numbers(&self) -> HashSet<String> {
        self.features.iter().filter_map(plot_number_of).collect()
    }

    /// Met à jour les compteurs après une tentative
    ///
    /// `attempted` est la position (1-based) de la parcelle dans la liste complète.
    pub fn update_counters(&mut self, total: usize, attempted: usize) {
        self.metadata.total_plots = total;
        self.metadata.successful_plots = self.features.len();
        self.metadata.failed_plots = attempted.saturating_sub(self.features.len());
    }
}

/// Numéro de parcelle d'une feature (`properties.plotno`, texte ou nombre)
pub fn plot_number_of(feature: &Feature) -> Option<String> {
    match feature.property(PLOT_KEY)? {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Construit la feature d'une parcelle.
///
/// Ordre des propriétés : contexte, puis attributs bruts. Les attributs bruts
/// l'emportent sur les collisions, sauf pour `district`, `taluk` et `village`
/// qui sont toujours ceux de l'extraction.
///
/// `plotno` vaut toujours le numéro demandé (clé de reprise) : une valeur
/// différente renvoyée par le service est remplacée, avec un warning.
pub fn build_feature(
    geometry: geojson::Geometry,
    context: &VillageContext,
    plot_number: &str,
    raw: RawAttributes,
) -> Feature {
    let mut properties = JsonObject::new();
    properties.insert("district".into(), JsonValue::from(context.district.as_str()));
    properties.insert("taluk".into(), JsonValue::from(context.taluk.as_str()));
    properties.insert("village".into(), JsonValue::from(context.village.as_str()));

    let service_plot = raw.get(PLOT_KEY).and_then(AttrValue::as_key);
    if let Some(service_plot) = service_plot.as_deref().filter(|p| *p != plot_number) {
        warn!(
            plot = %plot_number,
            service_plot = %service_plot,
            "Plot number differs from the plot list, keeping the listed one"
        );
    }

    for (key, value) in raw.into_json() {
        properties.insert(key, value);
    }

    properties.insert("district".into(), JsonValue::from(context.district.as_str()));
    properties.insert("taluk".into(), JsonValue::from(context.taluk.as_str()));
    properties.insert("village".into(), JsonValue::from(context.village.as_str()));

    properties.insert(PLOT_KEY.into(), JsonValue::from(plot_number));

    Feature {
        bbox: None,
        geometry: Some(geometry),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}
