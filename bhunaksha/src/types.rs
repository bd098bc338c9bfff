//! Types de données pour le crate bhunaksha

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// Niveau dans la hiérarchie administrative (l'État est la racine implicite)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HierarchyLevel {
    /// Niveau 1 : districts
    District = 1,
    /// Niveau 2 : taluks
    Taluk = 2,
    /// Niveau 3 : villages (ou zones urbaines)
    Village = 3,
}

impl HierarchyLevel {
    /// Valeur numérique attendue par le service
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::District => "district",
            Self::Taluk => "taluk",
            Self::Village => "village",
        }
    }
}

impl std::fmt::Display for HierarchyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Un noeud de la hiérarchie (nom affiché + code)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HierarchyNode {
    /// Nom affiché (ex: "Pune")
    pub name: String,

    /// Code utilisé dans les requêtes et l'identifiant composite
    pub code: String,
}

impl HierarchyNode {
    pub fn new(name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
        }
    }
}

/// Enfants d'un noeud, tels que renvoyés par `ListsAfterLevelGeoref`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChildList {
    /// Enfants, dans l'ordre du service, noms uniques
    pub nodes: Vec<HierarchyNode>,

    /// Liste secondaire des types de carte (niveau 3 uniquement)
    pub map_types: Vec<HierarchyNode>,
}

impl ChildList {
    /// Code du type de carte utilisé pour l'identifiant (premier de la liste)
    pub fn map_type_code(&self) -> Option<&str> {
        self.map_types.first().map(|n| n.code.as_str())
    }

    /// Recherche un code par nom affiché
    pub fn code_of(&self, name: &str) -> Option<&str> {
        self.nodes
            .iter()
            .find(|n| n.name == name)
            .map(|n| n.code.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Valeur d'un attribut brut renvoyé par le service (schéma non contractuel)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Null,
    Bool(bool),
    Number(Number),
    Text(String),
    /// Tableaux et objets imbriqués, conservés tels quels
    Nested(Value),
}

impl AttrValue {
    /// Représentation texte d'un scalaire (`None` pour null et les valeurs imbriquées)
    pub fn as_key(&self) -> Option<String> {
        match self {
            Self::Text(s) => Some(s.clone()),
            Self::Number(n) => Some(n.to_string()),
            Self::Bool(b) => Some(b.to_string()),
            Self::Null | Self::Nested(_) => None,
        }
    }
}

impl From<Value> for AttrValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => Self::Number(n),
            Value::String(s) => Self::Text(s),
            nested => Self::Nested(nested),
        }
    }
}

impl From<AttrValue> for Value {
    fn from(value: AttrValue) -> Self {
        match value {
            AttrValue::Null => Value::Null,
            AttrValue::Bool(b) => Value::Bool(b),
            AttrValue::Number(n) => Value::Number(n),
            AttrValue::Text(s) => Value::String(s),
            AttrValue::Nested(v) => v,
        }
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Attributs bruts d'une parcelle, dans l'ordre du service
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawAttributes(Vec<(String, AttrValue)>);

impl RawAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&AttrValue> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Insère ou remplace (la position d'origine est conservée en cas de remplacement)
    pub fn insert(&mut self, key: impl Into<String>, value: AttrValue) {
        let key = key.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Convertit en objet JSON (ordre conservé)
    pub fn into_json(self) -> Map<String, Value> {
        self.0.into_iter().map(|(k, v)| (k, v.into())).collect()
    }
}

impl FromIterator<(String, AttrValue)> for RawAttributes {
    fn from_iter<T: IntoIterator<Item = (String, AttrValue)>>(iter: T) -> Self {
        let mut attrs = Self::new();
        for (k, v) in iter {
            attrs.insert(k, v);
        }
        attrs
    }
}

/// Détail d'une parcelle (`getPlotInfo`)
#[derive(Debug, Clone, PartialEq)]
pub struct PlotRecord {
    /// Numéro de parcelle demandé
    pub plot_number: String,

    /// Tous les champs de la réponse, y compris la géométrie WKT
    pub raw_attributes: RawAttributes,

    /// Géométrie WKT dans le système projeté du service
    pub geometry_wkt: Option<String>,
}

impl PlotRecord {
    /// Géométrie WKT, ou erreur si la parcelle n'en a pas
    pub fn require_geometry(&self) -> Result<&str, crate::BhunakshaError> {
        self.geometry_wkt
            .as_deref()
            .ok_or_else(|| crate::BhunakshaError::MissingGeometry {
                plot: self.plot_number.clone(),
            })
    }
}
