//! Décodage des réponses JSON du service
//!
//! Les réponses ne sont pas contractuelles : on décode en `serde_json::Value`
//! puis on extrait ce dont on a besoin, en tolérant codes numériques et champs
//! supplémentaires.

use serde_json::Value;
use tracing::{debug, warn};

use crate::types::{AttrValue, ChildList, HierarchyNode, PlotRecord, RawAttributes};
use crate::BhunakshaError;

/// Champ portant la géométrie WKT dans `getPlotInfo`
pub const GEOMETRY_FIELD: &str = "the_geom";

pub(crate) const LISTS_ENDPOINT: &str = "ListsAfterLevelGeoref";
pub(crate) const VILLAGE_INFO_ENDPOINT: &str = "getVVVVExtentGeoref";
pub(crate) const PLOT_LIST_ENDPOINT: &str = "kidelistFromGisCodeMH";
pub(crate) const PLOT_INFO_ENDPOINT: &str = "getPlotInfo";

/// Formate le chemin parent attendu par `ListsAfterLevelGeoref`
/// (`["U", "25"]` → `"U,25,"`)
pub fn codes_param<S: AsRef<str>>(parent_codes: &[S]) -> String {
    parent_codes
        .iter()
        .map(|c| format!("{},", c.as_ref()))
        .collect()
}

fn parse_json(endpoint: &'static str, body: &[u8]) -> Result<Value, BhunakshaError> {
    serde_json::from_slice(body).map_err(|e| BhunakshaError::decode(endpoint, e.to_string()))
}

/// Valeur scalaire en texte (codes et numéros de parcelle arrivent parfois en nombre)
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Décode une liste de noeuds `{"value": nom, "code": code}`.
///
/// Les noms en double gardent leur première occurrence.
fn decode_nodes(items: &[Value]) -> Vec<HierarchyNode> {
    let mut nodes: Vec<HierarchyNode> = Vec::with_capacity(items.len());
    for item in items {
        let name = item.get("value").and_then(scalar_text);
        let code = item.get("code").and_then(scalar_text);
        let (Some(name), Some(code)) = (name, code) else {
            debug!(item = %item, "Ignoring hierarchy entry without value/code");
            continue;
        };
        if nodes.iter().any(|n| n.name == name) {
            warn!(name = %name, code = %code, "Duplicate hierarchy name, keeping first");
            continue;
        }
        nodes.push(HierarchyNode { name, code });
    }
    nodes
}

/// Décode la réponse de `ListsAfterLevelGeoref` : `[[noeuds], [types de carte]]`
pub fn decode_child_list(body: &[u8]) -> Result<ChildList, BhunakshaError> {
    let value = parse_json(LISTS_ENDPOINT, body)?;
    let lists = match value {
        Value::Array(lists) => lists,
        Value::Null => return Ok(ChildList::default()),
        other => {
            return Err(BhunakshaError::decode(
                LISTS_ENDPOINT,
                format!("expected an array of lists, got {}", type_name(&other)),
            ))
        }
    };

    let list_at = |i: usize| -> Vec<HierarchyNode> {
        match lists.get(i) {
            Some(Value::Array(items)) => decode_nodes(items),
            _ => Vec::new(),
        }
    };

    Ok(ChildList {
        nodes: list_at(0),
        map_types: list_at(1),
    })
}

/// Décode la liste des numéros de parcelle (`kidelistFromGisCodeMH`)
pub fn decode_plot_list(body: &[u8]) -> Result<Vec<String>, BhunakshaError> {
    match parse_json(PLOT_LIST_ENDPOINT, body)? {
        Value::Array(items) => Ok(items
            .iter()
            .filter_map(scalar_text)
            .filter(|s| !s.is_empty())
            .collect()),
        Value::Null => Ok(Vec::new()),
        other => Err(BhunakshaError::decode(
            PLOT_LIST_ENDPOINT,
            format!("expected an array, got {}", type_name(&other)),
        )),
    }
}

/// Décode les métadonnées d'un village (`getVVVVExtentGeoref`)
pub fn decode_village_info(body: &[u8]) -> Result<Value, BhunakshaError> {
    match parse_json(VILLAGE_INFO_ENDPOINT, body)? {
        Value::Null => Err(BhunakshaError::decode(VILLAGE_INFO_ENDPOINT, "empty response")),
        info => Ok(info),
    }
}

/// Décode le détail d'une parcelle (`getPlotInfo`)
pub fn decode_plot_detail(plot_number: &str, body: &[u8]) -> Result<PlotRecord, BhunakshaError> {
    let object = match parse_json(PLOT_INFO_ENDPOINT, body)? {
        Value::Object(object) => object,
        Value::Null => {
            return Err(BhunakshaError::MissingGeometry {
                plot: plot_number.to_string(),
            })
        }
        other => {
            return Err(BhunakshaError::decode(
                PLOT_INFO_ENDPOINT,
                format!("expected an object, got {}", type_name(&other)),
            ))
        }
    };

    let geometry_wkt = object
        .get(GEOMETRY_FIELD)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    let raw_attributes: RawAttributes = object
        .into_iter()
        .map(|(k, v)| (k, AttrValue::from(v)))
        .collect();

    Ok(PlotRecord {
        plot_number: plot_number.to_string(),
        raw_attributes,
        geometry_wkt,
    })
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
