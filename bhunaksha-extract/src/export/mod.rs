//! Sortie GeoJSON par village et stockage de la progression

pub mod geojson;
#[cfg(feature = "proj")]
pub mod reproject;
pub mod store;

pub use self::geojson::{build_feature, VillageContext, VillageMetadata, VillageOutput, PLOT_KEY};
pub use store::{district_dir, sanitize_name, village_path, GeoJsonFileStore, ProgressStore};
