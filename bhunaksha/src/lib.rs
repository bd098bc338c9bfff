//! # bhunaksha
//!
//! Client pour le service cartographique cadastral Bhunaksha (Inde).
//!
//! ## Features
//!
//! - Parcours de la hiérarchie État → district → taluk → village
//! - Construction de l'identifiant composite d'un village (`giscode`)
//! - Liste des parcelles d'un village et détail (attributs + WKT) d'une parcelle
//! - Session HTTP explicite (cookies, en-têtes), aucun état global
//!
//! ## Usage
//!
//! ```rust,ignore
//! use bhunaksha::{build_identifier, ClientConfig, HierarchyClient, HierarchyLevel, HttpHierarchyClient};
//!
//! let client = HttpHierarchyClient::connect(ClientConfig::default()).await?;
//! let districts = client.list_children(HierarchyLevel::District, &["U".to_string()]).await?;
//! for district in &districts.nodes {
//!     println!("{} ({})", district.name, district.code);
//! }
//! ```

pub mod client;
pub mod error;
pub mod identifier;
pub mod types;
pub mod wire;

pub use client::{ClientConfig, HierarchyClient, HttpHierarchyClient, DEFAULT_BASE_URL};
pub use error::BhunakshaError;
pub use identifier::{build_identifier, AreaIdentifier};
pub use types::{AttrValue, ChildList, HierarchyLevel, HierarchyNode, PlotRecord, RawAttributes};
