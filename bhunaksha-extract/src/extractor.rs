//! Extraction reprenable d'un village
//!
//! Le fichier GeoJSON du village est à la fois la sortie et le point de
//! reprise : les parcelles déjà présentes (`properties.plotno`) ne sont pas
//! redemandées, et le document est réécrit après chaque parcelle ajoutée.

use std::collections::HashSet;
use std::path::Path;

use bhunaksha::{AreaIdentifier, HierarchyClient};
use geojson::{Feature, JsonValue};
use tracing::{debug, error, info, warn};

use crate::delay::DelayPolicy;
use crate::error::ExtractError;
use crate::export::{build_feature, village_path, ProgressStore, VillageContext, VillageMetadata, VillageOutput};
use crate::geometry::CoordinateReprojector;
use crate::report::{IssueLevel, IssueScope, RunIssue};

/// Issue du traitement d'un village
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VillageOutcome {
    /// Village non traité (identifiant incomplet, liste de parcelles indisponible)
    #[default]
    Skipped,
    /// Toutes les parcelles étaient déjà sur disque
    AlreadyComplete,
    /// Parcelles manquantes tentées
    Done,
}

/// Compteurs et incidents d'un village
#[derive(Debug, Clone, Default)]
pub struct VillageStats {
    pub outcome: VillageOutcome,
    pub fetched: usize,
    pub saved: usize,
    pub failed: usize,
    pub issues: Vec<RunIssue>,
}

impl VillageStats {
    fn issue(&mut self, level: IssueLevel, scope: IssueScope, location: &str, message: impl ToString) {
        self.issues.push(RunIssue {
            level,
            scope,
            location: location.to_string(),
            message: message.to_string(),
        });
    }
}

/// Extracteur de villages : client, stockage, délai et reprojection fixes
pub struct VillageExtractor<C, S, D> {
    client: C,
    store: S,
    delay: D,
    reprojector: CoordinateReprojector,
    state: String,
}

impl<C, S, D> VillageExtractor<C, S, D>
where
    C: HierarchyClient,
    S: ProgressStore,
    D: DelayPolicy,
{
    pub fn new(client: C, store: S, delay: D, reprojector: CoordinateReprojector, state: impl Into<String>) -> Self {
        Self {
            client,
            store,
            delay,
            reprojector,
            state: state.into(),
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn state(&self) -> &str {
        &self.state
    }

    /// Extrait les parcelles manquantes d'un village.
    ///
    /// Ne retourne jamais d'erreur : chaque échec est journalisé et compté,
    /// puis l'extraction passe à l'unité suivante.
    pub async fn extract(
        &self,
        identifier: Option<&AreaIdentifier>,
        context: &VillageContext,
        output_root: &Path,
    ) -> VillageStats {
        let path = village_path(output_root, &context.taluk, &context.village);
        let location = format!("{}/{}/{}", context.district, context.taluk, context.village);
        let mut stats = VillageStats::default();

        let (mut output, mut existing) = match self.store.load(&path) {
            Ok(Some(previous)) => {
                let existing = previous.plot_numbers();
                info!(
                    village = %context.village,
                    path = %path.display(),
                    "Found existing file with {} plots",
                    existing.len()
                );
                (previous, existing)
            }
            Ok(None) => (VillageOutput::new(VillageMetadata::default()), HashSet::new()),
            Err(e) => {
                warn!(village = %context.village, error = %e, "Could not load existing file, starting fresh");
                stats.issue(IssueLevel::Warning, IssueScope::Village, &location, &e);
                (VillageOutput::new(VillageMetadata::default()), HashSet::new())
            }
        };

        let Some(identifier) = identifier else {
            let e = ExtractError::Identifier {
                village: context.village.clone(),
            };
            warn!(village = %context.village, "Skipping village: incomplete hierarchy codes");
            stats.issue(IssueLevel::Error, IssueScope::Village, &location, e);
            return stats;
        };

        if !output.metadata.has_village_info() {
            output.metadata.village_info = match self.client.get_village_info(identifier).await {
                Ok(info) => info,
                Err(e) => {
                    warn!(village = %context.village, error = %e, "Could not fetch village info");
                    stats.issue(IssueLevel::Warning, IssueScope::Village, &location, &e);
                    JsonValue::Object(Default::default())
                }
            };
        }

        let plots = match self.client.get_plot_list(identifier).await {
            Ok(plots) if !plots.is_empty() => plots,
            Ok(_) => {
                warn!(village = %context.village, gis_code = %identifier, "No plots found");
                stats.issue(IssueLevel::Error, IssueScope::Village, &location, "empty plot list");
                return stats;
            }
            Err(e) => {
                warn!(village = %context.village, error = %e, "Could not fetch plot list");
                stats.issue(IssueLevel::Error, IssueScope::Village, &location, &e);
                return stats;
            }
        };

        let total = plots.len();
        info!(village = %context.village, gis_code = %identifier, "Village has {} plots", total);

        if plots.iter().all(|p| existing.contains(p)) {
            info!(village = %context.village, "All plots already extracted, skipping");
            stats.outcome = VillageOutcome::AlreadyComplete;
            return stats;
        }

        stats.outcome = VillageOutcome::Done;
        output.metadata.district = context.district.clone();
        output.metadata.taluk = context.taluk.clone();
        output.metadata.village = context.village.clone();
        output.metadata.gis_code = identifier.to_string();
        output.metadata.state = self.state.clone();

        for (i, plot_number) in plots.iter().enumerate() {
            if existing.contains(plot_number) {
                continue;
            }
            debug!(village = %context.village, plot = %plot_number, "Processing plot {}/{}", i + 1, total);

            stats.fetched += 1;
            match self.fetch_feature(identifier, context, plot_number).await {
                Ok(feature) => {
                    output.features.push(feature);
                    output.update_counters(total, i + 1);
                    match self.store.save(&path, &output) {
                        Ok(()) => {
                            existing.insert(plot_number.clone());
                            stats.saved += 1;
                        }
                        Err(e) => {
                            // Le document en mémoire reste aligné sur le disque
                            output.features.pop();
                            output.update_counters(total, i + 1);
                            error!(village = %context.village, plot = %plot_number, error = %e, "Could not save plot");
                            stats.failed += 1;
                            stats.issue(
                                IssueLevel::Error,
                                IssueScope::Plot,
                                &format!("{}/{}", location, plot_number),
                                &e,
                            );
                        }
                    }
                }
                Err(e) => {
                    warn!(village = %context.village, plot = %plot_number, error = %e, "Skipping plot");
                    stats.failed += 1;
                    stats.issue(
                        IssueLevel::Error,
                        IssueScope::Plot,
                        &format!("{}/{}", location, plot_number),
                        &e,
                    );
                }
            }

            let pause = self.delay.next_delay();
            if !pause.is_zero() {
                tokio::time::sleep(pause).await;
            }
        }

        info!(
            village = %context.village,
            saved = stats.saved,
            failed = stats.failed,
            "Finished village, {} plots on disk",
            existing.len()
        );
        stats
    }

    async fn fetch_feature(
        &self,
        identifier: &AreaIdentifier,
        context: &VillageContext,
        plot_number: &str,
    ) -> Result<Feature, ExtractError> {
        let record = self
            .client
            .get_plot_detail(identifier, plot_number)
            .await
            .map_err(|e| ExtractError::PlotFetch {
                plot: plot_number.to_string(),
                reason: e.to_string(),
            })?;

        let wkt = record.require_geometry().map_err(|e| ExtractError::PlotFetch {
            plot: plot_number.to_string(),
            reason: e.to_string(),
        })?;
        let geometry = self.reprojector.reproject_wkt(wkt)?;

        Ok(build_feature(geometry, context, plot_number, record.raw_attributes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delay::NoDelay;
    use crate::export::GeoJsonFileStore;
    use crate::geometry::{DEFAULT_SOURCE_EPSG, DEFAULT_TARGET_EPSG};
    use async_trait::async_trait;
    use bhunaksha::{build_identifier, AttrValue, BhunakshaError, ChildList, HierarchyLevel, PlotRecord, RawAttributes};
    use std::sync::Mutex;

    /// Service en mémoire : une liste de parcelles, certaines sans géométrie
    struct FakeVillage {
        plots: Vec<&'static str>,
        without_geometry: Vec<&'static str>,
        info_fails: bool,
        detail_calls: Mutex<Vec<String>>,
    }

    impl FakeVillage {
        fn new(plots: Vec<&'static str>) -> Self {
            Self {
                plots,
                without_geometry: Vec::new(),
                info_fails: false,
                detail_calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.detail_calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl HierarchyClient for FakeVillage {
        async fn list_children(&self, _: HierarchyLevel, _: &[String]) -> Result<ChildList, BhunakshaError> {
            Ok(ChildList::default())
        }

        async fn get_village_info(&self, _: &AreaIdentifier) -> Result<JsonValue, BhunakshaError> {
            if self.info_fails {
                return Err(BhunakshaError::Status {
                    endpoint: "getVVVVExtentGeoref",
                    status: 500,
                });
            }
            Ok(serde_json::json!({"xmin": 276000.0, "ymin": 2110000.0}))
        }

        async fn get_plot_list(&self, _: &AreaIdentifier) -> Result<Vec<String>, BhunakshaError> {
            Ok(self.plots.iter().map(|p| p.to_string()).collect())
        }

        async fn get_plot_detail(&self, _: &AreaIdentifier, plot: &str) -> Result<PlotRecord, BhunakshaError> {
            self.detail_calls.lock().unwrap().push(plot.to_string());
            let wkt = (!self.without_geometry.iter().any(|p| *p == plot)).then(|| "POINT (276689.33 2110588.84)".to_string());
            let mut raw = RawAttributes::new();
            raw.insert("plotno", AttrValue::from(plot));
            Ok(PlotRecord {
                plot_number: plot.to_string(),
                raw_attributes: raw,
                geometry_wkt: wkt,
            })
        }
    }

    fn extractor(client: FakeVillage) -> VillageExtractor<FakeVillage, GeoJsonFileStore, NoDelay> {
        let reprojector = CoordinateReprojector::new(DEFAULT_SOURCE_EPSG, DEFAULT_TARGET_EPSG).unwrap();
        VillageExtractor::new(client, GeoJsonFileStore, NoDelay, reprojector, "27")
    }

    fn identifier() -> AreaIdentifier {
        build_identifier(Some("U"), Some("1"), Some("25"), Some("03"), Some("270001")).unwrap()
    }

    fn context() -> VillageContext {
        VillageContext::new("Pune", "Haveli", "Wagholi")
    }

    #[tokio::test]
    async fn test_fresh_village() {
        let dir = tempfile::tempdir().unwrap();
        let ex = extractor(FakeVillage::new(vec!["101", "102"]));

        let stats = ex.extract(Some(&identifier()), &context(), dir.path()).await;
        assert_eq!(stats.outcome, VillageOutcome::Done);
        assert_eq!(stats.saved, 2);
        assert!(stats.issues.is_empty());

        let output = GeoJsonFileStore
            .load(&dir.path().join("Haveli/Wagholi.geojson"))
            .unwrap()
            .unwrap();
        assert_eq!(output.metadata.total_plots, 2);
        assert_eq!(output.metadata.successful_plots, 2);
        assert_eq!(output.metadata.failed_plots, 0);
        assert_eq!(output.metadata.gis_code, "U12503270001");
        assert_eq!(output.metadata.state, "27");
        assert!(output.metadata.has_village_info());
    }

    #[tokio::test]
    async fn test_missing_geometry_is_counted() {
        let dir = tempfile::tempdir().unwrap();
        let mut client = FakeVillage::new(vec!["54", "55", "56"]);
        client.without_geometry = vec!["55"];
        let ex = extractor(client);

        let stats = ex.extract(Some(&identifier()), &context(), dir.path()).await;
        assert_eq!(stats.saved, 2);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.issues.len(), 1);
        assert_eq!(stats.issues[0].location, "Pune/Haveli/Wagholi/55");

        let output = GeoJsonFileStore
            .load(&dir.path().join("Haveli/Wagholi.geojson"))
            .unwrap()
            .unwrap();
        assert_eq!(output.metadata.successful_plots, 2);
        assert_eq!(output.metadata.failed_plots, 1);
        assert!(!output.plot_numbers().contains("55"));
    }

    #[tokio::test]
    async fn test_incomplete_identifier_skips() {
        let dir = tempfile::tempdir().unwrap();
        let ex = extractor(FakeVillage::new(vec!["1"]));

        let stats = ex.extract(None, &context(), dir.path()).await;
        assert_eq!(stats.outcome, VillageOutcome::Skipped);
        assert!(ex.client().calls().is_empty());
        assert!(!dir.path().join("Haveli").exists());
    }

    #[tokio::test]
    async fn test_empty_plot_list_skips() {
        let dir = tempfile::tempdir().unwrap();
        let ex = extractor(FakeVillage::new(Vec::new()));

        let stats = ex.extract(Some(&identifier()), &context(), dir.path()).await;
        assert_eq!(stats.outcome, VillageOutcome::Skipped);
        assert_eq!(stats.issues.len(), 1);
        assert!(!dir.path().join("Haveli/Wagholi.geojson").exists());
    }

    #[tokio::test]
    async fn test_village_info_failure_degrades() {
        let dir = tempfile::tempdir().unwrap();
        let mut client = FakeVillage::new(vec!["1"]);
        client.info_fails = true;
        let ex = extractor(client);

        let stats = ex.extract(Some(&identifier()), &context(), dir.path()).await;
        assert_eq!(stats.saved, 1);
        assert_eq!(stats.issues[0].level, IssueLevel::Warning);

        let output = GeoJsonFileStore
            .load(&dir.path().join("Haveli/Wagholi.geojson"))
            .unwrap()
            .unwrap();
        assert_eq!(output.metadata.village_info, serde_json::json!({}));
    }
}
