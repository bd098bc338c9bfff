//! Parcours district → taluk → village
//!
//! Seul l'échec de la liste des districts interrompt le run ; un échec plus
//! bas ne fait qu'ignorer la branche concernée.

use std::path::Path;
use std::time::Instant;

use bhunaksha::{build_identifier, ChildList, HierarchyClient, HierarchyLevel};
use tracing::{info, warn};

use crate::delay::DelayPolicy;
use crate::error::ExtractError;
use crate::export::{district_dir, ProgressStore, VillageContext};
use crate::extractor::VillageExtractor;
use crate::report::{IssueLevel, IssueScope, RunReport};

pub struct HierarchyWalker<C, S, D> {
    extractor: VillageExtractor<C, S, D>,
    category: String,
}

impl<C, S, D> HierarchyWalker<C, S, D>
where
    C: HierarchyClient,
    S: ProgressStore,
    D: DelayPolicy,
{
    pub fn new(extractor: VillageExtractor<C, S, D>, category: impl Into<String>) -> Self {
        Self {
            extractor,
            category: category.into(),
        }
    }

    pub fn extractor(&self) -> &VillageExtractor<C, S, D> {
        &self.extractor
    }

    /// Districts de l'état ; une liste vide est une erreur
    pub async fn list_districts(&self) -> Result<ChildList, ExtractError> {
        self.children(HierarchyLevel::District, &[self.category.clone()])
            .await
    }

    /// Extrait les districts demandés, dans l'ordre donné
    pub async fn walk(&self, districts: &[String], output_root: &Path) -> Result<RunReport, ExtractError> {
        let start = Instant::now();
        let mut report = RunReport::new(self.extractor.state());

        let available = self.list_districts().await?;
        info!(count = available.nodes.len(), "Found districts");

        for district in districts {
            let Some(district_code) = available.code_of(district) else {
                warn!(district = %district, "District not found, skipping");
                report.districts_skipped += 1;
                report.record_issue(
                    IssueLevel::Warning,
                    IssueScope::District,
                    district.as_str(),
                    "unknown district",
                );
                continue;
            };

            info!(district = %district, code = %district_code, "Processing district");
            let district_root = district_dir(output_root, district);
            self.walk_district(district, district_code, &district_root, &mut report)
                .await;
        }

        report.set_duration(start.elapsed());
        report.finalize();
        Ok(report)
    }

    async fn walk_district(&self, district: &str, district_code: &str, district_root: &Path, report: &mut RunReport) {
        let codes = [self.category.clone(), district_code.to_string()];
        let taluks = match self.children(HierarchyLevel::Taluk, &codes).await {
            Ok(taluks) => taluks,
            Err(e) => {
                warn!(district = %district, error = %e, "Skipping district");
                report.districts_skipped += 1;
                report.record_issue(IssueLevel::Error, IssueScope::District, district, &e);
                return;
            }
        };
        report.districts_processed += 1;

        for taluk in &taluks.nodes {
            let location = format!("{}/{}", district, taluk.name);
            let codes = [
                self.category.clone(),
                district_code.to_string(),
                taluk.code.clone(),
            ];
            let villages = match self.children(HierarchyLevel::Village, &codes).await {
                Ok(villages) => villages,
                Err(e) => {
                    warn!(district = %district, taluk = %taluk.name, error = %e, "Skipping taluk");
                    report.taluks_skipped += 1;
                    report.record_issue(IssueLevel::Error, IssueScope::Taluk, location, &e);
                    continue;
                }
            };
            report.taluks_processed += 1;
            info!(
                district = %district,
                taluk = %taluk.name,
                "Processing taluk with {} villages",
                villages.nodes.len()
            );

            let map_type = villages.map_type_code();
            for village in &villages.nodes {
                let identifier = build_identifier(
                    Some(self.category.as_str()),
                    map_type,
                    Some(district_code),
                    Some(taluk.code.as_str()),
                    Some(village.code.as_str()),
                );
                let context = VillageContext::new(district, taluk.name.as_str(), village.name.as_str());
                let stats = self
                    .extractor
                    .extract(identifier.as_ref(), &context, district_root)
                    .await;
                report.record_village(stats);
            }
        }
    }

    async fn children(&self, level: HierarchyLevel, codes: &[String]) -> Result<ChildList, ExtractError> {
        let list = self
            .extractor
            .client()
            .list_children(level, codes)
            .await
            .map_err(|e| ExtractError::hierarchy(level, codes, e))?;
        if list.is_empty() {
            return Err(ExtractError::hierarchy(level, codes, "empty list"));
        }
        Ok(list)
    }
}
