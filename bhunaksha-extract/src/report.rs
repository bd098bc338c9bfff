//! Rapport d'extraction avec graceful degradation
//!
//! Collecte les compteurs et les incidents d'un run pour l'affichage final
//! et l'export JSON.

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use serde::Serialize;

/// Statut global du run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RunStatus {
    /// Aucun incident
    Success,
    /// Des parcelles ou des branches ont été ignorées
    PartialSuccess,
    /// Des erreurs et rien d'extrait
    Failed,
}

/// Niveau de sévérité des incidents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IssueLevel {
    /// Unité de travail ignorée (branche, village, parcelle)
    Error,
    /// Dégradation sans perte (métadonnées manquantes, fichier repris à zéro)
    Warning,
}

/// Portée d'un incident
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IssueScope {
    District,
    Taluk,
    Village,
    Plot,
}

/// Incident avec contexte
#[derive(Debug, Clone, Serialize)]
pub struct RunIssue {
    pub level: IssueLevel,
    pub scope: IssueScope,
    /// Chemin lisible (district / taluk / village / parcelle)
    pub location: String,
    pub message: String,
}

/// Rapport complet d'un run
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub state: String,
    pub duration_secs: f64,
    pub status: Option<RunStatus>,

    pub districts_processed: usize,
    pub districts_skipped: usize,
    pub taluks_processed: usize,
    pub taluks_skipped: usize,
    pub villages_processed: usize,
    pub villages_skipped: usize,
    /// Villages déjà complets sur disque
    pub villages_complete: usize,

    /// Parcelles demandées au service
    pub plots_fetched: usize,
    /// Parcelles ajoutées et persistées
    pub plots_saved: usize,
    /// Parcelles en échec (requête, géométrie ou écriture)
    pub plots_failed: usize,

    pub issues: Vec<RunIssue>,
}

impl RunReport {
    pub fn new(state: &str) -> Self {
        Self {
            state: state.to_string(),
            ..Default::default()
        }
    }

    /// Enregistre un incident
    pub fn record_issue(
        &mut self,
        level: IssueLevel,
        scope: IssueScope,
        location: impl Into<String>,
        message: impl ToString,
    ) {
        self.issues.push(RunIssue {
            level,
            scope,
            location: location.into(),
            message: message.to_string(),
        });
    }

    /// Intègre le résultat d'un village
    pub fn record_village(&mut self, stats: crate::extractor::VillageStats) {
        use crate::extractor::VillageOutcome;

        match stats.outcome {
            VillageOutcome::Skipped => self.villages_skipped += 1,
            VillageOutcome::AlreadyComplete => {
                self.villages_processed += 1;
                self.villages_complete += 1;
            }
            VillageOutcome::Done => self.villages_processed += 1,
        }
        self.plots_fetched += stats.fetched;
        self.plots_saved += stats.saved;
        self.plots_failed += stats.failed;
        self.issues.extend(stats.issues);
    }

    pub fn set_duration(&mut self, duration: Duration) {
        self.duration_secs = duration.as_secs_f64();
    }

    /// Détermine le statut final
    pub fn finalize(&mut self) -> RunStatus {
        let has_errors = self.issues.iter().any(|i| i.level == IssueLevel::Error);
        let has_success = self.plots_saved > 0 || self.villages_complete > 0;

        let status = if has_errors && has_success {
            RunStatus::PartialSuccess
        } else if has_errors {
            RunStatus::Failed
        } else {
            RunStatus::Success
        };
        self.status = Some(status);
        status
    }

    /// Affiche le rapport sur la console
    pub fn display(&self) {
        println!("\n{}", "=".repeat(60));
        println!("EXTRACTION REPORT - State {}", self.state);
        println!("{}", "=".repeat(60));

        if let Some(status) = self.status {
            println!("\nStatus: {:?}", status);
        }
        println!("Duration: {:.2}s", self.duration_secs);

        println!("\n--- SUMMARY ---");
        println!(
            "Districts: {} processed, {} skipped",
            self.districts_processed, self.districts_skipped
        );
        println!(
            "Taluks: {} processed, {} skipped",
            self.taluks_processed, self.taluks_skipped
        );
        println!(
            "Villages: {} processed ({} already complete), {} skipped",
            self.villages_processed, self.villages_complete, self.villages_skipped
        );
        println!(
            "Plots: {} fetched, {} saved, {} failed",
            self.plots_fetched, self.plots_saved, self.plots_failed
        );

        if !self.issues.is_empty() {
            println!("\n--- ISSUES ({}) ---", self.issues.len());
            for issue in self.issues.iter().take(20) {
                println!(
                    "  {:?} {:?} [{}] {}",
                    issue.level, issue.scope, issue.location, issue.message
                );
            }
            if self.issues.len() > 20 {
                println!("  ... and {} more", self.issues.len() - 20);
            }
        }

        println!("\n{}", "=".repeat(60));
    }

    /// Sauvegarde le rapport en JSON
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Affichage compact pour le résumé
    pub fn summary(&self) -> String {
        format!(
            "{}: {} villages, {} plots saved, {} failed, {} issues",
            self.state,
            self.villages_processed,
            self.plots_saved,
            self.plots_failed,
            self.issues.len()
        )
    }
}
