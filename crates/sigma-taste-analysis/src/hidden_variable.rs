//! Concepts judges talk about that the analysis schema does not capture.
//!
//! Each entry of [`HIDDEN_CONCEPTS`] lists term fragments. Themes whose term
//! contains a fragment count towards the concept. A concept is proposed as a
//! new variable unless a strongly predictive existing path already covers it;
//! concepts mentioned often enough are proposed regardless.

use serde::{Deserialize, Serialize};

use crate::{
    correlation::{ConfidenceTier, VariableCorrelation},
    reasoning::ReasoningTheme,
};

/// |effect size| above which an existing path counts as capturing a concept.
pub const CAPTURE_EFFECT_SIZE: f64 = 0.3;

/// Concepts mentioned more often than this are proposed even when captured.
pub const FREQUENCY_OVERRIDE: usize = 5;

/// Maximum evidence snippets per candidate.
pub const MAX_EVIDENCE: usize = 3;

/// A concept that may be missing from the analysis schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HiddenConcept {
    pub key: &'static str,
    pub terms: &'static [&'static str],
    /// Where the concept would live in the analysis record.
    pub suggested_path: &'static str,
    pub description: &'static str,
}

pub const HIDDEN_CONCEPTS: &[HiddenConcept] = &[
    HiddenConcept {
        key: "replicability_ease",
        terms: &["replicable", "replicability", "replicate", "easy", "simple", "accessible"],
        suggested_path: "script.replicability.ease_score",
        description: "How easy it would be for a brand to recreate this video format",
    },
    HiddenConcept {
        key: "premise_strength",
        terms: &["premise", "concept", "idea", "clever", "smart", "creative"],
        suggested_path: "script.premise.strength",
        description: "The core concept or hook that makes the video interesting",
    },
    HiddenConcept {
        key: "performance_quality",
        terms: &["acting", "performance", "performer", "charisma", "energy", "presence"],
        suggested_path: "execution.performance_quality",
        description: "How well the on-screen talent performs their role",
    },
    HiddenConcept {
        key: "comedic_execution",
        terms: &["timing", "punchline", "payoff", "delivery", "comedic", "funny"],
        suggested_path: "script.humor.execution_quality",
        description: "The execution quality of comedic elements, not just presence of humor",
    },
    HiddenConcept {
        key: "visual_appeal",
        terms: &["attractive", "aesthetic", "visually", "beautiful", "pleasing"],
        suggested_path: "visual.aesthetic_appeal",
        description: "Visual attractiveness beyond technical quality",
    },
];

/// A proposed new variable backed by reasoning evidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HiddenVariableCandidate {
    pub key: String,
    /// Human-readable name: the key with underscores replaced by spaces.
    pub name: String,
    pub description: String,
    pub evidence: Vec<String>,
    /// Sum of the frequencies of all matching themes.
    pub frequency: usize,
    pub suggested_path: String,
}

impl HiddenConcept {
    fn matches(&self, theme: &ReasoningTheme) -> bool {
        self.terms.iter().any(|t| theme.term.contains(t))
    }

    fn is_captured_by(&self, strong_paths: &[String]) -> bool {
        strong_paths
            .iter()
            .any(|path| self.terms.iter().any(|t| path.contains(t)))
    }
}

/// Proposes schema additions from themes and existing correlations.
///
/// Candidates are sorted by descending frequency.
#[must_use]
pub fn identify_hidden_variables(
    themes: &[ReasoningTheme],
    correlations: &[VariableCorrelation],
) -> Vec<HiddenVariableCandidate> {
    let strong_paths = correlations
        .iter()
        .filter(|c| c.confidence != ConfidenceTier::Insufficient && c.effect_size.abs() > CAPTURE_EFFECT_SIZE)
        .map(|c| c.path.to_lowercase())
        .collect::<Vec<_>>();

    let mut candidates = HIDDEN_CONCEPTS
        .iter()
        .filter_map(|concept| {
            let matching = themes.iter().filter(|t| concept.matches(t)).collect::<Vec<_>>();
            if matching.is_empty() {
                return None;
            }
            let frequency = matching.iter().map(|t| t.frequency).sum::<usize>();
            if concept.is_captured_by(&strong_paths) && frequency <= FREQUENCY_OVERRIDE {
                tracing::debug!(concept = concept.key, "concept already captured");
                return None;
            }
            Some(HiddenVariableCandidate {
                key: concept.key.to_owned(),
                name: concept.key.replace('_', " "),
                description: concept.description.to_owned(),
                evidence: matching
                    .iter()
                    .flat_map(|t| &t.contexts)
                    .take(MAX_EVIDENCE)
                    .cloned()
                    .collect(),
                frequency,
                suggested_path: concept.suggested_path.to_owned(),
            })
        })
        .collect::<Vec<_>>();
    candidates.sort_by(|a, b| b.frequency.cmp(&a.frequency));
    candidates
}
