//! Inference of what drives human taste in short-form video
//!
//! This crate turns pairwise human judgments ("video A beat video B, and
//! here is why") into an explanation of which attributes of an AI analysis
//! record predict winning, and which recurring reasons the record does not
//! capture at all.
//!
//! # Overview
//!
//! The analysis runs in one pass over in-memory data:
//!
//! 1. **Load Data** ([`load`]): Read video and comparison exports
//! 2. **Extract Features** ([`feature::extract_features`]): Flatten each
//!    schema-less analysis record into normalized numeric features
//! 3. **Build Dataset** ([`dataset::build_training_dataset`]): One row of
//!    `winner - loser` deltas per decisive comparison
//! 4. **Correlate** ([`correlation::analyze_correlations`]): Per-variable
//!    direction, effect size and confidence tier
//! 5. **Regress** ([`regression::train_logistic_regression`]): Multivariate
//!    weights from a regularized logistic model
//! 6. **Mine Reasoning** ([`reasoning::mine_reasoning_themes`]): Recurring
//!    terms in free-text justifications
//! 7. **Find Hidden Variables** ([`hidden_variable::identify_hidden_variables`]):
//!    Concepts judges mention that no strong variable explains
//! 8. **Report** ([`report::run_full_analysis`]): Everything above plus
//!    recommendations, condensed by [`export::export_for_fingerprint`]
//!
//! Supporting tools work on the same data: [`matching`] checks comparison
//! coverage and ranks videos by win rate, [`pairing`] proposes the next pairs
//! to judge, and [`store`] merges exports.
//!
//! # Examples
//!
//! ```
//! use serde_json::json;
//! use sigma_taste_analysis::{
//!     comparison::{Comparison, Confidence},
//!     report::{AnalysisOptions, run_full_analysis},
//!     video::Video,
//! };
//!
//! let videos = vec![
//!     Video::new("a", json!({ "engagement": { "replayValue": 8 } })),
//!     Video::new("b", json!({ "engagement": { "replayValue": 4 } })),
//! ];
//! let comparisons = vec![
//!     Comparison::new("c1", "a", "b", Some("a"))
//!         .with_confidence(Confidence::Certain)
//!         .with_reasoning("Much better replay value"),
//! ];
//!
//! let report = run_full_analysis(&comparisons, &videos, &AnalysisOptions::default());
//! assert_eq!(report.sample_size.with_winner, 1);
//! assert_eq!(report.variable_importance[0].path, "engagement.replayValue");
//! ```

pub mod comparison;
pub mod correlation;
pub mod dataset;
pub mod export;
pub mod feature;
pub mod hidden_variable;
pub mod load;
pub mod matching;
pub mod pairing;
pub mod reasoning;
pub mod regression;
pub mod report;
pub mod store;
mod timestamp;
pub mod video;
