//! Statistical primitives for preference analysis.
//!
//! This crate provides the small set of statistics the correlation engine is
//! built on:
//!
//! - **Weighted descriptive statistics**: weighted mean, variance and standard
//!   deviation of a sample where every observation carries a confidence weight
//! - **Significance**: a bounded pseudo-correlation for constant-target data,
//!   a closed-form two-tailed p-value approximation, and an effect size
//!
//! # Modules
//!
//! - [`descriptive`]: Weighted summary statistics
//! - [`significance`]: Pseudo-correlation, p-value and effect size
//!
//! # Examples
//!
//! ## Computing weighted statistics
//!
//! ```
//! use sigma_taste_stats::descriptive::WeightedStats;
//!
//! let samples = [(1.0, 1.0), (3.0, 1.0)];
//! let stats = WeightedStats::new(samples).unwrap();
//! assert_eq!(stats.mean, 2.0);
//! assert_eq!(stats.std_dev, 1.0);
//! ```
//!
//! ## Estimating significance
//!
//! ```
//! use sigma_taste_stats::significance;
//!
//! let r = significance::pseudo_correlation(0.25, 0.1);
//! let p = significance::approximate_p_value(r, 30);
//! assert!(p < 0.05);
//! ```

pub mod descriptive;
pub mod significance;
