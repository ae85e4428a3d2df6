use std::path::PathBuf;

use sigma_taste_analysis::{
    comparison::DimensionFilter,
    correlation::ConfidenceTier,
    export,
    report::{self, AnalysisOptions, SigmaTasteAnalysis},
};
use sigma_taste_training::logistic::LogisticRegressionParams;

use crate::util::{DatasetArg, Output};

const SUMMARY_VARIABLE_COUNT: usize = 10;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct AnalyzeArg {
    #[clap(flatten)]
    dataset: DatasetArg,
    /// Comparison dimension to analyze (`all` disables filtering)
    #[arg(long, default_value = "overall")]
    dimension: DimensionFilter,
    /// Gradient descent step size
    #[arg(long, default_value_t = 0.1)]
    learning_rate: f64,
    /// Gradient descent iterations
    #[arg(long, default_value_t = 1000)]
    iterations: usize,
    /// L2 regularization strength
    #[arg(long, default_value_t = 0.1)]
    lambda: f64,
    /// Report output file path (stdout if omitted)
    #[arg(long)]
    output: Option<PathBuf>,
    /// Also write the fingerprint export to this path
    #[arg(long)]
    export: Option<PathBuf>,
}

pub(crate) fn run(arg: &AnalyzeArg) -> anyhow::Result<()> {
    let AnalyzeArg {
        dataset,
        dimension,
        learning_rate,
        iterations,
        lambda,
        output,
        export: export_path,
    } = arg;
    if !(learning_rate.is_finite() && *learning_rate > 0.0) {
        anyhow::bail!("--learning-rate must be a positive number, got {learning_rate}");
    }
    if !(lambda.is_finite() && *lambda >= 0.0) {
        anyhow::bail!("--lambda must be a non-negative number, got {lambda}");
    }
    let (videos, comparisons) = dataset.load()?;

    let options = AnalysisOptions {
        dimension: dimension.clone(),
        regression: LogisticRegressionParams {
            learning_rate: *learning_rate,
            iterations: *iterations,
            lambda: *lambda,
        },
    };
    let analysis = report::run_full_analysis(&comparisons, &videos, &options);
    print_summary(&analysis);

    Output::save_json(&analysis, output.as_deref())?;
    if let Some(path) = export_path {
        Output::save_json(&export::export_for_fingerprint(&analysis), Some(path.as_path()))?;
        eprintln!("Fingerprint export saved to {}", path.display());
    }
    Ok(())
}

fn print_summary(analysis: &SigmaTasteAnalysis) {
    let sample = &analysis.sample_size;
    eprintln!();
    eprintln!("Analysis ({}):", analysis.dimension);
    eprintln!("  Comparisons: {}", sample.total_comparisons);
    eprintln!("  With winner: {}", sample.with_winner);
    eprintln!("  Ties:        {}", sample.ties);
    eprintln!("  Unmatched:   {}", sample.unmatched);
    for (dimension, count) in &sample.by_dimension {
        eprintln!("    {dimension}: {count}");
    }

    eprintln!("  Top variables:");
    for c in analysis
        .variable_importance
        .iter()
        .filter(|c| c.confidence != ConfidenceTier::Insufficient)
        .take(SUMMARY_VARIABLE_COUNT)
    {
        eprintln!(
            "    {:<50} effect={:.3} mean={:+.3} p={:.3} n={} ({:?}, {:?})",
            c.path, c.effect_size, c.mean_delta, c.p_value, c.sample_count, c.direction, c.confidence
        );
    }

    let lr = &analysis.logistic_regression;
    if !lr.is_empty() {
        eprintln!("  Logistic regression accuracy: {:.3}", lr.accuracy);
        for p in lr.top_predictors.iter().take(SUMMARY_VARIABLE_COUNT) {
            eprintln!("    {:<50} {:+.4}", p.path, p.weight);
        }
    }

    if !analysis.hidden_variable_candidates.is_empty() {
        eprintln!("  Hidden variable candidates:");
        for h in &analysis.hidden_variable_candidates {
            eprintln!("    {} ({} mentions) -> {}", h.name, h.frequency, h.suggested_path);
        }
    }

    eprintln!("  Recommendations:");
    for r in &analysis.recommendations {
        eprintln!("    - {r}");
    }
    eprintln!();
}
