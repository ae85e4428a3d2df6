use std::path::PathBuf;

use sigma_taste_analysis::{export, report::SigmaTasteAnalysis};

use crate::util::{self, Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ExportArg {
    /// Analysis report produced by `analyze`
    report: PathBuf,
    /// Output file path (stdout if omitted)
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &ExportArg) -> anyhow::Result<()> {
    let ExportArg { report, output } = arg;
    let analysis: SigmaTasteAnalysis = util::read_json_file("analysis report", report)?;
    let fingerprint = export::export_for_fingerprint(&analysis);
    Output::save_json(&fingerprint, output.as_deref())?;

    eprintln!("Fingerprint export:");
    eprintln!("  Variable weights: {}", fingerprint.variable_weights.len());
    eprintln!("  Increase weight:  {}", fingerprint.adjustments.increase_weight.len());
    eprintln!("  Decrease weight:  {}", fingerprint.adjustments.decrease_weight.len());
    eprintln!("  Remove or review: {}", fingerprint.adjustments.remove_or_review.len());
    eprintln!("  New variables:    {}", fingerprint.proposed_new_variables.len());
    Ok(())
}
