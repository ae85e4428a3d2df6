use std::path::PathBuf;

use sigma_taste_analysis::matching;

use crate::util::{DatasetArg, Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct MatchArg {
    #[clap(flatten)]
    dataset: DatasetArg,
    /// Output file path (stdout if omitted)
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &MatchArg) -> anyhow::Result<()> {
    let MatchArg { dataset, output } = arg;
    let (videos, comparisons) = dataset.load()?;
    let summary = matching::match_comparisons(&comparisons, &videos);

    eprintln!("Matched:   {}", summary.matched);
    eprintln!("Unmatched: {}", summary.unmatched);
    eprintln!("Match rate: {:.1}%", summary.match_rate() * 100.0);
    eprintln!("By confidence:");
    for (confidence, count) in &summary.by_confidence {
        eprintln!("  {confidence:?}: {count}");
    }
    if !summary.missing_video_ids.is_empty() {
        eprintln!("Missing videos: {}", summary.missing_video_ids.len());
    }

    Output::save_json(&summary, output.as_deref())
}
