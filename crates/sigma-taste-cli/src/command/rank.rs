use std::path::PathBuf;

use sigma_taste_analysis::matching;

use crate::util::{DatasetArg, Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct RankArg {
    #[clap(flatten)]
    dataset: DatasetArg,
    /// Drop videos compared fewer than N times
    #[arg(long, default_value_t = 0)]
    min_appearances: usize,
    /// Only keep the best N videos
    #[arg(long)]
    top: Option<usize>,
    /// Output file path (stdout if omitted)
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &RankArg) -> anyhow::Result<()> {
    let RankArg {
        dataset,
        min_appearances,
        top,
        output,
    } = arg;
    let (videos, comparisons) = dataset.load()?;
    let mut rankings = matching::rank_videos(&comparisons, &videos);
    rankings.retain(|r| r.appearances() >= *min_appearances);
    if let Some(top) = top {
        rankings.truncate(*top);
    }

    for (i, r) in rankings.iter().take(10).enumerate() {
        eprintln!(
            "  {:2}: {} => {:.3} ({}W {}L {}T)",
            i + 1,
            r.video_id,
            r.score,
            r.wins,
            r.losses,
            r.ties
        );
    }

    Output::save_json(&rankings, output.as_deref())
}
