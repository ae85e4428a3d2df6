use std::path::PathBuf;

use rand::SeedableRng as _;
use rand_pcg::Pcg64Mcg;
use sigma_taste_analysis::{
    comparison::DimensionFilter,
    pairing::{self, PairSelectionParams},
};

use crate::util::{DatasetArg, Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SuggestPairsArg {
    #[clap(flatten)]
    dataset: DatasetArg,
    /// Dimension the pairs will be judged on
    #[arg(long, default_value = "overall")]
    dimension: DimensionFilter,
    /// Number of pairs to propose
    #[arg(long, default_value_t = 10)]
    count: usize,
    /// Random noise added to score differences
    #[arg(long, default_value_t = 0.3)]
    jitter: f64,
    /// Maximum pairs per video before top-up
    #[arg(long, default_value_t = 2)]
    max_per_video: usize,
    /// Seed for reproducible selection
    #[arg(long)]
    seed: Option<u64>,
    /// Output file path (stdout if omitted)
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &SuggestPairsArg) -> anyhow::Result<()> {
    let SuggestPairsArg {
        dataset,
        dimension,
        count,
        jitter,
        max_per_video,
        seed,
        output,
    } = arg;
    anyhow::ensure!(
        jitter.is_finite() && *jitter >= 0.0,
        "--jitter must be a non-negative number, got {jitter}"
    );
    anyhow::ensure!(*max_per_video > 0, "--max-per-video must be at least 1");
    let (videos, comparisons) = dataset.load()?;

    let mut rng = match seed {
        Some(seed) => Pcg64Mcg::seed_from_u64(*seed),
        None => Pcg64Mcg::from_rng(&mut rand::rng()),
    };
    let params = PairSelectionParams {
        count: *count,
        jitter: *jitter,
        max_per_video: *max_per_video,
    };
    let pairs =
        pairing::select_informative_pairs(&videos, &comparisons, dimension, &params, &mut rng);

    eprintln!("Suggested {} pairs:", pairs.len());
    for p in &pairs {
        eprintln!("  {} vs {} (diff {:.3})", p.video_a_id, p.video_b_id, p.score_diff);
    }
    Output::save_json(&pairs, output.as_deref())
}
