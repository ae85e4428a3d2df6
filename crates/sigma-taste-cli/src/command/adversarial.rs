use std::path::PathBuf;

use serde::Serialize;
use sigma_taste_analysis::video;

use crate::util::{self, Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct AdversarialArg {
    /// Videos JSON file
    #[arg(long)]
    videos: PathBuf,
    /// Output file path (stdout if omitted)
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AdversarialCase<'a> {
    video_id: &'a str,
    video_url: &'a str,
    overall_score: Option<f64>,
    divergence: f64,
}

pub(crate) fn run(arg: &AdversarialArg) -> anyhow::Result<()> {
    let AdversarialArg { videos, output } = arg;
    let videos = util::read_videos_file(videos)?;
    let cases = video::adversarial_cases(&videos)
        .into_iter()
        .filter_map(|v| {
            Some(AdversarialCase {
                video_id: &v.id,
                video_url: &v.video_url,
                overall_score: v.overall_score(),
                divergence: v.divergence()?,
            })
        })
        .collect::<Vec<_>>();

    eprintln!(
        "{} of {} videos diverge by more than {}",
        cases.len(),
        videos.len(),
        video::ADVERSARIAL_DIVERGENCE_THRESHOLD
    );
    Output::save_json(&cases, output.as_deref())
}
