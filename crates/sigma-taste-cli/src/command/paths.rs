use std::path::PathBuf;

use sigma_taste_analysis::feature;

use crate::util::{self, Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PathsArg {
    /// Videos JSON file
    #[arg(long)]
    videos: PathBuf,
    /// Number of videos to sample
    #[arg(long, default_value_t = 20)]
    limit: usize,
    /// Output file path (stdout if omitted)
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &PathsArg) -> anyhow::Result<()> {
    let PathsArg {
        videos,
        limit,
        output,
    } = arg;
    let videos = util::read_videos_file(videos)?;
    let paths = feature::discover_all_numeric_paths(&videos, *limit);
    let uncataloged = paths
        .iter()
        .filter(|p| !feature::KNOWN_PATHS.iter().any(|k| k.path == p.as_str()))
        .count();

    eprintln!(
        "Found {} numeric paths in {} videos ({uncataloged} outside the catalog)",
        paths.len(),
        videos.len().min(*limit)
    );
    Output::save_json(&paths, output.as_deref())
}
