use std::path::PathBuf;

use sigma_taste_analysis::store::TasteStore;

use crate::util::{self, Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct MergeArg {
    /// Dataset files holding `videos` and/or `comparisons`
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
    /// Output file path (stdout if omitted)
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &MergeArg) -> anyhow::Result<()> {
    let MergeArg { inputs, output } = arg;
    let mut store = TasteStore::default();
    for path in inputs {
        let (videos, comparisons) = store.merge(util::read_store_file(path)?);
        eprintln!(
            "{}: videos +{} ~{}, comparisons +{} ~{}",
            path.display(),
            videos.inserted,
            videos.updated,
            comparisons.inserted,
            comparisons.updated
        );
    }

    eprintln!(
        "Merged {} videos and {} comparisons",
        store.videos().len(),
        store.comparisons().len()
    );
    Output::save_json(&store, output.as_deref())
}
