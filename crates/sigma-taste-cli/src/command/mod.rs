use clap::{Parser, Subcommand};

use self::{
    adversarial::AdversarialArg, analyze::AnalyzeArg, export::ExportArg, match_comparisons::MatchArg,
    merge::MergeArg, paths::PathsArg, rank::RankArg, suggest_pairs::SuggestPairsArg,
};

mod adversarial;
mod analyze;
mod export;
mod match_comparisons;
mod merge;
mod paths;
mod rank;
mod suggest_pairs;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Run the full taste analysis and write the report
    Analyze(#[clap(flatten)] AnalyzeArg),
    /// Condense an analysis report for the fingerprint system
    Export(#[clap(flatten)] ExportArg),
    /// Check which comparisons reference known videos
    Match(#[clap(flatten)] MatchArg),
    /// Rank videos by comparison win rate
    Rank(#[clap(flatten)] RankArg),
    /// List videos whose human rating diverges from the AI estimate
    Adversarial(#[clap(flatten)] AdversarialArg),
    /// Propose the next video pairs to compare
    SuggestPairs(#[clap(flatten)] SuggestPairsArg),
    /// Merge dataset files, later records replacing earlier ones by ID
    Merge(#[clap(flatten)] MergeArg),
    /// List numeric paths found in analysis records
    Paths(#[clap(flatten)] PathsArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Analyze(arg) => analyze::run(&arg)?,
        Mode::Export(arg) => export::run(&arg)?,
        Mode::Match(arg) => match_comparisons::run(&arg)?,
        Mode::Rank(arg) => rank::run(&arg)?,
        Mode::Adversarial(arg) => adversarial::run(&arg)?,
        Mode::SuggestPairs(arg) => suggest_pairs::run(&arg)?,
        Mode::Merge(arg) => merge::run(&arg)?,
        Mode::Paths(arg) => paths::run(&arg)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_command_definition() {
        CommandArgs::command().debug_assert();
    }

    #[test]
    fn test_parse_analyze() {
        let args = CommandArgs::try_parse_from([
            "sigma-taste",
            "analyze",
            "--videos",
            "videos.json",
            "--comparisons",
            "comparisons.json",
            "--dimension",
            "all",
        ])
        .unwrap();
        assert!(matches!(args.mode, Mode::Analyze(_)));
    }
}
