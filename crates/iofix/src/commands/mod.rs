//! CLI subcommands.

pub mod check;
pub mod fix;

use clap::ValueEnum;
use iofix_rules::MatchStrategy;

/// Matching strategy selector shared by subcommands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    /// Binder-backed receiver resolution (authoritative)
    Semantic,
    /// Textual prefix matching
    Syntactic,
}

impl From<StrategyArg> for MatchStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Semantic => MatchStrategy::Semantic,
            StrategyArg::Syntactic => MatchStrategy::Syntactic,
        }
    }
}
