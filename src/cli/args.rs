use clap::Parser;
use std::path::PathBuf;

use crate::config::FieldGranularity;
use crate::reporting::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "lcom", version, about = "LCOM4 cohesion analysis over a symbol model")]
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Symbol model to analyze (JSON batch)
    #[arg(value_name = "MODEL")]
    pub model: PathBuf,
    /// Read options from this file instead of ./lcom.toml
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
    /// Ignore accesses made through views of the receiver
    #[arg(long)]
    pub no_alias_tracking: bool,
    /// Let calls to other types link their callers
    #[arg(long)]
    pub no_filter_external: bool,
    /// Do not treat wrapped results as accesses of their sources
    #[arg(long)]
    pub no_unify: bool,
    #[arg(long, value_enum)]
    pub granularity: Option<GranularityArg>,
    /// Worker threads, 0 for one per core
    #[arg(long)]
    pub workers: Option<usize>,
    /// Extra type-name regex to skip (repeatable)
    #[arg(long, value_name = "REGEX")]
    pub exclude: Vec<String>,
    #[arg(long, short)]
    pub verbose: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum GranularityArg {
    Root,
    Leaf,
}

impl From<GranularityArg> for FieldGranularity {
    fn from(arg: GranularityArg) -> Self {
        match arg {
            GranularityArg::Root => Self::Root,
            GranularityArg::Leaf => Self::Leaf,
        }
    }
}
