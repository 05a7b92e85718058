use std::path::PathBuf;

use clap::Parser;

use license_resolver::resolver::Strategy;

#[derive(Parser, Debug)]
#[command(
    name = "license-resolver",
    about = "Resolve the licenses of npm packages from manifests, READMEs and repository files",
    version
)]
pub struct Cli {
    /// Package names to look up in the registry
    #[arg(value_name = "PACKAGE")]
    pub packages: Vec<String>,

    /// Local package.json to resolve (repeatable)
    #[arg(long, value_name = "FILE")]
    pub manifest: Vec<PathBuf>,

    /// Local LICENSE or README file to run through the detection pipeline (repeatable)
    #[arg(long, value_name = "FILE")]
    pub file: Vec<PathBuf>,

    /// Strategy order, overriding the config file
    #[arg(long, value_delimiter = ',', value_name = "STRATEGIES")]
    pub order: Option<Vec<Strategy>>,

    /// Config file [default: ./.license-resolver/config.toml, fallback ~/.config/license-resolver/config.toml]
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Report format
    #[arg(long, default_value = "terminal", value_name = "FORMAT")]
    pub report: ReportFormat,

    /// Debug logging and origin/confidence columns
    #[arg(short, long)]
    pub verbose: bool,

    /// Only print summary line
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum ReportFormat {
    Terminal,
    Json,
}

impl Cli {
    pub fn has_inputs(&self) -> bool {
        !(self.packages.is_empty() && self.manifest.is_empty() && self.file.is_empty())
    }
}
