//! `license-resolver`: resolve package licenses from the command line.
//!
//! # Flow
//! 1. Parse CLI arguments ([`cli`]).
//! 2. Load config ([`load_config`]) and train the classifier.
//! 3. Resolve registry packages concurrently, then local manifests and files.
//! 4. Render the requested report ([`report`]).
//! 5. Exit `0`, or `1` when at least one lookup failed. Unresolved packages
//!    are reported but do not fail the run.

mod cli;
mod report;

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use futures::future::join_all;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use cli::{Cli, ReportFormat};
use license_resolver::config::{load_config, Config};
use license_resolver::host::github::GithubHost;
use license_resolver::host::FileHost;
use license_resolver::license::classifier;
use license_resolver::license::pipeline::Pipeline;
use license_resolver::models::LicenseText;
use license_resolver::registry::npm::NpmRegistry;
use license_resolver::registry::{Manifest, ManifestSource};
use license_resolver::resolver::{Resolution, Resolver, Strategy};
use report::{Entry, Outcome};

const BATCH_SIZE: usize = 25;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if !cli.has_inputs() {
        eprintln!("Nothing to resolve: pass package names, --manifest or --file");
        std::process::exit(2);
    }

    let cwd = std::env::current_dir()?;
    let config = load_config(&cwd, cli.config.as_deref())?;
    let order = cli.order.clone().unwrap_or_else(|| config.order.clone());

    let classifier = classifier::init(config.classifier.window);
    let pipeline = Pipeline::new(classifier, config.aliases())
        .with_min_confidence(config.classifier.min_confidence);

    let resolver = build_resolver(&config, pipeline)?
        .with_order(order)
        .with_host_name(&config.host.name);

    let mut entries = resolve_packages(&resolver, &cli.packages, cli.quiet).await;

    for path in &cli.manifest {
        entries.push(resolve_manifest_file(&resolver, path).await);
    }
    for path in &cli.file {
        entries.push(resolve_license_file(resolver.pipeline(), path));
    }

    match cli.report {
        ReportFormat::Terminal => report::terminal::render(&entries, cli.verbose, cli.quiet),
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&entries)?),
    }

    if entries.iter().any(Entry::is_failed) {
        std::process::exit(1);
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "warn,license_resolver=debug"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn build_resolver<'a>(
    config: &Config,
    pipeline: Pipeline<'a>,
) -> Result<Resolver<'a, NpmRegistry, GithubHost>> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.registry.timeout_secs))
        .user_agent(concat!("license-resolver/", env!("CARGO_PKG_VERSION")))
        .build()?;

    let registry = NpmRegistry::new(client, &config.registry.url);
    let host = GithubHost::new(&config.host)?;

    Ok(Resolver::new(pipeline, registry, host))
}

async fn resolve_packages<M, H>(
    resolver: &Resolver<'_, M, H>,
    packages: &[String],
    quiet: bool,
) -> Vec<Entry>
where
    M: ManifestSource,
    H: FileHost,
{
    let pb = if !quiet && packages.len() > 1 {
        let pb = ProgressBar::new(packages.len() as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .map(|style| style.progress_chars("#>-"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        pb.set_style(style);
        Some(pb)
    } else {
        None
    };

    let mut entries = Vec::with_capacity(packages.len());

    for batch in packages.chunks(BATCH_SIZE) {
        let futures: Vec<_> = batch
            .iter()
            .map(|name| resolver.resolve_package(name))
            .collect();

        let results = join_all(futures).await;

        for (name, result) in batch.iter().zip(results) {
            let outcome = match result {
                Ok(Some(resolution)) => Outcome::Resolved(resolution),
                Ok(None) => Outcome::Unresolved,
                Err(e) => {
                    tracing::warn!(package = %name, error = %e, "license lookup failed");
                    Outcome::Failed {
                        error: e.to_string(),
                    }
                }
            };
            entries.push(Entry::new(name, outcome));

            if let Some(pb) = &pb {
                pb.inc(1);
            }
        }
    }

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    entries
}

async fn resolve_manifest_file<M, H>(resolver: &Resolver<'_, M, H>, path: &Path) -> Entry
where
    M: ManifestSource,
    H: FileHost,
{
    let subject = path.display().to_string();

    let manifest = match Manifest::from_path(path) {
        Ok(manifest) => manifest,
        Err(e) => {
            return Entry::new(
                subject,
                Outcome::Failed {
                    error: format!("{:#}", e.context("failed to read manifest")),
                },
            )
        }
    };
    let subject = manifest.name().map(str::to_string).unwrap_or(subject);

    let outcome = match resolver.resolve_manifest(&manifest).await {
        Ok(Some(resolution)) => Outcome::Resolved(resolution),
        Ok(None) => Outcome::Unresolved,
        Err(e) => Outcome::Failed {
            error: e.to_string(),
        },
    };
    Entry::new(subject, outcome)
}

fn resolve_license_file(pipeline: &Pipeline<'_>, path: &Path) -> Entry {
    let subject = path.display().to_string();

    let content = match std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))
    {
        Ok(content) => content,
        Err(e) => {
            return Entry::new(
                subject,
                Outcome::Failed {
                    error: format!("{:#}", e),
                },
            )
        }
    };

    let origin = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| subject.clone());
    let text = LicenseText::file_content(content, Some(origin.clone()));

    let outcome = match pipeline.resolve(&text) {
        Some(detection) => {
            Outcome::Resolved(Resolution::new(detection, Strategy::Content, origin))
        }
        None => Outcome::Unresolved,
    };
    Entry::new(subject, outcome)
}
