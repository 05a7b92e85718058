//! `license_resolver`: find out which license(s) a package is released under.
//!
//! # Flow
//! 1. A [`registry::ManifestSource`] returns the package manifest.
//! 2. The [`resolver::Resolver`] walks its [`resolver::Strategy`] order:
//!    manifest license fields, embedded README, then LICENSE/README files on
//!    the source host ([`host::FileHost`]).
//! 3. Each captured text goes through the [`license::pipeline::Pipeline`]:
//!    pattern matcher and alias table for short fields, the naive Bayes
//!    classifier for full license documents.
//!
//! Finding nothing is `Ok(None)`; only collaborator failures are [`Error`]s.

pub mod config;
pub mod error;
pub mod host;
pub mod license;
pub mod models;
pub mod registry;
pub mod resolver;

pub use error::{Error, Result};
pub use models::{Detection, DetectionMethod, LicenseSet, LicenseText};
pub use resolver::{Resolution, Resolver, Strategy};
