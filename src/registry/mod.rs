//! Package manifest sources.
//!
//! A [`ManifestSource`] returns `Ok(Some(manifest))` when the package exists,
//! `Ok(None)` when the registry does not know it, and `Err` on transport
//! failures or unexpected statuses.

mod manifest;
pub mod npm;

use std::future::Future;

pub use manifest::Manifest;

use crate::error::Result;

pub trait ManifestSource {
    fn get_manifest(&self, name: &str) -> impl Future<Output = Result<Option<Manifest>>> + Send;
}
