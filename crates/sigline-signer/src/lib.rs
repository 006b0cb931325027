//! Sigline Signer - order-independent composite signature over integers
//!
//! Integers flow through three concurrent stages:
//! [`SingleHash`] → [`MultiHash`] → [`CombineResults`].
//! The first two emit in completion order; the combiner sorts, so the final
//! signature depends only on the multiset of inputs.

pub mod combine;
pub mod config;
pub mod multi_hash;
pub mod primitives;
pub mod single_hash;

use std::sync::Arc;

use anyhow::{Context, Result};
use sigline_core::{Pipeline, SharedPool, build_pool, conduit, preloaded};

// Re-exports for convenience
pub use combine::{CombineResults, combine};
pub use config::Config;
pub use multi_hash::{FAN_OUT, MultiHash, multi_hash};
pub use primitives::{Gated, Md5Crc32, Primitives};
pub use single_hash::{SingleHash, single_hash};

/// The three signing stages, sharing one set of primitives and one pool.
pub fn signer_pipeline(primitives: Arc<dyn Primitives>, pool: SharedPool) -> Pipeline {
    Pipeline::new()
        .stage(SingleHash::new(primitives.clone(), pool.clone()))
        .stage(MultiHash::new(primitives, pool))
        .stage(CombineResults)
}

/// Compute the combined signature of `values`.
///
/// Returns `None` only if the combiner emitted nothing (it panicked).
/// A primitive call that never returns blocks this call forever.
pub fn sign(
    values: &[i64],
    primitives: Arc<dyn Primitives>,
    config: &Config,
) -> Result<Option<String>> {
    let pool = build_pool(config.workers.count).context("Failed to build worker pool")?;
    let pipeline = signer_pipeline(primitives, pool);

    log::info!(
        "Signing {} values with {} workers",
        values.len(),
        config.workers.count
    );

    let (tx, rx) = conduit();
    let report = pipeline.execute(preloaded(values.iter().copied()), tx);
    if !report.is_clean() {
        log::warn!("stages panicked: {}", report.panicked.join(", "));
    }

    // The combiner emits at most once
    Ok(rx.try_recv().ok().and_then(|v| v.into_text().ok()))
}

/// [`sign`] with primitives built from `config`.
pub fn sign_with_config(values: &[i64], config: &Config) -> Result<Option<String>> {
    sign(values, Arc::new(config.primitives()), config)
}
