//! Hash primitives consumed by the signing stages.
//!
//! The stages treat both functions as opaque and pure. Concurrency limits of a
//! real primitive are enforced by wrapping it in [`Gated`].

use std::sync::Arc;
use std::time::Duration;

use sigline_core::Gate;

/// Digest and checksum functions, callable from any thread.
pub trait Primitives: Send + Sync {
    /// One-way digest of `data`
    fn digest(&self, data: &str) -> String;

    /// Short checksum of `data`
    fn checksum(&self, data: &str) -> String;
}

impl<P: Primitives + ?Sized> Primitives for Arc<P> {
    fn digest(&self, data: &str) -> String {
        (**self).digest(data)
    }

    fn checksum(&self, data: &str) -> String {
        (**self).checksum(data)
    }
}

impl<P: Primitives + ?Sized> Primitives for Box<P> {
    fn digest(&self, data: &str) -> String {
        (**self).digest(data)
    }

    fn checksum(&self, data: &str) -> String {
        (**self).checksum(data)
    }
}

/// Lowercase hex MD5 digest, decimal IEEE CRC-32 checksum.
#[derive(Debug, Clone, Copy, Default)]
pub struct Md5Crc32;

impl Primitives for Md5Crc32 {
    fn digest(&self, data: &str) -> String {
        format!("{:x}", md5::compute(data.as_bytes()))
    }

    fn checksum(&self, data: &str) -> String {
        crc32fast::hash(data.as_bytes()).to_string()
    }
}

/// Wraps primitives with an admission gate per function and optional
/// simulated latency.
///
/// The latency is spent while holding the permit, so a digest gated to one
/// permit with a 10ms delay admits at most one call per 10ms.
pub struct Gated<P> {
    inner: P,
    digest_gate: Gate,
    checksum_gate: Gate,
    digest_delay: Duration,
    checksum_delay: Duration,
}

impl<P: Primitives> Gated<P> {
    /// Ungated, no latency. Tighten with the builder methods.
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            digest_gate: Gate::unbounded(),
            checksum_gate: Gate::unbounded(),
            digest_delay: Duration::ZERO,
            checksum_delay: Duration::ZERO,
        }
    }

    /// Maximum in-flight digest calls (`None` = unbounded)
    pub fn digest_permits(mut self, permits: Option<usize>) -> Self {
        self.digest_gate = Gate::with_bound(permits);
        self
    }

    /// Maximum in-flight checksum calls (`None` = unbounded)
    pub fn checksum_permits(mut self, permits: Option<usize>) -> Self {
        self.checksum_gate = Gate::with_bound(permits);
        self
    }

    pub fn digest_delay(mut self, delay: Duration) -> Self {
        self.digest_delay = delay;
        self
    }

    pub fn checksum_delay(mut self, delay: Duration) -> Self {
        self.checksum_delay = delay;
        self
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }
}

fn pause(delay: Duration) {
    if !delay.is_zero() {
        std::thread::sleep(delay);
    }
}

impl<P: Primitives> Primitives for Gated<P> {
    fn digest(&self, data: &str) -> String {
        self.digest_gate.run(|| {
            pause(self.digest_delay);
            self.inner.digest(data)
        })
    }

    fn checksum(&self, data: &str) -> String {
        self.checksum_gate.run(|| {
            pause(self.checksum_delay);
            self.inner.checksum(data)
        })
    }
}
