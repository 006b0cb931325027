//! Expander stage: one integer in, one `c1~c2` string out.

use std::sync::Arc;

use sigline_core::{Inlet, Outlet, SharedPool, Stage, emit};

use crate::primitives::Primitives;

/// For each integer `v`: `checksum(v) + "~" + checksum(digest(v))`.
///
/// Every item gets its own task on the worker pool, so results leave in
/// completion order, not input order.
pub struct SingleHash {
    primitives: Arc<dyn Primitives>,
    pool: SharedPool,
}

impl SingleHash {
    pub fn new(primitives: Arc<dyn Primitives>, pool: SharedPool) -> Self {
        Self { primitives, pool }
    }
}

/// Expand a single value. `c1` always comes from the decimal string and
/// `c2` from its digest, whichever checksum finishes first.
pub fn single_hash(primitives: &dyn Primitives, value: i64) -> String {
    let data = value.to_string();
    let digest = primitives.digest(&data);
    let (c1, c2) = rayon::join(
        || primitives.checksum(&data),
        || primitives.checksum(&digest),
    );
    format!("{c1}~{c2}")
}

impl Stage for SingleHash {
    fn name(&self) -> &str {
        "single-hash"
    }

    fn run(&self, input: &Inlet, output: &Outlet) {
        let primitives: &dyn Primitives = &*self.primitives;

        self.pool.in_place_scope(|s| {
            for item in input.iter() {
                let value = match item.into_int() {
                    Ok(v) => v,
                    Err(e) => {
                        log::warn!("single-hash: {e}, dropping item");
                        continue;
                    }
                };

                s.spawn(move |_| {
                    let line = single_hash(primitives, value);
                    log::trace!("single-hash: {value} -> {line}");
                    if let Err(e) = emit(output, line) {
                        log::warn!("single-hash: {e}, dropping result for {value}");
                    }
                });
            }
        });
    }
}
