//! Multiplier stage: expands each string into six positional checksums.

use std::sync::{Arc, Mutex};

use sigline_core::{Inlet, Outlet, SharedPool, Stage, emit};

use crate::primitives::Primitives;

/// Number of checksums computed per item
pub const FAN_OUT: usize = 6;

/// For each string `s`: concatenation of `checksum(th + s)` for `th` in `0..6`.
pub struct MultiHash {
    primitives: Arc<dyn Primitives>,
    pool: SharedPool,
}

impl MultiHash {
    pub fn new(primitives: Arc<dyn Primitives>, pool: SharedPool) -> Self {
        Self { primitives, pool }
    }
}

/// Expand a single string.
///
/// The six checksums run in parallel and land in a buffer private to this
/// item, one lock per item. Output follows slot index, never completion order.
pub fn multi_hash(primitives: &dyn Primitives, data: &str) -> String {
    let slots: Mutex<[String; FAN_OUT]> = Mutex::new(Default::default());

    rayon::scope(|s| {
        for th in 0..FAN_OUT {
            let slots = &slots;
            s.spawn(move |_| {
                let hash = primitives.checksum(&format!("{th}{data}"));
                slots.lock().expect("multi-hash slot writer panicked")[th] = hash;
            });
        }
    });

    slots
        .into_inner()
        .expect("multi-hash slot writer panicked")
        .concat()
}

impl Stage for MultiHash {
    fn name(&self) -> &str {
        "multi-hash"
    }

    fn run(&self, input: &Inlet, output: &Outlet) {
        let primitives: &dyn Primitives = &*self.primitives;

        self.pool.in_place_scope(|s| {
            for item in input.iter() {
                let data = match item.into_text() {
                    Ok(d) => d,
                    Err(e) => {
                        log::warn!("multi-hash: {e}, dropping item");
                        continue;
                    }
                };

                s.spawn(move |_| {
                    let line = multi_hash(primitives, &data);
                    log::trace!("multi-hash: {data} -> {line}");
                    if let Err(e) = emit(output, line) {
                        log::warn!("multi-hash: {e}, dropping result for {data}");
                    }
                });
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::Md5Crc32;
    use sigline_core::{Value, build_pool, conduit, drain, preloaded};
    use std::time::Duration;

    #[test]
    fn known_value() {
        assert_eq!(
            multi_hash(&Md5Crc32, "4108050209~502633748"),
            "29568666068035183841425683795340791879727309630931025356555"
        );
    }

    /// Checksum that tags its output with the slot prefix and finishes
    /// slot 0 last, slot 5 first.
    struct Reversed;

    impl Primitives for Reversed {
        fn digest(&self, data: &str) -> String {
            data.to_string()
        }

        fn checksum(&self, data: &str) -> String {
            let th: u64 = data[..1].parse().unwrap();
            std::thread::sleep(Duration::from_millis((FAN_OUT as u64 - th) * 10));
            format!("[{th}]")
        }
    }

    #[test]
    fn slot_order_not_completion_order() {
        let pool = build_pool(FAN_OUT).unwrap();
        let out = pool.install(|| multi_hash(&Reversed, "x"));
        assert_eq!(out, "[0][1][2][3][4][5]");
    }

    #[test]
    fn stage_drops_int_items() {
        let stage = MultiHash::new(Arc::new(Reversed), build_pool(2).unwrap());
        let (tx, rx) = conduit();
        stage.run(&preloaded([Value::Int(3), Value::from("a")]), &tx);
        drop(tx);
        assert_eq!(drain(rx), vec![Value::from("[0][1][2][3][4][5]")]);
    }
}
