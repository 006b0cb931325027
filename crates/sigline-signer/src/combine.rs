//! Combiner stage: the only full barrier in the signing pipeline.

use sigline_core::{Inlet, Outlet, Stage, emit};

/// Separator between combined parts
pub const SEPARATOR: &str = "_";

/// Reads every string until the input closes, then emits exactly one string:
/// the parts sorted byte-wise ascending, joined with `_`.
///
/// With no input at all the single emitted string is empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct CombineResults;

/// Sort and join. The result depends only on the multiset of parts.
pub fn combine(mut parts: Vec<String>) -> String {
    parts.sort_unstable();
    parts.join(SEPARATOR)
}

impl Stage for CombineResults {
    fn name(&self) -> &str {
        "combine-results"
    }

    fn run(&self, input: &Inlet, output: &Outlet) {
        let mut parts = Vec::new();
        for item in input.iter() {
            match item.into_text() {
                Ok(s) => parts.push(s),
                Err(e) => log::warn!("combine-results: {e}, dropping item"),
            }
        }

        log::debug!("combine-results: combining {} parts", parts.len());
        if let Err(e) = emit(output, combine(parts)) {
            log::warn!("combine-results: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sigline_core::{Value, conduit, drain, preloaded};

    fn strings(xs: &[&str]) -> Vec<String> {
        xs.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn sorts_bytewise() {
        assert_eq!(combine(strings(&["b", "B", "a", "10", "9"])), "10_9_B_a_b");
    }

    #[test]
    fn permutation_invariant() {
        let a = combine(strings(&["x3", "x1", "x2", "x1"]));
        let b = combine(strings(&["x1", "x2", "x1", "x3"]));
        assert_eq!(a, b);
        assert_eq!(a, "x1_x1_x2_x3");
    }

    #[test]
    fn single_part_has_no_separator() {
        assert_eq!(combine(strings(&["only"])), "only");
    }

    #[test]
    fn empty_input_emits_one_empty_string() {
        let (tx, rx) = conduit();
        CombineResults.run(&preloaded(Vec::<String>::new()), &tx);
        drop(tx);
        assert_eq!(drain(rx), vec![Value::from("")]);
    }

    #[test]
    fn stage_drops_ints() {
        let (tx, rx) = conduit();
        CombineResults.run(
            &preloaded([Value::from("b"), Value::Int(1), Value::from("a")]),
            &tx,
        );
        drop(tx);
        assert_eq!(drain(rx), vec![Value::from("a_b")]);
    }
}
