//! Stage trait and small generic stages

use crate::conduit::{Inlet, Outlet, emit};
use crate::value::Value;

/// One step of a pipeline.
///
/// `run` reads `input` until it is closed and exhausted, writes zero or more
/// values to `output`, then returns. Returning signals completion: the
/// executor closes `output` right after, which ends the next stage's input.
///
/// Stages report nothing back. Per-item problems are handled inside the
/// stage (log and drop the item), and the stage must still return.
pub trait Stage: Send + Sync {
    /// Name used for the stage thread and in logs
    fn name(&self) -> &str;

    fn run(&self, input: &Inlet, output: &Outlet);
}

/// Stage that ignores its input and emits a fixed list of values.
///
/// Useful as the head of a pipeline whose input conduit is closed from
/// the start.
pub struct Feed {
    values: Vec<Value>,
}

impl Feed {
    pub fn new<I>(values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        Self {
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}

impl Stage for Feed {
    fn name(&self) -> &str {
        "feed"
    }

    fn run(&self, _input: &Inlet, output: &Outlet) {
        for v in &self.values {
            if let Err(e) = emit(output, v.clone()) {
                log::warn!("feed: {e}, stopping");
                return;
            }
        }
    }
}

/// Stage built from a closure, for ad-hoc wiring and tests.
pub struct FnStage<F> {
    name: String,
    body: F,
}

impl<F> FnStage<F>
where
    F: Fn(&Inlet, &Outlet) + Send + Sync,
{
    pub fn new(name: impl Into<String>, body: F) -> Self {
        Self {
            name: name.into(),
            body,
        }
    }
}

impl<F> Stage for FnStage<F>
where
    F: Fn(&Inlet, &Outlet) + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&self, input: &Inlet, output: &Outlet) {
        (self.body)(input, output)
    }
}
