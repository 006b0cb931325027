//! Pipeline executor: chains stages with conduits and runs one thread per stage.

use std::thread;
use std::time::{Duration, Instant};

use crate::conduit::{Inlet, Outlet, conduit};
use crate::stage::Stage;

/// Ordered list of stages. Conduit `i` is the output of stage `i` and the
/// input of stage `i + 1`.
#[derive(Default)]
pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a stage (builder style)
    pub fn stage(mut self, stage: impl Stage + 'static) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    pub fn push(&mut self, stage: Box<dyn Stage>) {
        self.stages.push(stage);
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Stage names in execution order
    pub fn names(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Run every stage concurrently and block until all of them have returned.
    ///
    /// `input` feeds the first stage; the last stage writes to `output`.
    /// Each stage thread owns its outlet, so the outlet closes when the stage
    /// returns and also when it panics. A panicking stage is logged and
    /// recorded in the report; it is never restarted.
    pub fn execute(&self, input: Inlet, output: Outlet) -> RunReport {
        let start = Instant::now();
        let n = self.stages.len();

        if n == 0 {
            log::debug!("empty pipeline, closing output");
            return RunReport {
                stages: 0,
                panicked: Vec::new(),
                elapsed: start.elapsed(),
            };
        }

        // Wire conduits: inlets[i] feeds stage i, outlets[i] is written by stage i
        let mut inlets = Vec::with_capacity(n);
        let mut outlets = Vec::with_capacity(n);
        inlets.push(input);
        for _ in 1..n {
            let (tx, rx) = conduit();
            outlets.push(tx);
            inlets.push(rx);
        }
        outlets.push(output);

        let mut panicked = Vec::new();

        thread::scope(|s| {
            let mut handles = Vec::with_capacity(n);

            for (idx, ((stage, inlet), outlet)) in
                self.stages.iter().zip(inlets).zip(outlets).enumerate()
            {
                let label = format!("stage-{idx}-{}", stage.name());
                let spawned = thread::Builder::new()
                    .name(label.clone())
                    .spawn_scoped(s, move || run_stage(stage.as_ref(), inlet, outlet));

                match spawned {
                    Ok(handle) => handles.push((label, handle)),
                    Err(e) => {
                        // The closure was dropped with its outlet, so downstream still ends
                        log::error!("{label}: failed to spawn: {e}");
                        panicked.push(label);
                    }
                }
            }

            for (label, handle) in handles {
                if handle.join().is_err() {
                    log::error!("{label}: panicked, output closed");
                    panicked.push(label);
                }
            }
        });

        let report = RunReport {
            stages: n,
            panicked,
            elapsed: start.elapsed(),
        };
        report.log();
        report
    }
}

fn run_stage(stage: &dyn Stage, input: Inlet, output: Outlet) {
    log::debug!("{}: started", stage.name());
    stage.run(&input, &output);
    drop(output);
    log::debug!("{}: finished", stage.name());
}

/// What happened during one [`Pipeline::execute`] call
#[derive(Debug)]
pub struct RunReport {
    pub stages: usize,
    /// Labels of stages that panicked or could not be started
    pub panicked: Vec<String>,
    pub elapsed: Duration,
}

impl RunReport {
    pub fn is_clean(&self) -> bool {
        self.panicked.is_empty()
    }

    pub fn log(&self) {
        log::debug!(
            "pipeline finished: {} stages, {} panicked, {:.1}ms",
            self.stages,
            self.panicked.len(),
            self.elapsed.as_secs_f64() * 1000.0
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conduit::{drain, emit, preloaded};
    use crate::stage::{Feed, FnStage};
    use crate::value::Value;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn add(name: &str, k: i64) -> FnStage<impl Fn(&Inlet, &Outlet) + Send + Sync> {
        FnStage::new(name, move |input: &Inlet, output: &Outlet| {
            for v in input.iter() {
                if let Ok(n) = v.into_int() {
                    let _ = emit(output, n + k);
                }
            }
        })
    }

    #[test]
    fn chains_stages_in_order() {
        let p = Pipeline::new().stage(add("a", 1)).stage(add("b", 10));
        assert_eq!(p.names(), vec!["a", "b"]);

        let (tx, rx) = conduit();
        let report = p.execute(preloaded([1i64, 2, 3]), tx);

        assert!(report.is_clean());
        assert_eq!(report.stages, 2);
        assert_eq!(
            drain(rx),
            vec![Value::Int(12), Value::Int(13), Value::Int(14)]
        );
    }

    #[test]
    fn empty_pipeline_closes_output() {
        let (tx, rx) = conduit();
        let report = Pipeline::new().execute(preloaded([1i64]), tx);
        assert_eq!(report.stages, 0);
        assert!(drain(rx).is_empty());
    }

    #[test]
    fn feed_head_with_closed_input() {
        let p = Pipeline::new().stage(Feed::new([5i64])).stage(add("inc", 1));
        let (tx, rx) = conduit();
        p.execute(preloaded(Vec::<i64>::new()), tx);
        assert_eq!(drain(rx), vec![Value::Int(6)]);
    }

    #[test]
    fn one_thread_per_stage() {
        let running = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let mut p = Pipeline::new();
        for i in 0..4 {
            let running = running.clone();
            let peak = peak.clone();
            p.push(Box::new(FnStage::new(
                format!("s{i}"),
                move |input: &Inlet, output: &Outlet| {
                    let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    for v in input.iter() {
                        let _ = output.send(v);
                    }
                    running.fetch_sub(1, Ordering::SeqCst);
                },
            )));
        }

        // Keep the head open until every stage has started
        let (head_tx, head_rx) = conduit();
        let (tx, rx) = conduit();
        thread::scope(|s| {
            s.spawn(|| {
                while peak.load(Ordering::SeqCst) < 4 {
                    thread::sleep(Duration::from_millis(1));
                }
                let _ = emit(&head_tx, 1i64);
                drop(head_tx);
            });
            p.execute(head_rx, tx);
        });

        assert_eq!(peak.load(Ordering::SeqCst), 4);
        assert_eq!(running.load(Ordering::SeqCst), 0);
        assert_eq!(drain(rx), vec![Value::Int(1)]);
    }

    #[test]
    fn panicking_stage_still_closes_output() {
        let boom = FnStage::new("boom", |input: &Inlet, _output: &Outlet| {
            if input.recv().is_ok() {
                panic!("stage failure");
            }
        });
        let p = Pipeline::new().stage(boom).stage(add("after", 1));

        let (tx, rx) = conduit();
        let report = p.execute(preloaded([1i64, 2]), tx);

        assert_eq!(report.panicked, vec!["stage-0-boom".to_string()]);
        assert!(drain(rx).is_empty());
    }
}
