//! Conduits: unbounded, ordered, closable channels between adjacent stages.
//!
//! The producer half closes when it is dropped. Readers see closure as the
//! end of iteration over the [`Inlet`].

use std::sync::mpsc::{self, Receiver, Sender};

use crate::error::StageError;
use crate::value::Value;

/// Reading end of a conduit
pub type Inlet = Receiver<Value>;

/// Writing end of a conduit. Dropping every clone closes the conduit.
pub type Outlet = Sender<Value>;

/// Create a fresh, open conduit.
pub fn conduit() -> (Outlet, Inlet) {
    mpsc::channel()
}

/// Create a conduit already holding `values`, already closed.
///
/// An empty iterator gives the closed-immediately input of a pipeline
/// with nothing to process.
pub fn preloaded<I>(values: I) -> Inlet
where
    I: IntoIterator,
    I::Item: Into<Value>,
{
    let (tx, rx) = conduit();
    for v in values {
        // The receiver is alive in this scope, so send cannot fail
        let _ = tx.send(v.into());
    }
    rx
}

/// Send one value downstream.
pub fn emit(outlet: &Outlet, value: impl Into<Value>) -> Result<(), StageError> {
    outlet
        .send(value.into())
        .map_err(|_| StageError::ConduitClosed)
}

/// Drain a closed conduit into a vector (blocks until it is closed).
pub fn drain(inlet: Inlet) -> Vec<Value> {
    inlet.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preloaded_is_closed_and_ordered() {
        let rx = preloaded([3i64, 1, 2]);
        assert_eq!(
            drain(rx),
            vec![Value::Int(3), Value::Int(1), Value::Int(2)]
        );
    }

    #[test]
    fn preloaded_empty() {
        let rx = preloaded(Vec::<i64>::new());
        assert!(drain(rx).is_empty());
    }

    #[test]
    fn emit_after_reader_dropped() {
        let (tx, rx) = conduit();
        drop(rx);
        assert_eq!(emit(&tx, 1i64), Err(StageError::ConduitClosed));
    }

    #[test]
    fn closes_when_outlet_dropped() {
        let (tx, rx) = conduit();
        emit(&tx, "a").unwrap();
        drop(tx);
        assert_eq!(rx.recv().unwrap(), Value::from("a"));
        assert!(rx.recv().is_err());
    }
}
