//! Compilation stages and the chains built from them
//!
//! A stage is anything implementing [`Runnable`]. [`Transform::then`] appends a stage to a
//! chain, so a mismatched stage order is a type error:
//!
//! ```rust,ignore
//! let to_source = Transform::from_fn(Ok)
//!     .then(Assembling::default())
//!     .then(Lowering::new())
//!     .then(Generation::new());
//! ```
//!
//! [`stages`] holds the stages, [`standard`] the chains the loader uses.

pub mod stages;
pub mod standard;

use thiserror::Error;

/// A stage refused its input.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{stage} stage failed: {message}")]
pub struct TransformError {
    pub stage: &'static str,
    pub message: String,
}

pub trait Runnable<I, O> {
    fn run(&self, input: I) -> Result<O, TransformError>;
}

type StepFn<I, O> = Box<dyn Fn(I) -> Result<O, TransformError> + Send + Sync>;

/// A chain of stages from `I` to `O`, shareable across threads.
pub struct Transform<I, O> {
    step: StepFn<I, O>,
}

impl<I: 'static, O: 'static> Transform<I, O> {
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(I) -> Result<O, TransformError> + Send + Sync + 'static,
    {
        Transform { step: Box::new(f) }
    }

    pub fn then<N: 'static, S>(self, stage: S) -> Transform<I, N>
    where
        S: Runnable<O, N> + Send + Sync + 'static,
    {
        let head = self.step;
        Transform::from_fn(move |input| stage.run(head(input)?))
    }

    pub fn run(&self, input: I) -> Result<O, TransformError> {
        (self.step)(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::haml::ast::Node;

    struct CountNodes;
    impl Runnable<Vec<Node>, usize> for CountNodes {
        fn run(&self, input: Vec<Node>) -> Result<usize, TransformError> {
            Ok(input.len())
        }
    }

    struct Reject;
    impl Runnable<usize, usize> for Reject {
        fn run(&self, _input: usize) -> Result<usize, TransformError> {
            Err(TransformError {
                stage: "Reject",
                message: "rejected".to_string(),
            })
        }
    }

    #[test]
    fn test_type_changing_chain() {
        let transform = Transform::from_fn(|s: String| Ok(crate::haml::parsing::parse(&s)))
            .then(CountNodes);
        assert_eq!(transform.run("%a\n%b\n  %c".to_string()).unwrap(), 2);
    }

    #[test]
    fn test_failure_stops_the_chain() {
        let transform = Transform::from_fn(|n: usize| Ok(n + 1))
            .then(Reject)
            .then(Reject);
        let error = transform.run(1).unwrap_err();
        assert_eq!(error.stage, "Reject");
        assert_eq!(error.to_string(), "Reject stage failed: rejected");
    }
}
