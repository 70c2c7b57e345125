//! Ordered collection of native handler stages.

use std::fmt;
use std::sync::Arc;

use crate::engine::{NativeHandler, NativeRequest, NativeResponse};
use crate::BoxError;

/// Invokes every stage in order, like a container's handler collection.
///
/// Stages decide for themselves whether to act on a request that an earlier
/// stage already handled. The first error stops the chain.
#[derive(Clone, Default)]
pub struct HandlerChain {
    stages: Vec<Arc<dyn NativeHandler>>,
}

impl HandlerChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stage(mut self, stage: Arc<dyn NativeHandler>) -> Self {
        self.stages.push(stage);
        self
    }

    pub fn push(&mut self, stage: Arc<dyn NativeHandler>) {
        self.stages.push(stage);
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

impl NativeHandler for HandlerChain {
    fn handle(
        &self,
        target: &str,
        request: &mut NativeRequest,
        response: &mut NativeResponse,
    ) -> Result<(), BoxError> {
        for stage in &self.stages {
            stage.handle(target, request, response)?;
        }
        Ok(())
    }
}

impl fmt::Display for HandlerChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, stage) in self.stages.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", stage)?;
        }
        write!(f, "]")
    }
}
