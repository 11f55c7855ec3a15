//! Training-run description
//!
//! Assembling a network and driving its training are different crates'
//! jobs; the seam between them is [`FitArgs`], a plain description of one
//! run that the training side consumes together with a network.

mod hooks;

pub use hooks::{Logs, StdoutHooks, TrainingHooks};

use std::fmt;

/// Everything one training run needs besides the network itself
pub struct FitArgs {
    /// Samples per gradient step
    pub batch_size: usize,
    /// Full passes over the training data
    pub epochs: usize,
    /// Lifecycle observers the training loop drives
    pub hooks: Box<dyn TrainingHooks>,
}

impl FitArgs {
    /// Replace the lifecycle hooks
    #[must_use]
    pub fn with_hooks(mut self, hooks: Box<dyn TrainingHooks>) -> Self {
        self.hooks = hooks;
        self
    }
}

impl fmt::Debug for FitArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FitArgs")
            .field("batch_size", &self.batch_size)
            .field("epochs", &self.epochs)
            .field("hooks", &self.hooks.name())
            .finish()
    }
}

/// Describe a training run: the given batch size and epoch count, with
/// [`StdoutHooks`] reporting progress.
#[must_use]
pub fn fit_args(batch_size: usize, epochs: usize) -> FitArgs {
    FitArgs {
        batch_size,
        epochs,
        hooks: Box::new(StdoutHooks),
    }
}
