//! Training lifecycle hooks
//!
//! The training loop itself belongs to the consuming framework; this module
//! only defines the six observation points it drives and a stdout
//! implementation. All methods have default no-op bodies, so an
//! implementation overrides just the events it cares about.

/// Per-event scalar logs handed to hooks by the training loop
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Logs {
    /// Loss for the finished epoch or batch, when the loop computed one
    pub loss: Option<f32>,
}

impl Logs {
    /// Logs carrying a loss value
    #[must_use]
    pub fn with_loss(loss: f32) -> Self {
        Self { loss: Some(loss) }
    }
}

/// The six training lifecycle events, in driving order: train begin, then
/// per epoch (epoch begin, per batch begin/end, epoch end), then train end.
/// Epoch and batch indices are 0-based.
pub trait TrainingHooks: Send {
    /// Called once before the first epoch
    fn on_train_begin(&mut self) {}

    /// Called once after the last epoch
    fn on_train_end(&mut self) {}

    /// Called before each epoch
    fn on_epoch_begin(&mut self, _epoch: usize) {}

    /// Called after each epoch
    fn on_epoch_end(&mut self, _epoch: usize, _logs: &Logs) {}

    /// Called before each batch
    fn on_batch_begin(&mut self, _batch: usize) {}

    /// Called after each batch
    fn on_batch_end(&mut self, _batch: usize, _logs: &Logs) {}

    /// Implementation name, for diagnostics
    fn name(&self) -> &'static str {
        "TrainingHooks"
    }
}

/// Hooks that print one status line per event
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutHooks;

impl TrainingHooks for StdoutHooks {
    fn on_train_begin(&mut self) {
        println!("Training started");
    }

    fn on_train_end(&mut self) {
        println!("Training finished");
    }

    fn on_epoch_begin(&mut self, epoch: usize) {
        println!("Epoch {epoch} starting");
    }

    fn on_epoch_end(&mut self, epoch: usize, logs: &Logs) {
        let loss = logs
            .loss
            .map(|l| format!(", loss: {l:.4}"))
            .unwrap_or_default();
        println!("Epoch {epoch} done{loss}");
    }

    fn on_batch_begin(&mut self, batch: usize) {
        println!("  Batch {batch} starting");
    }

    fn on_batch_end(&mut self, batch: usize, _logs: &Logs) {
        println!("  Batch {batch} done");
    }

    fn name(&self) -> &'static str {
        "StdoutHooks"
    }
}
