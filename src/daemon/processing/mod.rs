use anyhow::Result;
use module::UpdateProcessor;
use tokio::sync::mpsc::Receiver;
use tracing::{debug, error};

use super::storage::snapshot::Snapshot;

pub mod module;
pub mod snapshot_save;

/// Receives snapshot emissions from the tracker and hands them to a
/// processor. Runs until the tracker drops its sender, a single failed write
/// never stops the module.
pub struct ProcessingModule<Processor> {
    receiver: Receiver<Snapshot>,
    processor: Processor,
}

impl<P: UpdateProcessor> ProcessingModule<P> {
    pub fn new(receiver: Receiver<Snapshot>, processor: P) -> Self {
        Self {
            receiver,
            processor,
        }
    }

    pub async fn run(mut self) -> Result<()> {
        while let Some(snapshot) = self.receiver.recv().await {
            debug!("Persisting a snapshot");
            if let Err(e) = self.processor.process_next(snapshot).await {
                error!("Error persisting a snapshot: {e:?}");
            }
        }

        let result = self.processor.finalize().await;
        self.receiver.close();
        result
    }
}
