use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use crate::config::ReceiveConfig;
use crate::error::AppResult;
use crate::models::{TransferProgressDto, TransferStatus};
use crate::queue::BlockingQueue;
use crate::registry::TransferRegistry;

mod admission;
mod control;
mod event_sink;
mod events;
mod worker;

pub use admission::{ChunkDecision, OfferDecision, OfferOutcome};
pub use event_sink::{ChannelEventSink, NoopReceiveEventSink, ReceiveEventSink};

use worker::WriterCommand;

const WRITER_THREAD_NAME: &str = "receive-writer";

fn lock_mutex<'a, T>(lock: &'a Mutex<T>, name: &'static str) -> std::sync::MutexGuard<'a, T> {
    match lock.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            tracing::warn!(event = "receive_lock_poisoned", lock = name, access = "mutex");
            poisoned.into_inner()
        }
    }
}

#[derive(Clone)]
pub struct ReceiveService {
    config: ReceiveConfig,
    event_sink: Arc<dyn ReceiveEventSink>,
    registry: Arc<TransferRegistry>,
    queue: BlockingQueue<WriterCommand>,
    worker: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl ReceiveService {
    pub fn new(config: ReceiveConfig, event_sink: Arc<dyn ReceiveEventSink>) -> Self {
        Self {
            config,
            event_sink,
            registry: Arc::new(TransferRegistry::new()),
            queue: BlockingQueue::new(),
            worker: Arc::new(Mutex::new(None)),
        }
    }

    pub fn config(&self) -> &ReceiveConfig {
        &self.config
    }

    pub fn start(&self) -> AppResult<()> {
        self.ensure_worker_started()
    }

    // Stops the writer, then tears down every tracked transfer so no file
    // handle outlives the service.
    pub fn stop(&self) {
        let mut guard = lock_mutex(self.worker.as_ref(), "worker");
        if let Some(handle) = guard.take() {
            self.queue.push(WriterCommand::Shutdown);
            if handle.join().is_err() {
                tracing::warn!(event = "receive_writer_join_failed");
            }
        }
        drop(guard);

        let drained = self.registry.drain();
        let open_transfers = drained.len();
        for mut entry in drained {
            entry.close_handle();
        }
        tracing::info!(event = "receive_service_stopped", open_transfers);
    }

    pub fn progress_of(&self, transfer_id: u8) -> Option<TransferProgressDto> {
        self.registry
            .with_entry(transfer_id, |entry| entry.snapshot())
    }

    pub fn status_of(&self, transfer_id: u8) -> Option<TransferStatus> {
        self.registry.status_of(transfer_id)
    }

    pub fn active_transfers(&self) -> usize {
        self.registry.len()
    }

    pub fn active_transfer_ids(&self) -> Vec<u8> {
        self.registry.active_ids()
    }
}
