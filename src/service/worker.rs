use super::*;

use crate::error::{AppError, AppResult};
use crate::models::{ChunkWorkload, ReceiveFile, TransferProgressDto, TransferStatus};
use std::io::{Seek, SeekFrom, Write};

#[derive(Debug)]
pub(super) enum WriterCommand {
    Chunk(ChunkWorkload),
    Shutdown,
}

enum ChunkOutcome {
    CancelledCleanup,
    Discarded,
    Progress(TransferProgressDto),
}

impl ReceiveService {
    pub(super) fn ensure_worker_started(&self) -> AppResult<()> {
        let mut guard = lock_mutex(self.worker.as_ref(), "worker");
        if let Some(handle) = guard.as_ref() {
            if !handle.is_finished() {
                return Ok(());
            }
        }

        let queue = self.queue.clone();
        let registry = self.registry.clone();
        let sink = self.event_sink.clone();
        let handle = std::thread::Builder::new()
            .name(WRITER_THREAD_NAME.to_string())
            .spawn(move || run_writer_loop(&queue, registry.as_ref(), sink.as_ref()))
            .map_err(|error| {
                AppError::new("receive_worker_spawn_failed", "启动写入线程失败")
                    .with_detail(error.to_string())
            })?;
        *guard = Some(handle);
        Ok(())
    }
}

fn run_writer_loop(
    queue: &BlockingQueue<WriterCommand>,
    registry: &TransferRegistry,
    sink: &dyn ReceiveEventSink,
) {
    tracing::debug!(event = "receive_writer_started");
    loop {
        match queue.pop() {
            Some(WriterCommand::Chunk(workload)) => {
                if let Some(snapshot) = handle_single_workload(registry, workload) {
                    events::emit_snapshot(sink, &snapshot);
                }
            }
            Some(WriterCommand::Shutdown) | None => break,
        }
    }
    tracing::debug!(event = "receive_writer_stopped");
}

// One dequeued chunk, one registry entry. Every failure is contained to the
// addressed transfer; the loop itself must never die on bad input.
fn handle_single_workload(
    registry: &TransferRegistry,
    workload: ChunkWorkload,
) -> Option<TransferProgressDto> {
    let ChunkWorkload {
        transfer_id,
        offset,
        data,
    } = workload;

    let outcome = registry.with_entry(transfer_id, |entry| {
        apply_chunk(entry, offset, data.as_slice())
    });
    let Some(outcome) = outcome else {
        // Already forgotten (post-cancel cleanup or sender/receiver desync).
        tracing::debug!(event = "receive_chunk_dropped_unknown", transfer_id);
        return None;
    };

    match outcome {
        ChunkOutcome::CancelledCleanup => {
            registry.remove(transfer_id);
            tracing::debug!(event = "receive_transfer_cleaned_up", transfer_id);
            None
        }
        ChunkOutcome::Discarded => None,
        ChunkOutcome::Progress(snapshot) => Some(snapshot),
    }
}

fn apply_chunk(entry: &mut ReceiveFile, offset: u64, data: &[u8]) -> ChunkOutcome {
    // Cancellation wins before any write: the handle may already be doomed.
    if entry.status.is_cancelled() {
        entry.close_handle();
        return ChunkOutcome::CancelledCleanup;
    }
    if entry.status == TransferStatus::Error {
        return ChunkOutcome::Discarded;
    }
    if entry.status == TransferStatus::Completed {
        tracing::warn!(
            event = "receive_chunk_after_completion",
            transfer_id = entry.id
        );
        entry.status = TransferStatus::Error;
        entry.touch();
        return ChunkOutcome::Progress(entry.snapshot());
    }

    let length = data.len() as u64;
    let in_bounds = offset
        .checked_add(length)
        .is_some_and(|end| end <= entry.total_size);
    if !in_bounds || entry.written_bytes.saturating_add(length) > entry.total_size {
        // Duplicate or overlapping delivery is a transport bug; surface it
        // instead of clamping the counter.
        tracing::warn!(
            event = "receive_chunk_out_of_bounds",
            transfer_id = entry.id,
            offset,
            length,
            written_bytes = entry.written_bytes,
            total_size = entry.total_size
        );
        entry.status = TransferStatus::Error;
        entry.close_handle();
        entry.touch();
        return ChunkOutcome::Progress(entry.snapshot());
    }

    let Some(handle) = entry.handle.as_mut() else {
        tracing::warn!(event = "receive_handle_missing", transfer_id = entry.id);
        entry.status = TransferStatus::Error;
        entry.touch();
        return ChunkOutcome::Progress(entry.snapshot());
    };
    let written = handle
        .seek(SeekFrom::Start(offset))
        .and_then(|_| handle.write_all(data));
    if let Err(error) = written {
        tracing::warn!(
            event = "receive_chunk_write_failed",
            transfer_id = entry.id,
            offset,
            length,
            error = %error
        );
        entry.status = TransferStatus::Error;
        entry.close_handle();
        entry.touch();
        return ChunkOutcome::Progress(entry.snapshot());
    }

    entry.written_bytes += length;
    entry.touch();
    if entry.written_bytes == entry.total_size {
        entry.status = TransferStatus::Completed;
        entry.close_handle();
        tracing::info!(
            event = "receive_transfer_completed",
            transfer_id = entry.id,
            total_size = entry.total_size,
            path = %entry.local_save_path.display()
        );
    } else {
        entry.status = TransferStatus::InProgress;
    }
    ChunkOutcome::Progress(entry.snapshot())
}
