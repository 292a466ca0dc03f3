use super::*;

use std::time::Duration;

impl ReceiveService {
    // Advisory: the writer observes the flag on the next chunk it handles
    // for this identifier. Returns whether a live transfer was marked.
    pub fn cancel_by_receiver(&self, transfer_id: u8) -> bool {
        self.mark_cancelled(transfer_id, TransferStatus::CancelledByReceiver)
    }

    pub fn mark_cancelled_by_sender(&self, transfer_id: u8) -> bool {
        self.mark_cancelled(transfer_id, TransferStatus::CancelledBySender)
    }

    fn mark_cancelled(&self, transfer_id: u8, target: TransferStatus) -> bool {
        let snapshot = self
            .registry
            .with_entry(transfer_id, |entry| {
                if entry.status.is_terminal() {
                    return None;
                }
                entry.status = target;
                entry.touch();
                Some(entry.snapshot())
            })
            .flatten();

        match snapshot {
            Some(snapshot) => {
                tracing::info!(
                    event = "receive_transfer_cancelled",
                    transfer_id,
                    status = ?target
                );
                self.emit_progress(&snapshot);
                true
            }
            None => {
                tracing::debug!(event = "receive_cancel_ignored", transfer_id);
                false
            }
        }
    }

    // Cancelled transfers whose sender never speaks again would otherwise
    // park in the registry forever. Callers run this on their own cadence.
    pub fn reap_stale(&self, ttl: Duration) -> usize {
        let reaped = self.registry.reap_terminal_older_than(ttl);
        if !reaped.is_empty() {
            tracing::info!(
                event = "receive_stale_transfers_reaped",
                count = reaped.len(),
                transfer_ids = ?reaped
            );
        }
        reaped.len()
    }
}
