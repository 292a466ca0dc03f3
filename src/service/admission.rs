use super::*;

use crate::error::AppResult;
use crate::models::{ChunkWorkload, Peer, ReceiveFile};
use crate::paths::file_name_of;
use crate::reserve::reserve_space;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfferDecision {
    Accept,
    Decline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfferOutcome {
    Accepted { transfer_id: u8 },
    Declined,
}

impl OfferOutcome {
    pub fn is_accepted(self) -> bool {
        matches!(self, Self::Accepted { .. })
    }

    pub fn transfer_id(self) -> Option<u8> {
        match self {
            Self::Accepted { transfer_id } => Some(transfer_id),
            Self::Declined => None,
        }
    }
}

// Returned synchronously to the transport callback: Interrupt tells it to
// close the chunk stream instead of burning bandwidth on a dead transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkDecision {
    Continue,
    Interrupt,
}

impl ChunkDecision {
    pub fn should_interrupt(self) -> bool {
        matches!(self, Self::Interrupt)
    }
}

impl ReceiveService {
    pub fn handle_offer(
        &self,
        declared_size: u64,
        remote_path: &str,
        peer: Peer,
        decision: OfferDecision,
    ) -> OfferOutcome {
        if decision == OfferDecision::Decline {
            tracing::info!(
                event = "receive_offer_declined",
                remote_path,
                peer = %peer,
                declared_size
            );
            return OfferOutcome::Declined;
        }

        match self.admit(declared_size, remote_path, &peer) {
            Ok(transfer_id) => OfferOutcome::Accepted { transfer_id },
            Err(error) => {
                // Local setup failed after the user said yes: answer the
                // sender as rejected rather than accept and not be ready.
                tracing::error!(
                    event = "receive_admission_failed",
                    remote_path,
                    peer = %peer,
                    code = error.code.as_str(),
                    detail = error.detail.as_deref().unwrap_or_default()
                );
                self.emit_admission_failed(remote_path, &peer, &error);
                OfferOutcome::Declined
            }
        }
    }

    fn admit(&self, declared_size: u64, remote_path: &str, peer: &Peer) -> AppResult<u8> {
        let file_name = file_name_of(remote_path);
        let local_save_path = self.config.transfers_dir.join(file_name);

        let handle = reserve_space(local_save_path.as_path(), declared_size)?;
        let transfer_id = self.registry.register(|id| ReceiveFile {
            id,
            remote_source_path: remote_path.to_string(),
            local_save_path: local_save_path.clone(),
            total_size: declared_size,
            written_bytes: 0,
            status: TransferStatus::Accepted,
            peer: peer.clone(),
            handle: Some(handle),
            last_activity_at: Instant::now(),
        })?;
        self.ensure_worker_started()?;

        tracing::info!(
            event = "receive_offer_accepted",
            transfer_id,
            declared_size,
            path = %local_save_path.display(),
            peer = %peer
        );
        self.emit_progress(&TransferProgressDto {
            transfer_id,
            written_bytes: 0,
            total_size: declared_size,
            status: TransferStatus::Accepted,
        });
        Ok(transfer_id)
    }

    pub fn submit_chunk(&self, transfer_id: u8, offset: u64, data: Vec<u8>) -> ChunkDecision {
        match self.registry.status_of(transfer_id) {
            None => {
                tracing::debug!(event = "receive_chunk_unknown_transfer", transfer_id);
                ChunkDecision::Interrupt
            }
            Some(status) if status.is_terminal() => {
                tracing::debug!(
                    event = "receive_chunk_for_terminal_transfer",
                    transfer_id,
                    status = ?status
                );
                ChunkDecision::Interrupt
            }
            Some(_) => {
                self.queue.push(WriterCommand::Chunk(ChunkWorkload {
                    transfer_id,
                    offset,
                    data,
                }));
                ChunkDecision::Continue
            }
        }
    }
}
