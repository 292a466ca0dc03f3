use crossbeam_channel::{Receiver, Sender, unbounded};

use crate::error::{AppError, AppResult};
use crate::models::{Peer, TransferProgressDto};

pub trait ReceiveEventSink: Send + Sync {
    fn emit_progress(&self, snapshot: &TransferProgressDto) -> AppResult<()>;

    fn emit_admission_failed(
        &self,
        remote_path: &str,
        peer: &Peer,
        error: &AppError,
    ) -> AppResult<()>;
}

pub struct NoopReceiveEventSink;

impl ReceiveEventSink for NoopReceiveEventSink {
    fn emit_progress(&self, _snapshot: &TransferProgressDto) -> AppResult<()> {
        Ok(())
    }

    fn emit_admission_failed(
        &self,
        _remote_path: &str,
        _peer: &Peer,
        _error: &AppError,
    ) -> AppResult<()> {
        Ok(())
    }
}

// One typed channel of progress snapshots instead of per-event callback maps.
pub struct ChannelEventSink {
    tx: Sender<TransferProgressDto>,
}

impl ChannelEventSink {
    pub fn new() -> (Self, Receiver<TransferProgressDto>) {
        let (tx, rx) = unbounded();
        (Self { tx }, rx)
    }
}

impl ReceiveEventSink for ChannelEventSink {
    fn emit_progress(&self, snapshot: &TransferProgressDto) -> AppResult<()> {
        self.tx
            .send(*snapshot)
            .map_err(|_| AppError::new("receive_event_channel_closed", "进度事件通道已关闭"))
    }

    fn emit_admission_failed(
        &self,
        _remote_path: &str,
        _peer: &Peer,
        _error: &AppError,
    ) -> AppResult<()> {
        Ok(())
    }
}
