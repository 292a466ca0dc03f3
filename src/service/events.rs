use super::*;

use crate::error::AppError;
use crate::models::Peer;

pub(super) fn emit_snapshot(sink: &dyn ReceiveEventSink, snapshot: &TransferProgressDto) {
    if let Err(error) = sink.emit_progress(snapshot) {
        tracing::warn!(
            event = "receive_event_emit_failed",
            event_name = "transfer_progress",
            error = %error
        );
    }
}

impl ReceiveService {
    pub(super) fn emit_progress(&self, snapshot: &TransferProgressDto) {
        emit_snapshot(self.event_sink.as_ref(), snapshot);
    }

    pub(super) fn emit_admission_failed(&self, remote_path: &str, peer: &Peer, error: &AppError) {
        if let Err(emit_error) = self
            .event_sink
            .emit_admission_failed(remote_path, peer, error)
        {
            tracing::warn!(
                event = "receive_event_emit_failed",
                event_name = "admission_failed",
                error = %emit_error
            );
        }
    }
}
