use std::fs::File;
use std::path::PathBuf;
use std::time::Instant;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TransferStatus {
    Accepted,
    InProgress,
    Completed,
    CancelledBySender,
    CancelledByReceiver,
    Error,
}

impl TransferStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Completed | Self::CancelledBySender | Self::CancelledByReceiver | Self::Error
        )
    }

    pub fn is_cancelled(self) -> bool {
        matches!(self, Self::CancelledBySender | Self::CancelledByReceiver)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Peer {
    pub host_name: String,
    pub host: String,
    pub port: u16,
}

impl Peer {
    pub fn new(host_name: impl Into<String>, host: impl Into<String>, port: u16) -> Self {
        Self {
            host_name: host_name.into(),
            host: host.into(),
            port,
        }
    }

    // Peer format: <hostname>@<host>:<port>, the hostname part may be omitted.
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = if value.contains('@') {
            value.to_string()
        } else {
            format!("<empty>@{value}")
        };

        let (host_name, address) = normalized.split_once('@')?;
        let (host, port) = address.rsplit_once(':')?;
        if host_name.is_empty() || host.is_empty() {
            return None;
        }
        let port = port.parse::<u16>().ok()?;

        Some(Self::new(host_name, host, port))
    }
}

impl std::fmt::Display for Peer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}:{}", self.host_name, self.host, self.port)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkWorkload {
    pub transfer_id: u8,
    pub offset: u64,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferProgressDto {
    pub transfer_id: u8,
    pub written_bytes: u64,
    pub total_size: u64,
    pub status: TransferStatus,
}

#[derive(Debug)]
pub struct ReceiveFile {
    pub id: u8,
    pub remote_source_path: String,
    pub local_save_path: PathBuf,
    pub total_size: u64,
    pub written_bytes: u64,
    pub status: TransferStatus,
    pub peer: Peer,
    pub handle: Option<File>,
    pub last_activity_at: Instant,
}

impl ReceiveFile {
    pub fn snapshot(&self) -> TransferProgressDto {
        TransferProgressDto {
            transfer_id: self.id,
            written_bytes: self.written_bytes,
            total_size: self.total_size,
            status: self.status,
        }
    }

    pub fn size_representation(&self) -> String {
        format_size(self.total_size)
    }

    pub(crate) fn close_handle(&mut self) {
        self.handle.take();
    }

    pub(crate) fn touch(&mut self) {
        self.last_activity_at = Instant::now();
    }
}

pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} B")
    }
}
