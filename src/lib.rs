pub mod config;
pub mod error;
pub mod models;
pub mod paths;
pub mod queue;
pub mod registry;
pub mod reserve;
pub mod service;

pub use config::ReceiveConfig;
pub use error::{AppError, AppResult};
pub use models::{
    ChunkWorkload, Peer, ReceiveFile, TransferProgressDto, TransferStatus, format_size,
};
pub use service::{
    ChannelEventSink, ChunkDecision, NoopReceiveEventSink, OfferDecision, OfferOutcome,
    ReceiveEventSink, ReceiveService,
};
