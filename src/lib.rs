//! Client-side core of a content-summarization service: an HTTP adapter
//! for the analyze/ask endpoints, an incremental decoder for the streamed
//! answer body, and the single-flight session state machine that ties the
//! two together beneath whatever front end drives them.

pub mod api;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod session;
pub mod stream;
pub mod topics;

pub use client::BackendClient;
pub use config::Config;
pub use error::Error;
pub use session::{
    AnalysisPhase, ChatMessage, ContentSummary, Sender, Session, SessionCoordinator,
    SourceRef, UiEvent,
};
pub use stream::{decode_stream, FrameDecoder, FALLBACK_ANSWER};
