//! Session state, the single-flight analysis state machine, and the chat
//! turn controller.
//!
//! All mutation of the session funnels through the guarded begin/settle
//! transitions here, so the machine can be driven headless in tests and
//! rendered through whatever front end is attached: when a `ui_tx` sink is
//! set, state changes are emitted as [`UiEvent`]s; otherwise streamed text
//! is printed straight to stdout for the terminal binary.

use std::io::{self, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use colored::Colorize;
use serde::Serialize;
use tokio::sync::mpsc;
use tokio_stream::Stream;

use crate::client::BackendClient;
use crate::error::Error;
use crate::stream::{decode_stream, FALLBACK_ANSWER};
use crate::topics::{extract_key_topics, reading_time_minutes, word_count};

/// Inserted into the transcript when a chat turn fails mid-flight.
pub const APOLOGY_ANSWER: &str =
    "Sorry, something went wrong while answering. Please try again.";

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

// ---------------------------------------------------------------------------
// Session data model
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

/// One transcript entry. Assistant messages start empty and grow by
/// appension while the answer streams; immutable once the turn settles.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub sender: Sender,
    pub text: String,
    pub timestamp_ms: u64,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        ChatMessage { sender: Sender::User, text: text.into(), timestamp_ms: now_ms() }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        ChatMessage { sender: Sender::Assistant, text: text.into(), timestamp_ms: now_ms() }
    }
}

/// What was analyzed: a page URL or an uploaded PDF path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceRef {
    Url(String),
    Pdf(String),
}

impl std::fmt::Display for SourceRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceRef::Url(url) => write!(f, "{url}"),
            SourceRef::Pdf(path) => write!(f, "{path}"),
        }
    }
}

/// The analyzed content and its derived display metadata. Replaced
/// wholesale on each successful analysis, never mutated in place.
#[derive(Debug, Clone, Serialize)]
pub struct ContentSummary {
    pub source: SourceRef,
    pub summary_text: String,
    pub word_count: usize,
    pub reading_time_minutes: usize,
    pub key_topics: Vec<String>,
    pub created_at_ms: u64,
}

impl ContentSummary {
    /// Build the display record from a backend summary, deriving topics,
    /// word count, and reading time from the text.
    pub fn from_summary(source: SourceRef, summary_text: String) -> Self {
        ContentSummary {
            word_count: word_count(&summary_text),
            reading_time_minutes: reading_time_minutes(&summary_text),
            key_topics: extract_key_topics(&summary_text),
            created_at_ms: now_ms(),
            source,
            summary_text,
        }
    }
}

/// Page-lifetime session state. Created empty, dropped on exit.
#[derive(Debug, Default)]
pub struct Session {
    pub current_content: Option<ContentSummary>,
    pub is_analyzing: bool,
    pub is_chatting: bool,
    pub chat_enabled: bool,
    /// Append-only, wall-clock turn order.
    pub transcript: Vec<ChatMessage>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serialize the transcript for export.
    pub fn transcript_json(&self) -> Result<String, Error> {
        serde_json::to_string_pretty(&self.transcript)
            .map_err(|e| Error::Decode(e.to_string()))
    }
}

// ---------------------------------------------------------------------------
// UI events
// ---------------------------------------------------------------------------

/// State-change notifications emitted through the optional UI sink.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UiEvent {
    AnalysisStarted { source: SourceRef },
    SummaryReady { content: ContentSummary },
    AnalysisFailed { message: String },
    ChatPending,
    ChatFragment { text: String },
    ChatCompleted { fallback_used: bool },
    ChatFailed { message: String },
}

// ---------------------------------------------------------------------------
// Analysis phase machine
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisPhase {
    Idle,
    Loading,
    Displayed,
    Failed,
}

// ---------------------------------------------------------------------------
// Coordinator
// ---------------------------------------------------------------------------

/// Owns the session and enforces the at-most-one-in-flight invariant per
/// operation class (analyze vs. chat). Every transition is guarded here;
/// calling code never touches the flags directly.
pub struct SessionCoordinator {
    client: BackendClient,
    pub session: Session,
    phase: AnalysisPhase,
    /// When set, state changes are sent here instead of printed to stdout.
    pub ui_tx: Option<mpsc::UnboundedSender<UiEvent>>,
    /// Colored terminal output when no sink is attached.
    pub visual_mode: bool,
}

impl SessionCoordinator {
    pub fn new(client: BackendClient) -> Self {
        SessionCoordinator {
            client,
            session: Session::new(),
            phase: AnalysisPhase::Idle,
            ui_tx: None,
            visual_mode: false,
        }
    }

    pub fn phase(&self) -> AnalysisPhase {
        self.phase
    }

    fn emit(&self, event: UiEvent) {
        if let Some(tx) = &self.ui_tx {
            let _ = tx.send(event);
        }
    }

    // -- Analysis transitions ----------------------------------------------

    /// `Idle|Displayed|Failed → Loading`. Rejected without any state change
    /// while an analysis is already outstanding.
    pub fn begin_analysis(&mut self, source: &SourceRef) -> Result<(), Error> {
        if self.session.is_analyzing {
            return Err(Error::Busy("analyze"));
        }
        self.session.is_analyzing = true;
        self.phase = AnalysisPhase::Loading;
        tracing::debug!(%source, "analysis started");
        self.emit(UiEvent::AnalysisStarted { source: source.clone() });
        Ok(())
    }

    /// `Loading → Displayed|Failed`. On success the previous content is
    /// replaced and chat becomes enabled; on failure it is left untouched.
    pub fn settle_analysis(
        &mut self,
        source: SourceRef,
        result: Result<String, Error>,
    ) -> Result<ContentSummary, Error> {
        self.session.is_analyzing = false;
        match result {
            Ok(summary_text) => {
                let content = ContentSummary::from_summary(source, summary_text);
                self.session.current_content = Some(content.clone());
                self.session.chat_enabled = true;
                self.phase = AnalysisPhase::Displayed;
                self.emit(UiEvent::SummaryReady { content: content.clone() });
                Ok(content)
            }
            Err(error) => {
                self.phase = AnalysisPhase::Failed;
                tracing::warn!(%error, "analysis failed");
                self.emit(UiEvent::AnalysisFailed { message: error.to_string() });
                Err(error)
            }
        }
    }

    /// Analyze a page URL end to end.
    pub async fn analyze_url(&mut self, url: &str) -> Result<ContentSummary, Error> {
        let url = url.trim();
        if url.is_empty() {
            return Err(Error::Validation("please enter a URL".to_string()));
        }
        let source = SourceRef::Url(url.to_string());
        self.begin_analysis(&source)?;
        let result = self.client.analyze_url(url).await;
        self.settle_analysis(source, result)
    }

    /// Analyze a local PDF end to end.
    pub async fn analyze_pdf(&mut self, path: &Path) -> Result<ContentSummary, Error> {
        if path.as_os_str().is_empty() {
            return Err(Error::Validation("please select a PDF file".to_string()));
        }
        if !path.is_file() {
            return Err(Error::Validation(format!(
                "file not found: {}",
                path.display()
            )));
        }
        let source = SourceRef::Pdf(path.display().to_string());
        self.begin_analysis(&source)?;
        let result = self.client.analyze_pdf(path).await;
        self.settle_analysis(source, result)
    }

    // -- Chat transitions --------------------------------------------------

    /// Open a chat turn: append the user message, raise the in-flight
    /// guard, show the pending indicator. Rejected before any network call
    /// when chat is disabled, a turn is outstanding, or the message is
    /// empty after trimming.
    pub fn begin_chat_turn(&mut self, question: &str) -> Result<(), Error> {
        if !self.session.chat_enabled {
            return Err(Error::Validation(
                "analyze a page or PDF before asking questions".to_string(),
            ));
        }
        if question.trim().is_empty() {
            return Err(Error::Validation("message is empty".to_string()));
        }
        if self.session.is_chatting {
            return Err(Error::Busy("chat"));
        }
        self.session.transcript.push(ChatMessage::user(question.trim()));
        self.session.is_chatting = true;
        self.emit(UiEvent::ChatPending);
        Ok(())
    }

    /// Route an open response body into the current turn: append the empty
    /// assistant placeholder, then grow it fragment by fragment in arrival
    /// order. Settles the turn on every path, clearing the in-flight guard
    /// exactly once. Split from [`Self::send_chat_message`] so tests can
    /// feed synthetic streams.
    pub async fn stream_answer<S, B, E>(&mut self, body: S) -> Result<(), Error>
    where
        S: Stream<Item = Result<B, E>> + Unpin,
        B: AsRef<[u8]>,
        E: Into<Error>,
    {
        self.session.transcript.push(ChatMessage::assistant(""));

        let tx = self.ui_tx.clone();
        let visual = self.visual_mode;
        let transcript = &mut self.session.transcript;
        let decoded = decode_stream(body, |fragment| {
            if let Some(message) = transcript.last_mut() {
                message.text.push_str(fragment);
            }
            match &tx {
                Some(tx) => {
                    let _ = tx.send(UiEvent::ChatFragment { text: fragment.to_string() });
                }
                None => {
                    if visual {
                        print!("{}", fragment.bright_white());
                    } else {
                        print!("{fragment}");
                    }
                    let _ = io::stdout().flush();
                }
            }
        })
        .await;

        match decoded {
            Ok(emitted) => {
                self.settle_chat_success(emitted);
                Ok(())
            }
            Err(error) => {
                self.settle_chat_failure(&error);
                Err(error)
            }
        }
    }

    /// Run one full chat turn against the backend.
    pub async fn send_chat_message(&mut self, question: &str) -> Result<(), Error> {
        let question = question.trim().to_string();
        self.begin_chat_turn(&question)?;

        let response = match self.client.ask(&question).await {
            Ok(response) => response,
            Err(error) => {
                self.settle_chat_failure(&error);
                return Err(error);
            }
        };
        self.stream_answer(response.bytes_stream()).await
    }

    /// Stream closed cleanly. An answer that yielded zero characters is
    /// replaced by the literal fallback, never left as an empty display.
    fn settle_chat_success(&mut self, emitted: usize) {
        let fallback_used = emitted == 0;
        if fallback_used {
            if let Some(message) = self.session.transcript.last_mut() {
                if message.sender == Sender::Assistant && message.text.is_empty() {
                    message.text = FALLBACK_ANSWER.to_string();
                }
            }
            if self.ui_tx.is_none() {
                print!("{FALLBACK_ANSWER}");
                let _ = io::stdout().flush();
            }
        }
        self.session.is_chatting = false;
        self.emit(UiEvent::ChatCompleted { fallback_used });
    }

    /// Turn failed mid-flight. Partial text already streamed stays visible;
    /// the apology is appended to (or becomes) the assistant message.
    fn settle_chat_failure(&mut self, error: &Error) {
        match self.session.transcript.last_mut() {
            Some(message) if message.sender == Sender::Assistant => {
                if !message.text.is_empty() {
                    message.text.push('\n');
                }
                message.text.push_str(APOLOGY_ANSWER);
            }
            _ => self.session.transcript.push(ChatMessage::assistant(APOLOGY_ANSWER)),
        }
        if self.ui_tx.is_none() {
            print!("{APOLOGY_ANSWER}");
            let _ = io::stdout().flush();
        }
        self.session.is_chatting = false;
        tracing::warn!(%error, "chat turn failed");
        self.emit(UiEvent::ChatFailed { message: error.to_string() });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn make_coordinator() -> SessionCoordinator {
        // Port 9 (discard) is never served locally; nothing here performs
        // network I/O anyway — these tests drive the machine directly.
        let client = BackendClient::new(&Config {
            base_url: "http://127.0.0.1:9".to_string(),
            request_timeout_secs: 1,
        })
        .expect("client");
        SessionCoordinator::new(client)
    }

    fn ok_chunks(frames: &[&str]) -> Vec<Result<Vec<u8>, Error>> {
        frames.iter().map(|f| Ok(f.as_bytes().to_vec())).collect()
    }

    fn attach_sink(
        coordinator: &mut SessionCoordinator,
    ) -> mpsc::UnboundedReceiver<UiEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        coordinator.ui_tx = Some(tx);
        rx
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<UiEvent>) -> Vec<UiEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    // -- Session basics -----------------------------------------------------

    #[test]
    fn test_new_session_is_empty() {
        let session = Session::new();
        assert!(session.current_content.is_none());
        assert!(!session.is_analyzing);
        assert!(!session.is_chatting);
        assert!(!session.chat_enabled);
        assert!(session.transcript.is_empty());
    }

    #[test]
    fn test_content_summary_derives_metadata() {
        let content = ContentSummary::from_summary(
            SourceRef::Url("https://example.com".to_string()),
            "Quantum physics explains quantum effects in quantum systems".to_string(),
        );
        assert_eq!(content.word_count, 8);
        assert_eq!(content.reading_time_minutes, 1);
        assert_eq!(content.key_topics[0], "Quantum");
        assert!(content.created_at_ms > 1_704_067_200_000);
    }

    #[test]
    fn test_transcript_json_roundtrips() {
        let mut session = Session::new();
        session.transcript.push(ChatMessage::user("hello"));
        session.transcript.push(ChatMessage::assistant("hi there"));
        let json = session.transcript_json().expect("serialize");
        let parsed: Vec<serde_json::Value> = serde_json::from_str(&json).expect("parse");
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0]["sender"], "user");
        assert_eq!(parsed[1]["text"], "hi there");
    }

    // -- Analysis machine ---------------------------------------------------

    #[test]
    fn test_initial_phase_idle() {
        let coordinator = make_coordinator();
        assert_eq!(coordinator.phase(), AnalysisPhase::Idle);
    }

    #[test]
    fn test_begin_analysis_enters_loading() {
        let mut coordinator = make_coordinator();
        let source = SourceRef::Url("https://example.com".to_string());
        coordinator.begin_analysis(&source).expect("begin");
        assert_eq!(coordinator.phase(), AnalysisPhase::Loading);
        assert!(coordinator.session.is_analyzing);
    }

    #[test]
    fn test_second_begin_rejected_without_state_change() {
        let mut coordinator = make_coordinator();
        let source = SourceRef::Url("https://example.com".to_string());
        coordinator.begin_analysis(&source).expect("begin");
        let result = coordinator.begin_analysis(&source);
        assert!(matches!(result, Err(Error::Busy("analyze"))));
        assert_eq!(coordinator.phase(), AnalysisPhase::Loading);
    }

    #[test]
    fn test_successful_analysis_displays_and_enables_chat() {
        let mut coordinator = make_coordinator();
        let mut rx = attach_sink(&mut coordinator);
        let source = SourceRef::Url("https://example.com".to_string());
        coordinator.begin_analysis(&source).expect("begin");
        let content = coordinator
            .settle_analysis(source, Ok("Example summary text here.".to_string()))
            .expect("settle");

        assert_eq!(coordinator.phase(), AnalysisPhase::Displayed);
        assert_eq!(content.summary_text, "Example summary text here.");
        assert!(!coordinator.session.is_analyzing);
        assert!(coordinator.session.chat_enabled);
        let stored = coordinator.session.current_content.as_ref().expect("content");
        assert_eq!(stored.summary_text, "Example summary text here.");

        let events = drain(&mut rx);
        assert!(matches!(events[0], UiEvent::AnalysisStarted { .. }));
        assert!(matches!(events[1], UiEvent::SummaryReady { .. }));
    }

    #[test]
    fn test_failed_analysis_preserves_previous_content() {
        let mut coordinator = make_coordinator();
        let source = SourceRef::Url("https://example.com".to_string());
        coordinator.begin_analysis(&source).expect("begin");
        coordinator
            .settle_analysis(source.clone(), Ok("First summary.".to_string()))
            .expect("settle");

        coordinator.begin_analysis(&source).expect("re-entrant begin");
        let result = coordinator.settle_analysis(
            source,
            Err(Error::Transport { status: Some(500), message: "backend returned HTTP 500".into() }),
        );
        assert!(result.is_err());
        assert_eq!(coordinator.phase(), AnalysisPhase::Failed);
        assert!(!coordinator.session.is_analyzing);
        let stored = coordinator.session.current_content.as_ref().expect("content");
        assert_eq!(stored.summary_text, "First summary.");
    }

    #[test]
    fn test_reentrant_after_failure() {
        let mut coordinator = make_coordinator();
        let source = SourceRef::Pdf("report.pdf".to_string());
        coordinator.begin_analysis(&source).expect("begin");
        let _ = coordinator.settle_analysis(
            source.clone(),
            Err(Error::Application("no readable content".into())),
        );
        assert!(coordinator.begin_analysis(&source).is_ok());
    }

    #[tokio::test]
    async fn test_analyze_url_empty_is_validation_error() {
        let mut coordinator = make_coordinator();
        let result = coordinator.analyze_url("   ").await;
        assert!(matches!(result, Err(Error::Validation(_))));
        assert_eq!(coordinator.phase(), AnalysisPhase::Idle);
        assert!(!coordinator.session.is_analyzing);
    }

    #[tokio::test]
    async fn test_analyze_pdf_missing_file_is_validation_error() {
        let mut coordinator = make_coordinator();
        let result = coordinator.analyze_pdf(Path::new("/nonexistent/report.pdf")).await;
        assert!(matches!(result, Err(Error::Validation(_))));
        assert_eq!(coordinator.phase(), AnalysisPhase::Idle);
    }

    // -- Chat turn controller -----------------------------------------------

    fn enable_chat(coordinator: &mut SessionCoordinator) {
        let source = SourceRef::Url("https://example.com".to_string());
        coordinator.begin_analysis(&source).expect("begin");
        coordinator
            .settle_analysis(source, Ok("Example summary text here.".to_string()))
            .expect("settle");
    }

    #[test]
    fn test_chat_rejected_before_analysis() {
        let mut coordinator = make_coordinator();
        let result = coordinator.begin_chat_turn("what is this?");
        assert!(matches!(result, Err(Error::Validation(_))));
        assert!(coordinator.session.transcript.is_empty());
    }

    #[test]
    fn test_chat_rejected_for_empty_message() {
        let mut coordinator = make_coordinator();
        enable_chat(&mut coordinator);
        let result = coordinator.begin_chat_turn("   ");
        assert!(matches!(result, Err(Error::Validation(_))));
        assert!(coordinator.session.transcript.is_empty());
    }

    #[test]
    fn test_chat_single_flight() {
        let mut coordinator = make_coordinator();
        enable_chat(&mut coordinator);
        coordinator.begin_chat_turn("first question").expect("begin");
        let result = coordinator.begin_chat_turn("second question");
        assert!(matches!(result, Err(Error::Busy("chat"))));
        // The rejected turn must not touch the transcript.
        assert_eq!(coordinator.session.transcript.len(), 1);
    }

    #[tokio::test]
    async fn test_chat_turn_streams_answer_in_order() {
        let mut coordinator = make_coordinator();
        enable_chat(&mut coordinator);
        let mut rx = attach_sink(&mut coordinator);

        coordinator.begin_chat_turn("what is this about?").expect("begin");
        coordinator
            .stream_answer(tokio_stream::iter(ok_chunks(&[
                "data: Hello \n\n",
                "data: world.\n\n",
            ])))
            .await
            .expect("stream");

        assert!(!coordinator.session.is_chatting);
        let transcript = &coordinator.session.transcript;
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript[0].sender, Sender::User);
        assert_eq!(transcript[0].text, "what is this about?");
        assert_eq!(transcript[1].sender, Sender::Assistant);
        assert_eq!(transcript[1].text, "Hello world.");

        let events = drain(&mut rx);
        let fragments: Vec<&UiEvent> = events
            .iter()
            .filter(|e| matches!(e, UiEvent::ChatFragment { .. }))
            .collect();
        assert_eq!(fragments.len(), 2);
        assert!(matches!(
            events.last(),
            Some(UiEvent::ChatCompleted { fallback_used: false })
        ));
    }

    #[tokio::test]
    async fn test_empty_stream_substitutes_fallback() {
        let mut coordinator = make_coordinator();
        enable_chat(&mut coordinator);
        let mut rx = attach_sink(&mut coordinator);

        coordinator.begin_chat_turn("anything?").expect("begin");
        coordinator
            .stream_answer(tokio_stream::iter(ok_chunks(&[])))
            .await
            .expect("stream");

        let answer = coordinator.session.transcript.last().expect("answer");
        assert_eq!(answer.text, FALLBACK_ANSWER);
        assert!(!coordinator.session.is_chatting);
        let events = drain(&mut rx);
        assert!(matches!(
            events.last(),
            Some(UiEvent::ChatCompleted { fallback_used: true })
        ));
    }

    #[tokio::test]
    async fn test_stream_failure_keeps_partial_text_and_appends_apology() {
        let mut coordinator = make_coordinator();
        enable_chat(&mut coordinator);
        let mut rx = attach_sink(&mut coordinator);

        coordinator.begin_chat_turn("tell me more").expect("begin");
        let chunks: Vec<Result<Vec<u8>, Error>> = vec![
            Ok(b"data: partial answer\n\n".to_vec()),
            Err(Error::Transport { status: None, message: "connection reset".into() }),
        ];
        let result = coordinator.stream_answer(tokio_stream::iter(chunks)).await;

        assert!(result.is_err());
        assert!(!coordinator.session.is_chatting);
        let answer = coordinator.session.transcript.last().expect("answer");
        assert!(answer.text.starts_with("partial answer"));
        assert!(answer.text.ends_with(APOLOGY_ANSWER));
        let events = drain(&mut rx);
        assert!(matches!(events.last(), Some(UiEvent::ChatFailed { .. })));
    }

    #[tokio::test]
    async fn test_request_failure_before_stream_inserts_apology() {
        let mut coordinator = make_coordinator();
        enable_chat(&mut coordinator);
        coordinator.begin_chat_turn("unreachable?").expect("begin");

        // No placeholder exists yet; the failure path must create one.
        let error = Error::Transport { status: Some(502), message: "bad gateway".into() };
        coordinator.settle_chat_failure(&error);

        assert!(!coordinator.session.is_chatting);
        let answer = coordinator.session.transcript.last().expect("answer");
        assert_eq!(answer.sender, Sender::Assistant);
        assert_eq!(answer.text, APOLOGY_ANSWER);
    }

    #[tokio::test]
    async fn test_turn_after_settled_turn_is_accepted() {
        let mut coordinator = make_coordinator();
        enable_chat(&mut coordinator);

        coordinator.begin_chat_turn("first").expect("begin");
        coordinator
            .stream_answer(tokio_stream::iter(ok_chunks(&["data: one\n\n"])))
            .await
            .expect("stream");
        coordinator.begin_chat_turn("second").expect("second turn");

        assert_eq!(coordinator.session.transcript.len(), 3);
        assert_eq!(coordinator.session.transcript[2].text, "second");
    }

    #[tokio::test]
    async fn test_transcript_order_is_append_only() {
        let mut coordinator = make_coordinator();
        enable_chat(&mut coordinator);

        for (question, answer) in [("a?", "data: A\n\n"), ("b?", "data: B\n\n")] {
            coordinator.begin_chat_turn(question).expect("begin");
            coordinator
                .stream_answer(tokio_stream::iter(ok_chunks(&[answer])))
                .await
                .expect("stream");
        }

        let texts: Vec<&str> = coordinator
            .session
            .transcript
            .iter()
            .map(|m| m.text.as_str())
            .collect();
        assert_eq!(texts, vec!["a?", "A", "b?", "B"]);
        let timestamps: Vec<u64> = coordinator
            .session
            .transcript
            .iter()
            .map(|m| m.timestamp_ms)
            .collect();
        let mut sorted = timestamps.clone();
        sorted.sort_unstable();
        assert_eq!(timestamps, sorted);
    }

    #[test]
    fn test_ui_event_serializes_tagged() {
        let event = UiEvent::ChatFragment { text: "hi".to_string() };
        let json = serde_json::to_string(&event).expect("serialize");
        assert!(json.contains("\"kind\":\"chat_fragment\""));
        assert!(json.contains("\"text\":\"hi\""));
    }
}
