// ── Cache slots ──
//
// A slot holds the outcome of the most recent completed request for one
// key. Success and failure are variants of one enum, so an update always
// sets one and clears the other.

use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::model::Payload;

/// The last outcome recorded for one cache key.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Slot {
    /// No request has completed yet.
    #[default]
    Empty,
    /// The last request succeeded with this payload.
    Ready(Payload),
    /// The last request failed.
    Failed(Failure),
}

/// A failed request: the error text plus the snapshot a channel exposes
/// in place of a payload while the failure is current.
#[derive(Debug, Clone, PartialEq)]
pub struct Failure {
    pub kind: FailureKind,
    pub message: String,
    pub snapshot: Payload,
}

/// Coarse cause of a cached failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The request deadline fired.
    Timeout,
    /// The controller could not be reached.
    Connection,
    /// The controller answered with a non-success status.
    Rejected { status: u16 },
    /// Anything else (bad body, bad URL).
    Other,
}

impl From<&hermie_api::Error> for FailureKind {
    fn from(err: &hermie_api::Error) -> Self {
        if err.is_timeout() {
            return Self::Timeout;
        }
        match err {
            hermie_api::Error::Http { status, .. } => Self::Rejected { status: *status },
            hermie_api::Error::Transport(_) => Self::Connection,
            _ => Self::Other,
        }
    }
}

impl Slot {
    pub fn failed(message: impl Into<String>, snapshot: Payload) -> Self {
        Self::Failed(Failure {
            kind: FailureKind::Other,
            message: message.into(),
            snapshot,
        })
    }

    /// Failed slot for `err`, keeping its classification.
    pub fn from_error(err: &hermie_api::Error, snapshot: Payload) -> Self {
        Self::Failed(Failure {
            kind: FailureKind::from(err),
            message: err.to_string(),
            snapshot,
        })
    }

    /// Payload visible to field accessors: the response on success, the
    /// channel's failure snapshot on failure, nothing when empty.
    pub fn payload(&self) -> Option<&Payload> {
        match self {
            Self::Empty => None,
            Self::Ready(payload) => Some(payload),
            Self::Failed(failure) => Some(&failure.snapshot),
        }
    }

    /// The successful response only.
    pub fn response(&self) -> Option<&Payload> {
        match self {
            Self::Ready(payload) => Some(payload),
            _ => None,
        }
    }

    /// Error text of the last failure, if the last request failed.
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(failure) => Some(&failure.message),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&Failure> {
        match self {
            Self::Failed(failure) => Some(failure),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// Lock-free cell holding one [`Slot`].
///
/// Readers get a cheap `Arc` snapshot; writers swap in a whole new slot,
/// so a reader never observes a half-applied update.
#[derive(Debug, Default)]
pub struct SlotCell(ArcSwap<Slot>);

impl SlotCell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&self) -> Arc<Slot> {
        self.0.load_full()
    }

    pub fn replace(&self, slot: Slot) {
        self.0.store(Arc::new(slot));
    }
}
