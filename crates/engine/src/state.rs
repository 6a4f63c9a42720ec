//! Reconciliation state and its transitions.
//!
//! `apply` is pure: it reads the current state and an event and returns the
//! next state together with any request the host must dispatch. The caller
//! decides when to swap the new state in.

use serde_json::Value;
use timeline_core::{wire, OperationId, TimelineConfig};

use crate::flow::{FlowReturn, PayloadOutcome};
use crate::outputs::{HostInputs, Outputs, RequestPayload};
use crate::snapshot::RollbackSnapshot;
use crate::EngineError;

/// The post currently awaiting its correlated result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingPost {
    pub operation_id: OperationId,
    pub snapshot: RollbackSnapshot,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Phase {
    /// The host's collection is displayed as-is.
    #[default]
    Idle,
    /// An optimistic comment is displayed and a result is outstanding.
    Posting(PendingPost),
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Posting(_) => "posting",
        }
    }
}

pub enum Event<'a> {
    /// Host-driven refresh with the latest property bag.
    Refresh(&'a HostInputs),
    /// User posted `comment`, correlated by `operation_id`.
    Post {
        comment: Value,
        inputs: &'a HostInputs,
        operation_id: OperationId,
    },
}

/// Side-channel work for the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    DispatchPost(RequestPayload),
}

/// How a confirmed post changed the displayed collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitKind {
    Replaced,
    Unwrapped,
    Prepended,
    KeptOptimistic,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Idle refresh; the host collection was adopted.
    Synced,
    /// Posting and no usable result yet.
    Waiting,
    /// A result arrived for some other operation.
    Ignored { operation_id: String },
    Committed(CommitKind),
    RolledBack,
    Posted(OperationId),
}

#[derive(Debug, Clone)]
pub struct Transition {
    pub state: ReconciliationState,
    pub command: Option<Command>,
    pub outcome: Outcome,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconciliationState {
    effective: String,
    phase: Phase,
    last_error: String,
    request_payload: String,
    last_posted_text: String,
    post_counter: u64,
}

impl ReconciliationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn effective(&self) -> &str {
        &self.effective
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn is_busy(&self) -> bool {
        matches!(self.phase, Phase::Posting(_))
    }

    pub fn pending_operation_id(&self) -> Option<OperationId> {
        match &self.phase {
            Phase::Posting(pending) => Some(pending.operation_id),
            Phase::Idle => None,
        }
    }

    pub fn prior_snapshot(&self) -> Option<&RollbackSnapshot> {
        match &self.phase {
            Phase::Posting(pending) => Some(&pending.snapshot),
            Phase::Idle => None,
        }
    }

    pub fn last_error(&self) -> &str {
        &self.last_error
    }

    pub fn request_payload(&self) -> &str {
        &self.request_payload
    }

    pub fn last_posted_text(&self) -> &str {
        &self.last_posted_text
    }

    pub fn post_counter(&self) -> u64 {
        self.post_counter
    }

    pub fn outputs(&self) -> Outputs {
        Outputs {
            comments_json: self.effective.clone(),
            is_busy: self.is_busy(),
            last_error: self.last_error.clone(),
            operation_id: self
                .pending_operation_id()
                .map(|id| id.to_string())
                .unwrap_or_default(),
            request_payload: self.request_payload.clone(),
            new_comment_text: self.last_posted_text.clone(),
            new_comment_trigger: self.post_counter,
        }
    }

    pub fn apply(&self, event: Event<'_>, config: &TimelineConfig) -> Result<Transition, EngineError> {
        match event {
            Event::Refresh(inputs) => Ok(self.refresh(inputs, config)),
            Event::Post {
                comment,
                inputs,
                operation_id,
            } => self.post(comment, inputs, operation_id),
        }
    }

    fn refresh(&self, inputs: &HostInputs, config: &TimelineConfig) -> Transition {
        let mut next = self.clone();
        let outcome = match &self.phase {
            Phase::Idle => {
                // The host owns the collection whenever nothing is in flight.
                next.effective = inputs.comments_json.clone();
                Outcome::Synced
            }
            Phase::Posting(pending) => next.resolve(pending, inputs, config),
        };
        Transition {
            state: next,
            command: None,
            outcome,
        }
    }

    fn resolve(&mut self, pending: &PendingPost, inputs: &HostInputs, config: &TimelineConfig) -> Outcome {
        let Some(text) = inputs.flow_return.as_deref().filter(|t| !t.trim().is_empty()) else {
            return Outcome::Waiting;
        };

        let result = match FlowReturn::parse(text) {
            Ok(result) => result,
            Err(e) => {
                tracing::debug!(error = %e, len = text.len(), "unusable flow return, still waiting");
                return Outcome::Waiting;
            }
        };

        if !pending.operation_id.matches(&result.operation_id) {
            tracing::debug!(
                pending = %pending.operation_id,
                received = %result.operation_id,
                "ignoring flow return for another operation"
            );
            return Outcome::Ignored {
                operation_id: result.operation_id,
            };
        }

        self.phase = Phase::Idle;

        if result.error {
            self.effective = pending.snapshot.restore_text(&inputs.comments_json);
            self.last_error = config.rollback_message().to_string();
            tracing::info!(
                operation_id = %pending.operation_id,
                snapshot = pending.snapshot.source().as_str(),
                "post failed, rolled back"
            );
            return Outcome::RolledBack;
        }

        let payload = result.classify_payload();
        let kind = match payload {
            PayloadOutcome::Replace(collection) => {
                self.effective = collection;
                CommitKind::Replaced
            }
            PayloadOutcome::ReplaceWithValue(collection) => {
                self.effective = collection;
                CommitKind::Unwrapped
            }
            PayloadOutcome::Single(comment) => {
                // The optimistic copy is replaced by the confirmed record.
                self.effective = pending.snapshot.prepend(comment);
                CommitKind::Prepended
            }
            PayloadOutcome::KeepOptimistic => CommitKind::KeptOptimistic,
        };
        self.last_error.clear();
        tracing::info!(operation_id = %pending.operation_id, ?kind, "post confirmed");
        Outcome::Committed(kind)
    }

    fn post(
        &self,
        comment: Value,
        inputs: &HostInputs,
        operation_id: OperationId,
    ) -> Result<Transition, EngineError> {
        if let Some(pending) = self.pending_operation_id() {
            return Err(EngineError::Busy(pending));
        }

        let text = comment
            .get("text")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let snapshot = RollbackSnapshot::capture(&self.effective, &inputs.comments_json);
        let mut working = snapshot.entries();
        working.insert(0, comment);

        let payload = RequestPayload {
            site_url: inputs.site_url.clone(),
            record_id: inputs.record_id.clone(),
            text: text.clone(),
            operation_id: operation_id.to_string(),
        };

        let mut next = self.clone();
        next.effective = wire::to_canonical_text(&working);
        next.request_payload = payload
            .to_json()
            .map_err(|e| EngineError::Serialization(e.to_string()))?;
        next.last_posted_text = text;
        next.post_counter += 1;
        next.last_error.clear();
        next.phase = Phase::Posting(PendingPost {
            operation_id,
            snapshot,
        });

        Ok(Transition {
            state: next,
            command: Some(Command::DispatchPost(payload)),
            outcome: Outcome::Posted(operation_id),
        })
    }
}
