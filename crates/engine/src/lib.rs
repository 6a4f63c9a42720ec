pub mod error;
pub mod flow;
pub mod outputs;
pub mod snapshot;
pub mod state;
pub mod view;

pub use error::EngineError;
pub use flow::{FlowReturn, PayloadOutcome};
pub use outputs::{HostInputs, Outputs, RequestPayload};
pub use snapshot::{RollbackSnapshot, SnapshotSource};
pub use state::{Command, CommitKind, Event, Outcome, Phase, ReconciliationState, Transition};
pub use view::TimelineView;

use chrono::{DateTime, Utc};
use timeline_core::{
    compose::{compose_comment, CharacterBudget},
    normalize::normalize_at,
    Comment, IdSource, RandomIdSource, TimelineConfig,
};

/// One control instance: owns the reconciliation state for its lifetime.
///
/// The host calls [`Engine::refresh`] whenever its property bag changes and
/// [`Engine::post_text`] when the user submits a comment, then reads
/// [`Engine::outputs`]. Nothing here blocks or performs I/O.
pub struct Engine<S: IdSource = RandomIdSource> {
    config: TimelineConfig,
    ids: S,
    state: ReconciliationState,
    inputs: HostInputs,
}

impl Engine<RandomIdSource> {
    pub fn new(config: TimelineConfig) -> Self {
        Self::with_id_source(config, RandomIdSource)
    }
}

impl<S: IdSource> Engine<S> {
    pub fn with_id_source(config: TimelineConfig, ids: S) -> Self {
        Self {
            config,
            ids,
            state: ReconciliationState::new(),
            inputs: HostInputs::default(),
        }
    }

    pub fn config(&self) -> &TimelineConfig {
        &self.config
    }

    pub fn state(&self) -> &ReconciliationState {
        &self.state
    }

    /// The property bag seen on the most recent refresh.
    pub fn inputs(&self) -> &HostInputs {
        &self.inputs
    }

    pub fn is_busy(&self) -> bool {
        self.state.is_busy()
    }

    pub fn outputs(&self) -> Outputs {
        self.state.outputs()
    }

    /// Apply a host refresh. Never fails: unusable data degrades to a no-op.
    pub fn refresh(&mut self, inputs: HostInputs) -> Outcome {
        self.inputs = inputs;
        match self.state.apply(Event::Refresh(&self.inputs), &self.config) {
            Ok(transition) => {
                self.state = transition.state;
                transition.outcome
            }
            Err(e) => {
                // Refresh transitions do not produce errors; keep state if one ever does.
                tracing::warn!(error = %e, "refresh transition failed, state unchanged");
                Outcome::Waiting
            }
        }
    }

    /// Post `text` as the current user, stamped with the current time.
    pub fn post_text(&mut self, text: &str) -> Result<RequestPayload, EngineError> {
        self.post_text_at(text, Utc::now())
    }

    pub fn post_text_at(&mut self, text: &str, now: DateTime<Utc>) -> Result<RequestPayload, EngineError> {
        self.ensure_idle()?;
        let comment = compose_comment(text, &self.config, now)?;
        self.post(&comment)
    }

    /// Optimistically insert an already-built comment and produce the request
    /// the host must dispatch.
    pub fn post(&mut self, comment: &Comment) -> Result<RequestPayload, EngineError> {
        self.ensure_idle()?;
        let comment = comment
            .to_value()
            .map_err(|e| EngineError::Serialization(e.to_string()))?;
        let operation_id = self.ids.next_operation_id();

        let transition = self.state.apply(
            Event::Post {
                comment,
                inputs: &self.inputs,
                operation_id,
            },
            &self.config,
        )?;
        self.state = transition.state;

        tracing::debug!(%operation_id, counter = self.state.post_counter(), "optimistic comment inserted");
        match transition.command {
            Some(Command::DispatchPost(payload)) => Ok(payload),
            None => Err(EngineError::Serialization("post produced no request".into())),
        }
    }

    pub fn character_budget(&self, draft: &str) -> CharacterBudget {
        CharacterBudget::measure(draft, &self.config)
    }

    pub fn view(&self) -> TimelineView {
        self.view_at(Utc::now())
    }

    /// Render model for the current state; `now` fills missing dates.
    pub fn view_at(&self, now: DateTime<Utc>) -> TimelineView {
        if self.inputs.is_loading {
            return TimelineView::Loading;
        }
        let source = if self.state.effective().trim().is_empty() {
            self.inputs.comments_json.as_str()
        } else {
            self.state.effective()
        };
        let error = Some(self.state.last_error())
            .filter(|e| !e.is_empty())
            .map(str::to_string);
        TimelineView::Timeline {
            comments: normalize_at(source, now),
            busy: self.state.is_busy(),
            error,
        }
    }

    fn ensure_idle(&self) -> Result<(), EngineError> {
        match self.state.pending_operation_id() {
            Some(pending) => {
                tracing::warn!(%pending, "post rejected while another is in flight");
                Err(EngineError::Busy(pending))
            }
            None => Ok(()),
        }
    }
}
