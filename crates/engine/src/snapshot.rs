use serde_json::Value;
use timeline_core::wire;

pub const EMPTY_COLLECTION: &str = "[]";

/// Where a rollback snapshot was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotSource {
    /// The displayed collection at the time of the post.
    Effective,
    /// Nothing was displayed yet; the last host input stood in.
    HostInput,
    /// Neither existed.
    Empty,
}

impl SnapshotSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Effective => "effective",
            Self::HostInput => "host_input",
            Self::Empty => "empty",
        }
    }
}

/// The displayed collection captured right before an optimistic insertion.
/// Only one is held at a time; it lives inside the pending post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollbackSnapshot {
    text: String,
    source: SnapshotSource,
}

impl RollbackSnapshot {
    /// Capture, preferring `effective`, then `host_input`, then an empty collection.
    pub fn capture(effective: &str, host_input: &str) -> Self {
        if !effective.trim().is_empty() {
            Self {
                text: effective.to_string(),
                source: SnapshotSource::Effective,
            }
        } else if !host_input.trim().is_empty() {
            Self {
                text: host_input.trim().to_string(),
                source: SnapshotSource::HostInput,
            }
        } else {
            Self {
                text: EMPTY_COLLECTION.to_string(),
                source: SnapshotSource::Empty,
            }
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn source(&self) -> SnapshotSource {
        self.source
    }

    /// Entries of the snapshot in either wire shape; unreadable text is empty.
    pub fn entries(&self) -> Vec<Value> {
        wire::entries_or_empty(&self.text)
    }

    /// Text restored on rollback, falling back to the host input and then to an
    /// empty collection when the snapshot itself is blank.
    pub fn restore_text(&self, host_input: &str) -> String {
        if !self.text.trim().is_empty() {
            self.text.clone()
        } else if !host_input.trim().is_empty() {
            host_input.to_string()
        } else {
            EMPTY_COLLECTION.to_string()
        }
    }

    /// Snapshot entries with `comment` placed first, as canonical text.
    pub fn prepend(&self, comment: Value) -> String {
        let mut entries = self.entries();
        entries.insert(0, comment);
        wire::to_canonical_text(&entries)
    }
}
