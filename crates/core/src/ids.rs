use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Correlation token for one in-flight post.
///
/// Rendered as a lower-case hyphenated GUID. Uniqueness is probabilistic, which
/// is enough to match a result to a short-lived request but not for durable keys.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OperationId(Uuid);

impl OperationId {
    /// Build a version-4 style identifier from 16 random bytes.
    pub fn from_random_bytes(bytes: [u8; 16]) -> Self {
        Self(uuid::Builder::from_random_bytes(bytes).into_uuid())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Case-insensitive comparison against a textual id coming back from the host.
    pub fn matches(&self, candidate: &str) -> bool {
        let candidate = candidate.trim();
        !candidate.is_empty() && self.to_string().eq_ignore_ascii_case(candidate)
    }
}

impl fmt::Debug for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OperationId({})", &self.0.to_string()[..8])
    }
}

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

/// Source of fresh operation identifiers.
pub trait IdSource {
    fn next_operation_id(&mut self) -> OperationId;
}

/// Thread-local RNG backed generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIdSource;

impl IdSource for RandomIdSource {
    fn next_operation_id(&mut self) -> OperationId {
        let mut bytes = [0u8; 16];
        rand::thread_rng().fill_bytes(&mut bytes);
        OperationId::from_random_bytes(bytes)
    }
}

/// Deterministic generator for reproducible tests and replays.
pub struct SeededIdSource {
    rng: StdRng,
}

impl SeededIdSource {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl IdSource for SeededIdSource {
    fn next_operation_id(&mut self) -> OperationId {
        let mut bytes = [0u8; 16];
        self.rng.fill_bytes(&mut bytes);
        OperationId::from_random_bytes(bytes)
    }
}
