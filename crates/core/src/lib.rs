pub mod comment;
pub mod compose;
pub mod config;
pub mod error;
pub mod ids;
pub mod normalize;
pub mod timestamp;
pub mod wire;

pub use comment::{Author, Comment};
pub use config::{CurrentUser, TimelineConfig};
pub use error::CoreError;
pub use ids::{IdSource, OperationId, RandomIdSource, SeededIdSource};
pub use normalize::{normalize, normalize_at, NormalizedComments};
pub use wire::WireShape;
