use timeline_core::NormalizedComments;

/// What the timeline should render after the latest transition.
#[derive(Debug, Clone, PartialEq)]
pub enum TimelineView {
    /// The host is still loading; only a placeholder is shown.
    Loading,
    Timeline {
        comments: NormalizedComments,
        busy: bool,
        /// User-facing message from the last failed post.
        error: Option<String>,
    },
}

impl TimelineView {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn comments(&self) -> Option<&NormalizedComments> {
        match self {
            Self::Loading => None,
            Self::Timeline { comments, .. } => Some(comments),
        }
    }
}
