//! Control configuration.
//!
//! Resolved once when the control instance is initialized and then passed into
//! the engine. Transitions never consult globals.

use crate::CoreError;

pub const DEFAULT_ROLLBACK_MESSAGE: &str =
    "No se pudo publicar el comentario. Se ha deshecho en el timeline.";
pub const DEFAULT_CURRENT_USER_NAME: &str = "Usuario Actual";
pub const DEFAULT_MAX_CHARACTERS: usize = 2000;
pub const DEFAULT_WARNING_THRESHOLD: usize = 1800;
pub const DEFAULT_NEW_COMMENT_LIST_ID: &str = "new-comment-list";

/// Identity stamped on optimistic comments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CurrentUser {
    pub name: String,
    pub email: String,
}

impl Default for CurrentUser {
    fn default() -> Self {
        Self {
            name: DEFAULT_CURRENT_USER_NAME.to_string(),
            email: crate::comment::PLACEHOLDER_EMAIL.to_string(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct TimelineConfig {
    rollback_message: String,
    current_user: CurrentUser,
    max_characters: usize,
    warning_threshold: usize,
    new_comment_list_id: String,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            rollback_message: DEFAULT_ROLLBACK_MESSAGE.to_string(),
            current_user: CurrentUser::default(),
            max_characters: DEFAULT_MAX_CHARACTERS,
            warning_threshold: DEFAULT_WARNING_THRESHOLD,
            new_comment_list_id: DEFAULT_NEW_COMMENT_LIST_ID.to_string(),
        }
    }
}

impl TimelineConfig {
    pub fn new(
        rollback_message: String,
        current_user: CurrentUser,
        max_characters: usize,
        warning_threshold: usize,
        new_comment_list_id: String,
    ) -> Result<Self, CoreError> {
        if rollback_message.trim().is_empty() {
            return Err(CoreError::InvalidConfig(
                "rollback_message cannot be empty".into(),
            ));
        }
        if current_user.email.trim().is_empty() {
            return Err(CoreError::InvalidConfig(
                "current_user.email cannot be empty".into(),
            ));
        }
        if max_characters == 0 {
            return Err(CoreError::InvalidConfig(
                "max_characters must be positive".into(),
            ));
        }
        if warning_threshold > max_characters {
            return Err(CoreError::InvalidConfig(format!(
                "warning_threshold ({warning_threshold}) exceeds max_characters ({max_characters})"
            )));
        }

        Ok(Self {
            rollback_message,
            current_user,
            max_characters,
            warning_threshold,
            new_comment_list_id,
        })
    }

    pub fn rollback_message(&self) -> &str {
        &self.rollback_message
    }

    pub fn current_user(&self) -> &CurrentUser {
        &self.current_user
    }

    pub fn max_characters(&self) -> usize {
        self.max_characters
    }

    pub fn warning_threshold(&self) -> usize {
        self.warning_threshold
    }

    pub fn new_comment_list_id(&self) -> &str {
        &self.new_comment_list_id
    }
}
