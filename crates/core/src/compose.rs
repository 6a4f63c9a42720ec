//! Draft validation and construction of the optimistic comment record.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::comment::{claims_login_name, Author, Comment, DEFAULT_PRINCIPAL_TYPE, ROOT_PARENT_ID};
use crate::config::TimelineConfig;
use crate::timestamp::to_iso;
use crate::CoreError;

/// Character usage of a draft against the configured limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharacterBudget {
    pub used: usize,
    pub max: usize,
    pub over_limit: bool,
    pub near_limit: bool,
}

impl CharacterBudget {
    pub fn measure(text: &str, config: &TimelineConfig) -> Self {
        let used = text.chars().count();
        Self {
            used,
            max: config.max_characters(),
            over_limit: used > config.max_characters(),
            near_limit: used > config.warning_threshold(),
        }
    }

    pub fn remaining(&self) -> isize {
        self.max as isize - self.used as isize
    }
}

/// Trim a draft and check it can be posted.
pub fn validate_draft(text: &str, config: &TimelineConfig) -> Result<String, CoreError> {
    let budget = CharacterBudget::measure(text, config);
    if budget.over_limit {
        return Err(CoreError::CommentTooLong {
            len: budget.used,
            max: budget.max,
        });
    }
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(CoreError::EmptyComment);
    }
    Ok(trimmed.to_string())
}

/// Build the record shown optimistically for a new post by the current user.
pub fn compose_comment(
    text: &str,
    config: &TimelineConfig,
    now: DateTime<Utc>,
) -> Result<Comment, CoreError> {
    let text = validate_draft(text, config)?;
    let user = config.current_user();

    Ok(Comment {
        id: now.timestamp_millis().to_string(),
        text,
        author: Author {
            id: None,
            name: user.name.clone(),
            email: user.email.clone(),
            login_name: claims_login_name(&user.email),
            is_active: true,
            is_external: false,
            principal_type: Value::from(DEFAULT_PRINCIPAL_TYPE),
            extra: Map::new(),
        },
        created_date: to_iso(now),
        modified_date: None,
        is_reply: false,
        parent_id: ROOT_PARENT_ID.to_string(),
        item_id: Some(Value::from(1)),
        list_id: Some(Value::from(config.new_comment_list_id())),
        extra: Map::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CurrentUser;
    use chrono::TimeZone;

    fn small_config() -> TimelineConfig {
        TimelineConfig::new("failed".into(), CurrentUser::default(), 10, 8, "list".into()).unwrap()
    }

    #[test]
    fn budget_flags() {
        let config = small_config();
        let ok = CharacterBudget::measure("hello", &config);
        assert_eq!(ok.used, 5);
        assert_eq!(ok.remaining(), 5);
        assert!(!ok.near_limit);
        assert!(!ok.over_limit);

        let near = CharacterBudget::measure("123456789", &config);
        assert!(near.near_limit);
        assert!(!near.over_limit);

        let over = CharacterBudget::measure("12345678901", &config);
        assert!(over.over_limit);
        assert_eq!(over.remaining(), -1);
    }

    #[test]
    fn budget_counts_characters_not_bytes() {
        let config = small_config();
        assert_eq!(CharacterBudget::measure("ñandú", &config).used, 5);
    }

    #[test]
    fn validate_rejects_blank_and_long() {
        let config = small_config();
        assert!(matches!(validate_draft("   ", &config), Err(CoreError::EmptyComment)));
        assert!(matches!(
            validate_draft("this is far too long", &config),
            Err(CoreError::CommentTooLong { len: 20, max: 10 })
        ));
        assert_eq!(validate_draft("  hola  ", &config).unwrap(), "hola");
    }

    #[test]
    fn composed_comment_is_top_level_by_current_user() {
        let config = TimelineConfig::default();
        let now = Utc.with_ymd_and_hms(2024, 2, 3, 4, 5, 6).unwrap();
        let comment = compose_comment(" hi ", &config, now).unwrap();
        assert_eq!(comment.id, now.timestamp_millis().to_string());
        assert_eq!(comment.text, "hi");
        assert_eq!(comment.author.name, "Usuario Actual");
        assert_eq!(comment.author.login_name, "i:0#.f|membership|usuario@ejemplo.com");
        assert_eq!(comment.created_date, "2024-02-03T04:05:06.000Z");
        assert!(comment.is_primary());
        assert_eq!(comment.list_id, Some(Value::from("new-comment-list")));
    }
}
