//! Comment normalizer: host text in, canonical ordered records out.
//!
//! Pure apart from reading the clock for missing `createdDate` values, which
//! [`normalize_at`] lets callers pin.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::comment::Comment;
use crate::timestamp::{parse_timestamp, to_iso};
use crate::wire;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedComments {
    /// Top-level comments, most recent first.
    pub primary: Vec<Comment>,
    /// Replies to another comment, in input order.
    pub replies: Vec<Comment>,
}

impl NormalizedComments {
    pub fn total_count(&self) -> usize {
        self.primary.len() + self.replies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total_count() == 0
    }

    /// Canonical bare-array text of `primary` followed by `replies`.
    pub fn to_canonical_text(&self) -> Result<String, serde_json::Error> {
        let entries = self
            .primary
            .iter()
            .chain(self.replies.iter())
            .map(Comment::to_value)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(wire::to_canonical_text(&entries))
    }
}

/// Normalize host text using the current time for missing dates.
pub fn normalize(raw: &str) -> NormalizedComments {
    normalize_at(raw, Utc::now())
}

/// Normalize host text. Unreadable input yields an empty result.
pub fn normalize_at(raw: &str, now: DateTime<Utc>) -> NormalizedComments {
    normalize_entries(&wire::entries_or_empty(raw), now)
}

/// Normalize already-decoded entries.
pub fn normalize_entries(entries: &[Value], now: DateTime<Utc>) -> NormalizedComments {
    let now_iso = to_iso(now);
    let mut primary = Vec::new();
    let mut replies = Vec::new();

    for (index, entry) in entries.iter().enumerate() {
        let Some(raw) = entry.as_object() else {
            tracing::debug!(index, kind = wire::json_kind(entry), "skipping non-object comment entry");
            continue;
        };
        let comment = Comment::from_raw(index, raw, &now_iso);
        if comment.is_primary() {
            primary.push(comment);
        } else {
            replies.push(comment);
        }
    }

    sort_most_recent_first(&mut primary);
    NormalizedComments { primary, replies }
}

/// Stable descending sort by `createdDate`; undated entries go last.
fn sort_most_recent_first(comments: &mut [Comment]) {
    // Option orders None below Some, so reversing the comparison sinks None.
    comments.sort_by_cached_key(|c| std::cmp::Reverse(parse_timestamp(&c.created_date)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn ids(comments: &[Comment]) -> Vec<&str> {
        comments.iter().map(|c| c.id.as_str()).collect()
    }

    #[test]
    fn both_wire_shapes_normalize_identically() {
        let body = r#"[
            {"id":"a","text":"first","createdDate":"2024-01-01T10:00:00Z"},
            {"id":"b","text":"second","createdDate":"2024-01-02T10:00:00Z"}
        ]"#;
        let wrapped = format!(r#"{{"value":{body}}}"#);
        assert_eq!(normalize_at(body, now()), normalize_at(&wrapped, now()));
    }

    #[test]
    fn sorts_most_recent_first() {
        let result = normalize_at(
            r#"[
                {"id":"old","createdDate":"2024-01-01T10:00:00Z"},
                {"id":"new","createdDate":"2024-03-01T10:00:00Z"},
                {"id":"mid","createdDate":"2024-02-01T10:00:00Z"}
            ]"#,
            now(),
        );
        assert_eq!(ids(&result.primary), vec!["new", "mid", "old"]);
    }

    #[test]
    fn equal_timestamps_keep_input_order() {
        let result = normalize_at(
            r#"[
                {"id":"x","createdDate":"2024-01-01T10:00:00Z"},
                {"id":"late","createdDate":"2024-05-01T10:00:00Z"},
                {"id":"y","createdDate":"2024-01-01T10:00:00Z"},
                {"id":"z","createdDate":"2024-01-01T10:00:00Z"}
            ]"#,
            now(),
        );
        assert_eq!(ids(&result.primary), vec!["late", "x", "y", "z"]);
    }

    #[test]
    fn undated_entries_sink_in_input_order() {
        let result = normalize_at(
            r#"[
                {"id":"bad1","createdDate":"someday"},
                {"id":"ok","createdDate":"2024-01-01T10:00:00Z"},
                {"id":"bad2","createdDate":"never"}
            ]"#,
            now(),
        );
        assert_eq!(ids(&result.primary), vec!["ok", "bad1", "bad2"]);
    }

    #[test]
    fn replies_are_partitioned_out() {
        let result = normalize_at(
            r#"[
                {"id":"top","createdDate":"2024-01-01T10:00:00Z"},
                {"id":"r1","isReply":true,"parentId":"top"},
                {"id":"rooted","isReply":true,"parentId":"0","createdDate":"2024-01-02T10:00:00Z"}
            ]"#,
            now(),
        );
        assert_eq!(ids(&result.primary), vec!["rooted", "top"]);
        assert_eq!(ids(&result.replies), vec!["r1"]);
        assert_eq!(result.total_count(), 3);
    }

    #[test]
    fn malformed_input_is_empty() {
        for raw in ["", "   ", "{oops", "\"text\"", "17", r#"{"items":[]}"#, "null"] {
            assert!(normalize_at(raw, now()).is_empty(), "expected empty for {raw:?}");
        }
    }

    #[test]
    fn non_object_entries_are_skipped_but_keep_positions() {
        let result = normalize_at(r#"[1, null, {"text":"kept"}]"#, now());
        assert_eq!(result.total_count(), 1);
        assert_eq!(result.primary[0].id, "comment-2");
    }

    #[test]
    fn missing_date_uses_now() {
        let result = normalize_at(r#"[{"text":"x"}]"#, now());
        assert_eq!(result.primary[0].created_date, "2024-06-01T12:00:00.000Z");
    }

    #[test]
    fn renormalizing_canonical_output_is_stable() {
        let first = normalize_at(
            r#"{"value":[
                {"text":"no id","createdDate":"2024-01-01T10:00:00Z"},
                {"id":"r","isReply":true,"parentId":"p"},
                {"id":"b","createdDate":"2024-01-03T10:00:00Z","author":{"name":"Ana","jobTitle":"Dev"}},
                {"id":"c","createdDate":"2024-01-03T10:00:00Z"}
            ]}"#,
            now(),
        );
        let text = first.to_canonical_text().unwrap();
        let second = normalize_at(&text, now());
        assert_eq!(ids(&first.primary), ids(&second.primary));
        assert_eq!(ids(&first.replies), ids(&second.replies));
        assert_eq!(first, second);
    }

    #[test]
    fn decoded_entries_can_be_normalized_directly() {
        let entries = vec![json!({"id": "1", "text": "hola"})];
        let result = normalize_entries(&entries, now());
        assert_eq!(result.primary[0].text, "hola");
    }
}
