use serde::Serialize;
use serde_json::{Map, Value};

/// `parentId` of a top-level comment.
pub const ROOT_PARENT_ID: &str = "0";
pub const PLACEHOLDER_NAME: &str = "Usuario";
pub const PLACEHOLDER_EMAIL: &str = "usuario@ejemplo.com";
pub const DEFAULT_PRINCIPAL_TYPE: i64 = 1;

const COMMENT_KEYS: &[&str] = &[
    "id",
    "text",
    "author",
    "createdDate",
    "modifiedDate",
    "isReply",
    "parentId",
    "itemId",
    "listId",
];

const AUTHOR_KEYS: &[&str] = &[
    "id",
    "name",
    "email",
    "loginName",
    "isActive",
    "isExternal",
    "principalType",
];

/// Claims-based login name derived from an email address.
pub fn claims_login_name(email: &str) -> String {
    format!("i:0#.f|membership|{email}")
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    pub name: String,
    pub email: String,
    pub login_name: String,
    pub is_active: bool,
    pub is_external: bool,
    pub principal_type: Value,
    /// Directory identity fields (`directoryObjectId`, `jobTitle`, `userId`, ...)
    /// carried through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Author {
    /// Build an author from the raw `author` object, falling back to the
    /// comment-level `authorEmail` / `authorName` fields.
    fn from_raw(author: Option<&Map<String, Value>>, comment: &Map<String, Value>) -> Self {
        let empty = Map::new();
        let raw = author.unwrap_or(&empty);

        let email = text_field(raw, "email")
            .or_else(|| text_field(comment, "authorEmail"))
            .unwrap_or_else(|| PLACEHOLDER_EMAIL.to_string());
        let name = text_field(raw, "name")
            .or_else(|| text_field(comment, "authorName"))
            .unwrap_or_else(|| PLACEHOLDER_NAME.to_string());
        let login_name = text_field(raw, "loginName").unwrap_or_else(|| claims_login_name(&email));
        let principal_type = match raw.get("principalType") {
            Some(v) if is_truthy(v) => v.clone(),
            _ => Value::from(DEFAULT_PRINCIPAL_TYPE),
        };

        Self {
            id: present(raw, "id"),
            name,
            email,
            login_name,
            is_active: raw.get("isActive").and_then(Value::as_bool).unwrap_or(true),
            is_external: raw.get("isExternal").and_then(Value::as_bool).unwrap_or(false),
            principal_type,
            extra: unknown_fields(raw, AUTHOR_KEYS),
        }
    }
}

/// A canonical comment record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub text: String,
    pub author: Author,
    pub created_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_date: Option<Value>,
    pub is_reply: bool,
    pub parent_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_id: Option<Value>,
    /// Fields this model does not own, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Comment {
    /// Map one raw entry onto the canonical record.
    ///
    /// `index` is the entry's position in the input and seeds a missing id;
    /// `now_iso` is used when `createdDate` is absent.
    pub fn from_raw(index: usize, raw: &Map<String, Value>, now_iso: &str) -> Self {
        Self {
            id: text_field(raw, "id").unwrap_or_else(|| format!("comment-{index}")),
            text: text_field(raw, "text").unwrap_or_default(),
            author: Author::from_raw(raw.get("author").and_then(Value::as_object), raw),
            created_date: text_field(raw, "createdDate").unwrap_or_else(|| now_iso.to_string()),
            modified_date: present(raw, "modifiedDate"),
            is_reply: raw.get("isReply").is_some_and(is_truthy),
            parent_id: text_field(raw, "parentId").unwrap_or_else(|| ROOT_PARENT_ID.to_string()),
            item_id: present(raw, "itemId"),
            list_id: present(raw, "listId"),
            extra: unknown_fields(raw, COMMENT_KEYS),
        }
    }

    /// Top-level comments are rendered in the primary list; true replies are not.
    pub fn is_primary(&self) -> bool {
        !self.is_reply || self.parent_id == ROOT_PARENT_ID
    }

    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

/// Loose truthiness for flags supplied by hosts that do not always send booleans.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// A non-empty string or a number rendered as text. Anything else counts as absent.
fn text_field(map: &Map<String, Value>, key: &str) -> Option<String> {
    match map.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn present(map: &Map<String, Value>, key: &str) -> Option<Value> {
    map.get(key).filter(|v| !v.is_null()).cloned()
}

fn unknown_fields(map: &Map<String, Value>, known: &[&str]) -> Map<String, Value> {
    map.iter()
        .filter(|(k, _)| !known.contains(&k.as_str()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const NOW: &str = "2024-01-01T00:00:00.000Z";

    fn raw(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn minimal_entry_gets_documented_defaults() {
        let comment = Comment::from_raw(3, &raw(json!({})), NOW);
        assert_eq!(comment.id, "comment-3");
        assert_eq!(comment.text, "");
        assert_eq!(comment.author.name, PLACEHOLDER_NAME);
        assert_eq!(comment.author.email, PLACEHOLDER_EMAIL);
        assert_eq!(comment.author.login_name, "i:0#.f|membership|usuario@ejemplo.com");
        assert!(comment.author.is_active);
        assert!(!comment.author.is_external);
        assert_eq!(comment.author.principal_type, json!(1));
        assert_eq!(comment.created_date, NOW);
        assert!(!comment.is_reply);
        assert_eq!(comment.parent_id, ROOT_PARENT_ID);
        assert!(comment.item_id.is_none());
        assert!(comment.list_id.is_none());
    }

    #[test]
    fn empty_strings_count_as_absent() {
        let comment = Comment::from_raw(
            0,
            &raw(json!({"id": "", "author": {"name": "", "email": ""}, "createdDate": ""})),
            NOW,
        );
        assert_eq!(comment.id, "comment-0");
        assert_eq!(comment.author.name, PLACEHOLDER_NAME);
        assert_eq!(comment.author.email, PLACEHOLDER_EMAIL);
        assert_eq!(comment.created_date, NOW);
    }

    #[test]
    fn top_level_author_fallbacks() {
        let comment = Comment::from_raw(
            0,
            &raw(json!({"authorEmail": "ana@contoso.com", "authorName": "Ana"})),
            NOW,
        );
        assert_eq!(comment.author.email, "ana@contoso.com");
        assert_eq!(comment.author.name, "Ana");
        assert_eq!(comment.author.login_name, "i:0#.f|membership|ana@contoso.com");
        assert_eq!(comment.extra.get("authorEmail"), Some(&json!("ana@contoso.com")));
    }

    #[test]
    fn directory_fields_pass_through() {
        let comment = Comment::from_raw(
            0,
            &raw(json!({
                "id": 17,
                "author": {
                    "id": 12,
                    "name": "Ana",
                    "email": "ana@contoso.com",
                    "isActive": false,
                    "jobTitle": "Engineer",
                    "directoryObjectId": "abc",
                    "userPrincipalName": "ana@contoso.com"
                },
                "itemId": 5,
                "listId": "list-1",
                "mentions": []
            })),
            NOW,
        );
        assert_eq!(comment.id, "17");
        assert_eq!(comment.author.id, Some(json!(12)));
        assert!(!comment.author.is_active);
        assert_eq!(comment.author.extra.get("jobTitle"), Some(&json!("Engineer")));
        assert_eq!(comment.author.extra.get("directoryObjectId"), Some(&json!("abc")));
        assert_eq!(comment.item_id, Some(json!(5)));
        assert_eq!(comment.list_id, Some(json!("list-1")));
        assert_eq!(comment.extra.get("mentions"), Some(&json!([])));

        let value = comment.to_value().unwrap();
        assert_eq!(value["author"]["jobTitle"], json!("Engineer"));
        assert_eq!(value["mentions"], json!([]));
    }

    #[test]
    fn primary_partition_rule() {
        let top = Comment::from_raw(0, &raw(json!({"isReply": false, "parentId": "9"})), NOW);
        let rooted_reply = Comment::from_raw(1, &raw(json!({"isReply": true, "parentId": "0"})), NOW);
        let reply = Comment::from_raw(2, &raw(json!({"isReply": true, "parentId": "9"})), NOW);
        assert!(top.is_primary());
        assert!(rooted_reply.is_primary());
        assert!(!reply.is_primary());
    }

    #[test]
    fn truthiness() {
        assert!(is_truthy(&json!(true)));
        assert!(is_truthy(&json!("yes")));
        assert!(is_truthy(&json!(1)));
        assert!(is_truthy(&json!({})));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&Value::Null));
    }
}
