use serde_json::{json, Value};
use timeline_engine::RequestPayload;

/// How the simulated workflow answers a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    /// Success with the full collection as array text.
    Collection,
    /// Success with `{ "value": [...] }`.
    Wrapped,
    /// Success with just the created record.
    Single,
    /// Success whose payload cannot be decoded.
    Garbled,
    /// The workflow failed.
    Failure,
}

/// Stand-in for the external workflow and the list it writes to.
pub struct SimulatedWorkflow {
    comments: Vec<Value>,
    created: u32,
}

impl Default for SimulatedWorkflow {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedWorkflow {
    pub fn new() -> Self {
        Self::with_comments(Vec::new())
    }

    pub fn with_comments(comments: Vec<Value>) -> Self {
        Self { comments, created: 0 }
    }

    /// The stored collection as the host would bind it.
    pub fn comments_json(&self) -> String {
        Value::Array(self.comments.clone()).to_string()
    }

    pub fn len(&self) -> usize {
        self.comments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }

    /// Execute `request` and produce the flow return text for the host.
    pub fn handle(&mut self, request: &RequestPayload, reply: Reply) -> String {
        if reply == Reply::Failure {
            return json!({ "operationId": request.operation_id, "error": true }).to_string();
        }

        self.created += 1;
        let record = json!({
            "id": format!("srv-{}", self.created),
            "text": request.text,
            "author": { "name": "Ana Ruiz", "email": "ana@contoso.com", "jobTitle": "Ops" },
            "createdDate": format!("2030-01-01T10:{:02}:00.000Z", self.created % 60),
            "isReply": false,
            "parentId": "0",
            "itemId": request.record_id,
        });
        self.comments.insert(0, record.clone());

        let payload = match reply {
            Reply::Collection => Value::String(self.comments_json()),
            Reply::Wrapped => json!({ "value": self.comments }),
            Reply::Single => record,
            Reply::Garbled => Value::String("<html>502 Bad Gateway</html>".into()),
            Reply::Failure => Value::Null,
        };
        json!({ "operationId": request.operation_id, "error": false, "payload": payload }).to_string()
    }
}
