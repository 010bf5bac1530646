//! Chat message types exchanged with the chat collaborator.

use serde::{Deserialize, Serialize};

/// An inbound chat message. Only `content` is required.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    pub content: String,
}

impl ChatMessage {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Default::default()
        }
    }
}

/// A titled name/value pair inside a reply, shown as a block in chat clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplyField {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub inline: bool,
}

/// A formatted bot reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_reply_to: Option<String>,
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub body: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<ReplyField>,
    #[serde(default)]
    pub is_error: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<i32>,
}

impl ChatReply {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            in_reply_to: None,
            title: title.into(),
            body: String::new(),
            fields: Vec::new(),
            is_error: false,
            error_code: None,
        }
    }

    pub fn error(code: i32, message: String) -> Self {
        Self {
            in_reply_to: None,
            title: "Error".to_string(),
            body: message,
            fields: Vec::new(),
            is_error: true,
            error_code: Some(code),
        }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push(ReplyField {
            name: name.into(),
            value: value.into(),
            inline: false,
        });
        self
    }

    pub fn inline_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push(ReplyField {
            name: name.into(),
            value: value.into(),
            inline: true,
        });
        self
    }

    pub fn in_reply_to(mut self, id: Option<String>) -> Self {
        self.in_reply_to = id;
        self
    }

    /// Look up a field value by name.
    pub fn field_value(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
    }

    /// Plain-text rendering for terminals.
    pub fn to_text(&self) -> String {
        let mut out = format!("**{}**", self.title);
        if !self.body.is_empty() {
            out.push('\n');
            out.push_str(&self.body);
        }
        for field in &self.fields {
            out.push_str(&format!("\n\n__{}__\n{}", field.name, field.value));
        }
        out
    }
}
