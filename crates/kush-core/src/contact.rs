#![forbid(unsafe_code)]

//! "Contact us" form: validation, request body, mail fallback, and the
//! endpoint's JSON reply.

use serde::{Deserialize, Serialize};

use crate::encode::{encode_uri_component, form_body};

pub const DEFAULT_MAIL_RECIPIENT: &str = "hello@kushstore.example";
pub const INCOMPLETE_MESSAGE: &str = "Please complete all fields including phone number.";

const SENT_FALLBACK: &str = "Thank you! Your message has been sent.";
const REJECTED_FALLBACK: &str = "Sorry, your message could not be sent. Please try again.";

/// Errors from the contact flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactError {
    /// One or more fields were blank after trimming.
    Incomplete { missing: Vec<&'static str> },
    /// The endpoint answered with something other than the expected JSON.
    MalformedReply(String),
}

impl core::fmt::Display for ContactError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Incomplete { .. } => f.write_str(INCOMPLETE_MESSAGE),
            Self::MalformedReply(msg) => write!(f, "malformed contact reply: {msg}"),
        }
    }
}

impl std::error::Error for ContactError {}

/// Raw field values as typed into the form.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub message: String,
}

/// A form whose fields are all present, trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidContact {
    name: String,
    email: String,
    phone: String,
    message: String,
}

impl ContactForm {
    /// Trim every field and require all four.
    pub fn validate(&self) -> Result<ValidContact, ContactError> {
        let fields = [
            ("name", self.name.trim()),
            ("email", self.email.trim()),
            ("phone", self.phone.trim()),
            ("message", self.message.trim()),
        ];
        let missing: Vec<&'static str> = fields
            .iter()
            .filter(|(_, value)| value.is_empty())
            .map(|(field, _)| *field)
            .collect();
        if !missing.is_empty() {
            return Err(ContactError::Incomplete { missing });
        }
        let [name, email, phone, message] = fields.map(|(_, value)| value.to_string());
        Ok(ValidContact {
            name,
            email,
            phone,
            message,
        })
    }
}

impl ValidContact {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// `application/x-www-form-urlencoded` body for the contact endpoint.
    #[must_use]
    pub fn form_body(&self) -> String {
        form_body([
            ("name", self.name.as_str()),
            ("email", self.email.as_str()),
            ("phone", self.phone.as_str()),
            ("message", self.message.as_str()),
        ])
    }

    /// `mailto:` link used when no contact endpoint is configured.
    #[must_use]
    pub fn mailto(&self, recipient: &str) -> String {
        let subject = encode_uri_component(&format!("Website message from {}", self.name));
        let body = encode_uri_component(&format!(
            "Name: {}\nEmail: {}\nPhone: {}\n\n{}",
            self.name, self.email, self.phone, self.message
        ));
        format!("mailto:{recipient}?subject={subject}&body={body}")
    }
}

/// JSON reply of the contact endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContactReply {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ContactReply {
    pub fn from_json(body: &str) -> Result<Self, ContactError> {
        serde_json::from_str(body).map_err(|e| ContactError::MalformedReply(e.to_string()))
    }

    /// Text for the notice shown after submission.
    #[must_use]
    pub fn notice_text(&self) -> String {
        if self.success {
            self.message.clone().unwrap_or_else(|| SENT_FALLBACK.to_string())
        } else {
            self.error
                .clone()
                .or_else(|| self.message.clone())
                .unwrap_or_else(|| REJECTED_FALLBACK.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn filled() -> ContactForm {
        ContactForm {
            name: " Ama ".into(),
            email: "ama@example.com".into(),
            phone: "+250 700 000".into(),
            message: "Do you ship to Kigali?".into(),
        }
    }

    #[test]
    fn blank_fields_are_reported() {
        let form = ContactForm {
            phone: "   ".into(),
            message: String::new(),
            ..filled()
        };
        let err = form.validate().unwrap_err();
        assert_eq!(
            err,
            ContactError::Incomplete {
                missing: vec!["phone", "message"]
            }
        );
        assert_eq!(err.to_string(), INCOMPLETE_MESSAGE);
    }

    #[test]
    fn valid_form_is_trimmed_and_encoded() {
        let valid = filled().validate().expect("valid");
        assert_eq!(valid.name(), "Ama");
        assert_eq!(
            valid.form_body(),
            "name=Ama&email=ama%40example.com&phone=%2B250+700+000&message=Do+you+ship+to+Kigali%3F"
        );
    }

    #[test]
    fn mailto_fallback() {
        let valid = filled().validate().expect("valid");
        assert_eq!(
            valid.mailto(DEFAULT_MAIL_RECIPIENT),
            "mailto:hello@kushstore.example?subject=Website%20message%20from%20Ama\
             &body=Name%3A%20Ama%0AEmail%3A%20ama%40example.com%0APhone%3A%20%2B250%20700%20000%0A%0ADo%20you%20ship%20to%20Kigali%3F"
        );
    }

    #[test]
    fn reply_notice_text() {
        let ok = ContactReply::from_json(r#"{"success":true,"message":"Sent!"}"#).unwrap();
        assert_eq!(ok.notice_text(), "Sent!");
        let failed = ContactReply::from_json(r#"{"success":false,"error":"Invalid email"}"#).unwrap();
        assert_eq!(failed.notice_text(), "Invalid email");
        let bare = ContactReply::from_json(r#"{"success":false}"#).unwrap();
        assert_eq!(bare.notice_text(), REJECTED_FALLBACK);
    }

    #[test]
    fn malformed_reply() {
        assert!(matches!(
            ContactReply::from_json("<html>"),
            Err(ContactError::MalformedReply(_))
        ));
    }
}
