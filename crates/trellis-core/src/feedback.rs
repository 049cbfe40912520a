//! Feedback form, sent through the user's mail client.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::FeedbackError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackCategory {
    Bug,
    Feature,
    #[default]
    General,
}

impl FeedbackCategory {
    pub const ALL: [FeedbackCategory; 3] = [
        FeedbackCategory::Bug,
        FeedbackCategory::Feature,
        FeedbackCategory::General,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FeedbackCategory::Bug => "bug",
            FeedbackCategory::Feature => "feature",
            FeedbackCategory::General => "general",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(name.trim()))
    }
}

impl fmt::Display for FeedbackCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Feedback {
    pub category: FeedbackCategory,
    pub message: String,
    /// Optional reply address, passed through as typed.
    #[serde(default)]
    pub reply_to: Option<String>,
}

impl Feedback {
    pub fn new(category: FeedbackCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
            reply_to: None,
        }
    }

    pub fn with_reply_to(mut self, address: impl Into<String>) -> Self {
        let address = address.into();
        self.reply_to = (!address.trim().is_empty()).then_some(address);
        self
    }

    pub fn validate(&self) -> Result<(), FeedbackError> {
        if self.message.trim().is_empty() {
            return Err(FeedbackError::EmptyMessage);
        }
        Ok(())
    }

    /// Build the `mailto:` link, rejecting an empty message.
    pub fn to_mailto(&self, recipient: &str) -> Result<String, FeedbackError> {
        self.validate()?;

        let subject = format!("HTML Editor Feedback: {}", self.category);
        let mut body = format!("Message:\n{}", self.message);
        if let Some(from) = &self.reply_to {
            body.push_str("\n\nFrom: ");
            body.push_str(from);
        }

        Ok(format!(
            "mailto:{}?subject={}&body={}",
            recipient,
            urlencoding::encode(&subject),
            urlencoding::encode(&body)
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mailto_layout() {
        let link = Feedback::new(FeedbackCategory::Bug, "it broke")
            .with_reply_to("me@example.com")
            .to_mailto("team@example.com")
            .unwrap();
        assert_eq!(
            link,
            "mailto:team@example.com?subject=HTML%20Editor%20Feedback%3A%20bug\
             &body=Message%3A%0Ait%20broke%0A%0AFrom%3A%20me%40example.com"
        );
    }

    #[test]
    fn test_blank_reply_to_is_dropped() {
        let feedback = Feedback::new(FeedbackCategory::General, "hi").with_reply_to("  ");
        assert_eq!(feedback.reply_to, None);
        assert!(!feedback.to_mailto("a@b").unwrap().contains("From"));
    }

    #[test]
    fn test_empty_message_rejected() {
        let feedback = Feedback::new(FeedbackCategory::Feature, "   \n");
        assert_eq!(feedback.to_mailto("a@b"), Err(FeedbackError::EmptyMessage));
        assert_eq!(FeedbackError::EmptyMessage.to_string(), "Please enter a message.");
    }

    #[test]
    fn test_category_names() {
        assert_eq!(FeedbackCategory::from_name("Feature"), Some(FeedbackCategory::Feature));
        assert_eq!(FeedbackCategory::from_name("praise"), None);
    }
}
