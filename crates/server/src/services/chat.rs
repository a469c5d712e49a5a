//! Scripted chat responder.
//!
//! Replies are picked by keyword from a fixed set. Only the fallback
//! category involves randomness.

use rand::Rng;
use serde_json::Value;
use thiserror::Error;

/// Maximum message length in characters, after trimming.
pub const MAX_MESSAGE_CHARS: usize = 500;

/// How much of the message the fallback replies quote.
const QUOTE_CHARS: usize = 30;

/// Chat input rejected before a reply is generated.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum MessageError {
    #[error("Message is required and must be a string")]
    Missing,

    #[error("Message cannot be empty")]
    Empty,

    #[error("Message too long (max {max} characters)")]
    TooLong { max: usize },
}

/// Validate a raw `message` field and return it trimmed.
///
/// # Errors
///
/// Returns `MessageError::Missing` for an absent or non-string value,
/// `Empty` if nothing is left after trimming and `TooLong` past
/// [`MAX_MESSAGE_CHARS`].
pub fn validate_message(message: Option<&Value>) -> Result<&str, MessageError> {
    let trimmed = message
        .and_then(Value::as_str)
        .ok_or(MessageError::Missing)?
        .trim();

    if trimmed.is_empty() {
        return Err(MessageError::Empty);
    }
    if trimmed.chars().count() > MAX_MESSAGE_CHARS {
        return Err(MessageError::TooLong {
            max: MAX_MESSAGE_CHARS,
        });
    }
    Ok(trimmed)
}

/// Which branch of the script produced a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyCategory {
    Greeting,
    Help,
    Pricing,
    Integration,
    Thanks,
    General,
}

impl ReplyCategory {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Greeting => "greeting",
            Self::Help => "help",
            Self::Pricing => "pricing",
            Self::Integration => "integration",
            Self::Thanks => "thanks",
            Self::General => "general",
        }
    }
}

/// A generated reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub category: ReplyCategory,
    pub text: String,
}

/// Reply to `message` from `username` using the thread-local RNG.
#[must_use]
pub fn respond(username: &str, message: &str) -> Reply {
    respond_with(username, message, &mut rand::rng())
}

/// Reply to `message` from `username`, drawing fallback templates from `rng`.
pub fn respond_with<R: Rng>(username: &str, message: &str, rng: &mut R) -> Reply {
    let category = classify(message);

    let text = match category {
        ReplyCategory::Greeting => format!(
            "Hello {username}! 👋 Welcome to Beverly Technologies. How can I assist you today?"
        ),
        ReplyCategory::Help => "I can help you with:\n\
             • Navigating the marketplace\n\
             • Finding AI tools\n\
             • Account questions\n\
             • Technical support\n\n\
             What do you need help with?"
            .to_string(),
        ReplyCategory::Pricing => "Our marketplace offers tools ranging from $29.99 to $99.99. \
             We also offer enterprise pricing for bulk purchases. \
             Would you like to see specific products?"
            .to_string(),
        ReplyCategory::Integration => "All our products come with comprehensive API documentation \
             and SDKs. You can find integration guides in the product details or visit our API \
             docs section."
            .to_string(),
        ReplyCategory::Thanks => {
            "You're welcome! 😊 Feel free to ask if you need anything else.".to_string()
        }
        ReplyCategory::General => general(message, rng),
    };

    Reply { category, text }
}

fn classify(message: &str) -> ReplyCategory {
    let lower = message.to_lowercase();
    let has_word = |word: &str| {
        lower
            .split(|c: char| !c.is_alphanumeric())
            .any(|w| w == word)
    };

    if lower.contains("hello") || has_word("hi") || has_word("hey") {
        ReplyCategory::Greeting
    } else if lower.contains("help") {
        ReplyCategory::Help
    } else if lower.contains("price") || lower.contains("cost") {
        ReplyCategory::Pricing
    } else if lower.contains("api") || lower.contains("integration") {
        ReplyCategory::Integration
    } else if lower.contains("thank") {
        ReplyCategory::Thanks
    } else {
        ReplyCategory::General
    }
}

fn general<R: Rng>(message: &str, rng: &mut R) -> String {
    let quote: String = message.chars().take(QUOTE_CHARS).collect();

    match rng.random_range(0..5) {
        0 => format!("That's an interesting question about \"{quote}...\". Let me help you with that."),
        1 => format!(
            "I understand you're asking about \"{quote}...\". Here's what I can tell you..."
        ),
        2 => format!(
            "Great question! Regarding \"{quote}...\", our platform offers several solutions."
        ),
        3 => format!(
            "I'd be happy to help with \"{quote}...\". This is something our AI tools handle well."
        ),
        _ => format!("Thanks for asking about \"{quote}...\". Let me provide some insights..."),
    }
}

/// Truncate a message for log output.
#[must_use]
pub fn preview(message: &str, max_chars: usize) -> String {
    message.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_validate_message() {
        assert_eq!(validate_message(Some(&json!("  hello  "))), Ok("hello"));
        assert_eq!(validate_message(None), Err(MessageError::Missing));
        assert_eq!(validate_message(Some(&json!(42))), Err(MessageError::Missing));
        assert_eq!(validate_message(Some(&json!(null))), Err(MessageError::Missing));
        assert_eq!(validate_message(Some(&json!("   "))), Err(MessageError::Empty));
        assert_eq!(
            validate_message(Some(&json!("a".repeat(501)))),
            Err(MessageError::TooLong { max: 500 })
        );
        // Exactly 500 after trimming is fine
        let padded = format!("  {}  ", "a".repeat(500));
        assert!(validate_message(Some(&json!(padded))).is_ok());
    }

    #[test]
    fn test_keyword_categories() {
        let cases = [
            ("Hello there", ReplyCategory::Greeting),
            ("hi", ReplyCategory::Greeting),
            ("Hey, anyone around?", ReplyCategory::Greeting),
            ("I need help", ReplyCategory::Help),
            ("What does it cost?", ReplyCategory::Pricing),
            ("What is the price?", ReplyCategory::Pricing),
            ("Do you have an API?", ReplyCategory::Integration),
            ("thanks a lot", ReplyCategory::Thanks),
            ("Tell me about this", ReplyCategory::General),
        ];
        for (message, expected) in cases {
            assert_eq!(respond("alice", message).category, expected, "{message}");
        }
    }

    #[test]
    fn test_hi_inside_a_word_is_not_a_greeting() {
        // "this" and "which" contain "hi"
        assert_eq!(classify("which one is this"), ReplyCategory::General);
    }

    #[test]
    fn test_greeting_uses_username() {
        let reply = respond("alice", "hello");
        assert!(reply.text.starts_with("Hello alice!"));
    }

    #[test]
    fn test_general_reply_quotes_first_30_chars() {
        let mut rng = StdRng::seed_from_u64(7);
        let message = "Tell me everything about quantum widgets and their uses";
        for _ in 0..20 {
            let reply = respond_with("alice", message, &mut rng);
            assert_eq!(reply.category, ReplyCategory::General);
            assert!(reply.text.contains("\"Tell me everything about quant...\""));
        }
    }

    #[test]
    fn test_preview_counts_characters() {
        assert_eq!(preview("héllo wörld", 5), "héllo");
        assert_eq!(preview("short", 50), "short");
    }
}
