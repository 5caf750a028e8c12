//! Content rules shared by the post and quote composers

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why content was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Nothing left after trimming
    #[error("{0}")]
    Empty(&'static str),
    /// Shorter than the configured minimum
    #[error("{noun} must be at least {min} characters")]
    TooShort {
        /// "Post" or "Quote"
        noun: &'static str,
        /// Configured minimum
        min: usize,
    },
    /// Longer than the configured maximum
    #[error("{noun} must be at most {max} characters")]
    TooLong {
        /// "Post" or "Quote"
        noun: &'static str,
        /// Configured maximum
        max: usize,
    },
    /// Contains control characters other than newline and tab
    #[error("{0} contains unsupported characters")]
    InvalidCharacters(&'static str),
}

/// Which composer the content comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// Regular post; an empty body is fine when media is attached
    Post {
        /// Whether a media file is attached
        has_media: bool,
    },
    /// Quote post; always needs text
    Quote,
}

impl Target {
    const fn empty_message(self) -> &'static str {
        match self {
            Self::Post { .. } => "Write something or attach a file",
            Self::Quote => "Please add your thoughts",
        }
    }

    const fn noun(self) -> &'static str {
        match self {
            Self::Post { .. } => "Post",
            Self::Quote => "Quote",
        }
    }
}

/// Length and character limits for post content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentRules {
    /// Minimum length in characters for non-empty content
    #[serde(default = "default_min_chars")]
    pub min_chars: usize,
    /// Maximum length in characters
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,
}

fn default_min_chars() -> usize {
    1
}

fn default_max_chars() -> usize {
    5000
}

impl Default for ContentRules {
    fn default() -> Self {
        Self {
            min_chars: default_min_chars(),
            max_chars: default_max_chars(),
        }
    }
}

impl ContentRules {
    /// Check content and return it trimmed
    pub fn validate(&self, content: &str, target: Target) -> Result<String, ValidationError> {
        let trimmed = content.trim();
        let len = trimmed.chars().count();

        if len == 0 {
            return match target {
                Target::Post { has_media: true } => Ok(String::new()),
                _ => Err(ValidationError::Empty(target.empty_message())),
            };
        }

        if len < self.min_chars {
            return Err(ValidationError::TooShort {
                noun: target.noun(),
                min: self.min_chars,
            });
        }

        if len > self.max_chars {
            return Err(ValidationError::TooLong {
                noun: target.noun(),
                max: self.max_chars,
            });
        }

        if trimmed
            .chars()
            .any(|c| c.is_control() && c != '\n' && c != '\t')
        {
            return Err(ValidationError::InvalidCharacters(target.noun()));
        }

        Ok(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POST: Target = Target::Post { has_media: false };

    #[test]
    fn test_trims_content() {
        let rules = ContentRules::default();
        assert_eq!(rules.validate("  hello\n", POST).unwrap(), "hello");
    }

    #[test]
    fn test_empty_quote_is_rejected() {
        let rules = ContentRules::default();
        let err = rules.validate(" \n\t ", Target::Quote).unwrap_err();
        assert_eq!(err.to_string(), "Please add your thoughts");
    }

    #[test]
    fn test_empty_post_needs_media() {
        let rules = ContentRules::default();
        assert!(rules.validate("", POST).is_err());
        assert_eq!(
            rules.validate("   ", Target::Post { has_media: true }).unwrap(),
            ""
        );
    }

    #[test]
    fn test_length_limits_count_characters() {
        let rules = ContentRules {
            min_chars: 3,
            max_chars: 5,
        };
        assert_eq!(
            rules.validate("hi", POST),
            Err(ValidationError::TooShort {
                noun: "Post",
                min: 3
            })
        );
        assert_eq!(rules.validate("héllo", POST).unwrap(), "héllo");
        assert_eq!(
            rules.validate("héllo!", POST),
            Err(ValidationError::TooLong {
                noun: "Post",
                max: 5
            })
        );
    }

    #[test]
    fn test_control_characters() {
        let rules = ContentRules::default();
        assert_eq!(
            rules.validate("bad\u{7}bell", Target::Quote),
            Err(ValidationError::InvalidCharacters("Quote"))
        );
        assert!(rules.validate("line one\n\tline two", Target::Quote).is_ok());
    }

    #[test]
    fn test_quote_errors_name_the_quote() {
        let rules = ContentRules {
            min_chars: 4,
            max_chars: 6,
        };
        assert_eq!(
            rules.validate("ok", Target::Quote).unwrap_err().to_string(),
            "Quote must be at least 4 characters"
        );
        assert_eq!(
            rules.validate("far too long", Target::Quote).unwrap_err().to_string(),
            "Quote must be at most 6 characters"
        );
        assert_eq!(
            rules.validate("far too long", POST).unwrap_err().to_string(),
            "Post must be at most 6 characters"
        );
    }
}
