//! Course ID Value Object
//!
//! Course identifiers are URL slugs (`react-nextjs-bootcamp`). They appear in
//! route paths, cookie payloads and catalog files, so the alphabet is kept
//! narrow enough to be safe in all three without escaping.
//!
//! ## Invariants
//! - Length: 1..=64
//! - Characters: `a-z`, `0-9`, `-`
//! - No leading or trailing `-`

use derive_more::Display;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const COURSE_ID_MAX_LENGTH: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CourseIdError {
    #[error("courseId is required")]
    Empty,

    #[error("courseId is too long ({length} chars, maximum {max})")]
    TooLong { length: usize, max: usize },

    #[error("courseId contains invalid character '{0}'")]
    InvalidCharacter(char),

    #[error("courseId cannot start or end with '-'")]
    InvalidEdge,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Display, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
#[display("{_0}")]
pub struct CourseId(String);

impl CourseId {
    pub fn new(input: impl AsRef<str>) -> Result<Self, CourseIdError> {
        let value = input.as_ref().trim();

        if value.is_empty() {
            return Err(CourseIdError::Empty);
        }
        let length = value.chars().count();
        if length > COURSE_ID_MAX_LENGTH {
            return Err(CourseIdError::TooLong {
                length,
                max: COURSE_ID_MAX_LENGTH,
            });
        }
        if let Some(c) = value
            .chars()
            .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-'))
        {
            return Err(CourseIdError::InvalidCharacter(c));
        }
        if value.starts_with('-') || value.ends_with('-') {
            return Err(CourseIdError::InvalidEdge);
        }

        Ok(Self(value.to_string()))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Front-end page where a PIN for this course is entered
    pub fn pin_entry_path(&self) -> String {
        format!("/courses/{}/access", self.0)
    }
}

impl TryFrom<String> for CourseId {
    type Error = CourseIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CourseId> for String {
    fn from(id: CourseId) -> Self {
        id.0
    }
}

impl AsRef<str> for CourseId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
