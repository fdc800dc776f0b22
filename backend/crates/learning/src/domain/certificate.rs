//! Certificate Emitter
//!
//! `render` is a pure function of its inputs. Issued certificates are signed
//! with HMAC-SHA256 over their canonical fields, so a presented certificate
//! can be checked against the issuing server's key.

use askama::Template;
use chrono::NaiveDate;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use platform::crypto::{constant_time_eq, from_base64_url, hmac_sha256, random_hex, to_base64_url};

use crate::domain::quiz::QuizScore;

pub const STUDENT_NAME_MAX_CHARS: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StudentNameError {
    #[error("studentName is required")]
    Empty,

    #[error("studentName is too long (maximum {max} characters)")]
    TooLong { max: usize },

    #[error("studentName contains control characters")]
    ControlCharacter,
}

/// Name printed on a certificate
#[derive(Debug, Clone, PartialEq, Eq, Display)]
#[display("{_0}")]
pub struct StudentName(String);

impl StudentName {
    pub fn new(input: &str) -> Result<Self, StudentNameError> {
        let value = input.trim();
        if value.is_empty() {
            return Err(StudentNameError::Empty);
        }
        if value.chars().count() > STUDENT_NAME_MAX_CHARS {
            return Err(StudentNameError::TooLong {
                max: STUDENT_NAME_MAX_CHARS,
            });
        }
        if value.chars().any(char::is_control) {
            return Err(StudentNameError::ControlCharacter);
        }
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
pub enum Grade {
    Distinction,
    Merit,
    Pass,
}

impl Grade {
    pub fn from_percentage(percentage: u8) -> Self {
        match percentage {
            90.. => Grade::Distinction,
            80..=89 => Grade::Merit,
            _ => Grade::Pass,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateArtifact {
    pub certificate_id: String,
    pub student_name: String,
    pub course_title: String,
    pub completion_date: NaiveDate,
    pub grade: Grade,
    pub percentage: u8,
}

/// Build a certificate from a passing final assessment score.
pub fn render(
    student_name: &StudentName,
    course_title: &str,
    completion_date: NaiveDate,
    score: &QuizScore,
    certificate_id: String,
) -> CertificateArtifact {
    CertificateArtifact {
        certificate_id,
        student_name: student_name.as_str().to_string(),
        course_title: course_title.to_string(),
        completion_date,
        grade: Grade::from_percentage(score.percentage),
        percentage: score.percentage,
    }
}

/// `CERT-{yyyymmdd}-{8 hex}`
pub fn new_certificate_id(date: NaiveDate) -> String {
    format!(
        "CERT-{}-{}",
        date.format("%Y%m%d"),
        random_hex(4).to_uppercase()
    )
}

impl CertificateArtifact {
    /// Unambiguous encoding of the signed fields (a JSON array)
    fn canonical_payload(&self) -> String {
        serde_json::json!([
            self.certificate_id,
            self.student_name,
            self.course_title,
            self.completion_date.to_string(),
            self.grade.to_string(),
            self.percentage,
        ])
        .to_string()
    }

    pub fn sign(&self, secret: &[u8; 32]) -> String {
        to_base64_url(&hmac_sha256(secret, self.canonical_payload().as_bytes()))
    }

    pub fn verify(&self, secret: &[u8; 32], signature: &str) -> bool {
        let Ok(presented) = from_base64_url(signature) else {
            return false;
        };
        let expected = hmac_sha256(secret, self.canonical_payload().as_bytes());
        constant_time_eq(&expected, &presented)
    }

    /// Self-contained HTML document; askama escapes every field.
    pub fn render_html(&self, issuer: &str) -> Result<String, askama::Error> {
        CertificateTemplate {
            artifact: self,
            completion_date: self.completion_date.format("%B %-d, %Y").to_string(),
            issuer,
        }
        .render()
    }
}

#[derive(Template)]
#[template(path = "certificate.html")]
struct CertificateTemplate<'a> {
    artifact: &'a CertificateArtifact,
    completion_date: String,
    issuer: &'a str,
}
