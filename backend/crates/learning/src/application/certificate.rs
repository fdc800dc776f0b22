//! Certificate Use Cases

use std::sync::Arc;

use access::domain::value_object::{CourseId, DeviceId};
use chrono::Utc;

use crate::application::config::LearningConfig;
use crate::application::progress::find_course;
use crate::domain::catalog::CourseCatalog;
use crate::domain::certificate::{self, CertificateArtifact, StudentName};
use crate::domain::repository::ProgressRepository;
use crate::error::{LearningError, LearningResult};

#[derive(Debug, Clone)]
pub struct IssueCertificateOutput {
    pub certificate: CertificateArtifact,
    pub signature: String,
    pub html: String,
}

pub struct IssueCertificateUseCase<R>
where
    R: ProgressRepository,
{
    repo: Arc<R>,
    catalog: Arc<CourseCatalog>,
    config: Arc<LearningConfig>,
}

impl<R> IssueCertificateUseCase<R>
where
    R: ProgressRepository,
{
    pub fn new(repo: Arc<R>, catalog: Arc<CourseCatalog>, config: Arc<LearningConfig>) -> Self {
        Self {
            repo,
            catalog,
            config,
        }
    }

    /// Issue a signed certificate; the session must have reached `Certificate`.
    pub async fn execute(
        &self,
        course_id: &CourseId,
        device_id: &DeviceId,
        student_name: &str,
    ) -> LearningResult<IssueCertificateOutput> {
        let student_name = StudentName::new(student_name)?;
        let course = find_course(&self.catalog, course_id)?;

        let session = self
            .repo
            .load(course_id, device_id)
            .await?
            .ok_or(LearningError::CertificateNotEarned)?;
        let score = match session.final_score() {
            Some(score) if session.is_complete() => *score,
            _ => return Err(LearningError::CertificateNotEarned),
        };

        let today = Utc::now().date_naive();
        let artifact = certificate::render(
            &student_name,
            &course.title,
            today,
            &score,
            certificate::new_certificate_id(today),
        );
        let signature = artifact.sign(&self.config.certificate_secret);
        let html = artifact
            .render_html(&self.config.issuer)
            .map_err(|e| LearningError::Internal(e.to_string()))?;

        tracing::info!(
            course_id = %course_id,
            certificate_id = %artifact.certificate_id,
            grade = %artifact.grade,
            "Certificate issued"
        );

        Ok(IssueCertificateOutput {
            certificate: artifact,
            signature,
            html,
        })
    }
}

pub struct VerifyCertificateUseCase {
    config: Arc<LearningConfig>,
}

impl VerifyCertificateUseCase {
    pub fn new(config: Arc<LearningConfig>) -> Self {
        Self { config }
    }

    pub fn execute(&self, certificate: &CertificateArtifact, signature: &str) -> bool {
        let valid = certificate.verify(&self.config.certificate_secret, signature);
        if !valid {
            tracing::warn!(
                certificate_id = %certificate.certificate_id,
                "Certificate verification failed"
            );
        }
        valid
    }
}
