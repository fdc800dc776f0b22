//! Cross-layer tests for the learning crate: use cases against the built-in
//! catalog, and the HTTP router mounted behind the access gate.

#[cfg(test)]
mod support {
    use crate::domain::catalog::{Course, CourseCatalog, QuizQuestion};
    use access::domain::value_object::CourseId;

    pub const COURSE: &str = "react-nextjs-bootcamp";

    pub fn catalog() -> CourseCatalog {
        CourseCatalog::builtin().unwrap()
    }

    pub fn course(catalog: &CourseCatalog) -> &Course {
        catalog.get(&CourseId::new(COURSE).unwrap()).unwrap()
    }

    pub fn correct_answers(questions: &[QuizQuestion]) -> Vec<usize> {
        questions.iter().map(|q| q.correct_option).collect()
    }

    /// Answers with only the first `correct` questions right
    pub fn answers_with(questions: &[QuizQuestion], correct: usize) -> Vec<usize> {
        questions
            .iter()
            .enumerate()
            .map(|(i, q)| {
                if i < correct {
                    q.correct_option
                } else {
                    (q.correct_option + 1) % q.options.len()
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod use_case_tests {
    use std::sync::Arc;

    use access::domain::value_object::{CourseId, DeviceId};

    use super::support::*;
    use crate::application::{
        AdvanceProgressUseCase, GetProgressUseCase, IssueCertificateUseCase, LearningConfig,
        ProgressCommand, ResetProgressUseCase, VerifyCertificateUseCase,
    };
    use crate::domain::certificate::Grade;
    use crate::domain::progression::{ProgressionError, Stage};
    use crate::domain::quiz::QuizError;
    use crate::error::LearningError;
    use crate::infra::memory::InMemoryProgressRepository;

    struct Fixture {
        advance: AdvanceProgressUseCase<InMemoryProgressRepository>,
        issue: IssueCertificateUseCase<InMemoryProgressRepository>,
        repo: Arc<InMemoryProgressRepository>,
        catalog: Arc<crate::domain::catalog::CourseCatalog>,
        config: Arc<LearningConfig>,
        course_id: CourseId,
        device_id: DeviceId,
    }

    fn fixture() -> Fixture {
        let repo = Arc::new(InMemoryProgressRepository::new());
        let catalog = Arc::new(catalog());
        let config = Arc::new(LearningConfig::with_random_secret());
        Fixture {
            advance: AdvanceProgressUseCase::new(repo.clone(), catalog.clone()),
            issue: IssueCertificateUseCase::new(repo.clone(), catalog.clone(), config.clone()),
            repo,
            catalog,
            config,
            course_id: CourseId::new(COURSE).unwrap(),
            device_id: DeviceId::new("device-a").unwrap(),
        }
    }

    impl Fixture {
        async fn run(&self, command: ProgressCommand) -> Result<crate::application::ProgressOutput, LearningError> {
            self.advance
                .execute(&self.course_id, &self.device_id, command)
                .await
        }

        async fn pass_module(&self, module: u32) -> Stage {
            let questions = course(&self.catalog).module(module).unwrap().questions.clone();
            self.run(ProgressCommand::CompleteModule(module)).await.unwrap();
            let output = self
                .run(ProgressCommand::SubmitModuleQuiz {
                    module,
                    answers: correct_answers(&questions),
                })
                .await
                .unwrap();
            output.session.stage()
        }
    }

    #[tokio::test]
    async fn test_full_course_journey() {
        let f = fixture();
        for module in 1..=5 {
            assert_eq!(f.pass_module(module).await, Stage::Module(module + 1));
        }

        // Module 6 quiz: 1 of 2 correct fails and stays on module 6
        let questions = course(&f.catalog).module(6).unwrap().questions.clone();
        f.run(ProgressCommand::CompleteModule(6)).await.unwrap();
        let output = f
            .run(ProgressCommand::SubmitModuleQuiz {
                module: 6,
                answers: answers_with(&questions, 1),
            })
            .await
            .unwrap();
        let score = output.score.unwrap();
        assert!(!score.passed);
        assert_eq!(score.percentage, 50);
        assert_eq!(output.session.stage(), Stage::Module(6));
        assert_eq!(output.session.completed().len(), 5);

        assert_eq!(f.pass_module(6).await, Stage::FinalAssessment);

        // Final assessment: 3 of 5 fails and returns to module 6
        let final_questions = course(&f.catalog).final_assessment.clone();
        let output = f
            .run(ProgressCommand::SubmitFinalAssessment {
                answers: answers_with(&final_questions, 3),
            })
            .await
            .unwrap();
        assert_eq!(output.score.unwrap().percentage, 60);
        assert_eq!(output.session.stage(), Stage::Module(6));

        f.run(ProgressCommand::StartFinalAssessment).await.unwrap();
        let output = f
            .run(ProgressCommand::SubmitFinalAssessment {
                answers: correct_answers(&final_questions),
            })
            .await
            .unwrap();
        assert_eq!(output.session.stage(), Stage::Certificate);
        assert_eq!(output.session.final_attempts(), 2);

        let issued = f
            .issue
            .execute(&f.course_id, &f.device_id, "Ada Obi")
            .await
            .unwrap();
        assert_eq!(issued.certificate.grade, Grade::Distinction);
        assert_eq!(issued.certificate.course_title, "React & Next.js Bootcamp");
        assert!(issued.certificate.certificate_id.starts_with("CERT-"));
        assert!(issued.html.contains("Ada Obi"));

        let verify = VerifyCertificateUseCase::new(f.config.clone());
        assert!(verify.execute(&issued.certificate, &issued.signature));
    }

    #[tokio::test]
    async fn test_certificate_requires_completion() {
        let f = fixture();
        let err = f
            .issue
            .execute(&f.course_id, &f.device_id, "Ada Obi")
            .await
            .unwrap_err();
        assert!(matches!(err, LearningError::CertificateNotEarned));

        f.pass_module(1).await;
        let err = f
            .issue
            .execute(&f.course_id, &f.device_id, "Ada Obi")
            .await
            .unwrap_err();
        assert!(matches!(err, LearningError::CertificateNotEarned));
    }

    #[tokio::test]
    async fn test_certificate_rejects_blank_name() {
        let f = fixture();
        let err = f
            .issue
            .execute(&f.course_id, &f.device_id, "  ")
            .await
            .unwrap_err();
        assert!(matches!(err, LearningError::InvalidStudentName(_)));
    }

    #[tokio::test]
    async fn test_rejected_submission_is_not_saved() {
        let f = fixture();
        f.run(ProgressCommand::CompleteModule(1)).await.unwrap();

        let err = f
            .run(ProgressCommand::SubmitModuleQuiz {
                module: 1,
                answers: vec![0],
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            LearningError::Quiz(QuizError::AnswerCount {
                expected: 2,
                actual: 1
            })
        ));

        let session = GetProgressUseCase::new(f.repo.clone(), f.catalog.clone())
            .execute(&f.course_id, &f.device_id)
            .await
            .unwrap();
        assert_eq!(session.stage(), Stage::ModuleQuiz(1));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_quiz_submissions_advance_once() {
        let f = fixture();
        let answers = correct_answers(&course(&f.catalog).module(1).unwrap().questions);
        f.run(ProgressCommand::CompleteModule(1)).await.unwrap();

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let advance = AdvanceProgressUseCase::new(f.repo.clone(), f.catalog.clone());
                let (course_id, device_id) = (f.course_id.clone(), f.device_id.clone());
                let answers = answers.clone();
                tokio::spawn(async move {
                    advance
                        .execute(
                            &course_id,
                            &device_id,
                            ProgressCommand::SubmitModuleQuiz { module: 1, answers },
                        )
                        .await
                })
            })
            .collect();

        let mut accepted = 0;
        for task in tasks {
            if task.await.unwrap().is_ok() {
                accepted += 1;
            }
        }
        assert_eq!(accepted, 1);

        let session = GetProgressUseCase::new(f.repo.clone(), f.catalog.clone())
            .execute(&f.course_id, &f.device_id)
            .await
            .unwrap();
        assert_eq!(session.stage(), Stage::Module(2));
        assert_eq!(session.completed().len(), 1);
    }

    #[tokio::test]
    async fn test_locked_module_and_unknown_module() {
        let f = fixture();
        let err = f.run(ProgressCommand::Navigate(3)).await.unwrap_err();
        assert!(matches!(
            err,
            LearningError::Progression(ProgressionError::ModuleLocked { module: 3 })
        ));

        let err = f
            .run(ProgressCommand::SubmitModuleQuiz {
                module: 9,
                answers: vec![],
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            LearningError::Progression(ProgressionError::ModuleOutOfRange { module: 9, total: 6 })
        ));
    }

    #[tokio::test]
    async fn test_unknown_course() {
        let f = fixture();
        let err = f
            .advance
            .execute(
                &CourseId::new("rust-101").unwrap(),
                &f.device_id,
                ProgressCommand::CompleteModule(1),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, LearningError::CourseNotFound(_)));
    }

    #[tokio::test]
    async fn test_reset_progress() {
        let f = fixture();
        f.pass_module(1).await;

        let session = ResetProgressUseCase::new(f.repo.clone(), f.catalog.clone())
            .execute(&f.course_id, &f.device_id)
            .await
            .unwrap();
        assert_eq!(session.stage(), Stage::Module(1));
        assert!(session.completed().is_empty());

        let session = GetProgressUseCase::new(f.repo.clone(), f.catalog.clone())
            .execute(&f.course_id, &f.device_id)
            .await
            .unwrap();
        assert_eq!(session.stage(), Stage::Module(1));
    }
}

#[cfg(test)]
mod router_tests {
    use access::application::AccessConfig;
    use access::domain::entity::CoursePin;
    use access::domain::repository::PinRepository;
    use access::domain::value_object::{CourseId, PinCode, PinDigest};
    use access::{InMemoryAccessRepository, access_router};
    use axum::Router;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, Response, StatusCode, header};
    use tower::ServiceExt;

    use super::support::*;
    use crate::application::LearningConfig;
    use crate::presentation::router::learning_router;

    const DEVICE: &str = "device-a";

    async fn app() -> Router {
        let access_repo = InMemoryAccessRepository::new();
        let access_config = AccessConfig::development();
        for pin in ["12345", "54321"] {
            let course_id = CourseId::new(COURSE).unwrap();
            let digest = PinDigest::compute(
                &access_config.pin_secret,
                &course_id,
                &PinCode::new(pin).unwrap(),
            );
            access_repo
                .create(&CoursePin::new(course_id, digest, None, None))
                .await
                .unwrap();
        }

        access_router(access_repo.clone(), access_config.clone()).merge(learning_router(
            catalog(),
            LearningConfig::with_random_secret(),
            access_repo,
            access_config,
        ))
    }

    async fn body_json(response: Response<Body>) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    /// Redeem `pin` for `device` and return the grant cookie pair
    async fn unlock(app: &Router, pin: &str, device: &str) -> String {
        let body = serde_json::json!({ "courseId": COURSE, "pin": pin, "deviceId": device });
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/pins/validate")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap()
            .split(';')
            .next()
            .unwrap()
            .to_string()
    }

    fn gated(
        method: &str,
        path: &str,
        cookie: &str,
        device: &str,
        body: Option<serde_json::Value>,
    ) -> Request<Body> {
        let builder = Request::builder()
            .method(method)
            .uri(format!("/courses/{COURSE}{path}"))
            .header(header::COOKIE, cookie)
            .header(header::AUTHORIZATION, format!("Bearer {device}"));

        match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        (status, body_json(response).await)
    }

    #[tokio::test]
    async fn test_public_catalog_hides_answers() {
        let app = app().await;

        let response = app
            .clone()
            .oneshot(Request::builder().uri("/courses").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["courses"].as_array().unwrap().len(), 3);
        assert_eq!(json["courses"][0]["moduleCount"], 6);
        assert!(!json.to_string().contains("correctOption"));

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/courses/python-data-science")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["title"], "Python for Data Science");

        let response = app
            .oneshot(Request::builder().uri("/courses/rust-101").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_content_requires_grant() {
        let app = app().await;

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri(format!("/courses/{COURSE}/content"))
                    .header(header::AUTHORIZATION, format!("Bearer {DEVICE}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/courses/react-nextjs-bootcamp/access"
        );

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(format!("/courses/{COURSE}/progress/modules/1/complete"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    }

    #[tokio::test]
    async fn test_content_hides_answers() {
        let app = app().await;
        let cookie = unlock(&app, "12345", DEVICE).await;

        let (status, json) = send(&app, gated("GET", "/content", &cookie, DEVICE, None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["modules"].as_array().unwrap().len(), 6);
        assert_eq!(json["finalAssessment"].as_array().unwrap().len(), 5);
        assert!(json["modules"][0]["questions"][0]["options"].is_array());
        assert!(!json.to_string().contains("correctOption"));
    }

    #[tokio::test]
    async fn test_progress_over_http() {
        let app = app().await;
        let cookie = unlock(&app, "12345", DEVICE).await;
        let catalog = catalog();
        let course = course(&catalog);

        let (status, json) = send(&app, gated("GET", "/progress", &cookie, DEVICE, None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["stage"], serde_json::json!({"kind": "module", "module": 1}));
        assert_eq!(json["totalModules"], 6);

        for module in 1..=6u32 {
            let (status, json) = send(
                &app,
                gated("POST", &format!("/progress/modules/{module}/complete"), &cookie, DEVICE, None),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(json["stage"]["kind"], "moduleQuiz");

            let answers = correct_answers(&course.module(module).unwrap().questions);
            let (status, json) = send(
                &app,
                gated(
                    "POST",
                    &format!("/progress/modules/{module}/quiz"),
                    &cookie,
                    DEVICE,
                    Some(serde_json::json!({ "answers": answers })),
                ),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(json["score"]["passed"], true);
        }

        // Progress survives a reload
        let (_, json) = send(&app, gated("GET", "/progress", &cookie, DEVICE, None)).await;
        assert_eq!(json["stage"], serde_json::json!({"kind": "finalAssessment"}));
        assert_eq!(json["completedModules"], serde_json::json!([1, 2, 3, 4, 5, 6]));
        assert_eq!(json["finalAssessmentUnlocked"], true);

        let (status, json) = send(
            &app,
            gated(
                "POST",
                "/progress/final-assessment",
                &cookie,
                DEVICE,
                Some(serde_json::json!({ "answers": answers_with(&course.final_assessment, 4) })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["score"]["percentage"], 80);
        assert_eq!(json["completed"], true);

        let (status, json) = send(
            &app,
            gated(
                "POST",
                "/certificate",
                &cookie,
                DEVICE,
                Some(serde_json::json!({ "studentName": "Ada Obi" })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["certificate"]["grade"], "Merit");
        assert_eq!(json["certificate"]["percentage"], 80);
        assert!(json["html"].as_str().unwrap().contains("Ada Obi"));

        // Verification is public
        let verify = |body: serde_json::Value| {
            Request::builder()
                .method("POST")
                .uri("/certificates/verify")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap()
        };
        let presented = serde_json::json!({
            "certificate": json["certificate"],
            "signature": json["signature"],
        });
        let (status, result) = send(&app, verify(presented.clone())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(result["valid"], true);

        let mut tampered = presented;
        tampered["certificate"]["grade"] = "Distinction".into();
        let (_, result) = send(&app, verify(tampered)).await;
        assert_eq!(result["valid"], false);
    }

    #[tokio::test]
    async fn test_progression_errors() {
        let app = app().await;
        let cookie = unlock(&app, "12345", DEVICE).await;

        let (status, json) = send(
            &app,
            gated(
                "POST",
                "/progress/navigate",
                &cookie,
                DEVICE,
                Some(serde_json::json!({ "moduleId": 3 })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert!(json["message"].as_str().unwrap().contains("locked"));

        let (status, _) = send(
            &app,
            gated(
                "POST",
                "/progress/modules/1/quiz",
                &cookie,
                DEVICE,
                Some(serde_json::json!({ "answers": [0, 1] })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _) =
            send(&app, gated("POST", "/progress/modules/1/complete", &cookie, DEVICE, None)).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(
            &app,
            gated(
                "POST",
                "/progress/modules/1/quiz",
                &cookie,
                DEVICE,
                Some(serde_json::json!({ "answers": [0] })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(
            &app,
            gated("POST", "/progress/final-assessment/start", &cookie, DEVICE, None),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = send(
            &app,
            gated(
                "POST",
                "/certificate",
                &cookie,
                DEVICE,
                Some(serde_json::json!({ "studentName": "Ada" })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_progress_is_per_device_and_resettable() {
        let app = app().await;
        let cookie_a = unlock(&app, "12345", DEVICE).await;
        let cookie_b = unlock(&app, "54321", "device-b").await;

        let (status, _) =
            send(&app, gated("POST", "/progress/modules/1/complete", &cookie_a, DEVICE, None)).await;
        assert_eq!(status, StatusCode::OK);

        let (_, json) = send(&app, gated("GET", "/progress", &cookie_b, "device-b", None)).await;
        assert_eq!(json["stage"]["kind"], "module");

        // Device B cannot use device A's grant
        let (status, _) = send(&app, gated("GET", "/progress", &cookie_a, "device-b", None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, json) = send(&app, gated("DELETE", "/progress", &cookie_a, DEVICE, None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["stage"], serde_json::json!({"kind": "module", "module": 1}));
    }
}
