//! Session flow tests with mocked detector and recommendation service

use async_trait::async_trait;
use image::{DynamicImage, RgbImage};
use mockall::mock;
use mockall::predicate::eq;
use recolens_app::{Outcome, Session, SessionError};
use recolens_core::{Category, DetectionRecord, PromptCatalog};
use recolens_eye::{ObjectDetector, VisionError};
use recolens_llm::{RecommendationError, RecommendationService};

mock! {
    pub Detector {}

    impl ObjectDetector for Detector {
        fn detect(
            &self,
            image: &DynamicImage,
            confidence_threshold: f32,
        ) -> Result<Vec<DetectionRecord>, VisionError>;
    }
}

mock! {
    pub Service {}

    #[async_trait]
    impl RecommendationService for Service {
        fn name(&self) -> &str;
        async fn generate(
            &self,
            user_prompt: &str,
            system_prompt: &str,
        ) -> recolens_llm::Result<String>;
    }
}

fn image() -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::new(32, 32))
}

fn desk_detections() -> Vec<DetectionRecord> {
    vec![
        DetectionRecord::new("chair", 0.873, [10.0, 10.0, 60.0, 90.0]),
        DetectionRecord::new("laptop", 0.731, [40.0, 20.0, 80.0, 50.0]),
    ]
}

#[tokio::test]
async fn test_empty_detections_skip_request() {
    let mut detector = MockDetector::new();
    detector
        .expect_detect()
        .times(1)
        .returning(|_, _| Ok(Vec::new()));

    let mut service = MockService::new();
    service.expect_generate().never();

    let mut session = Session::new(detector, service);
    let outcome = session.recommend(&image(), "study_desk", 0.5).await.unwrap();

    assert_eq!(outcome, Outcome::NoObjects);
    assert_eq!(session.current_recommendations(), None);
}

#[tokio::test]
async fn test_recommendations_stored_on_success() {
    let mut detector = MockDetector::new();
    detector
        .expect_detect()
        .withf(|_, threshold| *threshold == 0.4)
        .times(1)
        .returning(|_, _| Ok(desk_detections()));

    let expected_user =
        PromptCatalog::build(Category::StudyDesk, "chair (0.87), laptop (0.73)").user_prompt;
    let mut service = MockService::new();
    service
        .expect_generate()
        .withf(move |user, system| {
            user == expected_user.as_str() && system == PromptCatalog::system_prompt()
        })
        .times(1)
        .returning(|_, _| Ok("Add a desk lamp".to_string()));

    let mut session = Session::new(detector, service);
    let outcome = session.recommend(&image(), "study_desk", 0.4).await.unwrap();

    match outcome {
        Outcome::Recommendations {
            detections,
            summary,
            prompt,
            text,
        } => {
            assert_eq!(detections.len(), 2);
            assert_eq!(summary, "chair (0.87), laptop (0.73)");
            assert!(prompt.user_prompt.contains("chair (0.87), laptop (0.73)"));
            assert_eq!(text, "Add a desk lamp");
        }
        other => panic!("Expected recommendations, got {:?}", other),
    }
    assert_eq!(session.current_recommendations(), Some("Add a desk lamp"));
}

#[tokio::test]
async fn test_failed_request_keeps_previous_recommendations() {
    let mut detector = MockDetector::new();
    detector
        .expect_detect()
        .times(2)
        .returning(|_, _| Ok(desk_detections()));

    let mut service = MockService::new();
    let mut seq = mockall::Sequence::new();
    service
        .expect_generate()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _| Ok("First".to_string()));
    service
        .expect_generate()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _| {
            Err(RecommendationError::Status {
                status: 500,
                body: "server exploded".to_string(),
            })
        });

    let mut session = Session::new(detector, service);
    session.recommend(&image(), "interior", 0.5).await.unwrap();

    let err = session.recommend(&image(), "interior", 0.5).await.unwrap_err();
    assert!(matches!(err, SessionError::Recommendation(_)));
    assert_eq!(err.to_string(), "Error: 500 - server exploded");
    assert_eq!(session.current_recommendations(), Some("First"));
}

#[tokio::test]
async fn test_unknown_category_skips_inference() {
    let mut detector = MockDetector::new();
    detector.expect_detect().never();
    let mut service = MockService::new();
    service.expect_generate().never();

    let mut session = Session::new(detector, service);
    for key in ["", "Fashion", "kitchen"] {
        let err = session.recommend(&image(), key, 0.5).await.unwrap_err();
        assert!(matches!(err, SessionError::UnknownCategory(ref k) if k == key));
    }
}

#[tokio::test]
async fn test_detection_failure_is_distinct_from_no_objects() {
    let mut detector = MockDetector::new();
    detector
        .expect_detect()
        .with(mockall::predicate::always(), eq(0.5f32))
        .returning(|_, _| Err(VisionError::Ort("YOLO inference failed".to_string())));
    let mut service = MockService::new();
    service.expect_generate().never();

    let mut session = Session::new(detector, service);
    let err = session.recommend(&image(), "fashion", 0.5).await.unwrap_err();
    assert!(matches!(err, SessionError::Detection(VisionError::Ort(_))));
}

#[tokio::test]
async fn test_fashion_template_used() {
    let mut detector = MockDetector::new();
    detector.expect_detect().returning(|_, _| {
        Ok(vec![DetectionRecord::new("tie", 0.66, [0.0, 0.0, 5.0, 20.0])])
    });
    let mut service = MockService::new();
    service
        .expect_generate()
        .withf(|user, _| user.starts_with("The outfit includes: tie (0.66)"))
        .returning(|_, _| Ok("Try a pocket square".to_string()));

    let mut session = Session::new(detector, service);
    let outcome = session.recommend(&image(), "fashion", 0.5).await.unwrap();
    assert!(matches!(
        outcome,
        Outcome::Recommendations { ref text, .. } if text == "Try a pocket square"
    ));
}

#[tokio::test]
async fn test_out_of_range_threshold_skips_inference() {
    let mut detector = MockDetector::new();
    detector.expect_detect().never();
    let mut service = MockService::new();
    service.expect_generate().never();

    let mut session = Session::new(detector, service);
    for threshold in [-0.1f32, 1.5, f32::NAN] {
        let err = session
            .recommend(&image(), "study_desk", threshold)
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::InvalidThreshold(_)));
        assert!(err.to_string().starts_with("Invalid confidence threshold"));
    }
    assert_eq!(session.current_recommendations(), None);
}

#[tokio::test]
async fn test_threshold_bounds_accepted() {
    let mut detector = MockDetector::new();
    detector
        .expect_detect()
        .times(2)
        .returning(|_, _| Ok(Vec::new()));
    let mut service = MockService::new();
    service.expect_generate().never();

    let mut session = Session::new(detector, service);
    for threshold in [0.0f32, 1.0] {
        let outcome = session.recommend(&image(), "interior", threshold).await.unwrap();
        assert_eq!(outcome, Outcome::NoObjects);
    }
}
