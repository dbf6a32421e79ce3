//! End-to-end evaluation cycles against a mock chat-completion endpoint.

use std::time::Duration;

use scigrade_core::config::Config;
use scigrade_core::credential::ApiKey;
use scigrade_core::error::ScigradeError;
use scigrade_core::{EvaluationRequest, EvaluationResult, Evaluator, Rubric, Subject};
use wiremock::{matchers, Mock, MockServer, ResponseTemplate};

const MITOCHONDRIA_ANSWER: &str = "Mitochondria produce ATP via oxidative phosphorylation.";
const MITOCHONDRIA_REPLY: &str = r#"{"Accuracy":[5,"Correct"],"Completeness":[3,"Missing detail on electron transport chain"],"Clarity":[4,"Clear"],"Depth":[3,"Surface level"],"Relevance":[5,"On topic"]}"#;

fn config_for(server: &MockServer) -> Config {
    Config {
        api_base: format!("{}/v1", server.uri()),
        timeout_secs: 2,
        ..Config::default()
    }
}

fn completion(content: &str) -> serde_json::Value {
    serde_json::json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }]
    })
}

fn mitochondria_request() -> EvaluationRequest {
    EvaluationRequest::new(MITOCHONDRIA_ANSWER, Subject::Biology, "Cell Respiration").unwrap()
}

#[tokio::test]
async fn test_mitochondria_scenario_is_parsed() {
    let mock_server = MockServer::start().await;

    Mock::given(matchers::method("POST"))
        .and(matchers::path("/v1/chat/completions"))
        .and(matchers::header("authorization", "Bearer test-key"))
        .and(matchers::body_string_contains("Cell Respiration"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(MITOCHONDRIA_REPLY)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let evaluator = Evaluator::new(
        &config_for(&mock_server),
        Rubric::science(),
        Some(ApiKey::new("test-key")),
    )
    .unwrap();

    let result = evaluator.evaluate(&mitochondria_request()).await.unwrap();
    let card = result.scorecard().expect("parsed result");

    let entries: Vec<(&str, i64, &str)> = card
        .scores()
        .iter()
        .map(|s| (s.criterion.as_str(), s.score, s.feedback.as_str()))
        .collect();
    assert_eq!(
        entries,
        vec![
            ("Accuracy", 5, "Correct"),
            ("Completeness", 3, "Missing detail on electron transport chain"),
            ("Clarity", 4, "Clear"),
            ("Depth", 3, "Surface level"),
            ("Relevance", 5, "On topic"),
        ]
    );
}

#[tokio::test]
async fn test_prose_reply_is_raw_fallback() {
    let mock_server = MockServer::start().await;
    let reply = "I'm not able to process this request.";

    Mock::given(matchers::method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(reply)))
        .mount(&mock_server)
        .await;

    let evaluator = Evaluator::new(
        &config_for(&mock_server),
        Rubric::science(),
        Some(ApiKey::new("test-key")),
    )
    .unwrap();

    let result = evaluator.evaluate(&mitochondria_request()).await.unwrap();
    assert_eq!(result, EvaluationResult::Raw(reply.to_string()));
}

#[tokio::test]
async fn test_missing_credential_fails_before_any_request() {
    let mock_server = MockServer::start().await;

    Mock::given(matchers::any())
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(MITOCHONDRIA_REPLY)))
        .expect(0)
        .mount(&mock_server)
        .await;

    let evaluator = Evaluator::new(&config_for(&mock_server), Rubric::science(), None).unwrap();
    assert!(!evaluator.has_credential());

    let err = evaluator
        .evaluate(&mitochondria_request())
        .await
        .unwrap_err();

    assert!(err.is_configuration(), "got {err:?}");
    assert!(!err.is_transport());
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_server_error_is_transport_not_raw() {
    let mock_server = MockServer::start().await;

    Mock::given(matchers::method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .mount(&mock_server)
        .await;

    let evaluator = Evaluator::new(
        &config_for(&mock_server),
        Rubric::science(),
        Some(ApiKey::new("test-key")),
    )
    .unwrap();

    let err = evaluator
        .evaluate(&mitochondria_request())
        .await
        .unwrap_err();
    assert!(err.is_transport());
    assert!(matches!(err, ScigradeError::HttpStatus { status: 500, .. }));
}

#[tokio::test]
async fn test_unauthorized_is_transport_error() {
    let mock_server = MockServer::start().await;

    Mock::given(matchers::method("POST"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(serde_json::json!({"error": {"message": "Invalid API Key"}})),
        )
        .mount(&mock_server)
        .await;

    let evaluator = Evaluator::new(
        &config_for(&mock_server),
        Rubric::science(),
        Some(ApiKey::new("wrong")),
    )
    .unwrap();

    let err = evaluator
        .evaluate(&mitochondria_request())
        .await
        .unwrap_err();
    assert!(matches!(err, ScigradeError::HttpStatus { status: 401, .. }));
    assert!(err.to_string().contains("Invalid API Key"));
}

#[tokio::test]
async fn test_timeout_is_transport_not_raw() {
    let mock_server = MockServer::start().await;

    Mock::given(matchers::method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_secs(4))
                .set_body_json(completion(MITOCHONDRIA_REPLY)),
        )
        .mount(&mock_server)
        .await;

    let config = Config {
        timeout_secs: 1,
        ..config_for(&mock_server)
    };
    let evaluator =
        Evaluator::new(&config, Rubric::science(), Some(ApiKey::new("test-key"))).unwrap();

    let err = evaluator
        .evaluate(&mitochondria_request())
        .await
        .unwrap_err();
    assert!(matches!(err, ScigradeError::Timeout { .. }), "got {err:?}");
}

#[tokio::test]
async fn test_overlapping_submission_is_rejected() {
    let mock_server = MockServer::start().await;

    Mock::given(matchers::method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(500))
                .set_body_json(completion(MITOCHONDRIA_REPLY)),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let evaluator = Evaluator::new(
        &config_for(&mock_server),
        Rubric::science(),
        Some(ApiKey::new("test-key")),
    )
    .unwrap();
    let request = mitochondria_request();

    let (first, second) = tokio::join!(evaluator.evaluate(&request), async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        evaluator.evaluate(&request).await
    });

    assert!(first.unwrap().is_parsed());
    assert!(matches!(second, Err(ScigradeError::Busy)));
    assert!(!evaluator.is_busy());
}

#[tokio::test]
async fn test_sequential_submissions_are_independent() {
    let mock_server = MockServer::start().await;

    Mock::given(matchers::method("POST"))
        .and(matchers::body_string_contains("first answer"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("not json")))
        .mount(&mock_server)
        .await;
    Mock::given(matchers::method("POST"))
        .and(matchers::body_string_contains("second answer"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(MITOCHONDRIA_REPLY)))
        .mount(&mock_server)
        .await;

    let evaluator = Evaluator::new(
        &config_for(&mock_server),
        Rubric::science(),
        Some(ApiKey::new("test-key")),
    )
    .unwrap();

    let first = EvaluationRequest::new("first answer", Subject::Physics, "Optics").unwrap();
    let second = EvaluationRequest::new("second answer", Subject::Physics, "Optics").unwrap();

    assert_eq!(
        evaluator.evaluate(&first).await.unwrap(),
        EvaluationResult::Raw("not json".to_string())
    );
    assert!(evaluator.evaluate(&second).await.unwrap().is_parsed());
}
