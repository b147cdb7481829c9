use super::*;

#[test]
fn endpoint_joins_base_and_model() {
    let cfg = AnalysisConfig {
        base_url: "https://example.test/v1beta/models/".to_string(),
        model: " gemini-x ".to_string(),
        ..AnalysisConfig::default()
    };
    assert_eq!(
        cfg.endpoint(),
        "https://example.test/v1beta/models/gemini-x:generateContent"
    );
}

#[test]
fn default_endpoint_targets_flash_model() {
    assert!(
        AnalysisConfig::default()
            .endpoint()
            .ends_with("/gemini-2.5-flash:generateContent")
    );
}

#[test]
fn missing_or_blank_key_is_rejected() {
    for key in [None, Some("   ".to_string())] {
        let cfg = AnalysisConfig {
            api_key: key,
            ..AnalysisConfig::default()
        };
        let err = GeminiAnalyzer::new(cfg).err().unwrap();
        assert!(matches!(err, XsheetError::Analysis(_)));
        assert!(err.to_string().contains("API Key is missing"));
    }
}

#[test]
fn debug_redacts_key() {
    let cfg = AnalysisConfig {
        api_key: Some("secret-key".to_string()),
        ..AnalysisConfig::default()
    };
    let dbg = format!("{cfg:?}");
    assert!(!dbg.contains("secret-key"));
    assert!(dbg.contains("<redacted>"));
}

#[test]
fn request_body_shape() {
    let json = serde_json::to_value(request_body("hello")).unwrap();
    assert_eq!(
        json,
        serde_json::json!({ "contents": [{ "parts": [{ "text": "hello" }] }] })
    );
}

#[test]
fn response_text_joins_first_candidate_parts() {
    let resp: GeminiResponse = serde_json::from_value(serde_json::json!({
        "candidates": [
            { "content": { "parts": [{ "text": "Hello " }, { "text": "world" }] } },
            { "content": { "parts": [{ "text": "ignored" }] } }
        ]
    }))
    .unwrap();
    assert_eq!(response_text(resp), "Hello world");
}

#[test]
fn response_without_candidates_is_empty() {
    let resp: GeminiResponse = serde_json::from_value(serde_json::json!({})).unwrap();
    assert_eq!(response_text(resp), "");
    let resp: GeminiResponse =
        serde_json::from_value(serde_json::json!({ "candidates": [{}] })).unwrap();
    assert_eq!(response_text(resp), "");
}
