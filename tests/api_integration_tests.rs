// API Integration Tests
//
// Purpose: Exercise every endpoint against an in-memory creature source
// Run with: cargo test --features api --test api_integration_tests

#[cfg(feature = "api")]
mod api_tests {
    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use cracker_calc::{
        create_router, AppState, CalcConfig, CalcError, CalcResult, CreatureProfile,
        CreatureRecord, CreatureSource, RuleChain,
    };
    use serde_json::Value;
    use std::sync::Arc;
    use tower::ServiceExt; // for oneshot

    struct StubSource;

    #[async_trait]
    impl CreatureSource for StubSource {
        async fn fetch(&self, id: u32) -> CalcResult<CreatureProfile> {
            match id {
                1 => Ok(CreatureProfile {
                    id: 1,
                    name: "bulbasaur".into(),
                    artwork_url: None,
                    stats: Vec::new(),
                    record: CreatureRecord::new(69.0, 7.0)
                        .with_category("grass")
                        .with_category("poison"),
                }),
                2 => Ok(CreatureProfile {
                    id: 2,
                    name: "broken".into(),
                    artwork_url: None,
                    stats: Vec::new(),
                    record: CreatureRecord::new(f64::NAN, 7.0),
                }),
                3 => Err(CalcError::DataUnavailable("upstream down".into())),
                _ => Err(CalcError::NotFound(id)),
            }
        }
    }

    // Helper: Create test app with a single-id range so /random is predictable
    fn create_test_app() -> axum::Router {
        let config = CalcConfig { max_creature_id: 1, ..CalcConfig::default() };
        let state = AppState::with_source(config, RuleChain::standard(), Arc::new(StubSource));
        create_router(state)
    }

    // Helper: Parse JSON response
    async fn json_response(response: axum::response::Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read response body");
        serde_json::from_slice(&body).expect("Failed to parse JSON")
    }

    async fn get(uri: &str) -> axum::response::Response {
        create_test_app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    // =========================================================================
    // Section 1: Health Check
    // =========================================================================

    #[tokio::test]
    async fn test_health_check() {
        let response = get("/health").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_response(response).await;
        assert_eq!(body["status"], "healthy");
        assert!(body["timestamp"].is_string());
    }

    // =========================================================================
    // Section 2: Creature cards
    // =========================================================================

    #[tokio::test]
    async fn test_creature_card() {
        let response = get("/api/creatures/1").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_response(response).await;
        assert_eq!(body["name"], "Bulbasaur");
        assert_eq!(body["crackers_display"], "345");
        assert_eq!(body["weight_kg"], 6.9);
        assert_eq!(body["assessment"]["helpful"], false);
        assert_eq!(body["assessment"]["confidence"], 50);
    }

    #[tokio::test]
    async fn test_random_creature_stays_in_range() {
        let response = get("/api/creatures/random").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_response(response).await["id"], 1);
    }

    #[tokio::test]
    async fn test_error_statuses() {
        assert_eq!(get("/api/creatures/2").await.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(get("/api/creatures/3").await.status(), StatusCode::BAD_GATEWAY);

        let response = get("/api/creatures/77").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = json_response(response).await;
        assert_eq!(body["message"], "Failed to catch that Pokémon! Try again?");
    }

    // =========================================================================
    // Section 3: Offline assessment
    // =========================================================================

    #[tokio::test]
    async fn test_assess_record() {
        let payload = serde_json::json!({
            "mass_hg": 10000,
            "height_dm": 20,
            "categories": ["rock"]
        });
        let response = create_test_app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/assess")
                    .header("content-type", "application/json")
                    .body(Body::from(payload.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_response(response).await;
        assert_eq!(body["crackers"], 50000.0);
        assert_eq!(body["assessment"]["confidence"], 90);
        assert_eq!(body["assessment"]["decided_by"], "heavy_lifter");
    }

    #[tokio::test]
    async fn test_assess_rejects_negative_mass() {
        let payload = serde_json::json!({ "mass_hg": -3, "height_dm": 20 });
        let response = create_test_app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/assess")
                    .header("content-type", "application/json")
                    .body(Body::from(payload.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_rules_listing() {
        let response = get("/api/rules").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_response(response).await;
        let rules = body.as_array().expect("array of rules");
        assert_eq!(rules.len(), 8);
        assert_eq!(rules[0]["name"], "too_small");
    }
}
