//! Creature data source
//!
//! One read operation: creature id → `CreatureProfile`. Single attempt per
//! call; a transport failure is terminal for that attempt.

use crate::config::CalcConfig;
use crate::error::{CalcError, CalcResult};
use crate::record::{CreatureProfile, PokemonPayload};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;

#[async_trait]
pub trait CreatureSource: Send + Sync {
    async fn fetch(&self, id: u32) -> CalcResult<CreatureProfile>;
}

/// PokeAPI over HTTP: `GET {base_url}/pokemon/{id}`.
#[derive(Clone)]
pub struct PokeApiSource {
    client: Client,
    base_url: String,
    max_id: u32,
}

impl PokeApiSource {
    pub fn new(config: &CalcConfig) -> CalcResult<Self> {
        config.validate()?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()
            .map_err(|e| CalcError::InvalidConfiguration(format!("HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            max_id: config.max_creature_id,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl CreatureSource for PokeApiSource {
    async fn fetch(&self, id: u32) -> CalcResult<CreatureProfile> {
        if id == 0 || id > self.max_id {
            return Err(CalcError::NotFound(id));
        }

        let url = format!("{}/pokemon/{}", self.base_url, id);
        tracing::info!(id, %url, "fetching creature");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| CalcError::DataUnavailable(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(CalcError::NotFound(id));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CalcError::DataUnavailable(format!("HTTP {status}: {body}")));
        }

        let payload: PokemonPayload = response
            .json()
            .await
            .map_err(|e| CalcError::DataUnavailable(format!("undecodable body: {e}")))?;

        CreatureProfile::try_from(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn source_for(server: &MockServer) -> PokeApiSource {
        let config = CalcConfig {
            api_base_url: server.uri(),
            http_timeout_secs: 5,
            ..CalcConfig::default()
        };
        PokeApiSource::new(&config).unwrap()
    }

    fn pikachu() -> serde_json::Value {
        serde_json::json!({
            "id": 25,
            "name": "pikachu",
            "weight": 60,
            "height": 4,
            "sprites": { "front_default": "https://img/25.png", "other": {} },
            "stats": [{ "base_stat": 55, "stat": { "name": "attack" } }],
            "types": [{ "slot": 1, "type": { "name": "electric" } }]
        })
    }

    #[tokio::test]
    async fn fetches_and_decodes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/pokemon/25"))
            .respond_with(ResponseTemplate::new(200).set_body_json(pikachu()))
            .mount(&server)
            .await;

        let profile = source_for(&server).fetch(25).await.unwrap();
        assert_eq!(profile.name, "pikachu");
        assert!(profile.record.has_category("electric"));
        assert_eq!(profile.artwork_url.as_deref(), Some("https://img/25.png"));
    }

    #[tokio::test]
    async fn not_found_maps_to_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/pokemon/404"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
            .mount(&server)
            .await;

        let err = source_for(&server).fetch(404).await.unwrap_err();
        assert_eq!(err, CalcError::NotFound(404));
    }

    #[tokio::test]
    async fn server_error_is_unavailable_without_retry() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/pokemon/1"))
            .respond_with(ResponseTemplate::new(503).set_body_string("down"))
            .expect(1)
            .mount(&server)
            .await;

        let err = source_for(&server).fetch(1).await.unwrap_err();
        assert!(matches!(err, CalcError::DataUnavailable(_)));
    }

    #[tokio::test]
    async fn garbage_body_is_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/pokemon/7"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let err = source_for(&server).fetch(7).await.unwrap_err();
        assert!(matches!(err, CalcError::DataUnavailable(_)));
    }

    #[tokio::test]
    async fn ids_outside_range_never_hit_the_network() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(pikachu()))
            .expect(0)
            .mount(&server)
            .await;

        let source = source_for(&server);
        assert_eq!(source.fetch(0).await.unwrap_err(), CalcError::NotFound(0));
        assert_eq!(source.fetch(899).await.unwrap_err(), CalcError::NotFound(899));
    }
}
