//! Calculator configuration from environment variables.

use crate::error::{CalcError, CalcResult};
use crate::utils::units::{validate_unit_mass, DEFAULT_CRACKER_WEIGHT_G};
use std::env;
use std::str::FromStr;

pub const DEFAULT_API_BASE_URL: &str = "https://pokeapi.co/api/v2";

/// Approximate size of the National Pokédex.
pub const DEFAULT_MAX_CREATURE_ID: u32 = 898;

#[derive(Debug, Clone, PartialEq)]
pub struct CalcConfig {
    pub api_base_url: String,
    pub cracker_weight_g: f64,
    pub max_creature_id: u32,
    pub http_timeout_secs: u64,
    pub port: u16,
}

impl Default for CalcConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            cracker_weight_g: DEFAULT_CRACKER_WEIGHT_G,
            max_creature_id: DEFAULT_MAX_CREATURE_ID,
            http_timeout_secs: 10,
            port: 3000,
        }
    }
}

impl CalcConfig {
    /// Read `POKEAPI_BASE_URL`, `CRACKER_WEIGHT_G`, `MAX_CREATURE_ID`,
    /// `HTTP_TIMEOUT_SECS` and `PORT`, falling back to defaults, then validate.
    pub fn from_env() -> CalcResult<Self> {
        let defaults = Self::default();
        let config = Self {
            api_base_url: env::var("POKEAPI_BASE_URL").unwrap_or(defaults.api_base_url),
            cracker_weight_g: parse_var("CRACKER_WEIGHT_G", defaults.cracker_weight_g)?,
            max_creature_id: parse_var("MAX_CREATURE_ID", defaults.max_creature_id)?,
            http_timeout_secs: parse_var("HTTP_TIMEOUT_SECS", defaults.http_timeout_secs)?,
            port: parse_var("PORT", defaults.port)?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> CalcResult<()> {
        validate_unit_mass(self.cracker_weight_g)?;
        if self.max_creature_id == 0 {
            return Err(CalcError::InvalidConfiguration(
                "MAX_CREATURE_ID must be at least 1".to_string(),
            ));
        }
        if self.http_timeout_secs == 0 {
            return Err(CalcError::InvalidConfiguration(
                "HTTP_TIMEOUT_SECS must be at least 1".to_string(),
            ));
        }
        if self.api_base_url.trim().is_empty() {
            return Err(CalcError::InvalidConfiguration(
                "POKEAPI_BASE_URL is empty".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_var<T: FromStr>(key: &str, default: T) -> CalcResult<T>
where
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| CalcError::InvalidConfiguration(format!("invalid {key}: {e}"))),
        Err(_) => Ok(default),
    }
}
