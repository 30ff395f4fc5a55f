//! Animal Cracker Calculator
//!
//! Weighs creatures in animal crackers and judges how useful they would be
//! when changing a tire.
//!
//! - `utils/`: Unit conversion and display formatting
//! - `record`: Creature records and the upstream payload model
//! - `rules/`: Ordered, weighted rule chain with early exit
//! - `shell/`: Request state machine, id picking and cards
//! - `batch`: Parallel classification of many profiles
//! - `source`: HTTP data source (feature `fetch`)
//! - `api_server`: Axum endpoints (feature `api`)

pub mod utils;
pub mod error;
pub mod config;
pub mod record;
pub mod rules;
pub mod shell;
pub mod batch;

#[cfg(feature = "fetch")]
pub mod source;

#[cfg(feature = "api")]
pub mod api_server;

// Re-export commonly used types
pub use utils::{to_novelty_units, DEFAULT_CRACKER_WEIGHT_G};
pub use error::{CalcError, CalcResult};
pub use config::CalcConfig;
pub use record::{CreatureProfile, CreatureRecord};
pub use rules::{assess_utility, Assessment, RuleChain};
pub use shell::{CreatureCard, Shell, ShellState};

#[cfg(feature = "fetch")]
pub use source::{CreatureSource, PokeApiSource};

#[cfg(feature = "api")]
pub use api_server::{create_router, AppState};
