//! Utility modules for the calculator
//!
//! Contains functionality shared by the classifier and the shells:
//! - Units: hectograms to animal crackers
//! - Formatting: display names and grouped numbers

pub mod units;
pub mod formatting;

// Re-export commonly used items
pub use units::{to_novelty_units, mass_kg, DEFAULT_CRACKER_WEIGHT_G};
pub use formatting::{format_name, format_grouped};
