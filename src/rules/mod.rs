//! Tire-change utility classifier
//!
//! An ordered chain of weighted rules with early exit. Each rule is data
//! (predicate, delta, exit threshold, polarity, message); `chain` runs them.
//!
//! - `table`: rule types and the standard eight-rule table
//! - `chain`: evaluation, assessments and per-rule trace

pub mod table;
pub mod chain;

pub use table::{standard_rules, ExitCondition, Polarity, Predicate, Rule};
pub use chain::{assess_utility, Assessment, RuleChain, RuleStep, BASELINE_SCORE};
