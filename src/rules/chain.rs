//! Rule chain evaluation
//!
//! Algorithm:
//! 1. Start at the neutral baseline (50).
//! 2. For each rule in order: if its predicate matches, add its delta, then
//!    check its exit threshold. Crossing it ends evaluation with the rule's
//!    polarity and message.
//! 3. With no exit, the verdict is `score > 50` with one of two fallback messages.
//!
//! The score is never clamped here; `Assessment::display_confidence` clamps
//! for presentation only.

use super::table::{standard_rules, Rule, FALLBACK_HELPFUL, FALLBACK_UNHELPFUL};
use crate::error::CalcResult;
use crate::record::CreatureRecord;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Neutral starting score on the 0-100 display scale.
pub const BASELINE_SCORE: i32 = 50;

/// Outcome of one rule during evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleStep {
    pub rule: String,
    pub matched: bool,
    /// Delta actually applied (0 when the predicate did not match)
    pub applied: i32,
    /// Running score after this rule
    pub score: i32,
}

/// Verdict, rationale and running score for one creature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assessment {
    pub helpful: bool,
    pub justification: String,
    pub confidence: i32,
    /// Rule that exited early, `None` when the fallback decided.
    pub decided_by: Option<String>,
    pub trace: Vec<RuleStep>,
}

impl Assessment {
    /// Confidence clamped to 0..=100 for display.
    pub fn display_confidence(&self) -> u8 {
        self.confidence.clamp(0, 100) as u8
    }
}

/// Ordered rule chain plus fallback messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleChain {
    rules: Vec<Rule>,
    fallback_helpful: String,
    fallback_unhelpful: String,
}

impl Default for RuleChain {
    fn default() -> Self {
        Self::standard()
    }
}

impl RuleChain {
    /// The eight-rule tire-change chain.
    pub fn standard() -> Self {
        Self::new(standard_rules())
    }

    pub fn new(rules: Vec<Rule>) -> Self {
        Self {
            rules,
            fallback_helpful: FALLBACK_HELPFUL.to_string(),
            fallback_unhelpful: FALLBACK_UNHELPFUL.to_string(),
        }
    }

    /// Load a chain from a JSON array of rules (standard fallback messages).
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read rules file: {:?}", path))?;
        let rules: Vec<Rule> =
            serde_json::from_str(&contents).with_context(|| "Failed to parse rules JSON")?;
        if rules.is_empty() {
            anyhow::bail!("Rules file {:?} contains no rules", path);
        }

        // Every delta applied at once must still fit the running score.
        let reach: i64 = rules.iter().map(|r| i64::from(r.delta).abs()).sum();
        if i64::from(BASELINE_SCORE) + reach > i64::from(i32::MAX) {
            anyhow::bail!(
                "Rules file {:?} has deltas summing to {}, beyond the score range",
                path,
                reach
            );
        }
        Ok(Self::new(rules))
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Classify one record. Fails only on a malformed record.
    pub fn assess(&self, record: &CreatureRecord) -> CalcResult<Assessment> {
        record.validate()?;

        let mut score = BASELINE_SCORE;
        let mut trace = Vec::with_capacity(self.rules.len());

        for rule in &self.rules {
            let matched = rule.predicate.matches(record);
            let applied = if matched { rule.delta } else { 0 };
            // Saturates rather than wraps for hand-built chains with huge deltas.
            score = score.saturating_add(applied);
            trace.push(RuleStep {
                rule: rule.name.clone(),
                matched,
                applied,
                score,
            });

            if !matched {
                continue;
            }

            if let Some(exit) = rule.exit {
                if exit.crossed(score) {
                    tracing::debug!(rule = %rule.name, score, "early exit");
                    return Ok(Assessment {
                        helpful: rule.polarity.is_helpful(),
                        justification: rule.message.clone(),
                        confidence: score,
                        decided_by: Some(rule.name.clone()),
                        trace,
                    });
                }
            }
        }

        let helpful = score > BASELINE_SCORE;
        let justification = if helpful {
            self.fallback_helpful.clone()
        } else {
            self.fallback_unhelpful.clone()
        };
        tracing::debug!(score, helpful, "no rule exited, using fallback");

        Ok(Assessment {
            helpful,
            justification,
            confidence: score,
            decided_by: None,
            trace,
        })
    }
}

/// Classify with the standard chain.
pub fn assess_utility(record: &CreatureRecord) -> CalcResult<Assessment> {
    RuleChain::standard().assess(record)
}
