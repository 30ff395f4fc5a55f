//! Batch assessment
//!
//! Classifies many profiles at once with Rayon. Profiles come from a JSON
//! file holding `CreatureProfile` objects, raw upstream payloads, or both.

use crate::error::CalcError;
use crate::record::{CreatureProfile, PokemonPayload};
use crate::rules::{Assessment, RuleChain};
use crate::utils::to_novelty_units;
use anyhow::{Context, Result};
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Serialize)]
pub struct BatchRow {
    pub id: u32,
    pub name: String,
    pub crackers: Option<f64>,
    pub assessment: Option<Assessment>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub helpful: usize,
    pub unhelpful: usize,
    pub failed: usize,
    /// Rule that decided the most verdicts, "fallback" for the default branch.
    pub top_rule: Option<String>,
}

/// One entry of a batch file.
#[derive(Debug, Clone)]
pub enum BatchEntry {
    Ready(CreatureProfile),
    /// Could not become a profile. Reported as a failed row, never dropped.
    Rejected { id: u32, name: String, error: String },
}

/// Read a JSON array of entries.
///
/// An object with a `record` key is a `CreatureProfile`; any other object is
/// an upstream payload.
pub fn load_profiles(path: &Path) -> Result<Vec<BatchEntry>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read profiles file: {:?}", path))?;
    let values: Vec<Value> =
        serde_json::from_str(&contents).with_context(|| "Failed to parse profiles JSON")?;

    Ok(values.into_iter().map(decode_entry).collect())
}

fn decode_entry(value: Value) -> BatchEntry {
    let id = value
        .get("id")
        .and_then(Value::as_u64)
        .and_then(|v| u32::try_from(v).ok())
        .unwrap_or(0);
    let name = value
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let decoded = if value.get("record").is_some() {
        serde_json::from_value::<CreatureProfile>(value)
            .map_err(|e| CalcError::MalformedRecord(e.to_string()))
    } else {
        serde_json::from_value::<PokemonPayload>(value)
            .map_err(|e| CalcError::MalformedRecord(e.to_string()))
            .and_then(CreatureProfile::try_from)
    };

    match decoded {
        Ok(profile) => BatchEntry::Ready(profile),
        Err(e) => {
            tracing::warn!(id, %name, error = %e, "rejecting batch entry");
            BatchEntry::Rejected { id, name, error: e.to_string() }
        }
    }
}

fn assess_profile(chain: &RuleChain, profile: &CreatureProfile, cracker_weight_g: f64) -> BatchRow {
    let outcome = to_novelty_units(profile.record.mass_hg, cracker_weight_g)
        .and_then(|crackers| chain.assess(&profile.record).map(|a| (crackers, a)));
    match outcome {
        Ok((crackers, assessment)) => BatchRow {
            id: profile.id,
            name: profile.name.clone(),
            crackers: Some(crackers),
            assessment: Some(assessment),
            error: None,
        },
        Err(e) => BatchRow {
            id: profile.id,
            name: profile.name.clone(),
            crackers: None,
            assessment: None,
            error: Some(e.to_string()),
        },
    }
}

/// Assess every profile in parallel. Output order matches input order.
pub fn assess_batch(
    chain: &RuleChain,
    profiles: &[CreatureProfile],
    cracker_weight_g: f64,
) -> Vec<BatchRow> {
    profiles
        .par_iter()
        .map(|profile| assess_profile(chain, profile, cracker_weight_g))
        .collect()
}

/// Like `assess_batch`, with rejected entries carried through as failed rows.
pub fn assess_entries(
    chain: &RuleChain,
    entries: &[BatchEntry],
    cracker_weight_g: f64,
) -> Vec<BatchRow> {
    entries
        .par_iter()
        .map(|entry| match entry {
            BatchEntry::Ready(profile) => assess_profile(chain, profile, cracker_weight_g),
            BatchEntry::Rejected { id, name, error } => BatchRow {
                id: *id,
                name: name.clone(),
                crackers: None,
                assessment: None,
                error: Some(error.clone()),
            },
        })
        .collect()
}

pub fn summarize(rows: &[BatchRow]) -> BatchSummary {
    let mut summary = BatchSummary {
        total: rows.len(),
        ..Default::default()
    };
    let mut deciders: FxHashMap<&str, usize> = FxHashMap::default();

    for row in rows {
        match &row.assessment {
            Some(a) => {
                if a.helpful {
                    summary.helpful += 1;
                } else {
                    summary.unhelpful += 1;
                }
                let rule = a.decided_by.as_deref().unwrap_or("fallback");
                *deciders.entry(rule).or_insert(0) += 1;
            }
            None => summary.failed += 1,
        }
    }

    // Ties break alphabetically so the summary is deterministic.
    summary.top_rule = deciders
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(a.0)))
        .map(|(rule, _)| rule.to_string());
    summary
}
