//! Render-ready view of one classified creature.

use crate::error::CalcResult;
use crate::record::CreatureProfile;
use crate::rules::{Assessment, RuleChain};
use crate::utils::{format_grouped, format_name, mass_kg, to_novelty_units};
use serde::Serialize;
use std::fmt::Write;

pub const HELPFUL_LABEL: &str = "Yes! 👍";
pub const UNHELPFUL_LABEL: &str = "Not really 👎";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatRow {
    pub label: String,
    pub value: i64,
}

/// Everything the card shows: identity, stats, weight facts and the verdict.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreatureCard {
    pub id: u32,
    pub name: String,
    pub artwork_url: Option<String>,
    pub types: Vec<String>,
    pub stats: Vec<StatRow>,
    pub weight_kg: f64,
    pub crackers: f64,
    pub crackers_display: String,
    pub cracker_weight_g: f64,
    pub assessment: Assessment,
    pub verdict_label: String,
    pub confidence_display: u8,
}

impl CreatureCard {
    /// Run the converter and the classifier over a profile.
    pub fn build(
        profile: &CreatureProfile,
        chain: &RuleChain,
        cracker_weight_g: f64,
    ) -> CalcResult<Self> {
        let record = &profile.record;
        let crackers = to_novelty_units(record.mass_hg, cracker_weight_g)?;
        let assessment = chain.assess(record)?;

        let verdict_label = if assessment.helpful {
            HELPFUL_LABEL
        } else {
            UNHELPFUL_LABEL
        };

        Ok(Self {
            id: profile.id,
            name: format_name(&profile.name),
            artwork_url: profile.artwork_url.clone(),
            types: record.categories.iter().map(|t| format_name(t)).collect(),
            stats: profile
                .stats
                .iter()
                .map(|s| StatRow { label: format_name(&s.name), value: s.value })
                .collect(),
            weight_kg: mass_kg(record.mass_hg),
            crackers,
            crackers_display: format_grouped(crackers),
            cracker_weight_g,
            confidence_display: assessment.display_confidence(),
            verdict_label: verdict_label.to_string(),
            assessment,
        })
    }

    /// Plain-text rendition for terminals.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let tags: Vec<String> = self.types.iter().map(|t| format!("[{}]", t)).collect();
        let _ = writeln!(out, "{} (#{})  {}", self.name, self.id, tags.join(" "));
        if let Some(url) = &self.artwork_url {
            let _ = writeln!(out, "  {}", url);
        }

        if !self.stats.is_empty() {
            let _ = writeln!(out);
            for pair in self.stats.chunks(2) {
                let row: Vec<String> = pair
                    .iter()
                    .map(|s| format!("{:<16}{:>4}", s.label, s.value))
                    .collect();
                let _ = writeln!(out, "  {}", row.join("    "));
            }
        }

        let _ = writeln!(out, "\nWeight Facts");
        let _ = writeln!(out, "  Official Weight: {} kg", self.weight_kg);
        let _ = writeln!(out, "  In Animal Crackers: {} crackers", self.crackers_display);
        let _ = writeln!(
            out,
            "  (Based on average animal cracker weight of {}g)",
            self.cracker_weight_g
        );

        let _ = writeln!(out, "\nTire Change Assistant?");
        let _ = writeln!(
            out,
            "  {}  (confidence {}/100)",
            self.verdict_label, self.confidence_display
        );
        let _ = writeln!(out, "  {}", self.assessment.justification);
        out
    }
}
