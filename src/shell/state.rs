//! Request/response state machine with stale-response protection.

use super::card::CreatureCard;
use crate::config::{CalcConfig, DEFAULT_MAX_CREATURE_ID};
use crate::error::CalcResult;
use crate::record::CreatureProfile;
use crate::rules::RuleChain;
use crate::utils::units::validate_unit_mass;
use serde::Serialize;
use std::mem;

/// Sequence number of an issued request. Only the newest one may land.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn sequence(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ShellState {
    Idle,
    Loading {
        token: RequestToken,
        previous: Option<Box<CreatureCard>>,
    },
    Loaded(Box<CreatureCard>),
    /// The previous card, if any, stays on screen under the error.
    Failed {
        message: String,
        previous: Option<Box<CreatureCard>>,
    },
}

/// What `Shell::complete` did with a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    /// Superseded by a newer request, or already completed. State untouched.
    Stale,
}

pub struct Shell {
    chain: RuleChain,
    cracker_weight_g: f64,
    max_creature_id: u32,
    issued: u64,
    state: ShellState,
}

impl Shell {
    /// Fails with `InvalidConfiguration` for an unusable cracker weight.
    pub fn new(chain: RuleChain, cracker_weight_g: f64) -> CalcResult<Self> {
        validate_unit_mass(cracker_weight_g)?;
        Ok(Self {
            chain,
            cracker_weight_g,
            max_creature_id: DEFAULT_MAX_CREATURE_ID,
            issued: 0,
            state: ShellState::Idle,
        })
    }

    pub fn from_config(config: &CalcConfig, chain: RuleChain) -> CalcResult<Self> {
        config.validate()?;
        let mut shell = Self::new(chain, config.cracker_weight_g)?;
        shell.max_creature_id = config.max_creature_id;
        Ok(shell)
    }

    pub fn state(&self) -> &ShellState {
        &self.state
    }

    pub fn max_creature_id(&self) -> u32 {
        self.max_creature_id
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, ShellState::Loading { .. })
    }

    /// The last successfully loaded card, whatever the current state.
    pub fn displayed(&self) -> Option<&CreatureCard> {
        match &self.state {
            ShellState::Idle => None,
            ShellState::Loaded(card) => Some(card.as_ref()),
            ShellState::Loading { previous, .. } | ShellState::Failed { previous, .. } => {
                previous.as_deref()
            }
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.state {
            ShellState::Failed { message, .. } => Some(message.as_str()),
            _ => None,
        }
    }

    /// Start a request. Any request still in flight becomes stale.
    pub fn begin_request(&mut self) -> RequestToken {
        self.issued += 1;
        let token = RequestToken(self.issued);
        if self.is_loading() {
            tracing::debug!(superseded = self.issued - 1, "new request supersedes pending one");
        }
        let previous = self.take_displayed();
        self.state = ShellState::Loading { token, previous };
        token
    }

    /// Land a response. Stale tokens are discarded without touching state.
    pub fn complete(
        &mut self,
        token: RequestToken,
        outcome: CalcResult<CreatureProfile>,
    ) -> Completion {
        let pending = matches!(self.state, ShellState::Loading { token: t, .. } if t == token);
        if !pending {
            tracing::warn!(token = token.0, latest = self.issued, "discarding stale response");
            return Completion::Stale;
        }

        let card = outcome.and_then(|profile| {
            CreatureCard::build(&profile, &self.chain, self.cracker_weight_g)
        });

        let previous = self.take_displayed();
        self.state = match card {
            Ok(card) => {
                tracing::info!(
                    id = card.id,
                    name = %card.name,
                    helpful = card.assessment.helpful,
                    confidence = card.assessment.confidence,
                    "creature loaded"
                );
                ShellState::Loaded(Box::new(card))
            }
            Err(err) => {
                tracing::warn!(error = %err, "request failed");
                ShellState::Failed { message: err.user_message(), previous }
            }
        };
        Completion::Applied
    }

    fn take_displayed(&mut self) -> Option<Box<CreatureCard>> {
        match mem::replace(&mut self.state, ShellState::Idle) {
            ShellState::Idle => None,
            ShellState::Loaded(card) => Some(card),
            ShellState::Loading { previous, .. } | ShellState::Failed { previous, .. } => previous,
        }
    }
}

#[cfg(feature = "fetch")]
impl Shell {
    /// One full cycle: begin, fetch, complete.
    ///
    /// Holds `&mut self` across the await, so requests never overlap here.
    /// Callers that need overlapping requests use `begin_request` and
    /// `complete` directly.
    pub async fn fetch_id<S>(&mut self, source: &S, id: u32) -> Completion
    where
        S: crate::source::CreatureSource + ?Sized,
    {
        let token = self.begin_request();
        let outcome = source.fetch(id).await;
        self.complete(token, outcome)
    }

    /// Fetch whatever id the picker chooses.
    pub async fn fetch_next<S, P>(&mut self, source: &S, picker: &mut P) -> Completion
    where
        S: crate::source::CreatureSource + ?Sized,
        P: super::picker::IdPicker,
    {
        let id = picker.pick(self.max_creature_id);
        self.fetch_id(source, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CalcError, RETRY_MESSAGE};
    use crate::record::CreatureRecord;

    fn profile(id: u32, name: &str) -> CreatureProfile {
        CreatureProfile {
            id,
            name: name.to_string(),
            artwork_url: None,
            stats: Vec::new(),
            record: CreatureRecord::new(60.0, 4.0),
        }
    }

    fn shell() -> Shell {
        Shell::new(RuleChain::standard(), 2.0).unwrap()
    }

    #[test]
    fn starts_idle() {
        let s = shell();
        assert_eq!(s.state(), &ShellState::Idle);
        assert!(s.displayed().is_none());
    }

    #[test]
    fn rejects_bad_cracker_weight() {
        assert!(matches!(
            Shell::new(RuleChain::standard(), 0.0),
            Err(CalcError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn success_loads_card() {
        let mut s = shell();
        let token = s.begin_request();
        assert!(s.is_loading());
        assert_eq!(s.complete(token, Ok(profile(25, "pikachu"))), Completion::Applied);
        assert_eq!(s.displayed().map(|c| c.name.as_str()), Some("Pikachu"));
    }

    #[test]
    fn stale_response_is_discarded() {
        let mut s = shell();
        let first = s.begin_request();
        let second = s.begin_request();

        assert_eq!(s.complete(second, Ok(profile(2, "ivysaur"))), Completion::Applied);
        assert_eq!(s.complete(first, Ok(profile(1, "bulbasaur"))), Completion::Stale);
        assert_eq!(s.displayed().map(|c| c.id), Some(2));
    }

    #[test]
    fn stale_response_does_not_end_newer_loading() {
        let mut s = shell();
        let first = s.begin_request();
        let _second = s.begin_request();
        assert_eq!(s.complete(first, Ok(profile(1, "bulbasaur"))), Completion::Stale);
        assert!(s.is_loading());
    }

    #[test]
    fn failure_keeps_previous_card() {
        let mut s = shell();
        let t = s.begin_request();
        s.complete(t, Ok(profile(25, "pikachu")));

        let t = s.begin_request();
        assert_eq!(s.displayed().map(|c| c.id), Some(25));
        s.complete(t, Err(CalcError::DataUnavailable("connection reset".into())));

        assert_eq!(s.error_message(), Some(RETRY_MESSAGE));
        assert_eq!(s.displayed().map(|c| c.id), Some(25));
    }

    #[test]
    fn malformed_profile_reads_like_unavailable() {
        let mut s = shell();
        let t = s.begin_request();
        let mut bad = profile(3, "venusaur");
        bad.record.mass_hg = f64::NAN;
        s.complete(t, Ok(bad));
        assert_eq!(s.error_message(), Some(RETRY_MESSAGE));
        assert!(s.displayed().is_none());
    }

    #[test]
    fn duplicate_completion_is_stale() {
        let mut s = shell();
        let t = s.begin_request();
        assert_eq!(s.complete(t, Ok(profile(25, "pikachu"))), Completion::Applied);
        assert_eq!(s.complete(t, Ok(profile(26, "raichu"))), Completion::Stale);
        assert_eq!(s.displayed().map(|c| c.id), Some(25));
    }
}
