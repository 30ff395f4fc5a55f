//! Presentation shell
//!
//! Owns the transient request state (Idle → Loading → Loaded | Failed) and
//! turns fetched profiles into cards. The converter and classifier only run
//! on the Loaded transition.

pub mod card;
pub mod picker;
pub mod state;

pub use card::{CreatureCard, StatRow, HELPFUL_LABEL, UNHELPFUL_LABEL};
pub use picker::{FixedIdPicker, IdPicker, RandomIdPicker};
pub use state::{Completion, RequestToken, Shell, ShellState};
