//! Room Intake Core - Validation and Staged Submission
//!
//! # The Contract
//! 1. Selection caps are enforced while the user types, never by error
//! 2. Validation reports the first violated rule only
//! 3. Records are built only from validated entries
//! 4. The handoff channel treats absent and corrupt payloads alike

pub mod config;
pub mod entry;
pub mod selection;
pub mod validation;
pub mod submission;
pub mod hashing;
pub mod handoff;
pub mod intake;
pub mod review;
pub mod logging;

pub use config::{IntakeConfig, OverflowPolicy, SelectionLimits, ConfigError, STYLE_OPTIONS};
pub use entry::{DEFAULT_STYLE, EntryState, RoomType, BudgetTier, PhotoDescriptor, IntakeEvent, Rejection, Transition, reduce};
pub use selection::{toggle, add_many, try_add_many, remove_at, SelectionError};
pub use validation::{validate, parse_positive_decimal, ValidationResult, ValidationError, ParseError, ValidEntry, Validator};
pub use submission::{build, SubmissionRecord, Dimensions};
pub use hashing::{canonical_json, submission_digest};
pub use handoff::{HandoffChannel, HandoffError, SessionStore, MemorySessionStore};
pub use intake::{IntakeStage, SubmitError, SubmitOutcome, Navigation, StyleChoice};
pub use review::ReviewView;

pub const INTAKE_VERSION: &str = env!("CARGO_PKG_VERSION");
