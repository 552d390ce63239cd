//! Intake Stage - Single Entry Point for Submission
//!
//! CRITICAL: submit MUST validate before building. A record reaches the
//! handoff channel only after passing every rule.

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::IntakeConfig;
use crate::entry::{reduce, EntryState, IntakeEvent, Rejection};
use crate::handoff::{HandoffChannel, HandoffError, SessionStore};
use crate::submission::{build, SubmissionRecord};
use crate::validation::{ValidationError, ValidationResult, Validator};

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("Handoff failed: {0}")]
    Handoff(#[from] HandoffError),
}

/// Where control goes after an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    ToIntake,
    ToReview,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubmitOutcome {
    pub record: SubmissionRecord,
    pub navigation: Navigation,
}

/// One style button as the form shows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleChoice {
    pub label: String,
    pub selected: bool,
    pub enabled: bool,
}

pub struct IntakeStage {
    config: IntakeConfig,
    validator: Validator,
    state: EntryState,
    error: Option<ValidationError>,
}

impl IntakeStage {
    pub fn new(config: IntakeConfig) -> Self {
        Self {
            validator: Validator::new(config.limits.clone()),
            config,
            state: EntryState::default(),
            error: None,
        }
    }

    /// Resume from an existing entry, e.g. one supplied by the CLI bridge.
    ///
    /// The style selection is replayed through the reducer, so duplicates,
    /// styles outside the catalog and styles past `maxStyles` are dropped and
    /// reported. Photos are kept as given; the submit-time cap covers them.
    pub fn with_state(config: IntakeConfig, mut state: EntryState) -> (Self, Vec<Rejection>) {
        let styles = std::mem::take(&mut state.style_prefs);
        let mut stage = Self { state, ..Self::new(config) };

        let mut rejections = vec![];
        for style in styles {
            if stage.state.style_prefs.contains(&style) {
                debug!(%style, "duplicate style dropped");
                rejections.push(Rejection::DuplicateStyle { style });
                continue;
            }
            if let Some(rejection) = stage.dispatch(IntakeEvent::ToggleStyle(style)) {
                rejections.push(rejection);
            }
        }
        (stage, rejections)
    }

    pub fn config(&self) -> &IntakeConfig {
        &self.config
    }

    pub fn state(&self) -> &EntryState {
        &self.state
    }

    /// The inline error currently shown, if any.
    pub fn error(&self) -> Option<&ValidationError> {
        self.error.as_ref()
    }

    /// Apply one user event. Events are processed strictly in call order.
    pub fn dispatch(&mut self, event: IntakeEvent) -> Option<Rejection> {
        if matches!(event, IntakeEvent::AddPhotos(_)) {
            self.error = None;
        }

        let state = std::mem::take(&mut self.state);
        let transition = reduce(state, &event, &self.config);
        self.state = transition.state;

        if let Some(rejection) = &transition.rejection {
            if let Rejection::PhotoBatchRejected { limit, .. } = rejection {
                self.error = Some(ValidationError::TooManyPhotos { max: *limit });
            }
            debug!(?rejection, "mutation rejected");
        }
        transition.rejection
    }

    pub fn validate(&self) -> ValidationResult {
        self.validator.validate(&self.state)
    }

    /// Validate, build and hand off. On success the entry state is discarded
    /// and control moves to the review stage.
    pub fn submit<S: SessionStore>(
        &mut self,
        channel: &mut HandoffChannel<S>,
        now: DateTime<Utc>,
    ) -> Result<SubmitOutcome, SubmitError> {
        self.error = None;

        // MANDATORY: no record without validation.
        let record = match self.validator.check(&self.state) {
            Ok(entry) => build(&entry, now),
            Err(violation) => {
                info!(reason = %violation, "submission rejected");
                self.error = Some(violation.clone());
                return Err(SubmitError::Validation(violation));
            }
        };

        channel.put(&self.config.handoff_key, &record)?;
        self.state = EntryState::default();

        Ok(SubmitOutcome {
            record,
            navigation: Navigation::ToReview,
        })
    }

    pub fn style_choices(&self) -> Vec<StyleChoice> {
        let full = self.state.style_prefs.len() >= self.config.limits.max_styles;
        self.config
            .style_catalog
            .iter()
            .map(|label| {
                let selected = self.state.style_prefs.contains(label);
                StyleChoice {
                    label: label.clone(),
                    selected,
                    enabled: selected || !full,
                }
            })
            .collect()
    }

    /// e.g. `5/8 selected (minimum 3)`
    pub fn photo_count_label(&self) -> String {
        format!(
            "{}/{} selected (minimum {})",
            self.state.photos.len(),
            self.config.limits.max_photos,
            self.config.limits.min_photos
        )
    }
}

impl Default for IntakeStage {
    fn default() -> Self {
        Self::new(IntakeConfig::default())
    }
}
