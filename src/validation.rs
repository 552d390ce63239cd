//! Validation System - Ordered, First-Violation-Wins
//!
//! Rules run in a fixed order and the first one that fires is the only
//! reason surfaced. Rule order is part of the contract.

use thiserror::Error;

use crate::config::SelectionLimits;
use crate::entry::EntryState;
use crate::submission::Dimensions;

#[cfg(feature = "test-hooks")]
use std::sync::atomic::{AtomicU32, Ordering};

#[cfg(feature = "test-hooks")]
static VALIDATION_CALL_COUNT: AtomicU32 = AtomicU32::new(0);

#[cfg(feature = "test-hooks")]
pub fn get_validation_call_count() -> u32 {
    VALIDATION_CALL_COUNT.load(Ordering::SeqCst)
}

#[cfg(feature = "test-hooks")]
pub fn reset_validation_call_count() {
    VALIDATION_CALL_COUNT.store(0, Ordering::SeqCst);
}

/// The single user-correctable error kind. `Display` is the inline message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter room length and width.")]
    MissingDimensions,

    #[error("Length/width must be positive numbers.")]
    InvalidDimensions,

    #[error("Height must be a positive number.")]
    InvalidHeight,

    #[error("Please pick at least one style (up to {max}).")]
    NoStyle { max: usize },

    #[error("Please upload at least {min} room photos (up to {max}).")]
    TooFewPhotos { min: usize, max: usize },

    #[error("Please upload no more than {max} photos.")]
    TooManyPhotos { max: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("value is empty")]
    Empty,

    #[error("'{0}' is not a number")]
    NotANumber(String),

    #[error("{0} is not positive")]
    NotPositive(String),
}

/// Parse user-typed text as a finite decimal strictly greater than zero.
///
/// Surrounding whitespace is ignored. Non-finite spellings (`inf`, `NaN`)
/// are not numbers here.
pub fn parse_positive_decimal(text: &str) -> Result<f64, ParseError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ParseError::Empty);
    }
    let value: f64 = trimmed
        .parse()
        .map_err(|_| ParseError::NotANumber(trimmed.to_string()))?;
    if !value.is_finite() {
        return Err(ParseError::NotANumber(trimmed.to_string()));
    }
    if value <= 0.0 {
        return Err(ParseError::NotPositive(trimmed.to_string()));
    }
    Ok(value)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Valid,
    Invalid(ValidationError),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    pub fn reason(&self) -> Option<String> {
        match self {
            ValidationResult::Valid => None,
            ValidationResult::Invalid(e) => Some(e.to_string()),
        }
    }
}

/// Validation rule trait - reports its violation, if any
pub trait ValidationRule {
    fn name(&self) -> &'static str;
    fn check(&self, state: &EntryState, limits: &SelectionLimits) -> Option<ValidationError>;
}

// --- Concrete Rules ---

pub struct DimensionsPresentRule;

impl ValidationRule for DimensionsPresentRule {
    fn name(&self) -> &'static str { "dimensions_present" }

    fn check(&self, state: &EntryState, _limits: &SelectionLimits) -> Option<ValidationError> {
        if state.length_ft.is_empty() || state.width_ft.is_empty() {
            Some(ValidationError::MissingDimensions)
        } else {
            None
        }
    }
}

pub struct DimensionsPositiveRule;

impl ValidationRule for DimensionsPositiveRule {
    fn name(&self) -> &'static str { "dimensions_positive" }

    fn check(&self, state: &EntryState, _limits: &SelectionLimits) -> Option<ValidationError> {
        let length = parse_positive_decimal(&state.length_ft);
        let width = parse_positive_decimal(&state.width_ft);
        if length.is_err() || width.is_err() {
            Some(ValidationError::InvalidDimensions)
        } else {
            None
        }
    }
}

/// Empty height text means "not provided"; anything else must parse.
pub struct HeightRule;

impl ValidationRule for HeightRule {
    fn name(&self) -> &'static str { "height" }

    fn check(&self, state: &EntryState, _limits: &SelectionLimits) -> Option<ValidationError> {
        if state.height_ft.is_empty() {
            return None;
        }
        parse_positive_decimal(&state.height_ft)
            .err()
            .map(|_| ValidationError::InvalidHeight)
    }
}

pub struct StyleRule;

impl ValidationRule for StyleRule {
    fn name(&self) -> &'static str { "style_prefs" }

    fn check(&self, state: &EntryState, limits: &SelectionLimits) -> Option<ValidationError> {
        if state.style_prefs.is_empty() {
            Some(ValidationError::NoStyle { max: limits.max_styles })
        } else {
            None
        }
    }
}

pub struct MinPhotosRule;

impl ValidationRule for MinPhotosRule {
    fn name(&self) -> &'static str { "min_photos" }

    fn check(&self, state: &EntryState, limits: &SelectionLimits) -> Option<ValidationError> {
        if state.photos.len() < limits.min_photos {
            Some(ValidationError::TooFewPhotos { min: limits.min_photos, max: limits.max_photos })
        } else {
            None
        }
    }
}

/// Unreachable through the reducer, which caps at add time. Kept for
/// states built directly (deserialized payloads, tests).
pub struct MaxPhotosRule;

impl ValidationRule for MaxPhotosRule {
    fn name(&self) -> &'static str { "max_photos" }

    fn check(&self, state: &EntryState, limits: &SelectionLimits) -> Option<ValidationError> {
        if state.photos.len() > limits.max_photos {
            Some(ValidationError::TooManyPhotos { max: limits.max_photos })
        } else {
            None
        }
    }
}

/// Proof that an `EntryState` passed every rule, with its parsed dimensions.
#[derive(Debug, Clone, Copy)]
pub struct ValidEntry<'a> {
    state: &'a EntryState,
    dimensions: Dimensions,
}

impl<'a> ValidEntry<'a> {
    pub fn state(&self) -> &'a EntryState {
        self.state
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }
}

/// Validator runs the rules in order and stops at the first violation
pub struct Validator {
    rules: Vec<Box<dyn ValidationRule>>,
    limits: SelectionLimits,
}

impl Validator {
    pub fn new(limits: SelectionLimits) -> Self {
        Self {
            rules: vec![
                Box::new(DimensionsPresentRule),
                Box::new(DimensionsPositiveRule),
                Box::new(HeightRule),
                Box::new(StyleRule),
                Box::new(MinPhotosRule),
                Box::new(MaxPhotosRule),
            ],
            limits,
        }
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// This is the ONLY path to a [`ValidEntry`].
    pub fn check<'a>(&self, state: &'a EntryState) -> Result<ValidEntry<'a>, ValidationError> {
        #[cfg(feature = "test-hooks")]
        VALIDATION_CALL_COUNT.fetch_add(1, Ordering::SeqCst);

        if let Some(violation) = self.rules.iter().find_map(|rule| rule.check(state, &self.limits)) {
            return Err(violation);
        }

        let dimensions = parse_dimensions(state)?;
        Ok(ValidEntry { state, dimensions })
    }

    pub fn validate(&self, state: &EntryState) -> ValidationResult {
        match self.check(state) {
            Ok(_) => ValidationResult::Valid,
            Err(e) => ValidationResult::Invalid(e),
        }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(SelectionLimits::default())
    }
}

/// Validate against the default limits.
pub fn validate(state: &EntryState) -> ValidationResult {
    Validator::default().validate(state)
}

fn parse_dimensions(state: &EntryState) -> Result<Dimensions, ValidationError> {
    let length_ft = parse_positive_decimal(&state.length_ft)
        .map_err(|_| ValidationError::InvalidDimensions)?;
    let width_ft = parse_positive_decimal(&state.width_ft)
        .map_err(|_| ValidationError::InvalidDimensions)?;
    let height_ft = if state.height_ft.is_empty() {
        None
    } else {
        Some(parse_positive_decimal(&state.height_ft).map_err(|_| ValidationError::InvalidHeight)?)
    };
    Ok(Dimensions { length_ft, width_ft, height_ft })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::PhotoDescriptor;

    fn valid_state() -> EntryState {
        EntryState {
            length_ft: "12".into(),
            width_ft: "10".into(),
            photos: (0..3)
                .map(|i| PhotoDescriptor::new(format!("p{}.jpg", i), "image/jpeg", 500_000))
                .collect(),
            ..EntryState::default()
        }
    }

    #[test]
    fn test_parse_positive_decimal() {
        assert_eq!(parse_positive_decimal("12"), Ok(12.0));
        assert_eq!(parse_positive_decimal(" 8.5 "), Ok(8.5));
        assert_eq!(parse_positive_decimal(".5"), Ok(0.5));
        assert_eq!(parse_positive_decimal(""), Err(ParseError::Empty));
        assert_eq!(parse_positive_decimal("   "), Err(ParseError::Empty));
        assert_eq!(parse_positive_decimal("0"), Err(ParseError::NotPositive("0".into())));
        assert_eq!(parse_positive_decimal("-5"), Err(ParseError::NotPositive("-5".into())));
        assert_eq!(parse_positive_decimal("12ft"), Err(ParseError::NotANumber("12ft".into())));
        assert!(matches!(parse_positive_decimal("inf"), Err(ParseError::NotANumber(_))));
        assert!(matches!(parse_positive_decimal("NaN"), Err(ParseError::NotANumber(_))));
    }

    #[test]
    fn test_rule_order_is_fixed() {
        let validator = Validator::default();
        assert_eq!(
            validator.rule_names(),
            vec![
                "dimensions_present",
                "dimensions_positive",
                "height",
                "style_prefs",
                "min_photos",
                "max_photos",
            ]
        );
    }

    #[test]
    fn test_valid_state_passes() {
        let state = valid_state();
        let entry = Validator::default().check(&state).unwrap();
        assert_eq!(entry.dimensions().length_ft, 12.0);
        assert_eq!(entry.dimensions().height_ft, None);
    }

    #[test]
    fn test_whitespace_length_is_not_missing_but_invalid() {
        let state = EntryState { length_ft: "  ".into(), ..valid_state() };
        assert_eq!(validate(&state), ValidationResult::Invalid(ValidationError::InvalidDimensions));
    }

    #[test]
    fn test_height_provided_but_invalid() {
        for bad in ["0", "-1", "tall", " "] {
            let state = EntryState { height_ft: bad.into(), ..valid_state() };
            assert_eq!(
                validate(&state).reason().as_deref(),
                Some("Height must be a positive number."),
                "height {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_too_many_photos_message() {
        let mut state = valid_state();
        state.photos = (0..9).map(|i| PhotoDescriptor::new(format!("{}", i), "", 1)).collect();
        assert_eq!(
            validate(&state).reason().as_deref(),
            Some("Please upload no more than 8 photos.")
        );
    }

    #[test]
    fn test_messages_follow_configured_limits() {
        let limits = SelectionLimits { max_styles: 2, min_photos: 4, max_photos: 6 };
        let validator = Validator::new(limits);

        let no_style = EntryState { style_prefs: vec![], ..valid_state() };
        assert_eq!(
            validator.validate(&no_style).reason().as_deref(),
            Some("Please pick at least one style (up to 2).")
        );
        assert_eq!(
            validator.validate(&valid_state()).reason().as_deref(),
            Some("Please upload at least 4 room photos (up to 6).")
        );
    }
}
