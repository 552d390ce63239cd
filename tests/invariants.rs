//! Contract Invariant Tests
//!
//! These tests verify the non-negotiable guarantees of intake and handoff.

use chrono::{DateTime, TimeZone, Utc};

use roomintake_core::{
    add_many, toggle, validate, BudgetTier, Dimensions, EntryState, HandoffChannel, IntakeConfig,
    IntakeEvent, IntakeStage, Navigation, PhotoDescriptor, ReviewView, RoomType, SessionStore,
    SubmissionRecord, ValidationError, ValidationResult, STYLE_OPTIONS,
};

const KEY: &str = "roomIntakePayload";

fn photos(n: usize) -> Vec<PhotoDescriptor> {
    (0..n)
        .map(|i| PhotoDescriptor::new(format!("IMG_{:04}.jpg", i), "image/jpeg", 1_200_000 + i as u64))
        .collect()
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 16, 14, 5, 30).unwrap()
}

fn scenario_a_state() -> EntryState {
    EntryState {
        length_ft: "12".into(),
        width_ft: "10".into(),
        height_ft: String::new(),
        style_prefs: vec!["Modern".into()],
        photos: photos(3),
        ..EntryState::default()
    }
}

fn invalid(message: &str) -> Option<String> {
    Some(message.to_string())
}

#[test]
fn invariant_fourth_style_never_added() {
    // Every full selection of 3 rejects every other catalog style.
    for a in 0..STYLE_OPTIONS.len() {
        for b in (a + 1)..STYLE_OPTIONS.len() {
            for c in (b + 1)..STYLE_OPTIONS.len() {
                let full: Vec<String> =
                    [a, b, c].iter().map(|i| STYLE_OPTIONS[*i].to_string()).collect();
                for extra in STYLE_OPTIONS.iter().filter(|s| !full.contains(&s.to_string())) {
                    assert_eq!(toggle(&full, extra.to_string(), 3), full);
                }
            }
        }
    }
}

#[test]
fn invariant_style_removal_never_blocked() {
    let full: Vec<String> = STYLE_OPTIONS[..3].iter().map(|s| s.to_string()).collect();
    for style in &full {
        let next = toggle(&full, style.clone(), 3);
        assert_eq!(next.len(), 2);
        assert!(!next.contains(style));
    }
}

#[test]
fn invariant_photo_batches_capped_in_order() {
    for existing in 0..=8 {
        for incoming in 0..=10 {
            let current = photos(existing);
            let batch: Vec<_> = (0..incoming)
                .map(|i| PhotoDescriptor::new(format!("new-{}.png", i), "image/png", 1))
                .collect();

            let (next, dropped) = add_many(&current, &batch, 8);
            let kept = incoming.min(8 - existing);

            assert!(next.len() <= 8);
            assert_eq!(&next[..existing], &current[..]);
            assert_eq!(&next[existing..], &batch[..kept]);
            assert_eq!(dropped, incoming - kept);
        }
    }
}

#[test]
fn invariant_validate_is_pure() {
    let states = vec![
        scenario_a_state(),
        EntryState::default(),
        EntryState { height_ft: "abc".into(), ..scenario_a_state() },
    ];
    for state in &states {
        let snapshot = state.clone();
        assert_eq!(validate(state), validate(state));
        assert_eq!(state, &snapshot);
    }
}

#[test]
fn invariant_first_rule_wins() {
    // Violates rule 1 (missing length) and rule 4 (no style) at once.
    let state = EntryState {
        length_ft: String::new(),
        width_ft: "10".into(),
        style_prefs: vec![],
        photos: photos(3),
        ..EntryState::default()
    };
    assert_eq!(validate(&state).reason(), invalid("Please enter room length and width."));

    // Every rule violated at once still reports rule 1 only.
    let worst = EntryState {
        length_ft: String::new(),
        width_ft: String::new(),
        height_ft: "-1".into(),
        style_prefs: vec![],
        photos: photos(9),
        ..EntryState::default()
    };
    assert_eq!(validate(&worst), ValidationResult::Invalid(ValidationError::MissingDimensions));

    // Rules 3, 4 and 5 together report rule 3.
    let later = EntryState {
        height_ft: "0".into(),
        style_prefs: vec![],
        photos: photos(1),
        ..scenario_a_state()
    };
    assert_eq!(validate(&later).reason(), invalid("Height must be a positive number."));
}

#[test]
fn invariant_handoff_round_trip() {
    let record = SubmissionRecord {
        room_type: RoomType::DiningRoom,
        dimensions: Dimensions { length_ft: 13.333333333333334, width_ft: 0.1, height_ft: Some(8.75) },
        budget_tier: BudgetTier::Premium,
        style_prefs: vec!["Mid-century modern".into(), "Coastal".into(), "Industrial".into()],
        must_keep: "walnut sideboard, \"grandma's\" rug".into(),
        dislike_most: "awkward layout\nnot enough storage ✨".into(),
        photos: photos(8),
        created_at: Utc.with_ymd_and_hms(2026, 10, 16, 23, 59, 59).unwrap()
            + chrono::Duration::milliseconds(999),
    };

    let mut channel = HandoffChannel::default();
    channel.put(KEY, &record).unwrap();
    assert_eq!(channel.get(KEY), Some(record.clone()));

    // Records not produced by the builder may carry finer timestamps.
    let base = Utc.with_ymd_and_hms(2026, 10, 16, 0, 0, 0).unwrap();
    for extra_nanos in [1_500_000, 1_000, 7, 999_999_999] {
        let fine = SubmissionRecord {
            created_at: base + chrono::Duration::nanoseconds(extra_nanos),
            ..record.clone()
        };
        channel.put(KEY, &fine).unwrap();
        assert_eq!(channel.get(KEY), Some(fine));
    }
}

#[test]
fn scenario_a_valid_without_height() {
    let state = scenario_a_state();
    assert_eq!(validate(&state), ValidationResult::Valid);

    let (mut stage, rejections) = IntakeStage::with_state(IntakeConfig::default(), state);
    assert!(rejections.is_empty());
    let mut channel = HandoffChannel::default();
    let outcome = stage.submit(&mut channel, now()).unwrap();

    assert_eq!(outcome.navigation, Navigation::ToReview);
    assert_eq!(outcome.record.dimensions.length_ft, 12.0);
    assert_eq!(outcome.record.dimensions.width_ft, 10.0);
    assert_eq!(outcome.record.dimensions.height_ft, None);

    let raw = channel.store().get_item(KEY).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert!(value["dimensions"]["heightFt"].is_null());
}

#[test]
fn scenario_b_missing_length() {
    let state = EntryState {
        length_ft: String::new(),
        width_ft: "10".into(),
        photos: photos(3),
        ..EntryState::default()
    };
    assert_eq!(validate(&state).reason(), invalid("Please enter room length and width."));
}

#[test]
fn scenario_c_negative_length() {
    let state = EntryState {
        length_ft: "-5".into(),
        width_ft: "10".into(),
        photos: photos(3),
        ..EntryState::default()
    };
    assert_eq!(validate(&state).reason(), invalid("Length/width must be positive numbers."));
}

#[test]
fn scenario_d_no_style() {
    let state = EntryState { style_prefs: vec![], ..scenario_a_state() };
    assert_eq!(validate(&state).reason(), invalid("Please pick at least one style (up to 3)."));
}

#[test]
fn scenario_e_two_photos() {
    let state = EntryState { photos: photos(2), ..scenario_a_state() };
    assert_eq!(
        validate(&state).reason(),
        invalid("Please upload at least 3 room photos (up to 8).")
    );
}

#[test]
fn scenario_f_review_without_put() {
    let channel = HandoffChannel::default();
    let view = ReviewView::load(&channel, KEY);

    assert_eq!(view, ReviewView::NoPayload);
    assert_eq!(view.render().unwrap(), "No payload found. Go back and submit the form.");
    assert_eq!(view.back(), Navigation::ToIntake);
}

#[test]
fn invariant_event_flow_end_to_end() {
    let mut stage = IntakeStage::default();
    let events = vec![
        IntakeEvent::SetRoomType(RoomType::Office),
        IntakeEvent::SetBudgetTier(BudgetTier::Budget),
        IntakeEvent::SetLength("11.5".into()),
        IntakeEvent::SetWidth("9".into()),
        IntakeEvent::SetHeight("8".into()),
        IntakeEvent::ToggleStyle("Modern".into()),
        IntakeEvent::ToggleStyle("Scandinavian".into()),
        IntakeEvent::SetMustKeep("standing desk".into()),
        IntakeEvent::AddPhotos(photos(5)),
        IntakeEvent::AddPhotos(photos(5)),
        IntakeEvent::RemovePhoto(0),
    ];
    for event in events {
        stage.dispatch(event);
    }
    assert_eq!(stage.state().photos.len(), 7);
    assert_eq!(stage.state().style_prefs, vec!["Scandinavian".to_string()]);

    let mut channel = HandoffChannel::default();
    let outcome = stage.submit(&mut channel, now()).unwrap();

    let view = ReviewView::load(&channel, KEY);
    assert_eq!(view.record(), Some(&outcome.record));
    assert_eq!(outcome.record.room_type, RoomType::Office);
    assert_eq!(outcome.record.dimensions.height_ft, Some(8.0));
    assert_eq!(outcome.record.must_keep, "standing desk");
    assert_eq!(outcome.record.created_at, now());
}

#[test]
fn invariant_corrupt_and_absent_render_alike() {
    let absent = HandoffChannel::default();

    let mut corrupt = HandoffChannel::default();
    corrupt.store_mut().set_item(KEY, "{not json".into());

    assert_eq!(ReviewView::load(&absent, KEY), ReviewView::load(&corrupt, KEY));
}
