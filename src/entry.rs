//! Entry State - Live Intake Data and Its Transitions
//!
//! The intake stage never mutates `EntryState` in place from the outside:
//! every user action is an [`IntakeEvent`] folded through [`reduce`].

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::{IntakeConfig, OverflowPolicy};
use crate::selection;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum RoomType {
    #[default]
    #[serde(rename = "Living Room")]
    LivingRoom,
    Bedroom,
    Kitchen,
    Bathroom,
    Office,
    #[serde(rename = "Dining Room")]
    DiningRoom,
    Other,
}

impl RoomType {
    pub const ALL: [RoomType; 7] = [
        RoomType::LivingRoom,
        RoomType::Bedroom,
        RoomType::Kitchen,
        RoomType::Bathroom,
        RoomType::Office,
        RoomType::DiningRoom,
        RoomType::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            RoomType::LivingRoom => "Living Room",
            RoomType::Bedroom => "Bedroom",
            RoomType::Kitchen => "Kitchen",
            RoomType::Bathroom => "Bathroom",
            RoomType::Office => "Office",
            RoomType::DiningRoom => "Dining Room",
            RoomType::Other => "Other",
        }
    }
}

impl fmt::Display for RoomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum BudgetTier {
    Budget,
    #[default]
    Mid,
    Premium,
}

impl BudgetTier {
    pub const ALL: [BudgetTier; 3] = [BudgetTier::Budget, BudgetTier::Mid, BudgetTier::Premium];
}

impl fmt::Display for BudgetTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BudgetTier::Budget => "Budget",
            BudgetTier::Mid => "Mid",
            BudgetTier::Premium => "Premium",
        };
        f.write_str(label)
    }
}

/// Metadata for one chosen image. Binary content stays with the file picker.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PhotoDescriptor {
    pub name: String,
    #[serde(alias = "type")]
    pub mime_type: String,
    #[serde(alias = "size")]
    pub size_bytes: u64,
}

impl PhotoDescriptor {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            size_bytes,
        }
    }

    /// One-line summary, e.g. `image/jpeg • 2.40 MB`.
    pub fn summary(&self) -> String {
        let kind = if self.mime_type.is_empty() { "image" } else { &self.mime_type };
        let megabytes = self.size_bytes as f64 / 1024.0 / 1024.0;
        format!("{} • {:.2} MB", kind, megabytes)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EntryState {
    #[serde(default)]
    pub room_type: RoomType,
    #[serde(default)]
    pub budget_tier: BudgetTier,
    #[serde(default)]
    pub length_ft: String,
    #[serde(default)]
    pub width_ft: String,
    #[serde(default)]
    pub height_ft: String,
    #[serde(default = "default_style_prefs")]
    pub style_prefs: Vec<String>,
    #[serde(default)]
    pub must_keep: String,
    #[serde(default)]
    pub dislike_most: String,
    #[serde(default)]
    pub photos: Vec<PhotoDescriptor>,
}

/// Pre-selected on a fresh entry. Every catalog must offer it.
pub const DEFAULT_STYLE: &str = "Modern";

fn default_style_prefs() -> Vec<String> {
    vec![DEFAULT_STYLE.to_string()]
}

impl Default for EntryState {
    fn default() -> Self {
        Self {
            room_type: RoomType::default(),
            budget_tier: BudgetTier::default(),
            length_ft: String::new(),
            width_ft: String::new(),
            height_ft: String::new(),
            style_prefs: default_style_prefs(),
            must_keep: String::new(),
            dislike_most: String::new(),
            photos: vec![],
        }
    }
}

/// A discrete user action on the intake form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum IntakeEvent {
    SetRoomType(RoomType),
    SetBudgetTier(BudgetTier),
    SetLength(String),
    SetWidth(String),
    SetHeight(String),
    ToggleStyle(String),
    SetMustKeep(String),
    SetDislikeMost(String),
    AddPhotos(Vec<PhotoDescriptor>),
    RemovePhoto(usize),
}

/// A mutation the constraint engine refused or clipped.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Rejection {
    StyleLimitReached { style: String, limit: usize },
    UnknownStyle { style: String },
    DuplicateStyle { style: String },
    PhotosDropped { dropped: usize, limit: usize },
    PhotoBatchRejected { requested: usize, limit: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: EntryState,
    pub rejection: Option<Rejection>,
}

impl Transition {
    fn accepted(state: EntryState) -> Self {
        Self { state, rejection: None }
    }
}

/// Fold one event into the entry state.
pub fn reduce(state: EntryState, event: &IntakeEvent, config: &IntakeConfig) -> Transition {
    let limits = &config.limits;
    match event {
        IntakeEvent::SetRoomType(room_type) => {
            Transition::accepted(EntryState { room_type: *room_type, ..state })
        }
        IntakeEvent::SetBudgetTier(tier) => {
            Transition::accepted(EntryState { budget_tier: *tier, ..state })
        }
        IntakeEvent::SetLength(text) => {
            Transition::accepted(EntryState { length_ft: text.clone(), ..state })
        }
        IntakeEvent::SetWidth(text) => {
            Transition::accepted(EntryState { width_ft: text.clone(), ..state })
        }
        IntakeEvent::SetHeight(text) => {
            Transition::accepted(EntryState { height_ft: text.clone(), ..state })
        }
        IntakeEvent::SetMustKeep(text) => {
            Transition::accepted(EntryState { must_keep: text.clone(), ..state })
        }
        IntakeEvent::SetDislikeMost(text) => {
            Transition::accepted(EntryState { dislike_most: text.clone(), ..state })
        }
        IntakeEvent::ToggleStyle(style) => {
            let selected = state.style_prefs.contains(style);
            if !selected && !config.offers_style(style) {
                return Transition {
                    state,
                    rejection: Some(Rejection::UnknownStyle { style: style.clone() }),
                };
            }
            let style_prefs = selection::toggle(&state.style_prefs, style.clone(), limits.max_styles);
            let rejection = (!selected && style_prefs.len() == state.style_prefs.len()).then(|| {
                Rejection::StyleLimitReached { style: style.clone(), limit: limits.max_styles }
            });
            Transition { state: EntryState { style_prefs, ..state }, rejection }
        }
        IntakeEvent::AddPhotos(batch) => match config.photo_overflow {
            OverflowPolicy::Truncate => {
                let (photos, dropped) = selection::add_many(&state.photos, batch, limits.max_photos);
                let rejection = (dropped > 0)
                    .then_some(Rejection::PhotosDropped { dropped, limit: limits.max_photos });
                Transition { state: EntryState { photos, ..state }, rejection }
            }
            OverflowPolicy::Reject => {
                match selection::try_add_many(&state.photos, batch, limits.max_photos) {
                    Ok(photos) => Transition::accepted(EntryState { photos, ..state }),
                    Err(_) => Transition {
                        state,
                        rejection: Some(Rejection::PhotoBatchRejected {
                            requested: batch.len(),
                            limit: limits.max_photos,
                        }),
                    },
                }
            }
        },
        IntakeEvent::RemovePhoto(index) => {
            let photos = selection::remove_at(&state.photos, *index);
            Transition::accepted(EntryState { photos, ..state })
        }
    }
}
