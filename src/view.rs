use crate::models::{Activity, ActivityMap};
use crate::pipeline::{visible_activities, FilterState};
use crate::status::StatusMessage;
use crate::store::{LoadState, StoreSnapshot};
use serde::Serialize;
use std::collections::BTreeSet;

pub const ACTIVITY_PLACEHOLDER: &str = "-- Select an activity --";
pub const ALL_CATEGORIES: &str = "All";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

impl SelectOption {
    fn new(value: &str, label: &str, selected: bool) -> Self {
        Self {
            value: value.to_string(),
            label: label.to_string(),
            selected,
        }
    }
}

/// One participant row; the pair is what the remove control submits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParticipantRow {
    pub activity: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityCard {
    pub name: String,
    pub description: String,
    pub schedule: String,
    pub spots_left: i64,
    pub participants: Vec<ParticipantRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ListView {
    Loading,
    Failed,
    Empty,
    Cards { cards: Vec<ActivityCard> },
}

/// Values the signup form is rendered with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SignupDraft {
    pub activity: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PageView {
    pub filter: FilterState,
    pub list: ListView,
    pub activity_options: Vec<SelectOption>,
    pub category_options: Vec<SelectOption>,
    pub draft: SignupDraft,
    pub status: Option<StatusMessage>,
    pub loaded_at: Option<String>,
}

/// Signup select: placeholder first, then every activity in map order.
pub fn activity_options(activities: &ActivityMap, selected: &str) -> Vec<SelectOption> {
    std::iter::once(SelectOption::new("", ACTIVITY_PLACEHOLDER, selected.is_empty()))
        .chain(
            activities
                .keys()
                .map(|name| SelectOption::new(name, name, name == selected)),
        )
        .collect()
}

/// Category filter: "All" first, then distinct non-empty categories in
/// ascending order.
pub fn category_options(activities: &ActivityMap, selected: Option<&str>) -> Vec<SelectOption> {
    let categories: BTreeSet<&str> = activities.values().filter_map(Activity::category).collect();

    std::iter::once(SelectOption::new("", ALL_CATEGORIES, selected.is_none()))
        .chain(
            categories
                .into_iter()
                .map(|category| SelectOption::new(category, category, selected == Some(category))),
        )
        .collect()
}

pub fn build_card(name: &str, activity: &Activity) -> ActivityCard {
    ActivityCard {
        name: name.to_string(),
        description: activity.description.clone(),
        schedule: activity.schedule.clone(),
        spots_left: activity.spots_left(),
        participants: activity
            .participants
            .iter()
            .map(|email| ParticipantRow {
                activity: name.to_string(),
                email: email.clone(),
            })
            .collect(),
    }
}

pub fn build_list(snapshot: &StoreSnapshot, filter: &FilterState) -> ListView {
    match snapshot.state {
        LoadState::Pending => ListView::Loading,
        LoadState::Failed => ListView::Failed,
        LoadState::Ready => {
            let cards: Vec<ActivityCard> = visible_activities(&snapshot.activities, filter)
                .into_iter()
                .map(|(name, activity)| build_card(name, activity))
                .collect();
            if cards.is_empty() {
                ListView::Empty
            } else {
                ListView::Cards { cards }
            }
        }
    }
}

pub fn build_page(
    snapshot: &StoreSnapshot,
    filter: FilterState,
    draft: SignupDraft,
    status: Option<StatusMessage>,
) -> PageView {
    PageView {
        list: build_list(snapshot, &filter),
        activity_options: activity_options(&snapshot.activities, &draft.activity),
        category_options: category_options(&snapshot.activities, filter.category.as_deref()),
        loaded_at: snapshot
            .loaded_at
            .map(|at| at.format("%Y-%m-%d %H:%M:%S").to_string()),
        filter,
        draft,
        status,
    }
}
