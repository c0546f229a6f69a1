use crate::models::{Activity, ActivityMap};
use feruca::Collator;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    Name,
    Time,
}

impl SortKey {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "name" => Some(Self::Name),
            "time" => Some(Self::Time),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Name => "name",
            SortKey::Time => "time",
        }
    }
}

/// Raw toolbar values as they arrive in the query string.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct FilterQuery {
    pub category: Option<String>,
    pub sort: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterState {
    pub category: Option<String>,
    pub sort: Option<SortKey>,
    pub search: String,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            category: None,
            sort: Some(SortKey::Name),
            search: String::new(),
        }
    }
}

impl From<&FilterQuery> for FilterState {
    fn from(query: &FilterQuery) -> Self {
        Self {
            category: query.category.clone().filter(|category| !category.is_empty()),
            // A missing sort falls back to the toolbar default; an unknown
            // one disables sorting.
            sort: match query.sort.as_deref() {
                None => Some(SortKey::Name),
                Some(raw) => SortKey::parse(raw),
            },
            search: query.search.clone().unwrap_or_default(),
        }
    }
}

/// Derives the visible entries and their order. The store itself is never
/// touched.
pub fn visible_activities<'a>(
    activities: &'a ActivityMap,
    filter: &FilterState,
) -> Vec<(&'a str, &'a Activity)> {
    let term = filter.search.trim().to_lowercase();

    let mut visible: Vec<(&str, &Activity)> = activities
        .iter()
        .map(|(name, activity)| (name.as_str(), activity))
        .filter(|(_, activity)| matches_category(activity, filter.category.as_deref()))
        .filter(|(name, activity)| matches_search(name, activity, &term))
        .collect();

    match filter.sort {
        Some(SortKey::Name) => {
            let mut collator = Collator::default();
            visible.sort_by(|a, b| collator.collate(a.0, b.0));
        }
        Some(SortKey::Time) => sort_by_schedule(&mut visible),
        None => {}
    }

    visible
}

fn matches_category(activity: &Activity, selected: Option<&str>) -> bool {
    match selected.filter(|selected| !selected.is_empty()) {
        None => true,
        Some(selected) => activity.category.as_deref() == Some(selected),
    }
}

fn matches_search(name: &str, activity: &Activity, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    name.to_lowercase().contains(term)
        || (!activity.description.is_empty() && activity.description.to_lowercase().contains(term))
}

/// Orders entries that have a schedule among themselves; entries without
/// one stay in the slots they already occupy.
fn sort_by_schedule(visible: &mut [(&str, &Activity)]) {
    let slots: Vec<usize> = visible
        .iter()
        .enumerate()
        .filter(|(_, (_, activity))| activity.schedule().is_some())
        .map(|(index, _)| index)
        .collect();

    let mut scheduled: Vec<_> = slots.iter().map(|&index| visible[index]).collect();
    let mut collator = Collator::default();
    scheduled.sort_by(|a, b| collator.collate(a.1.schedule.as_str(), b.1.schedule.as_str()));

    for (slot, entry) in slots.into_iter().zip(scheduled) {
        visible[slot] = entry;
    }
}

/// Unicode collation with the root locale: accents and case only break
/// ties, and lowercase sorts ahead of uppercase.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    Collator::default().collate(a, b)
}
