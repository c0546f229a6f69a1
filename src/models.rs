use crate::pipeline::FilterQuery;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Activity {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub schedule: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub max_participants: i64,
    #[serde(default)]
    pub participants: Vec<String>,
}

impl Activity {
    pub fn spots_left(&self) -> i64 {
        self.max_participants - self.participants.len() as i64
    }

    /// Category with empty strings folded into `None`.
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref().filter(|category| !category.is_empty())
    }

    pub fn schedule(&self) -> Option<&str> {
        Some(self.schedule.as_str()).filter(|schedule| !schedule.is_empty())
    }
}

/// Activities keyed by their unique name, in the order the server sent them.
pub type ActivityMap = IndexMap<String, Activity>;

/// Body of a signup/unregister response. Success carries `message`,
/// failure carries `detail`.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ServerReply {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
}

/// Signup/unregister form body. The toolbar values ride along so the
/// redirect lands on the same filtered view.
#[derive(Debug, Deserialize, Default)]
pub struct ActionForm {
    #[serde(default)]
    pub activity: String,
    #[serde(default)]
    pub email: String,
    #[serde(flatten)]
    pub filter: FilterQuery,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spots_left_goes_negative_when_oversubscribed() {
        let activity = Activity {
            max_participants: 1,
            participants: vec!["a@x.com".into(), "b@x.com".into()],
            ..Activity::default()
        };
        assert_eq!(activity.spots_left(), -1);
    }

    #[test]
    fn decodes_activity_without_category() {
        let raw = r#"{
            "description": "d",
            "schedule": "Mon 3pm",
            "max_participants": 10,
            "participants": ["a@x.com"]
        }"#;
        let activity: Activity = serde_json::from_str(raw).unwrap();
        assert_eq!(activity.category(), None);
        assert_eq!(activity.spots_left(), 9);
    }

    #[test]
    fn decoding_keeps_server_key_order() {
        let raw = r#"{
            "Zumba": {"max_participants": 5},
            "Art": {"max_participants": 5},
            "Chess Club": {"max_participants": 5}
        }"#;
        let activities: ActivityMap = serde_json::from_str(raw).unwrap();
        assert_eq!(
            activities.keys().collect::<Vec<_>>(),
            vec!["Zumba", "Art", "Chess Club"]
        );
    }

    #[test]
    fn empty_category_counts_as_unset() {
        let activity = Activity {
            category: Some(String::new()),
            ..Activity::default()
        };
        assert_eq!(activity.category(), None);
    }
}
