#![allow(dead_code)]

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use once_cell::sync::Lazy;
use serde::Deserialize;
use indexmap::IndexMap;
use serde_json::{json, Value};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};

/// In-process stand-in for the upstream activities API. It runs on its own
/// thread and runtime so it outlives any single `#[tokio::test]`.
pub struct MockUpstream {
    pub base_url: String,
    data: Arc<Mutex<Upstream>>,
}

/// What `GET /activities` answers with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Listing {
    #[default]
    Normal,
    ServerError,
    /// 200 with this raw JSON body instead of the activity map.
    Raw(&'static str),
}

#[derive(Default)]
struct Upstream {
    activities: IndexMap<String, Value>,
    listing: Listing,
}

#[derive(Deserialize)]
struct EmailQuery {
    email: String,
}

type Shared = Arc<Mutex<Upstream>>;

pub static UPSTREAM: Lazy<MockUpstream> = Lazy::new(MockUpstream::start);

impl MockUpstream {
    fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind mock upstream");
        listener.set_nonblocking(true).expect("nonblocking listener");
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let data: Shared = Arc::new(Mutex::new(Upstream::default()));

        let app = Router::new()
            .route("/activities", get(list))
            .route("/activities/:name/signup", post(signup))
            .route("/activities/:name/unregister", delete(unregister))
            .with_state(Arc::clone(&data));

        std::thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("mock upstream runtime");
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::from_std(listener).expect("tokio listener");
                axum::serve(listener, app).await.expect("mock upstream serve");
            });
        });

        Self { base_url, data }
    }

    /// Replaces the upstream data with the fixture and a normal listing.
    pub fn reset(&self) {
        let mut data = self.data.lock().unwrap();
        data.listing = Listing::Normal;
        data.activities = fixture();
    }

    pub fn set_listing(&self, listing: Listing) {
        self.data.lock().unwrap().listing = listing;
    }

    pub fn participants(&self, activity: &str) -> Vec<String> {
        let data = self.data.lock().unwrap();
        data.activities
            .get(activity)
            .and_then(|details| details["participants"].as_array())
            .map(|emails| {
                emails
                    .iter()
                    .filter_map(|email| email.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Deliberately not in name order.
pub fn fixture() -> IndexMap<String, Value> {
    let mut activities = IndexMap::new();
    activities.insert(
        "Soccer Team".to_string(),
        json!({
            "description": "Outdoor practice",
            "schedule": "Tue 4pm",
            "category": "Athletics",
            "max_participants": 2,
            "participants": []
        }),
    );
    activities.insert(
        "Chess Club".to_string(),
        json!({
            "description": "d",
            "schedule": "Mon 3pm",
            "max_participants": 10,
            "participants": ["a@x.com"]
        }),
    );
    activities
}

async fn list(State(data): State<Shared>) -> Response {
    let data = data.lock().unwrap();
    match data.listing {
        Listing::Normal => Json(data.activities.clone()).into_response(),
        Listing::ServerError => {
            (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded").into_response()
        }
        Listing::Raw(body) => (
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response(),
    }
}

async fn signup(
    State(data): State<Shared>,
    Path(name): Path<String>,
    Query(query): Query<EmailQuery>,
) -> Response {
    let mut data = data.lock().unwrap();
    let Some(activity) = data.activities.get_mut(&name) else {
        return detail(StatusCode::NOT_FOUND, "Activity not found");
    };
    let Some(participants) = activity["participants"].as_array_mut() else {
        return detail(StatusCode::INTERNAL_SERVER_ERROR, "Corrupt activity");
    };
    if participants.iter().any(|email| email.as_str() == Some(query.email.as_str())) {
        return detail(StatusCode::BAD_REQUEST, "Student is already signed up");
    }
    participants.push(Value::String(query.email.clone()));
    Json(json!({ "message": format!("Signed up {} for {}", query.email, name) })).into_response()
}

async fn unregister(
    State(data): State<Shared>,
    Path(name): Path<String>,
    Query(query): Query<EmailQuery>,
) -> Response {
    let mut data = data.lock().unwrap();
    let Some(activity) = data.activities.get_mut(&name) else {
        return detail(StatusCode::NOT_FOUND, "Activity not found");
    };
    let Some(participants) = activity["participants"].as_array_mut() else {
        return detail(StatusCode::INTERNAL_SERVER_ERROR, "Corrupt activity");
    };
    let Some(index) = participants
        .iter()
        .position(|email| email.as_str() == Some(query.email.as_str()))
    else {
        return detail(StatusCode::NOT_FOUND, "Participant not found");
    };
    participants.remove(index);
    Json(json!({ "message": format!("Unregistered {} from {}", query.email, name) })).into_response()
}

fn detail(status: StatusCode, detail: &str) -> Response {
    (status, Json(json!({ "detail": detail }))).into_response()
}
