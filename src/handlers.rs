use crate::actions;
use crate::errors::AppError;
use crate::models::{ActionForm, ActivityMap};
use crate::pipeline::{FilterQuery, FilterState};
use crate::state::AppState;
use crate::status::StatusMessage;
use crate::store::LoadState;
use crate::ui::{render_index, render_list};
use crate::view::{build_list, build_page, PageView, SignupDraft};
use axum::{
    extract::{Query, State},
    response::{Html, Redirect},
    Form, Json,
};
use serde::Deserialize;

/// Toolbar filters plus an optional signup draft to prefill.
#[derive(Debug, Deserialize, Default)]
pub struct PageQuery {
    #[serde(flatten)]
    pub filter: FilterQuery,
    pub activity: Option<String>,
    pub email: Option<String>,
}

pub async fn index(State(state): State<AppState>, Query(query): Query<PageQuery>) -> Html<String> {
    let page = page_view(&state, &query).await;
    Html(render_index(&page, state.status.ttl()))
}

pub async fn activities_fragment(
    State(state): State<AppState>,
    Query(query): Query<FilterQuery>,
) -> Html<String> {
    let snapshot = state.store.snapshot().await;
    let filter = FilterState::from(&query);
    Html(render_list(&build_list(&snapshot, &filter), &filter))
}

pub async fn get_view(State(state): State<AppState>, Query(query): Query<PageQuery>) -> Json<PageView> {
    Json(page_view(&state, &query).await)
}

pub async fn get_activities(State(state): State<AppState>) -> Result<Json<ActivityMap>, AppError> {
    let snapshot = state.store.snapshot().await;
    match snapshot.state {
        LoadState::Ready => Ok(Json(snapshot.activities)),
        LoadState::Failed => Err(AppError::bad_gateway("failed to load activities")),
        LoadState::Pending => Err(AppError::unavailable("activities not loaded yet")),
    }
}

pub async fn get_status(State(state): State<AppState>) -> Json<Option<StatusMessage>> {
    Json(state.status.current())
}

pub async fn signup(State(state): State<AppState>, Form(form): Form<ActionForm>) -> Redirect {
    let outcome = actions::signup(&state, &form.activity, &form.email).await;
    if outcome.accepted {
        Redirect::to(&page_location(&form.filter, None))
    } else {
        Redirect::to(&page_location(&form.filter, Some(&form)))
    }
}

pub async fn unregister(State(state): State<AppState>, Form(form): Form<ActionForm>) -> Redirect {
    actions::unregister(&state, &form.activity, &form.email).await;
    Redirect::to(&page_location(&form.filter, None))
}

pub async fn refresh(State(state): State<AppState>, Form(filter): Form<FilterQuery>) -> Redirect {
    actions::load(&state).await;
    Redirect::to(&page_location(&filter, None))
}

async fn page_view(state: &AppState, query: &PageQuery) -> PageView {
    let snapshot = state.store.snapshot().await;
    let draft = SignupDraft {
        activity: query.activity.clone().unwrap_or_default(),
        email: query.email.clone().unwrap_or_default(),
    };
    build_page(
        &snapshot,
        FilterState::from(&query.filter),
        draft,
        state.status.current(),
    )
}

/// Page location for the given toolbar filter, optionally re-rendering the
/// signup form with what was submitted.
fn page_location(filter: &FilterQuery, draft: Option<&ActionForm>) -> String {
    let mut pairs: Vec<(&str, &str)> = Vec::new();
    if let Some(category) = filter.category.as_deref().filter(|category| !category.is_empty()) {
        pairs.push(("category", category));
    }
    if let Some(sort) = filter.sort.as_deref() {
        pairs.push(("sort", sort));
    }
    if let Some(search) = filter.search.as_deref().filter(|search| !search.is_empty()) {
        pairs.push(("search", search));
    }
    if let Some(draft) = draft {
        pairs.push(("activity", draft.activity.as_str()));
        pairs.push(("email", draft.email.as_str()));
    }
    if pairs.is_empty() {
        return "/".to_string();
    }

    let query = reqwest::Url::parse_with_params("http://localhost/", pairs)
        .ok()
        .and_then(|url| url.query().map(str::to_string))
        .unwrap_or_default();
    format!("/?{query}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_signup_location_keeps_filter_and_draft() {
        let form = ActionForm {
            activity: "Chess Club".into(),
            email: "b@x.com".into(),
            filter: FilterQuery {
                category: Some("Athletics".into()),
                sort: Some("time".into()),
                search: Some("soc cer".into()),
            },
        };
        assert_eq!(
            page_location(&form.filter, Some(&form)),
            "/?category=Athletics&sort=time&search=soc+cer&activity=Chess+Club&email=b%40x.com"
        );
    }

    #[test]
    fn location_without_filter_is_root() {
        assert_eq!(page_location(&FilterQuery::default(), None), "/");
    }

    #[test]
    fn empty_sort_is_kept_so_unsorted_view_survives() {
        let filter = FilterQuery {
            category: Some(String::new()),
            sort: Some(String::new()),
            search: Some(String::new()),
        };
        assert_eq!(page_location(&filter, None), "/?sort=");
    }
}
