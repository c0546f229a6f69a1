use crate::pipeline::{FilterState, SortKey};
use crate::status::StatusMessage;
use crate::view::{ActivityCard, ListView, PageView, SelectOption};
use std::time::Duration;

pub const LOAD_FAILED_TEXT: &str = "Failed to load activities. Please try again later.";
pub const EMPTY_LIST_TEXT: &str = "No activities found.";
pub const NO_PARTICIPANTS_TEXT: &str = "No participants yet";

pub fn render_index(page: &PageView, status_ttl: Duration) -> String {
    let sort = page.filter.sort;
    fill_template(INDEX_HTML, |key| match key {
        "CATEGORY_OPTIONS" => Some(render_options(&page.category_options)),
        "SORT_NAME_SELECTED" => Some(selected_attr(sort == Some(SortKey::Name)).to_string()),
        "SORT_TIME_SELECTED" => Some(selected_attr(sort == Some(SortKey::Time)).to_string()),
        "SEARCH" => Some(escape(&page.filter.search)),
        "ACTIVITIES" => Some(render_list(&page.list, &page.filter)),
        "ACTIVITY_OPTIONS" => Some(render_options(&page.activity_options)),
        "EMAIL" => Some(escape(&page.draft.email)),
        "FILTER_INPUTS" => Some(filter_inputs(&page.filter)),
        "STATUS" => Some(render_status(page.status.as_ref())),
        "LOADED_AT" => Some(render_loaded_at(page.loaded_at.as_deref())),
        "STATUS_TTL_MS" => Some(status_ttl.as_millis().to_string()),
        _ => None,
    })
}

/// Substitutes every `{{KEY}}` in a single left-to-right pass. Inserted
/// values are never scanned again; unknown keys are kept verbatim.
fn fill_template(template: &str, mut value: impl FnMut(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);
        let after = &rest[open + 2..];
        let Some(close) = after.find("}}") else {
            rest = &rest[open..];
            break;
        };
        let key = &after[..close];
        match value(key) {
            Some(filled) => out.push_str(&filled),
            None => out.push_str(&rest[open..open + close + 4]),
        }
        rest = &after[close + 2..];
    }
    out.push_str(rest);
    out
}

/// Inner HTML of the activities list container. Forms inside it carry the
/// toolbar filter so the page comes back with the same view.
pub fn render_list(list: &ListView, filter: &FilterState) -> String {
    let carry = filter_inputs(filter);
    match list {
        ListView::Loading => "<p>Loading activities...</p>".to_string(),
        ListView::Failed => format!(
            r#"<p>{LOAD_FAILED_TEXT}</p>
<form method="post" action="/refresh">{carry}<button type="submit" class="retry-btn">Retry</button></form>"#
        ),
        ListView::Empty => format!("<p>{EMPTY_LIST_TEXT}</p>"),
        ListView::Cards { cards } => cards.iter().map(|card| render_card(card, &carry)).collect(),
    }
}

fn render_card(card: &ActivityCard, carry: &str) -> String {
    let participants = if card.participants.is_empty() {
        format!("<p><em>{NO_PARTICIPANTS_TEXT}</em></p>")
    } else {
        let rows: String = card
            .participants
            .iter()
            .map(|row| {
                format!(
                    r#"<li><span class="participant-email">{email}</span><form method="post" action="/unregister" class="remove-form"><input type="hidden" name="activity" value="{activity}" /><input type="hidden" name="email" value="{email}" />{carry}<button class="delete-btn" type="submit" title="Unregister">&#10060;</button></form></li>"#,
                    activity = escape(&row.activity),
                    email = escape(&row.email),
                )
            })
            .collect();
        format!(
            r#"<div class="participants-section"><h5>Participants:</h5><ul class="participants-list">{rows}</ul></div>"#
        )
    };

    format!(
        r#"<div class="activity-card">
  <h4>{name}</h4>
  <p>{description}</p>
  <p><strong>Schedule:</strong> {schedule}</p>
  <p><strong>Availability:</strong> {spots} spots left</p>
  <div class="participants-container">{participants}</div>
</div>
"#,
        name = escape(&card.name),
        description = escape(&card.description),
        schedule = escape(&card.schedule),
        spots = card.spots_left,
    )
}

/// Hidden copies of the toolbar values for action forms.
fn filter_inputs(filter: &FilterState) -> String {
    format!(
        r#"<input type="hidden" name="category" class="carry-category" value="{}" /><input type="hidden" name="sort" class="carry-sort" value="{}" /><input type="hidden" name="search" class="carry-search" value="{}" />"#,
        escape(filter.category.as_deref().unwrap_or_default()),
        filter.sort.map(SortKey::as_str).unwrap_or_default(),
        escape(&filter.search),
    )
}

fn render_options(options: &[SelectOption]) -> String {
    options
        .iter()
        .map(|option| {
            format!(
                r#"<option value="{}"{}>{}</option>"#,
                escape(&option.value),
                selected_attr(option.selected),
                escape(&option.label)
            )
        })
        .collect()
}

fn render_status(status: Option<&StatusMessage>) -> String {
    match status {
        Some(message) => format!(
            r#"<div id="message" class="{}">{}</div>"#,
            message.kind.as_str(),
            escape(&message.text)
        ),
        None => r#"<div id="message" class="hidden"></div>"#.to_string(),
    }
}

fn render_loaded_at(loaded_at: Option<&str>) -> String {
    match loaded_at {
        Some(at) => format!("Last refreshed {}.", escape(at)),
        None => String::new(),
    }
}

fn selected_attr(selected: bool) -> &'static str {
    if selected { " selected" } else { "" }
}

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Activity Sign-Ups</title>
  <style>
    :root {
      --bg: #f4f1ea;
      --ink: #23272f;
      --muted: #6b6760;
      --accent: #1a5e8a;
      --ok: #2d7a4b;
      --err: #c63b2b;
      --card: #ffffff;
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      background: var(--bg);
      color: var(--ink);
      font-family: "Trebuchet MS", sans-serif;
      padding: 24px 16px 48px;
    }

    header h1 {
      margin: 0 0 4px;
    }

    .subtitle,
    .hint {
      margin: 0;
      color: var(--muted);
    }

    main {
      max-width: 1100px;
      margin: 24px auto 0;
      display: grid;
      grid-template-columns: 2fr 1fr;
      gap: 24px;
    }

    section {
      background: var(--card);
      border-radius: 14px;
      padding: 20px;
      box-shadow: 0 10px 30px rgba(35, 39, 47, 0.08);
    }

    .toolbar {
      display: flex;
      flex-wrap: wrap;
      gap: 8px;
      margin-bottom: 16px;
    }

    .activity-card {
      border: 1px solid rgba(35, 39, 47, 0.1);
      border-radius: 10px;
      padding: 14px;
      margin-bottom: 12px;
    }

    .activity-card h4 {
      margin: 0 0 6px;
      color: var(--accent);
    }

    .participants-list {
      list-style: none;
      padding-left: 0;
    }

    .participants-list li {
      display: flex;
      align-items: center;
      justify-content: space-between;
      padding: 2px 0;
    }

    .remove-form {
      display: inline;
    }

    .delete-btn {
      border: none;
      background: transparent;
      cursor: pointer;
    }

    .form-group {
      display: grid;
      gap: 4px;
      margin-bottom: 12px;
    }

    #message {
      margin-top: 16px;
      padding: 10px;
      border-radius: 8px;
    }

    #message.success {
      background: #e3f4e9;
      color: var(--ok);
    }

    #message.error {
      background: #fbe4e1;
      color: var(--err);
    }

    .hidden {
      display: none;
    }

    @media (max-width: 760px) {
      main {
        grid-template-columns: 1fr;
      }
    }
  </style>
</head>
<body>
  <header>
    <h1>Activity Sign-Ups</h1>
    <p class="subtitle">Browse activities, then sign up or remove participants.</p>
  </header>

  <main>
    <section id="activities-container">
      <h3>Available Activities</h3>
      <form id="toolbar" class="toolbar" method="get" action="/">
        <select id="category-filter" name="category">{{CATEGORY_OPTIONS}}</select>
        <select id="sort-filter" name="sort">
          <option value="name"{{SORT_NAME_SELECTED}}>Name</option>
          <option value="time"{{SORT_TIME_SELECTED}}>Time</option>
        </select>
        <input type="search" id="search-box" name="search" placeholder="Search activities" value="{{SEARCH}}" />
        <a id="clear-filters" href="/?sort=name">Clear filters</a>
      </form>
      <div id="activities-list">{{ACTIVITIES}}</div>
      <p class="hint">{{LOADED_AT}}</p>
    </section>

    <section id="signup-container">
      <h3>Sign Up for an Activity</h3>
      <form id="signup-form" method="post" action="/signup">
        <div class="form-group">
          <label for="email">Student Email:</label>
          <input type="email" id="email" name="email" required placeholder="your-email@mergington.edu" value="{{EMAIL}}" />
        </div>
        <div class="form-group">
          <label for="activity">Select Activity:</label>
          <select id="activity" name="activity" required>{{ACTIVITY_OPTIONS}}</select>
        </div>
        {{FILTER_INPUTS}}
        <button type="submit">Sign Up</button>
      </form>
      {{STATUS}}
    </section>
  </main>

  <script>
    const toolbar = document.getElementById('toolbar');
    const list = document.getElementById('activities-list');
    const categoryFilter = document.getElementById('category-filter');
    const sortFilter = document.getElementById('sort-filter');
    const searchBox = document.getElementById('search-box');
    const clearFilters = document.getElementById('clear-filters');
    const message = document.getElementById('message');

    const renderActivities = async () => {
      const params = new URLSearchParams(new FormData(toolbar));
      document.querySelectorAll('.carry-category').forEach((input) => { input.value = categoryFilter.value; });
      document.querySelectorAll('.carry-sort').forEach((input) => { input.value = sortFilter.value; });
      document.querySelectorAll('.carry-search').forEach((input) => { input.value = searchBox.value; });
      history.replaceState(null, '', `/?${params}`);
      const res = await fetch(`/fragments/activities?${params}`);
      list.innerHTML = await res.text();
    };

    const rerender = () => {
      renderActivities().catch((err) => console.error('Error rendering activities:', err));
    };

    toolbar.addEventListener('submit', (event) => {
      event.preventDefault();
      rerender();
    });
    categoryFilter.addEventListener('change', rerender);
    sortFilter.addEventListener('change', rerender);
    searchBox.addEventListener('input', rerender);
    clearFilters.addEventListener('click', (event) => {
      event.preventDefault();
      categoryFilter.value = '';
      sortFilter.value = 'name';
      searchBox.value = '';
      rerender();
    });

    if (!message.classList.contains('hidden')) {
      setTimeout(() => message.classList.add('hidden'), {{STATUS_TTL_MS}});
    }
  </script>
</body>
</html>
"#;
