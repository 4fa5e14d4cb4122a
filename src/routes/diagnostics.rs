//! Store connectivity smoke test.

use axum::extract::State;
use axum::response::Html;

use crate::models::Restaurant;
use crate::state::AppState;

/// `GET /test` — read one restaurant and report what came back.
pub async fn store_test_page(State(state): State<AppState>) -> Html<String> {
    let result = state.store.list_restaurants(1).await;
    if let Err(e) = &result {
        tracing::warn!(error = %e, "store test query failed");
    }
    let message = summarize(result);

    Html(format!(
        "<!doctype html>\n<html><head><title>Store Test</title></head>\
         <body><main><h1>Store Test</h1><p>{}</p></main></body></html>",
        escape_html(&message)
    ))
}

/// One-line summary of the probe query.
pub(crate) fn summarize(result: Result<Vec<Restaurant>, sqlx::Error>) -> String {
    match result {
        Err(e) => format!("Error: {e}"),
        Ok(rows) => match rows.first() {
            Some(r) => format!("OK: {}", r.name),
            None => "OK: no restaurants found".to_owned(),
        },
    }
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
#[path = "diagnostics_test.rs"]
mod tests;
