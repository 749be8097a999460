use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Form, Json,
};
use chrono::Utc;

use super::{page, AppState};
use crate::flash::{self, Flash};
use crate::models::*;

const NOTE_ADDED: &str = "Note added!";
const NOTE_UPDATED: &str = "Note updated!";
const NOTE_DELETED: &str = "Note deleted.";

type HandlerResult = Result<Response, (StatusCode, String)>;

// ============================================================
// Error Handling
// ============================================================

/// Log a store failure and answer with a generic 500 so internals never
/// reach the client.
fn internal_error(e: impl std::fmt::Display) -> (StatusCode, String) {
    tracing::error!("Internal error: {}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal server error".to_string(),
    )
}

/// 303 back to the list page, carrying `message` for one display.
fn redirect_with(state: &AppState, message: Flash) -> Response {
    (
        [(header::SET_COOKIE, state.flash.set_cookie(&message))],
        Redirect::to("/"),
    )
        .into_response()
}

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Notes
// ============================================================

pub async fn list_notes(
    State(state): State<AppState>,
    Query(query): Query<ListNotesQuery>,
    headers: HeaderMap,
) -> HandlerResult {
    let notes = match query.term() {
        Some(term) => state.db.search_notes(term),
        None => state.db.list_notes(),
    }
    .map_err(internal_error)?;

    let pending = state.flash.read_cookie(&headers);
    let html = Html(page::render_index(
        &notes,
        query.term().unwrap_or_default(),
        pending.as_ref(),
    ));

    // Clear any flash cookie, including one that failed verification
    if flash::cookie_present(&headers) {
        Ok(([(header::SET_COOKIE, flash::clear_cookie())], html).into_response())
    } else {
        Ok(html.into_response())
    }
}

pub async fn add_note(State(state): State<AppState>, Form(form): Form<NoteForm>) -> HandlerResult {
    let input = match form.validate() {
        Ok(input) => input,
        Err(e) => {
            tracing::debug!("Rejected new note: {}", e);
            return Ok(redirect_with(&state, Flash::error(e.to_string())));
        }
    };

    let note = state
        .db
        .insert_note(&input.title, &input.body, Utc::now())
        .map_err(internal_error)?;
    tracing::info!(id = note.id, "Note added");

    Ok(redirect_with(&state, Flash::success(NOTE_ADDED)))
}

pub async fn edit_note(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Form(form): Form<NoteForm>,
) -> HandlerResult {
    let input = match form.validate() {
        Ok(input) => input,
        Err(e) => {
            tracing::debug!(id, "Rejected note edit: {}", e);
            return Ok(redirect_with(&state, Flash::error(e.to_string())));
        }
    };

    let updated = state
        .db
        .update_note(id, &input.title, &input.body, Utc::now())
        .map_err(internal_error)?;
    if updated {
        tracing::info!(id, "Note updated");
    } else {
        tracing::debug!(id, "Edit matched no note");
    }

    Ok(redirect_with(&state, Flash::success(NOTE_UPDATED)))
}

pub async fn delete_note(State(state): State<AppState>, Path(id): Path<i64>) -> HandlerResult {
    let deleted = state.db.delete_note(id).map_err(internal_error)?;
    if deleted {
        tracing::info!(id, "Note deleted");
    } else {
        tracing::debug!(id, "Delete matched no note");
    }

    Ok(redirect_with(&state, Flash::success(NOTE_DELETED)))
}
