use aide::axum::IntoApiResponse;
use axum::{
	extract::State,
	http::StatusCode,
	response::IntoResponse,
};
use macros::route;

use crate::{
	extract::{Json, Path},
	openapi::tag,
	Database,
};

use super::{
	model::{self, NOTE_COLUMNS},
	Error, RouteError,
};

/// Ids outside the `SERIAL` range cannot belong to any note.
fn serial_id(id: i64) -> Result<i32, Error> {
	i32::try_from(id).map_err(|_| Error::NotFound(id))
}

/// List notes
/// Returns every note, ordered by id with the most recently created first.
#[route(tag = tag::NOTE)]
pub async fn list_notes(
	State(database): State<Database>,
) -> Result<Json<Vec<model::Note>>, RouteError> {
	let notes = sqlx::query_as::<_, model::Note>(&format!(
		"SELECT {NOTE_COLUMNS} FROM notes ORDER BY id DESC"
	))
	.fetch_all(&database)
	.await?;

	Ok(Json(notes))
}

/// Create note
/// Creates a new note. The title is trimmed and must not be empty; the content defaults to an empty string.
#[route(
	tag = tag::NOTE,
	response(status = 201, description = "The created note.", shape = "Json<model::Note>")
)]
pub async fn create_note(
	State(database): State<Database>,
	Json(input): Json<model::NoteInput>,
) -> Result<impl IntoApiResponse, RouteError> {
	let note = sqlx::query_as::<_, model::Note>(&format!(
		"INSERT INTO notes (title, content) VALUES ($1, $2) RETURNING {NOTE_COLUMNS}"
	))
	.bind(&input.title)
	.bind(&input.content)
	.fetch_one(&database)
	.await?;

	tracing::info!(id = note.id, "note created");

	Ok((StatusCode::CREATED, Json(note)))
}

/// Update note
/// Replaces the title and content of an existing note and refreshes its update time.
#[route(tag = tag::NOTE)]
pub async fn update_note(
	State(database): State<Database>,
	Path(id): Path<i64>,
	Json(input): Json<model::NoteInput>,
) -> Result<Json<model::Note>, RouteError> {
	let note = sqlx::query_as::<_, model::Note>(&format!(
		"
			UPDATE notes
			SET title = $1, content = $2, updated_at = NOW()
			WHERE id = $3
			RETURNING {NOTE_COLUMNS}
		"
	))
	.bind(&input.title)
	.bind(&input.content)
	.bind(serial_id(id)?)
	.fetch_optional(&database)
	.await?;

	let note = note.ok_or(Error::NotFound(id))?;

	tracing::info!(id = note.id, "note updated");

	Ok(Json(note))
}

/// Delete note
/// Permanently deletes a note. This action is irreversible.
#[route(
	tag = tag::NOTE,
	response(status = 204, description = "The note was deleted.")
)]
pub async fn delete_note(
	State(database): State<Database>,
	Path(id): Path<i64>,
) -> Result<impl IntoApiResponse, RouteError> {
	let status = sqlx::query("DELETE FROM notes WHERE id = $1")
		.bind(serial_id(id)?)
		.execute(&database)
		.await?;

	if status.rows_affected() == 0 {
		return Err(Error::NotFound(id).into());
	}

	tracing::info!(id, "note deleted");

	Ok(StatusCode::NO_CONTENT.into_response())
}
