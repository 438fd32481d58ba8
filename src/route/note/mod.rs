use aide::axum::{
	routing::{get_with, put_with},
	ApiRouter,
};
use axum::http::StatusCode;

use crate::{error, AppState};

pub mod model;
pub mod route;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
	#[error("note {0} not found")]
	NotFound(i64),
}

pub type RouteError = error::RouteError<Error>;

pub fn routes() -> ApiRouter<AppState> {
	use route::*;

	ApiRouter::new()
		.api_route(
			"/notes",
			get_with(list_notes, list_notes_docs).post_with(create_note, create_note_docs),
		)
		.api_route(
			"/notes/:id",
			put_with(update_note, update_note_docs)
				.delete_with(delete_note, delete_note_docs),
		)
}

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		match self {
			Self::NotFound(..) => StatusCode::NOT_FOUND,
		}
	}

	fn message(&self) -> error::Message {
		match self {
			Self::NotFound(..) => error::Message::new("Note not found"),
		}
	}
}
