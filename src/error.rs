use std::{any::Any, borrow::Cow};

use axum::{
	body::Body,
	extract::rejection,
	http::{Response, StatusCode},
	response::IntoResponse,
};
use schemars::JsonSchema;
use serde::Serialize;

pub const INTERNAL_SERVER_ERROR: &str = "Internal server error";

/// The body of every error response.
#[derive(Debug, Serialize, JsonSchema)]
pub struct Message {
	/// A human-readable description of what went wrong.
	pub error: Cow<'static, str>,
}

impl Message {
	pub fn new(error: impl Into<Cow<'static, str>>) -> Self {
		Self {
			error: error.into(),
		}
	}
}

/// Errors shared by every route.
///
/// The Display output is only logged, never sent to the client, so it
/// may contain sensitive information.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
	#[error("validation error: {0}")]
	Validation(#[from] validator::ValidationErrors),
	#[error("json error: {0}")]
	Json(#[from] rejection::JsonRejection),
	#[error("path error: {0}")]
	Path(#[from] rejection::PathRejection),
	#[error("database error: {0}")]
	Database(#[from] sqlx::Error),
}

impl AppError {
	fn status(&self) -> StatusCode {
		match self {
			Self::Json(rejection) if is_too_large(rejection) => StatusCode::PAYLOAD_TOO_LARGE,
			Self::Validation(..) | Self::Json(..) | Self::Path(..) => StatusCode::BAD_REQUEST,
			Self::Database(..) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}

	fn message(&self) -> Message {
		match self {
			Self::Validation(errors) => Message::new(
				errors
					.field_errors()
					.into_values()
					.flatten()
					.find_map(|error| error.message.clone())
					.unwrap_or(Cow::Borrowed("Invalid request body")),
			),
			Self::Json(rejection) if is_too_large(rejection) => {
				Message::new("Request body is too large")
			}
			Self::Json(..) => Message::new("Invalid JSON body"),
			Self::Path(..) => Message::new("Invalid id"),
			Self::Database(..) => Message::new(INTERNAL_SERVER_ERROR),
		}
	}
}

/// Bodies over the configured limit fail while buffering, before any JSON is parsed.
fn is_too_large(rejection: &rejection::JsonRejection) -> bool {
	rejection.status() == StatusCode::PAYLOAD_TOO_LARGE
}

/// Describes how a route-specific error is presented to the client.
pub trait ErrorShape: std::error::Error {
	fn status(&self) -> StatusCode;

	fn message(&self) -> Message;
}

/// The error returned by route handlers: either one shared by every route,
/// or one specific to the route.
#[derive(Debug, thiserror::Error)]
pub enum RouteError<E> {
	#[error(transparent)]
	App(AppError),
	#[error(transparent)]
	Route(E),
}

impl<E> From<AppError> for RouteError<E> {
	fn from(error: AppError) -> Self {
		Self::App(error)
	}
}

impl<E> From<sqlx::Error> for RouteError<E> {
	fn from(error: sqlx::Error) -> Self {
		Self::App(AppError::Database(error))
	}
}

impl<E: ErrorShape> From<E> for RouteError<E> {
	fn from(error: E) -> Self {
		Self::Route(error)
	}
}

impl IntoResponse for AppError {
	fn into_response(self) -> Response<Body> {
		let status = self.status();

		if status.is_server_error() {
			tracing::error!(error = %self, "request failed");
		}

		(status, axum::Json(self.message())).into_response()
	}
}

impl<E: ErrorShape> IntoResponse for RouteError<E> {
	fn into_response(self) -> Response<Body> {
		match self {
			Self::App(error) => error.into_response(),
			Self::Route(error) => {
				let status = error.status();

				if status.is_server_error() {
					tracing::error!(error = %error, "request failed");
				}

				(status, axum::Json(error.message())).into_response()
			}
		}
	}
}

impl<E> aide::OperationOutput for RouteError<E> {
	type Inner = Message;
}

impl aide::OperationOutput for AppError {
	type Inner = Message;
}

/// Turns a panic inside a handler into the generic internal error response.
#[allow(clippy::needless_pass_by_value)]
pub fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response<Body> {
	let detail = panic
		.downcast_ref::<String>()
		.map(String::as_str)
		.or_else(|| panic.downcast_ref::<&str>().copied())
		.unwrap_or("unknown panic");

	tracing::error!(panic = detail, "handler panicked");

	(
		StatusCode::INTERNAL_SERVER_ERROR,
		axum::Json(Message::new(INTERNAL_SERVER_ERROR)),
	)
		.into_response()
}
