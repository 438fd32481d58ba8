use std::sync::Arc;

use aide::{
	axum::{
		routing::{get, get_with},
		ApiRouter, IntoApiResponse,
	},
	openapi::OpenApi,
	scalar::Scalar,
};
use axum::{response::IntoResponse, Extension};

use crate::extract::Json;

macro_rules! root {
	() => {
		"/docs"
	};
}

macro_rules! document {
	() => {
		"/private/api.json"
	};
}

/// Where [`routes`] is nested.
pub const ROOT: &str = root!();

/// The absolute path of the `OpenAPI` document.
pub const SPEC_PATH: &str = concat!(root!(), document!());

/// Serves the documentation page and the `OpenAPI` document it renders.
///
/// Expects the finished [`OpenApi`] to be available as an [`Extension`].
pub fn routes() -> ApiRouter {
	let page = Scalar::new(SPEC_PATH)
		.with_title(env!("CARGO_PKG_NAME"))
		.axum_handler();

	ApiRouter::new()
		.api_route(
			"/",
			get_with(page, |op| {
				op.summary("Documentation")
					.description("Renders the OpenAPI document of this service.")
			}),
		)
		.route(document!(), get(openapi_document))
}

async fn openapi_document(Extension(api): Extension<Arc<OpenApi>>) -> impl IntoApiResponse {
	Json(api.as_ref()).into_response()
}
