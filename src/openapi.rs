use aide::{openapi::Tag, transform::TransformOpenApi};

use crate::{error, extract::Json};

pub mod tag {
	pub const HEALTH: &str = "Health";
	pub const NOTE: &str = "Note";
}

pub fn docs(api: TransformOpenApi) -> TransformOpenApi {
	api.title("Notes API")
		.summary("A minimal notes service")
		.description(include_str!("../README.md"))
		.tag(Tag {
			name: tag::HEALTH.into(),
			description: Some("Service and database liveness".into()),
			..Default::default()
		})
		.tag(Tag {
			name: tag::NOTE.into(),
			description: Some("Note management".into()),
			..Default::default()
		})
		.default_response_with::<Json<error::Message>, _>(|res| {
			res.description("Every error shares this shape. Server errors never include details.")
				.example(error::Message::new("Note not found"))
		})
}
