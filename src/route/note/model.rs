use std::borrow::Cow;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::{Validate, ValidationError};

pub const TITLE_MAX_LENGTH: usize = 255;

/// The columns of a note, in the order [`Note`] expects them.
pub const NOTE_COLUMNS: &str = "id, title, COALESCE(content, '') AS content, created_at, updated_at";

/// A single note.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, JsonSchema, sqlx::FromRow)]
pub struct Note {
	/// The unique identifier of the note, assigned by the server.
	pub id: i32,
	/// The title of the note, without surrounding whitespace.
	pub title: String,
	/// The body of the note.
	pub content: String,
	/// The creation time of the note.
	pub created_at: chrono::NaiveDateTime,
	/// The time of the last update, equal to `created_at` until the note is updated.
	pub updated_at: chrono::NaiveDateTime,
}

/// The body accepted when creating or updating a note.
///
/// Coercion happens while deserializing: the title is trimmed (a missing or
/// non-string title becomes empty and fails validation), and the content is
/// converted to a string. A body that is not a JSON object has no fields.
#[derive(Debug, Deserialize, Validate, JsonSchema)]
#[serde(from = "Value")]
pub struct NoteInput {
	/// The title of the note. Surrounding whitespace is removed.
	#[validate(custom(function = "validate_title"))]
	pub title: String,
	/// The body of the note. Non-string values are stored in their JSON text form.
	#[serde(default)]
	pub content: String,
}

impl From<Value> for NoteInput {
	fn from(body: Value) -> Self {
		let Value::Object(mut fields) = body else {
			return Self {
				title: String::new(),
				content: String::new(),
			};
		};

		Self {
			title: trimmed_title(fields.remove("title")),
			content: stringified_content(fields.remove("content")),
		}
	}
}

fn trimmed_title(title: Option<Value>) -> String {
	match title {
		Some(Value::String(title)) => title.trim().to_owned(),
		_ => String::new(),
	}
}

fn stringified_content(content: Option<Value>) -> String {
	match content {
		Some(Value::String(content)) => content,
		None | Some(Value::Null) => String::new(),
		Some(other) => other.to_string(),
	}
}

fn validate_title(title: &str) -> Result<(), ValidationError> {
	let message = if title.is_empty() {
		"Title is required"
	} else if title.chars().count() > TITLE_MAX_LENGTH {
		"Title must be at most 255 characters"
	} else {
		return Ok(());
	};

	let mut error = ValidationError::new("title");
	error.message = Some(Cow::Borrowed(message));

	Err(error)
}

#[cfg(test)]
mod test {
	use serde_json::json;
	use validator::Validate;

	use super::NoteInput;

	fn input(value: serde_json::Value) -> NoteInput {
		serde_json::from_value(value).unwrap()
	}

	fn first_message(input: &NoteInput) -> Option<String> {
		let errors = input.validate().err()?;

		errors
			.field_errors()
			.into_values()
			.flatten()
			.find_map(|error| error.message.as_ref().map(ToString::to_string))
	}

	#[test]
	fn test_title_is_trimmed() {
		let input = input(json!({ "title": "  Hello  " }));

		assert_eq!(input.title, "Hello");
		assert_eq!(input.content, "");
		assert!(input.validate().is_ok());
	}

	#[test]
	fn test_missing_or_blank_title() {
		for body in [
			json!({}),
			json!({ "title": "" }),
			json!({ "title": "   \t\n" }),
			json!({ "title": null }),
			json!({ "title": 42 }),
			json!({ "title": ["a"] }),
		] {
			assert_eq!(
				first_message(&input(body.clone())).as_deref(),
				Some("Title is required"),
				"{body}"
			);
		}
	}

	#[test]
	fn test_title_length_counts_characters() {
		let at_limit = input(json!({ "title": "é".repeat(255) }));
		assert!(at_limit.validate().is_ok());

		let over_limit = input(json!({ "title": "a".repeat(256) }));
		assert_eq!(
			first_message(&over_limit).as_deref(),
			Some("Title must be at most 255 characters")
		);
	}

	#[test]
	fn test_content_is_stringified() {
		let cases = [
			(json!("text"), "text"),
			(json!(null), ""),
			(json!(5), "5"),
			(json!(1.5), "1.5"),
			(json!(true), "true"),
			(json!(["a", 1]), r#"["a",1]"#),
			(json!({ "k": "v" }), r#"{"k":"v"}"#),
		];

		for (content, expected) in cases {
			let input = input(json!({ "title": "t", "content": content }));

			assert_eq!(input.content, expected);
		}
	}

	#[test]
	fn test_non_object_body_has_no_title() {
		for body in [json!(["seq title"]), json!(["t", "c"]), json!("title"), json!(3), json!(null)] {
			let input = input(body.clone());

			assert_eq!(input.content, "", "{body}");
			assert_eq!(
				first_message(&input).as_deref(),
				Some("Title is required"),
				"{body}"
			);
		}
	}

	#[test]
	fn test_unknown_fields_are_ignored() {
		let input = input(json!({ "title": "t", "id": 7, "updated_at": "never" }));

		assert_eq!(input.title, "t");
		assert!(input.validate().is_ok());
	}
}
