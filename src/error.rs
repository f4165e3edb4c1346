use axum::{
	body::Body,
	extract::rejection,
	http::{Response, StatusCode},
	response::IntoResponse,
	Json,
};
use serde::Serialize;

use crate::service;

/// Error type for the application.
///
/// The Display trait is not sent to the client for internal failures, so it
/// can show sensitive information.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("validation error: {0}")]
	Validation(#[from] validator::ValidationErrors),
	#[error("json error: {0}")]
	Json(#[from] rejection::JsonRejection),
	#[error("service error: {0}")]
	Service(#[from] service::Error),
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
	pub success: bool,
	pub errors: Vec<String>,
}

fn status(error: &service::Error) -> StatusCode {
	match error {
		service::Error::UsernameTaken | service::Error::EmailTaken => StatusCode::CONFLICT,
		service::Error::ContentTooLong => StatusCode::BAD_REQUEST,
		service::Error::UnknownUser(..)
		| service::Error::UnknownTweet(..)
		| service::Error::UnknownFollow(..) => StatusCode::NOT_FOUND,
		service::Error::Argon(..) | service::Error::Store(..) => {
			StatusCode::INTERNAL_SERVER_ERROR
		}
	}
}

impl IntoResponse for Error {
	fn into_response(self) -> Response<Body> {
		match self {
			Error::Validation(errors) => (
				StatusCode::BAD_REQUEST,
				Json(ErrorResponse {
					errors: errors
						.field_errors()
						.into_iter()
						.flat_map(|(field, errors)| {
							errors
								.iter()
								.map(move |error| format!("{field}: {error}"))
								.collect::<Vec<_>>()
						})
						.collect(),
					success: false,
				}),
			)
				.into_response(),
			Error::Json(error) => (
				StatusCode::BAD_REQUEST,
				Json(ErrorResponse {
					errors: vec![error.to_string()],
					success: false,
				}),
			)
				.into_response(),
			Error::Service(error) => {
				let status = status(&error);

				// Internal failures are logged, not shown to the client.
				let errors = if status == StatusCode::INTERNAL_SERVER_ERROR {
					tracing::error!(%error, "internal error");

					Vec::new()
				} else {
					vec![error.to_string()]
				};

				(
					status,
					Json(ErrorResponse {
						errors,
						success: false,
					}),
				)
					.into_response()
			}
		}
	}
}
