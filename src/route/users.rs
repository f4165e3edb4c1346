use axum::{
	extract::{Path, State},
	routing::{delete, post, put},
	Router,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
	extract::Json,
	model::User,
	service::{self, CreateUser, Service},
	AppState, Error,
};

pub fn routes() -> Router<AppState> {
	Router::new()
		.route("/", post(create_user))
		.route("/:id", delete(delete_user))
		.route("/:id/email", put(update_email))
		.route("/:id/username", put(update_username))
		.route("/:id/password", put(update_password))
		.route("/:id/bio", put(update_bio))
}

#[derive(Deserialize, Validate)]
pub struct CreateUserInput {
	#[validate(length(min = 3, max = 16))]
	pub username: String,
	#[validate(email)]
	pub email: String,
	#[validate(length(min = 8, max = 128))]
	pub password: String,
	pub bio: Option<String>,
	pub profile_picture: Option<String>,
}

#[derive(Deserialize, Validate)]
pub struct EmailInput {
	#[validate(email)]
	pub email: String,
}

#[derive(Deserialize, Validate)]
pub struct UsernameInput {
	#[validate(length(min = 3, max = 16))]
	pub username: String,
}

#[derive(Deserialize, Validate)]
pub struct PasswordInput {
	#[validate(length(min = 8, max = 128))]
	pub password: String,
}

#[derive(Deserialize, Validate)]
pub struct BioInput {
	pub bio: String,
}

/// Creates a new user. The password is hashed before it is stored.
async fn create_user(
	State(service): State<Service>,
	Json(input): Json<CreateUserInput>,
) -> Result<Json<User>, Error> {
	let user = service
		.create_user(CreateUser {
			username: input.username,
			email: input.email,
			password: input.password,
			bio: input.bio,
			profile_picture: input.profile_picture,
		})
		.await?;

	Ok(Json(user))
}

/// Replaces the user's email address.
async fn update_email(
	State(service): State<Service>,
	Path(id): Path<Uuid>,
	Json(input): Json<EmailInput>,
) -> Result<Json<User>, Error> {
	let user = service
		.update_email(id, input.email)
		.await?
		.ok_or(service::Error::UnknownUser(id))?;

	Ok(Json(user))
}

/// Replaces the user's username.
async fn update_username(
	State(service): State<Service>,
	Path(id): Path<Uuid>,
	Json(input): Json<UsernameInput>,
) -> Result<Json<User>, Error> {
	let user = service
		.update_username(id, input.username)
		.await?
		.ok_or(service::Error::UnknownUser(id))?;

	Ok(Json(user))
}

/// Replaces the user's password.
async fn update_password(
	State(service): State<Service>,
	Path(id): Path<Uuid>,
	Json(input): Json<PasswordInput>,
) -> Result<Json<User>, Error> {
	let user = service
		.update_password(id, input.password)
		.await?
		.ok_or(service::Error::UnknownUser(id))?;

	Ok(Json(user))
}

/// Replaces the user's bio.
async fn update_bio(
	State(service): State<Service>,
	Path(id): Path<Uuid>,
	Json(input): Json<BioInput>,
) -> Result<Json<User>, Error> {
	let user = service
		.update_bio(id, input.bio)
		.await?
		.ok_or(service::Error::UnknownUser(id))?;

	Ok(Json(user))
}

/// Deletes a user and their related content. This action is irreversible.
async fn delete_user(
	State(service): State<Service>,
	Path(id): Path<Uuid>,
) -> Result<Json<User>, Error> {
	let user = service
		.delete_user(id)
		.await?
		.ok_or(service::Error::UnknownUser(id))?;

	Ok(Json(user))
}
