use axum::{extract::State, routing::post, Router};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
	extract::Json,
	model::Follow,
	service::{self, Service},
	AppState, Error,
};

pub fn routes() -> Router<AppState> {
	Router::new().route("/", post(follow).delete(unfollow))
}

#[derive(Deserialize, Validate)]
pub struct FollowInput {
	pub follower_id: Uuid,
	pub following_id: Uuid,
}

/// Creates a follow edge from `follower_id` to `following_id`.
async fn follow(
	State(service): State<Service>,
	Json(input): Json<FollowInput>,
) -> Result<Json<Follow>, Error> {
	let follow = service.follow(input.follower_id, input.following_id).await?;

	Ok(Json(follow))
}

/// Removes the follow edge from `follower_id` to `following_id`.
async fn unfollow(
	State(service): State<Service>,
	Json(input): Json<FollowInput>,
) -> Result<Json<Follow>, Error> {
	let follow = service
		.unfollow(input.follower_id, input.following_id)
		.await?
		.ok_or(service::Error::UnknownFollow(
			input.follower_id,
			input.following_id,
		))?;

	Ok(Json(follow))
}
