use axum::{
	extract::{Path, State},
	routing::{post, put},
	Router,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
	extract::Json,
	model::Tweet,
	service::{self, ComposeTweet, Service},
	AppState, Error,
};

pub fn routes() -> Router<AppState> {
	Router::new()
		.route("/", post(compose_tweet))
		.route("/:id", put(edit_tweet).delete(delete_tweet))
		.route("/:id/like", post(like_tweet))
		.route("/:id/retweet", post(retweet))
}

#[derive(Deserialize, Validate)]
pub struct ComposeTweetInput {
	pub user_id: Uuid,
	#[validate(length(max = 280))]
	pub content: String,
	pub image_url: Option<String>,
}

#[derive(Deserialize, Validate)]
pub struct EditTweetInput {
	#[validate(length(max = 280))]
	pub content: String,
	pub image_url: Option<String>,
}

#[derive(Deserialize, Validate)]
pub struct RetweetInput {
	pub user_id: Uuid,
}

/// Creates a new tweet owned by `user_id`.
async fn compose_tweet(
	State(service): State<Service>,
	Json(input): Json<ComposeTweetInput>,
) -> Result<Json<Tweet>, Error> {
	let tweet = service
		.compose_tweet(ComposeTweet {
			user_id: input.user_id,
			content: input.content,
			image_url: input.image_url,
		})
		.await?;

	Ok(Json(tweet))
}

/// Overwrites a tweet's content and image reference.
async fn edit_tweet(
	State(service): State<Service>,
	Path(id): Path<Uuid>,
	Json(input): Json<EditTweetInput>,
) -> Result<Json<Tweet>, Error> {
	let tweet = service
		.edit_tweet(id, input.content, input.image_url)
		.await?
		.ok_or(service::Error::UnknownTweet(id))?;

	Ok(Json(tweet))
}

/// Adds one like to a tweet.
async fn like_tweet(
	State(service): State<Service>,
	Path(id): Path<Uuid>,
) -> Result<Json<Tweet>, Error> {
	let tweet = service.like_tweet(id).await?;

	Ok(Json(tweet))
}

/// Retweets a tweet on behalf of `user_id`.
async fn retweet(
	State(service): State<Service>,
	Path(id): Path<Uuid>,
	Json(input): Json<RetweetInput>,
) -> Result<Json<Tweet>, Error> {
	let tweet = service.retweet(input.user_id, id).await?;

	Ok(Json(tweet))
}

/// Deletes a tweet.
async fn delete_tweet(
	State(service): State<Service>,
	Path(id): Path<Uuid>,
) -> Result<Json<Tweet>, Error> {
	let tweet = service
		.delete_tweet(id)
		.await?
		.ok_or(service::Error::UnknownTweet(id))?;

	Ok(Json(tweet))
}

#[cfg(test)]
mod test {
	use crate::test::*;

	async fn create_user(app: &TestServer, username: &str) -> String {
		let response = app
			.post("/users")
			.json(&json!({
				"username": username,
				"email": format!("{username}@smith.com"),
				"password": "hunter2hunter",
			}))
			.await;

		assert_eq!(response.status_code(), 200);

		response.json::<serde_json::Value>()["id"]
			.as_str()
			.unwrap()
			.to_owned()
	}

	#[tokio::test]
	async fn test_compose_like_flow() {
		let app = app();
		let user_id = create_user(&app, "john").await;

		let response = app
			.post("/tweets")
			.json(&json!({
				"user_id": user_id,
				"content": "hello world",
			}))
			.await;

		assert_eq!(response.status_code(), 200);

		let tweet = response.json::<serde_json::Value>();

		assert_eq!(tweet["likes"], 0);

		let id = tweet["id"].as_str().unwrap();
		let response = app.post(&format!("/tweets/{id}/like")).await;

		assert_eq!(response.status_code(), 200);
		assert_eq!(response.json::<serde_json::Value>()["likes"], 1);
	}

	#[tokio::test]
	async fn test_compose_content_too_long() {
		let app = app();
		let user_id = create_user(&app, "john").await;

		let response = app
			.post("/tweets")
			.json(&json!({
				"user_id": user_id,
				"content": "a".repeat(281),
			}))
			.await;

		assert_eq!(response.status_code(), 400);
	}

	#[tokio::test]
	async fn test_like_unknown_tweet() {
		let app = app();

		let response = app
			.post(&format!("/tweets/{}/like", uuid::Uuid::new_v4()))
			.await;

		assert_eq!(response.status_code(), 404);
	}

	#[tokio::test]
	async fn test_retweet_has_no_content() {
		let app = app();
		let user_id = create_user(&app, "john").await;

		let response = app
			.post("/tweets")
			.json(&json!({
				"user_id": user_id,
				"content": "hello world",
			}))
			.await;

		let origin = response.json::<serde_json::Value>();
		let origin_id = origin["id"].as_str().unwrap();

		let response = app
			.post(&format!("/tweets/{origin_id}/retweet"))
			.json(&json!({ "user_id": user_id }))
			.await;

		assert_eq!(response.status_code(), 200);

		let retweet = response.json::<serde_json::Value>();

		assert_eq!(retweet["original_tweet"], origin["id"]);
		assert_eq!(retweet["content"], serde_json::Value::Null);
	}
}
