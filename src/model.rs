use serde::Serialize;
use uuid::Uuid;

/// A single user.
///
/// Use this when fetching from the store and returning to the client.
/// The `password` field holds the argon2 hash and is never serialized.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
	pub id: Uuid,
	pub username: String,
	pub email: String,
	/// argon2, salted with `id`
	#[serde(skip_serializing)]
	pub password: Vec<u8>,
	pub bio: Option<String>,
	pub profile_picture: Option<String>,
	pub created_at: chrono::DateTime<chrono::Utc>,
}

/// A single tweet, owned by a user.
///
/// A retweet carries no content of its own; it only points at its origin
/// through `original_tweet`. The reference is a weak link and never controls
/// the origin's lifecycle.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Tweet {
	pub id: Uuid,
	/// The user that created the tweet.
	pub user_id: Uuid,
	/// The text of the tweet, at most 280 characters. Absent for retweets.
	pub content: Option<String>,
	pub created_at: chrono::DateTime<chrono::Utc>,
	pub likes: i32,
	pub retweets: i32,
	pub image_url: Option<String>,
	/// The origin tweet, present iff this tweet is a retweet.
	pub original_tweet: Option<Uuid>,
}

/// A directed follow edge between two users.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Follow {
	pub id: Uuid,
	pub follower_id: Uuid,
	pub following_id: Uuid,
}
