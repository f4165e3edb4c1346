use async_trait::async_trait;
use uuid::Uuid;

use crate::model::{Follow, Tweet, User};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// The uniquely-indexed field that rejected a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
	Username,
	Email,
}

impl std::fmt::Display for UniqueField {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Username => f.write_str("username"),
			Self::Email => f.write_str("email"),
		}
	}
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("{0} already taken")]
	UniqueViolation(UniqueField),
	#[error("database error: {0}")]
	Database(#[from] sqlx::Error),
}

/// A partial update to a user. `None` leaves the field untouched.
#[derive(Debug, Default)]
pub struct UserPatch {
	pub username: Option<String>,
	pub email: Option<String>,
	pub password: Option<Vec<u8>>,
	pub bio: Option<String>,
}

/// A partial update to a tweet. `None` leaves the field untouched.
#[derive(Debug, Default)]
pub struct TweetPatch {
	pub content: Option<String>,
	pub image_url: Option<String>,
}

/// The persistence boundary.
///
/// Every method is a single store round trip. Lookups and partial updates
/// return `None` when the id does not resolve; bulk deletions return the
/// number of records removed. `increment_likes` is the one read-modify-write
/// in the system and must be atomic on the store side, so that concurrent
/// increments never lose updates.
#[async_trait]
pub trait Store: Send + Sync {
	async fn insert_user(&self, user: User) -> Result<User, Error>;
	async fn find_user(&self, id: Uuid) -> Result<Option<User>, Error>;
	async fn update_user(&self, id: Uuid, patch: UserPatch) -> Result<Option<User>, Error>;
	async fn delete_user(&self, id: Uuid) -> Result<Option<User>, Error>;

	async fn insert_tweet(&self, tweet: Tweet) -> Result<Tweet, Error>;
	async fn find_tweet(&self, id: Uuid) -> Result<Option<Tweet>, Error>;
	async fn update_tweet(&self, id: Uuid, patch: TweetPatch) -> Result<Option<Tweet>, Error>;
	async fn increment_likes(&self, id: Uuid, delta: i32) -> Result<Option<Tweet>, Error>;
	async fn delete_tweet(&self, id: Uuid) -> Result<Option<Tweet>, Error>;
	/// Deletes every tweet owned by `user_id`, returning how many were removed.
	async fn delete_tweets_by_user(&self, user_id: Uuid) -> Result<u64, Error>;

	async fn insert_follow(&self, follow: Follow) -> Result<Follow, Error>;
	/// Deletes the first edge matching the pair, returning it if one existed.
	async fn remove_follow(
		&self,
		follower_id: Uuid,
		following_id: Uuid,
	) -> Result<Option<Follow>, Error>;
	/// Deletes every edge where `user_id` is follower or followee.
	async fn delete_follows_of_user(&self, user_id: Uuid) -> Result<u64, Error>;
}
