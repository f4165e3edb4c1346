use std::sync::Arc;

use argon2::Argon2;
use chrono::Utc;
use uuid::Uuid;

use crate::{
	model::{Follow, Tweet, User},
	store::{self, Store, TweetPatch, UniqueField, UserPatch},
};

/// The longest content a tweet may carry, in characters.
pub const TWEET_MAX_CHARS: usize = 280;

const HASH_LENGTH: usize = 32;

/// An error produced by a mutation.
///
/// Operations that look up a record by id report its absence as `Ok(None)`
/// rather than an error; the exceptions are [`Service::like_tweet`], which
/// reports a missing tweet as [`Error::UnknownTweet`], and the owner check on
/// tweet creation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("username already taken")]
	UsernameTaken,
	#[error("email already taken")]
	EmailTaken,
	#[error("tweet content exceeds 280 characters")]
	ContentTooLong,
	#[error("unknown user {0}")]
	UnknownUser(Uuid),
	#[error("unknown tweet {0}")]
	UnknownTweet(Uuid),
	#[error("no follow from {0} to {1}")]
	UnknownFollow(Uuid, Uuid),
	#[error("password hashing error")]
	Argon(#[from] argon2::Error),
	#[error("store error: {0}")]
	Store(store::Error),
}

impl From<store::Error> for Error {
	fn from(e: store::Error) -> Self {
		match e {
			store::Error::UniqueViolation(UniqueField::Username) => Self::UsernameTaken,
			store::Error::UniqueViolation(UniqueField::Email) => Self::EmailTaken,
			e => Self::Store(e),
		}
	}
}

/// Arguments for [`Service::create_user`].
#[derive(Debug)]
pub struct CreateUser {
	pub username: String,
	pub email: String,
	pub password: String,
	pub bio: Option<String>,
	pub profile_picture: Option<String>,
}

/// Arguments for [`Service::compose_tweet`].
#[derive(Debug)]
pub struct ComposeTweet {
	pub user_id: Uuid,
	pub content: String,
	pub image_url: Option<String>,
}

/// The mutation service.
///
/// Every write to the system goes through here. The service keeps no state of
/// its own between requests; all durable state lives behind the [`Store`].
#[derive(Clone)]
pub struct Service {
	store: Arc<dyn Store>,
	hasher: Argon2<'static>,
}

impl Service {
	pub fn new(store: Arc<dyn Store>) -> Self {
		Self {
			store,
			hasher: Argon2::default(),
		}
	}

	/// Hashes a password with Argon2, using the user's id as a salt.
	fn hash_password(&self, password: &str, id: &Uuid) -> Result<Vec<u8>, argon2::Error> {
		let mut hash = [0; HASH_LENGTH];

		self.hasher
			.hash_password_into(password.as_bytes(), id.as_bytes(), &mut hash)?;

		Ok(hash.to_vec())
	}

	/// Creates a user, hashing the password before it is persisted.
	///
	/// Fails with [`Error::UsernameTaken`] or [`Error::EmailTaken`] when the
	/// corresponding unique index rejects the insert.
	pub async fn create_user(&self, input: CreateUser) -> Result<User, Error> {
		let id = Uuid::new_v4();
		let password = self.hash_password(&input.password, &id)?;

		let user = self
			.store
			.insert_user(User {
				id,
				username: input.username,
				email: input.email,
				password,
				bio: input.bio,
				profile_picture: input.profile_picture,
				created_at: Utc::now(),
			})
			.await?;

		tracing::info!(id = %user.id, username = %user.username, "created user");

		Ok(user)
	}

	pub async fn update_email(&self, id: Uuid, email: String) -> Result<Option<User>, Error> {
		let patch = UserPatch {
			email: Some(email),
			..UserPatch::default()
		};

		Ok(self.store.update_user(id, patch).await?)
	}

	pub async fn update_username(&self, id: Uuid, username: String) -> Result<Option<User>, Error> {
		let patch = UserPatch {
			username: Some(username),
			..UserPatch::default()
		};

		Ok(self.store.update_user(id, patch).await?)
	}

	pub async fn update_password(&self, id: Uuid, password: String) -> Result<Option<User>, Error> {
		let patch = UserPatch {
			password: Some(self.hash_password(&password, &id)?),
			..UserPatch::default()
		};

		Ok(self.store.update_user(id, patch).await?)
	}

	pub async fn update_bio(&self, id: Uuid, bio: String) -> Result<Option<User>, Error> {
		let patch = UserPatch {
			bio: Some(bio),
			..UserPatch::default()
		};

		Ok(self.store.update_user(id, patch).await?)
	}

	/// Deletes a user and everything they own, returning the pre-deletion
	/// record, or `None` when the id does not resolve.
	///
	/// Follow edges and tweets are removed before the user record so a
	/// failure part-way through never leaves them referencing a vanished
	/// user. An error in either cleanup step aborts the remaining steps.
	///
	/// Cleanup runs before the user record is looked up, so an unknown id
	/// still sweeps any dangling edges or tweets referencing it before `None`
	/// is returned.
	pub async fn delete_user(&self, id: Uuid) -> Result<Option<User>, Error> {
		let follows = self.store.delete_follows_of_user(id).await?;
		let tweets = self.store.delete_tweets_by_user(id).await?;

		let user = self.store.delete_user(id).await?;

		if user.is_some() {
			tracing::info!(%id, follows, tweets, "deleted user");
		}

		Ok(user)
	}

	/// Creates a tweet with fresh counters and the current time as its
	/// timestamp.
	///
	/// The owner check is best-effort: the user is looked up first, but
	/// nothing prevents a concurrent deletion between the check and the
	/// insert.
	pub async fn compose_tweet(&self, input: ComposeTweet) -> Result<Tweet, Error> {
		if input.content.chars().count() > TWEET_MAX_CHARS {
			return Err(Error::ContentTooLong);
		}

		if self.store.find_user(input.user_id).await?.is_none() {
			return Err(Error::UnknownUser(input.user_id));
		}

		let tweet = self
			.store
			.insert_tweet(Tweet {
				id: Uuid::new_v4(),
				user_id: input.user_id,
				content: Some(input.content),
				created_at: Utc::now(),
				likes: 0,
				retweets: 0,
				image_url: input.image_url,
				original_tweet: None,
			})
			.await?;

		Ok(tweet)
	}

	/// Overwrites a tweet's content, and its image reference when one is
	/// supplied. Counters and the timestamp are untouched.
	pub async fn edit_tweet(
		&self,
		id: Uuid,
		content: String,
		image_url: Option<String>,
	) -> Result<Option<Tweet>, Error> {
		if content.chars().count() > TWEET_MAX_CHARS {
			return Err(Error::ContentTooLong);
		}

		let patch = TweetPatch {
			content: Some(content),
			image_url,
		};

		Ok(self.store.update_tweet(id, patch).await?)
	}

	/// Adds one like to a tweet.
	///
	/// The increment happens inside the store, so concurrent likes on the
	/// same tweet each land. A missing tweet is an error here, not `None`.
	pub async fn like_tweet(&self, id: Uuid) -> Result<Tweet, Error> {
		self.store
			.increment_likes(id, 1)
			.await?
			.ok_or(Error::UnknownTweet(id))
	}

	/// Creates a retweet: a tweet with no content of its own that references
	/// its origin.
	///
	/// The origin is not looked up; a dangling reference is permitted, and
	/// the origin's retweet counter is left alone.
	pub async fn retweet(&self, user_id: Uuid, original_tweet_id: Uuid) -> Result<Tweet, Error> {
		if self.store.find_user(user_id).await?.is_none() {
			return Err(Error::UnknownUser(user_id));
		}

		let tweet = self
			.store
			.insert_tweet(Tweet {
				id: Uuid::new_v4(),
				user_id,
				content: None,
				created_at: Utc::now(),
				likes: 0,
				retweets: 0,
				image_url: None,
				original_tweet: Some(original_tweet_id),
			})
			.await?;

		Ok(tweet)
	}

	/// Deletes a tweet. Deleting a retweet never touches its origin, and
	/// deleting an origin leaves existing retweets pointing at the old id.
	pub async fn delete_tweet(&self, id: Uuid) -> Result<Option<Tweet>, Error> {
		Ok(self.store.delete_tweet(id).await?)
	}

	/// Creates a follow edge unconditionally: no existence, duplicate, or
	/// self-follow check.
	pub async fn follow(&self, follower_id: Uuid, following_id: Uuid) -> Result<Follow, Error> {
		let follow = self
			.store
			.insert_follow(Follow {
				id: Uuid::new_v4(),
				follower_id,
				following_id,
			})
			.await?;

		Ok(follow)
	}

	/// Removes the first edge matching the pair, or returns `None` and leaves
	/// the store unchanged when there is none.
	pub async fn unfollow(
		&self,
		follower_id: Uuid,
		following_id: Uuid,
	) -> Result<Option<Follow>, Error> {
		Ok(self.store.remove_follow(follower_id, following_id).await?)
	}
}
