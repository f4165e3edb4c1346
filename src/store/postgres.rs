use async_trait::async_trait;
use uuid::Uuid;

use crate::model::{Follow, Tweet, User};

use super::{Error, Store, TweetPatch, UniqueField, UserPatch};

/// The Postgres-backed store.
///
/// Queries use the runtime API rather than the compile-time checked macros so
/// the crate builds without a live database. Uniqueness lives in the schema's
/// unique indexes; [`unique_violation`] maps their constraint names back to
/// typed errors. The like counter is incremented in SQL, so concurrent likes
/// serialize on the row instead of racing through the application.
pub struct PgStore {
	pool: sqlx::PgPool,
}

impl PgStore {
	pub fn new(pool: sqlx::PgPool) -> Self {
		Self { pool }
	}
}

fn unique_violation(e: sqlx::Error) -> Error {
	match e {
		sqlx::Error::Database(ref d) => match d.constraint() {
			Some("user_username_key") => Error::UniqueViolation(UniqueField::Username),
			Some("user_email_key") => Error::UniqueViolation(UniqueField::Email),
			_ => Error::Database(e),
		},
		e => Error::Database(e),
	}
}

#[async_trait]
impl Store for PgStore {
	async fn insert_user(&self, user: User) -> Result<User, Error> {
		sqlx::query_as::<_, User>(
			r#"
				INSERT INTO "user" (id, username, email, password, bio, profile_picture, created_at)
				VALUES ($1, $2, $3, $4, $5, $6, $7)
				RETURNING *
			"#,
		)
		.bind(user.id)
		.bind(user.username)
		.bind(user.email)
		.bind(user.password)
		.bind(user.bio)
		.bind(user.profile_picture)
		.bind(user.created_at)
		.fetch_one(&self.pool)
		.await
		.map_err(unique_violation)
	}

	async fn find_user(&self, id: Uuid) -> Result<Option<User>, Error> {
		let user = sqlx::query_as::<_, User>(r#"SELECT * FROM "user" WHERE id = $1"#)
			.bind(id)
			.fetch_optional(&self.pool)
			.await?;

		Ok(user)
	}

	async fn update_user(&self, id: Uuid, patch: UserPatch) -> Result<Option<User>, Error> {
		sqlx::query_as::<_, User>(
			r#"
				UPDATE "user"
				SET username = COALESCE($2, username),
					email = COALESCE($3, email),
					password = COALESCE($4, password),
					bio = COALESCE($5, bio)
				WHERE id = $1
				RETURNING *
			"#,
		)
		.bind(id)
		.bind(patch.username)
		.bind(patch.email)
		.bind(patch.password)
		.bind(patch.bio)
		.fetch_optional(&self.pool)
		.await
		.map_err(unique_violation)
	}

	async fn delete_user(&self, id: Uuid) -> Result<Option<User>, Error> {
		let user = sqlx::query_as::<_, User>(r#"DELETE FROM "user" WHERE id = $1 RETURNING *"#)
			.bind(id)
			.fetch_optional(&self.pool)
			.await?;

		Ok(user)
	}

	async fn insert_tweet(&self, tweet: Tweet) -> Result<Tweet, Error> {
		let tweet = sqlx::query_as::<_, Tweet>(
			r#"
				INSERT INTO tweet (id, user_id, content, created_at, likes, retweets, image_url, original_tweet)
				VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
				RETURNING *
			"#,
		)
		.bind(tweet.id)
		.bind(tweet.user_id)
		.bind(tweet.content)
		.bind(tweet.created_at)
		.bind(tweet.likes)
		.bind(tweet.retweets)
		.bind(tweet.image_url)
		.bind(tweet.original_tweet)
		.fetch_one(&self.pool)
		.await?;

		Ok(tweet)
	}

	async fn find_tweet(&self, id: Uuid) -> Result<Option<Tweet>, Error> {
		let tweet = sqlx::query_as::<_, Tweet>("SELECT * FROM tweet WHERE id = $1")
			.bind(id)
			.fetch_optional(&self.pool)
			.await?;

		Ok(tweet)
	}

	async fn update_tweet(&self, id: Uuid, patch: TweetPatch) -> Result<Option<Tweet>, Error> {
		let tweet = sqlx::query_as::<_, Tweet>(
			r#"
				UPDATE tweet
				SET content = COALESCE($2, content),
					image_url = COALESCE($3, image_url)
				WHERE id = $1
				RETURNING *
			"#,
		)
		.bind(id)
		.bind(patch.content)
		.bind(patch.image_url)
		.fetch_optional(&self.pool)
		.await?;

		Ok(tweet)
	}

	async fn increment_likes(&self, id: Uuid, delta: i32) -> Result<Option<Tweet>, Error> {
		let tweet = sqlx::query_as::<_, Tweet>(
			"UPDATE tweet SET likes = likes + $2 WHERE id = $1 RETURNING *",
		)
		.bind(id)
		.bind(delta)
		.fetch_optional(&self.pool)
		.await?;

		Ok(tweet)
	}

	async fn delete_tweet(&self, id: Uuid) -> Result<Option<Tweet>, Error> {
		let tweet = sqlx::query_as::<_, Tweet>("DELETE FROM tweet WHERE id = $1 RETURNING *")
			.bind(id)
			.fetch_optional(&self.pool)
			.await?;

		Ok(tweet)
	}

	async fn delete_tweets_by_user(&self, user_id: Uuid) -> Result<u64, Error> {
		let result = sqlx::query("DELETE FROM tweet WHERE user_id = $1")
			.bind(user_id)
			.execute(&self.pool)
			.await?;

		Ok(result.rows_affected())
	}

	async fn insert_follow(&self, follow: Follow) -> Result<Follow, Error> {
		let follow = sqlx::query_as::<_, Follow>(
			r#"
				INSERT INTO follow (id, follower_id, following_id)
				VALUES ($1, $2, $3)
				RETURNING *
			"#,
		)
		.bind(follow.id)
		.bind(follow.follower_id)
		.bind(follow.following_id)
		.fetch_one(&self.pool)
		.await?;

		Ok(follow)
	}

	async fn remove_follow(
		&self,
		follower_id: Uuid,
		following_id: Uuid,
	) -> Result<Option<Follow>, Error> {
		let follow = sqlx::query_as::<_, Follow>(
			r#"
				DELETE FROM follow
				WHERE id = (
					SELECT id FROM follow
					WHERE follower_id = $1 AND following_id = $2
					LIMIT 1
				)
				RETURNING *
			"#,
		)
		.bind(follower_id)
		.bind(following_id)
		.fetch_optional(&self.pool)
		.await?;

		Ok(follow)
	}

	async fn delete_follows_of_user(&self, user_id: Uuid) -> Result<u64, Error> {
		let result = sqlx::query("DELETE FROM follow WHERE follower_id = $1 OR following_id = $1")
			.bind(user_id)
			.execute(&self.pool)
			.await?;

		Ok(result.rows_affected())
	}
}
