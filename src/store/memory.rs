use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::model::{Follow, Tweet, User};

use super::{Error, Store, TweetPatch, UniqueField, UserPatch};

/// An in-process store used by the test suite and for local development.
///
/// All state sits behind a single [`RwLock`]; holding the write guard across
/// `increment_likes` is what makes the increment atomic here.
#[derive(Default)]
pub struct MemoryStore {
	inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
	users: HashMap<Uuid, User>,
	tweets: HashMap<Uuid, Tweet>,
	// Insertion order matters: `remove_follow` takes the oldest matching edge.
	follows: Vec<Follow>,
}

impl Inner {
	fn check_unique(&self, id: Uuid, username: Option<&str>, email: Option<&str>) -> Result<(), Error> {
		for user in self.users.values().filter(|user| user.id != id) {
			if username.is_some_and(|username| user.username == username) {
				return Err(Error::UniqueViolation(UniqueField::Username));
			}

			if email.is_some_and(|email| user.email == email) {
				return Err(Error::UniqueViolation(UniqueField::Email));
			}
		}

		Ok(())
	}
}

#[async_trait]
impl Store for MemoryStore {
	async fn insert_user(&self, user: User) -> Result<User, Error> {
		let mut inner = self.inner.write().await;

		inner.check_unique(user.id, Some(&user.username), Some(&user.email))?;
		inner.users.insert(user.id, user.clone());

		Ok(user)
	}

	async fn find_user(&self, id: Uuid) -> Result<Option<User>, Error> {
		Ok(self.inner.read().await.users.get(&id).cloned())
	}

	async fn update_user(&self, id: Uuid, patch: UserPatch) -> Result<Option<User>, Error> {
		let mut inner = self.inner.write().await;

		if !inner.users.contains_key(&id) {
			return Ok(None);
		}

		inner.check_unique(id, patch.username.as_deref(), patch.email.as_deref())?;

		let Some(user) = inner.users.get_mut(&id) else {
			return Ok(None);
		};

		if let Some(username) = patch.username {
			user.username = username;
		}
		if let Some(email) = patch.email {
			user.email = email;
		}
		if let Some(password) = patch.password {
			user.password = password;
		}
		if let Some(bio) = patch.bio {
			user.bio = Some(bio);
		}

		Ok(Some(user.clone()))
	}

	async fn delete_user(&self, id: Uuid) -> Result<Option<User>, Error> {
		Ok(self.inner.write().await.users.remove(&id))
	}

	async fn insert_tweet(&self, tweet: Tweet) -> Result<Tweet, Error> {
		self.inner
			.write()
			.await
			.tweets
			.insert(tweet.id, tweet.clone());

		Ok(tweet)
	}

	async fn find_tweet(&self, id: Uuid) -> Result<Option<Tweet>, Error> {
		Ok(self.inner.read().await.tweets.get(&id).cloned())
	}

	async fn update_tweet(&self, id: Uuid, patch: TweetPatch) -> Result<Option<Tweet>, Error> {
		let mut inner = self.inner.write().await;

		let Some(tweet) = inner.tweets.get_mut(&id) else {
			return Ok(None);
		};

		if let Some(content) = patch.content {
			tweet.content = Some(content);
		}
		if let Some(image_url) = patch.image_url {
			tweet.image_url = Some(image_url);
		}

		Ok(Some(tweet.clone()))
	}

	async fn increment_likes(&self, id: Uuid, delta: i32) -> Result<Option<Tweet>, Error> {
		let mut inner = self.inner.write().await;

		let Some(tweet) = inner.tweets.get_mut(&id) else {
			return Ok(None);
		};

		tweet.likes += delta;

		Ok(Some(tweet.clone()))
	}

	async fn delete_tweet(&self, id: Uuid) -> Result<Option<Tweet>, Error> {
		Ok(self.inner.write().await.tweets.remove(&id))
	}

	async fn delete_tweets_by_user(&self, user_id: Uuid) -> Result<u64, Error> {
		let mut inner = self.inner.write().await;

		let before = inner.tweets.len();
		inner.tweets.retain(|_, tweet| tweet.user_id != user_id);

		Ok((before - inner.tweets.len()) as u64)
	}

	async fn insert_follow(&self, follow: Follow) -> Result<Follow, Error> {
		self.inner.write().await.follows.push(follow.clone());

		Ok(follow)
	}

	async fn remove_follow(
		&self,
		follower_id: Uuid,
		following_id: Uuid,
	) -> Result<Option<Follow>, Error> {
		let mut inner = self.inner.write().await;

		let position = inner
			.follows
			.iter()
			.position(|follow| {
				follow.follower_id == follower_id && follow.following_id == following_id
			});

		Ok(position.map(|position| inner.follows.remove(position)))
	}

	async fn delete_follows_of_user(&self, user_id: Uuid) -> Result<u64, Error> {
		let mut inner = self.inner.write().await;

		let before = inner.follows.len();
		inner
			.follows
			.retain(|follow| follow.follower_id != user_id && follow.following_id != user_id);

		Ok((before - inner.follows.len()) as u64)
	}
}

#[cfg(test)]
mod test {
	use super::*;

	fn follow(follower_id: Uuid, following_id: Uuid) -> Follow {
		Follow {
			id: Uuid::new_v4(),
			follower_id,
			following_id,
		}
	}

	#[tokio::test]
	async fn test_increment_likes_unknown_id() {
		let store = MemoryStore::default();

		let tweet = store.increment_likes(Uuid::new_v4(), 1).await.unwrap();

		assert!(tweet.is_none());
	}

	#[tokio::test]
	async fn test_remove_follow_takes_first_match() {
		let store = MemoryStore::default();
		let (a, b) = (Uuid::new_v4(), Uuid::new_v4());

		let first = store.insert_follow(follow(a, b)).await.unwrap();
		let second = store.insert_follow(follow(a, b)).await.unwrap();

		let removed = store.remove_follow(a, b).await.unwrap().unwrap();

		assert_eq!(removed.id, first.id);

		let removed = store.remove_follow(a, b).await.unwrap().unwrap();

		assert_eq!(removed.id, second.id);
		assert!(store.remove_follow(a, b).await.unwrap().is_none());
	}

	#[tokio::test]
	async fn test_delete_follows_of_user_covers_both_directions() {
		let store = MemoryStore::default();
		let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());

		store.insert_follow(follow(a, b)).await.unwrap();
		store.insert_follow(follow(c, a)).await.unwrap();
		store.insert_follow(follow(b, c)).await.unwrap();

		assert_eq!(store.delete_follows_of_user(a).await.unwrap(), 2);
		assert_eq!(store.delete_follows_of_user(a).await.unwrap(), 0);
	}
}
