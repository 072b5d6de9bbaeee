//! Feed assembly.
//!
//! Read-only composition of the follow graph and the content store. Feeds
//! observe whatever graph state is committed at query time; no locks are
//! taken against concurrent mutation.

use std::collections::HashSet;

use sqlx::{Pool, Postgres};

use crate::config::Suggestions;
use crate::error::Result;
use crate::graph::FollowRepository;
use crate::post::{PostRepository, PostView, Scope};
use crate::user::{User, UserRepository};

/// Derives home feeds and people-to-follow lists from graph state.
#[derive(Clone)]
pub struct FeedAssembler {
    users: UserRepository,
    posts: PostRepository,
    follows: FollowRepository,
}

impl FeedAssembler {
    /// Create a new [`FeedAssembler`].
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            posts: PostRepository::new(pool.clone()),
            follows: FollowRepository::new(pool),
        }
    }

    /// Posts from everyone `user_id` follows, newest first.
    ///
    /// An empty following set yields an empty feed, not an error.
    pub async fn following_feed(&self, user_id: &str) -> Result<Vec<PostView>> {
        self.posts.views(Scope::FolloweesOf, user_id).await
    }

    /// Posts `owner_user_id` liked, newest post first.
    ///
    /// The upstream feature never sorted this list; newest-first is this
    /// implementation's documented choice.
    pub async fn liked_feed(&self, owner_user_id: &str) -> Result<Vec<PostView>> {
        // resolve first so an unknown user is a 404, not an empty feed.
        self.users.find_by_id(owner_user_id).await?;

        self.posts.views(Scope::LikedBy, owner_user_id).await
    }

    /// People-to-follow list for `user_id`.
    ///
    /// Draws a random sample, THEN filters out already-followed users, THEN
    /// truncates. The order matters: filtering the whole population before
    /// sampling would change who gets suggested and how often. The list may
    /// hold fewer than `limit` entries, or none, when the sample happens to
    /// be mostly already-followed.
    pub async fn suggestions(
        &self,
        user_id: &str,
        config: &Suggestions,
    ) -> Result<Vec<User>> {
        let sample = self
            .users
            .sample_excluding(user_id, config.sample_size)
            .await?;

        let following: HashSet<String> = self
            .follows
            .following_ids(user_id)
            .await?
            .into_iter()
            .collect();

        let mut suggested: Vec<User> = sample
            .into_iter()
            .filter(|user| !following.contains(&user.id))
            .collect();
        suggested.truncate(config.limit);

        Ok(suggested)
    }
}
