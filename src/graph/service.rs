use sqlx::{Pool, Postgres};

use crate::error::{Result, ServerError};
use crate::graph::FollowRepository;
use crate::notification::{Event, Fanout, Kind};
use crate::user::UserRepository;

/// Relationship manager.
///
/// Owns follow/unfollow semantics; the notification fanout runs after the
/// edge write committed.
#[derive(Clone)]
pub struct GraphService {
    users: UserRepository,
    follows: FollowRepository,
    fanout: Fanout,
}

impl GraphService {
    /// Create a new [`GraphService`].
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            follows: FollowRepository::new(pool.clone()),
            fanout: Fanout::new(pool),
        }
    }

    /// Follow `target_id` if not followed, unfollow otherwise.
    ///
    /// Returns the new relationship state (true = now following). Exactly
    /// one `follow` notification is recorded on the follow transition,
    /// none on unfollow.
    pub async fn toggle_follow(
        &self,
        actor_id: &str,
        target_id: &str,
    ) -> Result<bool> {
        if actor_id == target_id {
            return Err(ServerError::SelfAction);
        }

        if !self.users.exists(actor_id).await?
            || !self.users.exists(target_id).await?
        {
            return Err(ServerError::NotFound { resource: "user" });
        }

        let now_following = self.follows.toggle(actor_id, target_id).await?;

        if now_following {
            self.fanout
                .emit(Event {
                    from: actor_id.to_owned(),
                    to: target_id.to_owned(),
                    kind: Kind::Follow,
                })
                .await;
        }

        Ok(now_following)
    }
}
