use sqlx::{Pool, Postgres};
use validator::{ValidationError, ValidationErrors};

use crate::engagement::EngagementRepository;
use crate::error::Result;
use crate::notification::{Event, Fanout, Kind};
use crate::post::{PostRepository, PostView};

fn blank_comment() -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    errors.add(
        "text",
        ValidationError::new("comment")
            .with_message("Comment text cannot be blank.".into()),
    );
    errors
}

/// Engagement manager.
///
/// Owns like/unlike and comment-append semantics; the notification fanout
/// runs after the engagement write committed.
#[derive(Clone)]
pub struct EngagementService {
    posts: PostRepository,
    engagement: EngagementRepository,
    fanout: Fanout,
}

impl EngagementService {
    /// Create a new [`EngagementService`].
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            posts: PostRepository::new(pool.clone()),
            engagement: EngagementRepository::new(pool.clone()),
            fanout: Fanout::new(pool),
        }
    }

    /// Like `post_id` if not liked, unlike otherwise.
    ///
    /// Returns the post's updated likes set, not a count, so the caller can
    /// reconcile optimistic UI state. One `like` notification is recorded on
    /// the like transition, addressed to the post owner. A self-like still
    /// notifies the actor; the behavior the product shipped with.
    pub async fn toggle_like(
        &self,
        actor_id: &str,
        post_id: i64,
    ) -> Result<Vec<String>> {
        let post = self.posts.find_by_id(post_id).await?;

        let now_liked =
            self.engagement.toggle_like(post_id, actor_id).await?;

        if now_liked {
            self.fanout
                .emit(Event {
                    from: actor_id.to_owned(),
                    to: post.user_id,
                    kind: Kind::Like,
                })
                .await;
        }

        self.posts.likes(post_id).await
    }

    /// Append a comment to `post_id` and return the updated post.
    ///
    /// No notification is generated for comments.
    pub async fn append_comment(
        &self,
        actor_id: &str,
        post_id: i64,
        text: &str,
    ) -> Result<PostView> {
        let text = text.trim();
        if text.is_empty() {
            return Err(blank_comment().into());
        }

        // resolve before writing so an absent post is a 404, not a FK error.
        self.posts.find_by_id(post_id).await?;

        self.engagement.append_comment(post_id, actor_id, text).await?;

        self.posts.view(post_id).await
    }
}

#[cfg(test)]
mod tests {
    use sqlx::{Pool, Postgres};

    use super::*;
    use crate::error::ServerError;
    use crate::notification::NotificationRepository;

    #[sqlx::test(fixtures("../../fixtures/users.sql", "../../fixtures/posts.sql"))]
    async fn test_like_keeps_both_indexes_in_agreement(pool: Pool<Postgres>) {
        let service = EngagementService::new(pool.clone());
        let engagement = EngagementRepository::new(pool.clone());
        let posts = PostRepository::new(pool);

        let likes = service.toggle_like("admin", 1).await.unwrap();
        assert_eq!(likes, vec!["admin"]);
        // user in post.likes iff post in user.likedPosts.
        assert_eq!(posts.likes(1).await.unwrap(), vec!["admin"]);
        assert_eq!(engagement.liked_post_ids("admin").await.unwrap(), vec![1]);

        let likes = service.toggle_like("admin", 1).await.unwrap();
        assert!(likes.is_empty());
        assert!(posts.likes(1).await.unwrap().is_empty());
        assert!(engagement.liked_post_ids("admin").await.unwrap().is_empty());
    }

    #[sqlx::test(fixtures("../../fixtures/users.sql", "../../fixtures/posts.sql"))]
    async fn test_like_notifies_owner_once(pool: Pool<Postgres>) {
        let service = EngagementService::new(pool.clone());
        let notifications = NotificationRepository::new(pool);

        service.toggle_like("admin", 1).await.unwrap();
        let rows = notifications.raw_for("bob").await.unwrap();
        assert_eq!(rows, vec![("admin".into(), "like".into(), false)]);

        // unlike records nothing and leaves the first record alone.
        service.toggle_like("admin", 1).await.unwrap();
        let rows = notifications.raw_for("bob").await.unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[sqlx::test(fixtures("../../fixtures/users.sql", "../../fixtures/posts.sql"))]
    async fn test_self_like_still_notifies(pool: Pool<Postgres>) {
        let service = EngagementService::new(pool.clone());
        let notifications = NotificationRepository::new(pool);

        service.toggle_like("bob", 1).await.unwrap();

        let rows = notifications.raw_for("bob").await.unwrap();
        assert_eq!(rows, vec![("bob".into(), "like".into(), false)]);
    }

    #[sqlx::test(fixtures("../../fixtures/users.sql", "../../fixtures/posts.sql"))]
    async fn test_like_unknown_post(pool: Pool<Postgres>) {
        let service = EngagementService::new(pool);

        let error = service.toggle_like("admin", 999).await.unwrap_err();
        assert!(matches!(error, ServerError::NotFound { resource: "post" }));
    }

    #[sqlx::test(fixtures("../../fixtures/users.sql", "../../fixtures/posts.sql"))]
    async fn test_blank_comment_is_rejected(pool: Pool<Postgres>) {
        let service = EngagementService::new(pool.clone());

        for text in ["", "   "] {
            let error =
                service.append_comment("admin", 1, text).await.unwrap_err();
            assert!(matches!(error, ServerError::Validation(_)));
        }

        // sequence length unchanged.
        let view = PostRepository::new(pool).view(1).await.unwrap();
        assert!(view.comments.is_empty());
    }

    #[sqlx::test(fixtures("../../fixtures/users.sql", "../../fixtures/posts.sql"))]
    async fn test_comments_append_in_order_without_notification(
        pool: Pool<Postgres>,
    ) {
        let service = EngagementService::new(pool.clone());

        service.append_comment("admin", 1, "first").await.unwrap();
        let view = service.append_comment("carol", 1, "second").await.unwrap();

        assert_eq!(view.comments.len(), 2);
        assert_eq!(view.comments[0].text, "first");
        assert_eq!(view.comments[0].user.username, "admin");
        assert_eq!(view.comments[1].text, "second");
        assert_eq!(view.comments[1].user.username, "carol");

        let notifications = NotificationRepository::new(pool);
        assert!(notifications.raw_for("bob").await.unwrap().is_empty());
    }
}
