//! Notification fanout and inbox.
//!
//! Fanout runs synchronously with the graph or engagement mutation that
//! triggered it, after that mutation committed. Emission is fail-soft: a
//! failed insert is logged and never surfaced to the caller, the committed
//! mutation stands on its own.

mod repository;

pub use repository::*;

use serde::{Deserialize, Serialize};
use sqlx::{Pool, Postgres};

use crate::user::PublicProfile;

/// Kind of event a notification was fanned out for.
///
/// Comments intentionally fan out nothing, matching the behavior the product
/// shipped with.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Follow,
    Like,
}

impl Kind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Follow => "follow",
            Kind::Like => "like",
        }
    }
}

/// A graph or engagement mutation with an addressed recipient.
#[derive(Clone, Debug, PartialEq)]
pub struct Event {
    pub from: String,
    pub to: String,
    pub kind: Kind,
}

/// Notification as listed to its recipient, actor profile pre-joined.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct NotificationView {
    pub id: i64,
    pub kind: String,
    pub read: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[sqlx(json)]
    pub from: PublicProfile,
}

/// Fail-soft notification producer.
#[derive(Clone)]
pub struct Fanout {
    repo: NotificationRepository,
}

impl Fanout {
    /// Create a new [`Fanout`].
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            repo: NotificationRepository::new(pool),
        }
    }

    /// Record one notification for `event`.
    ///
    /// Never propagates failure: the triggering mutation already committed
    /// and is not conditioned on notification delivery.
    pub async fn emit(&self, event: Event) {
        if let Err(err) = self.repo.insert(&event).await {
            tracing::error!(
                from = event.from,
                to = event.to,
                kind = event.kind.as_str(),
                error = err.to_string(),
                "notification not recorded"
            );
        }
    }
}
