use chrono::{DateTime, Duration, Utc};
use sea_orm::sea_query::OnConflict;
use sea_orm::{ConnectionTrait, DbErr, EntityTrait, Set};
use serde::Serialize;

use crate::auth::AuthUser;
use crate::entity::{online, user};

/// Presence of a user as seen by one particular viewer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Presence {
    Online,
    OfflineVisible,
    /// The user hides their presence from this viewer.
    OfflineHidden,
}

impl Presence {
    pub fn resolve(
        subject: &user::Model,
        tracker: Option<&online::Model>,
        viewer: Option<&AuthUser>,
        window: Duration,
        now: DateTime<Utc>,
    ) -> Self {
        let sees_hidden = viewer
            .map(|v| v.user_id == subject.id || v.is_admin())
            .unwrap_or(false);
        if subject.is_hiding_presence && !sees_hidden {
            return Presence::OfflineHidden;
        }

        let active = tracker
            .map(|t| now.signed_duration_since(t.last_click) <= window)
            .unwrap_or(false);
        if active {
            Presence::Online
        } else {
            Presence::OfflineVisible
        }
    }

    pub fn is_online(self) -> bool {
        self == Presence::Online
    }

    pub fn is_hidden(self) -> bool {
        self == Presence::OfflineHidden
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct PresenceDto {
    pub is_online: bool,
    pub is_offline: bool,
    pub is_hidden: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_click: Option<String>,
}

impl PresenceDto {
    pub fn new(presence: Presence, tracker: Option<&online::Model>) -> Self {
        let last_click = if presence.is_hidden() {
            None
        } else {
            tracker.map(|t| crate::routes::to_rfc3339(t.last_click))
        };
        Self {
            is_online: presence.is_online(),
            is_offline: !presence.is_online(),
            is_hidden: presence.is_hidden(),
            last_click,
        }
    }
}

/// Records activity for `user_id`. A single upsert, so concurrent requests
/// of the same user never race on the primary key.
pub async fn touch<C: ConnectionTrait>(db: &C, user_id: i32, now: DateTime<Utc>) -> Result<(), DbErr> {
    let active = online::ActiveModel {
        user_id: Set(user_id),
        last_click: Set(now),
    };
    online::Entity::insert(active)
        .on_conflict(
            OnConflict::column(online::Column::UserId)
                .update_column(online::Column::LastClick)
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;
    Ok(())
}

/// Forgets `user_id`'s activity, so they show offline right away.
pub async fn clear<C: ConnectionTrait>(db: &C, user_id: i32) -> Result<(), DbErr> {
    online::Entity::delete_by_id(user_id).exec(db).await?;
    Ok(())
}
