//! Filtered, paginated user listings.

pub mod filter;

use std::collections::HashMap;

use chrono::{Duration, Utc};
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
};

use crate::auth::AuthUser;
use crate::entity::{online, rank, user};
use crate::error::AppError;
use crate::presence::Presence;

pub use filter::{resolve, resolve_rank, resolve_user, ListUsersQuery, ResolvedFilter, UserFilter};

/// A user as shown in a listing, decorated for one viewer.
#[derive(Debug, Clone)]
pub struct ListedUser {
    pub user: user::Model,
    pub rank: Option<rank::Model>,
    pub tracker: Option<online::Model>,
    pub presence: Presence,
}

#[derive(Debug, Clone)]
pub struct UserListing {
    pub items: Vec<ListedUser>,
    pub total: u64,
    pub page: u64,
    pub total_page: u64,
}

pub struct ListParams<'a> {
    pub page: u64,
    pub per_page: u64,
    pub viewer: Option<&'a AuthUser>,
    pub online_window: Duration,
}

pub async fn list_users<C: ConnectionTrait>(
    db: &C,
    filter: &UserFilter,
    params: ListParams<'_>,
) -> Result<UserListing, AppError> {
    let resolved = resolve(db, filter).await?;

    let mut select = user::Entity::find().filter(resolved.condition);
    for (column, order) in resolved.order {
        select = select.order_by(column, order);
    }

    let per_page = params.per_page.max(1);
    let paginator = select.paginate(db, per_page);
    let counts = paginator.num_items_and_pages().await?;

    let page = params.page.max(1);
    if page > 1 && page > counts.number_of_pages {
        return Err(AppError::not_found(format!("page {}", page)));
    }

    let users = paginator.fetch_page(page - 1).await?;
    let items = decorate(db, users, params.viewer, params.online_window).await?;

    Ok(UserListing {
        items,
        total: counts.number_of_items,
        page,
        total_page: counts.number_of_pages,
    })
}

/// Loads one user card by id.
pub async fn get_user<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    viewer: Option<&AuthUser>,
    online_window: Duration,
) -> Result<ListedUser, AppError> {
    let user = user::Entity::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::not_found("user"))?;
    let mut items = decorate(db, vec![user], viewer, online_window).await?;
    items.pop().ok_or_else(|| AppError::not_found("user"))
}

/// Attaches ranks and per-viewer presence with one query for each.
async fn decorate<C: ConnectionTrait>(
    db: &C,
    users: Vec<user::Model>,
    viewer: Option<&AuthUser>,
    online_window: Duration,
) -> Result<Vec<ListedUser>, AppError> {
    if users.is_empty() {
        return Ok(Vec::new());
    }

    let user_ids: Vec<i32> = users.iter().map(|u| u.id).collect();
    let mut rank_ids: Vec<i32> = users.iter().filter_map(|u| u.rank_id).collect();
    rank_ids.sort_unstable();
    rank_ids.dedup();

    let ranks: HashMap<i32, rank::Model> = rank::Entity::find()
        .filter(rank::Column::Id.is_in(rank_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|r| (r.id, r))
        .collect();

    let mut trackers: HashMap<i32, online::Model> = online::Entity::find()
        .filter(online::Column::UserId.is_in(user_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|t| (t.user_id, t))
        .collect();

    let now = Utc::now();
    let items = users
        .into_iter()
        .map(|user| {
            let tracker = trackers.remove(&user.id);
            let presence = Presence::resolve(&user, tracker.as_ref(), viewer, online_window, now);
            let rank = user.rank_id.and_then(|id| ranks.get(&id).cloned());
            ListedUser {
                user,
                rank,
                tracker,
                presence,
            }
        })
        .collect();
    Ok(items)
}

/// Ranks that get their own users tab, in display order.
pub async fn tab_ranks<C: ConnectionTrait>(db: &C) -> Result<Vec<rank::Model>, AppError> {
    let ranks = rank::Entity::find()
        .filter(rank::Column::IsTab.eq(true))
        .order_by_asc(rank::Column::SortOrder)
        .order_by_asc(rank::Column::Id)
        .all(db)
        .await?;
    Ok(ranks)
}
