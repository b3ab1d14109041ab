use log::debug;
use sea_orm::sea_query::{Expr, Func, LikeExpr};
use sea_orm::{ColumnTrait, Condition, ConnectionTrait, EntityTrait, Order, QueryFilter, QuerySelect};
use serde::Deserialize;

use crate::entity::{rank, user, user_follow};
use crate::error::AppError;
use crate::slug::slugify;

/// Raw query string of `GET /api/users/`.
#[derive(Deserialize, Debug, Default, Clone)]
pub struct ListUsersQuery {
    pub list: Option<String>,
    pub followers: Option<String>,
    pub follows: Option<String>,
    pub rank: Option<String>,
    pub name: Option<String>,
    pub page: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserFilter {
    All,
    Active,
    Followers(String),
    Follows(String),
    Rank(String),
    Name(String),
    /// A `list=` value that names no known listing.
    UnknownList(String),
}

impl UserFilter {
    /// Picks the single filter of a request. When several are given the first
    /// of `list`, `followers`, `follows`, `rank`, `name` wins.
    pub fn from_query(query: &ListUsersQuery) -> Self {
        if let Some(list) = &query.list {
            return match list.trim() {
                "active" => UserFilter::Active,
                other => UserFilter::UnknownList(other.to_string()),
            };
        }
        if let Some(slug) = &query.followers {
            return UserFilter::Followers(slug.clone());
        }
        if let Some(slug) = &query.follows {
            return UserFilter::Follows(slug.clone());
        }
        if let Some(slug) = &query.rank {
            return UserFilter::Rank(slug.clone());
        }
        if let Some(name) = &query.name {
            return UserFilter::Name(name.clone());
        }
        UserFilter::All
    }
}

/// Predicate and ordering over `t_user` for one listing.
#[derive(Debug, Clone)]
pub struct ResolvedFilter {
    pub condition: Condition,
    pub order: Vec<(user::Column, Order)>,
}

impl ResolvedFilter {
    fn by_slug(condition: Condition) -> Self {
        Self {
            condition,
            order: vec![(user::Column::Slug, Order::Asc)],
        }
    }
}

pub async fn resolve_user<C: ConnectionTrait>(db: &C, slug: &str) -> Result<user::Model, AppError> {
    let slug = slugify(slug);
    if slug.is_empty() {
        return Err(AppError::not_found("user"));
    }
    user::Entity::find()
        .filter(user::Column::Slug.eq(slug))
        .one(db)
        .await?
        .ok_or_else(|| AppError::not_found("user"))
}

/// Resolves a browsable rank. Ranks that are not tabs are reported as missing.
pub async fn resolve_rank<C: ConnectionTrait>(db: &C, slug: &str) -> Result<rank::Model, AppError> {
    let slug = slugify(slug);
    if slug.is_empty() {
        return Err(AppError::not_found("rank"));
    }
    rank::Entity::find()
        .filter(rank::Column::Slug.eq(slug))
        .one(db)
        .await?
        .filter(|r| r.is_tab)
        .ok_or_else(|| AppError::not_found("rank"))
}

pub async fn resolve<C: ConnectionTrait>(db: &C, filter: &UserFilter) -> Result<ResolvedFilter, AppError> {
    debug!("resolving user filter {:?}", filter);
    let resolved = match filter {
        UserFilter::All => ResolvedFilter::by_slug(Condition::all()),
        UserFilter::Active => ResolvedFilter {
            condition: Condition::all().add(user::Column::Posts.gt(0)),
            order: vec![
                (user::Column::LastPostedOn, Order::Desc),
                (user::Column::Posts, Order::Desc),
                (user::Column::Id, Order::Asc),
            ],
        },
        UserFilter::Followers(slug) => {
            let target = resolve_user(db, slug).await?;
            let ids: Vec<i32> = user_follow::Entity::find()
                .select_only()
                .column(user_follow::Column::FollowerId)
                .filter(user_follow::Column::FollowedId.eq(target.id))
                .into_tuple()
                .all(db)
                .await?;
            ResolvedFilter::by_slug(Condition::all().add(user::Column::Id.is_in(ids)))
        }
        UserFilter::Follows(slug) => {
            let source = resolve_user(db, slug).await?;
            let ids: Vec<i32> = user_follow::Entity::find()
                .select_only()
                .column(user_follow::Column::FollowedId)
                .filter(user_follow::Column::FollowerId.eq(source.id))
                .into_tuple()
                .all(db)
                .await?;
            ResolvedFilter::by_slug(Condition::all().add(user::Column::Id.is_in(ids)))
        }
        UserFilter::Rank(slug) => {
            let rank = resolve_rank(db, slug).await?;
            ResolvedFilter::by_slug(Condition::all().add(user::Column::RankId.eq(rank.id)))
        }
        UserFilter::Name(needle) => {
            // sqlite's lower() only folds ASCII, so the needle must match it.
            let needle = needle.trim().to_ascii_lowercase();
            let condition = if needle.is_empty() {
                Condition::all()
            } else {
                let pattern = format!("%{}%", escape_like(&needle));
                Condition::all().add(
                    Expr::expr(Func::lower(Expr::col((user::Entity, user::Column::Username))))
                        .like(LikeExpr::new(pattern).escape('\\')),
                )
            };
            ResolvedFilter::by_slug(condition)
        }
        UserFilter::UnknownList(name) => {
            return Err(AppError::not_found(format!("list \"{}\"", name)));
        }
    };
    Ok(resolved)
}

/// Makes `%`, `_` and `\` match literally inside a `LIKE ... ESCAPE '\'` pattern.
fn escape_like(needle: &str) -> String {
    let mut out = String::with_capacity(needle.len());
    for c in needle.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
