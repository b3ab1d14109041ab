use actix_web::{web, Either, HttpResponse};
use log::debug;
use sea_orm::DatabaseConnection;
use serde::Serialize;

use crate::auth::{AuthUser, OptionalAuthUser};
use crate::config::AppConfig;
use crate::entity::{rank, user};
use crate::error::AppError;
use crate::forum_options::{self, ForumOptionsRequest};
use crate::listing::{self, ListParams, ListUsersQuery, ListedUser, UserFilter};
use crate::presence::PresenceDto;
use crate::response::ResponseDto;

use super::to_rfc3339;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("").route(web::get().to(list)))
        .service(web::resource("/").route(web::get().to(list)))
        .service(web::resource("/{id:\\d+}").route(web::get().to(get)))
        .service(web::resource("/{id:\\d+}/").route(web::get().to(get)))
        .service(web::resource("/{id:\\d+}/forum-options").route(web::post().to(change_forum_options)))
        .service(web::resource("/{id:\\d+}/forum-options/").route(web::post().to(change_forum_options)));
}

#[derive(Serialize)]
struct ListUsersResponse {
    items: Vec<UserCardDto>,
    total: u64,
    page: u64,
    total_page: u64,
}

#[derive(Serialize)]
pub(crate) struct RankDto {
    pub id: i32,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub title: Option<String>,
    pub css_class: Option<String>,
}

#[derive(Serialize)]
struct UserCardDto {
    id: i32,
    username: String,
    slug: String,
    title: Option<String>,
    rank: Option<RankDto>,
    posts: i32,
    threads: i32,
    joined_on: Option<String>,
    status: PresenceDto,
}

#[derive(Serialize)]
struct ForumOptionsDto {
    id: i32,
    username: String,
    limits_private_thread_invites_to: i32,
    subscribe_to_started_threads: i32,
    subscribe_to_replied_threads: i32,
    is_hiding_presence: bool,
}

async fn list(
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
    auth: OptionalAuthUser,
    query: web::Query<ListUsersQuery>,
) -> Result<HttpResponse, AppError> {
    let filter = UserFilter::from_query(&query);
    debug!("users list filter={:?} page={:?}", filter, query.page);

    let listing = listing::list_users(
        db.get_ref(),
        &filter,
        ListParams {
            page: query.page.unwrap_or(1),
            per_page: config.users_per_page,
            viewer: auth.0.as_ref(),
            online_window: config.online_window(),
        },
    )
    .await?;

    let response = ListUsersResponse {
        items: listing.items.into_iter().map(to_card_dto).collect(),
        total: listing.total,
        page: listing.page,
        total_page: listing.total_page,
    };
    Ok(HttpResponse::Ok().json(ResponseDto::success(Some(response))))
}

async fn get(
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
    auth: OptionalAuthUser,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let card = listing::get_user(db.get_ref(), *path, auth.0.as_ref(), config.online_window()).await?;
    Ok(HttpResponse::Ok().json(ResponseDto::success(Some(to_card_dto(card)))))
}

/// Takes a JSON or urlencoded body. An absent or unparseable one is validated
/// as an empty form, so the caller learns about every missing field at once.
async fn change_forum_options(
    db: web::Data<DatabaseConnection>,
    auth: AuthUser,
    path: web::Path<i32>,
    payload: Option<Either<web::Json<ForumOptionsRequest>, web::Form<ForumOptionsRequest>>>,
) -> Result<HttpResponse, AppError> {
    let user_id = path.into_inner();
    if user_id != auth.user_id && !auth.is_admin() {
        return Err(AppError::Forbidden(
            "You can't change other users options.".to_string(),
        ));
    }

    let form = match payload {
        Some(Either::Left(json)) => json.into_inner(),
        Some(Either::Right(form)) => form.into_inner(),
        None => ForumOptionsRequest::default(),
    };
    let options = form.validate().map_err(AppError::Validation)?;
    let updated = forum_options::save(db.get_ref(), user_id, &options).await?;

    Ok(HttpResponse::Ok().json(ResponseDto::success(Some(to_forum_options_dto(updated)))))
}

fn to_card_dto(item: ListedUser) -> UserCardDto {
    let status = PresenceDto::new(item.presence, item.tracker.as_ref());
    UserCardDto {
        id: item.user.id,
        username: item.user.username,
        slug: item.user.slug,
        title: item.user.title,
        rank: item.rank.map(to_rank_dto),
        posts: item.user.posts,
        threads: item.user.threads,
        joined_on: item.user.joined_on.map(to_rfc3339),
        status,
    }
}

pub(crate) fn to_rank_dto(model: rank::Model) -> RankDto {
    RankDto {
        id: model.id,
        name: model.name,
        slug: model.slug,
        description: model.description,
        title: model.title,
        css_class: model.css_class,
    }
}

fn to_forum_options_dto(model: user::Model) -> ForumOptionsDto {
    ForumOptionsDto {
        id: model.id,
        username: model.username,
        limits_private_thread_invites_to: model.limits_private_thread_invites_to,
        subscribe_to_started_threads: model.subscribe_to_started_threads,
        subscribe_to_replied_threads: model.subscribe_to_replied_threads,
        is_hiding_presence: model.is_hiding_presence,
    }
}
