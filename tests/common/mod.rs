#![allow(dead_code)]

use chrono::Utc;
use forum_backend_rs::config::AppConfig;
use forum_backend_rs::db;
use forum_backend_rs::entity::{rank, user, user_follow};
use forum_backend_rs::slug::slugify;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

pub const PASSWORD: &str = "Pass.123";

/// Builds the service the same way `main` does, on top of `$db` and `$config`.
macro_rules! test_app {
    ($db:expr, $config:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new($db.clone()))
                .app_data(actix_web::web::Data::new($config.clone()))
                .wrap(actix_web::middleware::from_fn(
                    forum_backend_rs::routes::cors::cors_handler,
                ))
                .configure(forum_backend_rs::routes::configure),
        )
        .await
    };
}

/// Sends `$req` (a `TestRequest`) and returns the status with the JSON body.
macro_rules! call {
    ($app:expr, $req:expr) => {{
        let resp = actix_web::test::call_service(&$app, $req.to_request()).await;
        let status = resp.status();
        let body: serde_json::Value = actix_web::test::read_body_json(resp).await;
        (status, body)
    }};
}

pub(crate) use call;
pub(crate) use test_app;

/// Fresh in-memory store per test.
pub async fn setup() -> (DatabaseConnection, AppConfig) {
    let conn = db::connect_url("sqlite::memory:").await.unwrap();
    (conn, AppConfig::default())
}

pub async fn rank_by_slug(conn: &DatabaseConnection, slug: &str) -> rank::Model {
    rank::Entity::find()
        .filter(rank::Column::Slug.eq(slug))
        .one(conn)
        .await
        .unwrap()
        .unwrap()
}

pub async fn create_rank(conn: &DatabaseConnection, name: &str, is_tab: bool) -> rank::Model {
    rank::ActiveModel {
        name: Set(name.to_string()),
        slug: Set(slugify(name)),
        is_default: Set(false),
        is_tab: Set(is_tab),
        sort_order: Set(10),
        ..Default::default()
    }
    .insert(conn)
    .await
    .unwrap()
}

pub async fn create_user(conn: &DatabaseConnection, username: &str) -> user::Model {
    let members = rank_by_slug(conn, "members").await;
    user::ActiveModel {
        username: Set(username.to_string()),
        slug: Set(slugify(username)),
        email: Set(Some(format!("{}@example.com", slugify(username)))),
        password_hash: Set(bcrypt::hash(PASSWORD, 4).unwrap()),
        role: Set(None),
        rank_id: Set(Some(members.id)),
        title: Set(None),
        posts: Set(0),
        threads: Set(0),
        last_posted_on: Set(None),
        joined_on: Set(Some(Utc::now())),
        is_hiding_presence: Set(false),
        limits_private_thread_invites_to: Set(0),
        subscribe_to_started_threads: Set(0),
        subscribe_to_replied_threads: Set(0),
        ..Default::default()
    }
    .insert(conn)
    .await
    .unwrap()
}

pub async fn update_user(
    conn: &DatabaseConnection,
    model: user::Model,
    change: impl FnOnce(&mut user::ActiveModel),
) -> user::Model {
    let mut active: user::ActiveModel = model.into();
    change(&mut active);
    active.update(conn).await.unwrap()
}

pub async fn reload_user(conn: &DatabaseConnection, id: i32) -> user::Model {
    user::Entity::find_by_id(id).one(conn).await.unwrap().unwrap()
}

pub async fn follow(conn: &DatabaseConnection, follower: &user::Model, followed: &user::Model) {
    user_follow::ActiveModel {
        follower_id: Set(follower.id),
        followed_id: Set(followed.id),
        ..Default::default()
    }
    .insert(conn)
    .await
    .unwrap();
}

pub fn token_for(config: &AppConfig, model: &user::Model) -> String {
    forum_backend_rs::auth::generate_token(config, model.id).unwrap()
}

/// Usernames of a users listing response, in order.
pub fn usernames(body: &serde_json::Value) -> Vec<String> {
    body["data"]["items"]
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|i| i["username"].as_str().map(|s| s.to_string()))
                .collect()
        })
        .unwrap_or_default()
}
