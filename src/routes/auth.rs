use actix_web::{web, HttpResponse};
use bcrypt::verify;
use chrono::Utc;
use log::info;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};

use crate::auth::{generate_token, AuthUser};
use crate::config::AppConfig;
use crate::entity::user;
use crate::error::AppError;
use crate::presence;
use crate::response::ResponseDto;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/login").route(web::post().to(login)))
        .service(web::resource("/logout").route(web::post().to(logout)));
}

#[derive(Deserialize)]
struct LoginRequest {
    username: Option<String>,
    password: Option<String>,
}

#[derive(Serialize)]
struct LoginResponse {
    token: String,
    user_id: i32,
    username: String,
    slug: String,
    role: Option<String>,
}

async fn login(
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
    payload: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let username = payload.username.clone().unwrap_or_default();
    let password = payload.password.clone().unwrap_or_default();
    if username.trim().is_empty() {
        return Err(AppError::param_error("username cannot be null"));
    }
    if password.trim().is_empty() {
        return Err(AppError::param_error("password cannot be null"));
    }

    let user = user::Entity::find()
        .filter(user::Column::Username.eq(username.trim()))
        .one(db.get_ref())
        .await?
        .ok_or_else(|| AppError::fail("wrong username or password"))?;

    let ok = verify(password, &user.password_hash).map_err(|_| AppError::system_exception())?;
    if !ok {
        return Err(AppError::fail("wrong username or password"));
    }

    let token = generate_token(&config, user.id)?;
    presence::touch(db.get_ref(), user.id, Utc::now()).await?;
    info!("user {} signed in", user.id);

    let response = LoginResponse {
        token,
        user_id: user.id,
        username: user.username,
        slug: user.slug,
        role: user.role,
    };
    Ok(HttpResponse::Ok().json(ResponseDto::success(Some(response))))
}

async fn logout(
    db: web::Data<DatabaseConnection>,
    auth: AuthUser,
) -> Result<HttpResponse, AppError> {
    presence::clear(db.get_ref(), auth.user_id).await?;
    info!("user {} signed out", auth.user_id);
    Ok(HttpResponse::Ok().json(ResponseDto::<()>::success(None)))
}
