pub mod auth;
pub mod cors;
pub mod ranks;
pub mod users;

use actix_web::web;
use chrono::SecondsFormat;

use crate::response::{json_error_handler, query_error_handler};

/// Mounts the whole `/api` tree. Callers provide the database connection and
/// `AppConfig` as app data.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .service(
            web::scope("/api")
                .service(web::scope("/auth").configure(auth::config))
                .service(web::scope("/users").configure(users::config))
                .service(web::scope("/ranks").configure(ranks::config)),
        );
}

pub(crate) fn to_rfc3339(dt: chrono::DateTime<chrono::Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, false)
}
