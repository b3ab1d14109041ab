use std::env;

use chrono::Duration;

#[derive(Clone)]
pub struct AppConfig {
    pub server_port: u16,
    pub sqlite_path: String,
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub token_header: String,
    pub cors_origin: String,
    pub users_per_page: u64,
    pub online_window_minutes: i64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_port: 38321,
            sqlite_path: "./data/forum.sqlite".to_string(),
            database_url: None,
            jwt_secret: "kq2Vn8TzR4xWbM7pLs0E".to_string(),
            token_header: "token".to_string(),
            cors_origin: "*".to_string(),
            users_per_page: 18,
            online_window_minutes: 15,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let server_port = env::var("SERVER_PORT")
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(defaults.server_port);

        let sqlite_path = env::var("SQLITE_PATH").unwrap_or(defaults.sqlite_path);
        let database_url = env::var("DATABASE_URL").ok();

        let jwt_secret = env::var("JWT_SECRET").unwrap_or(defaults.jwt_secret);
        let token_header = env::var("TOKEN_HEADER").unwrap_or(defaults.token_header);
        let cors_origin = env::var("CORS_ORIGIN").unwrap_or(defaults.cors_origin);

        let users_per_page = env::var("USERS_PER_PAGE")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|v| *v > 0)
            .unwrap_or(defaults.users_per_page);

        let online_window_minutes = env::var("ONLINE_WINDOW_MINUTES")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .filter(|v| *v > 0)
            .unwrap_or(defaults.online_window_minutes);

        Self {
            server_port,
            sqlite_path,
            database_url,
            jwt_secret,
            token_header,
            cors_origin,
            users_per_page,
            online_window_minutes,
        }
    }

    pub fn database_url(&self) -> String {
        if let Some(url) = &self.database_url {
            return url.clone();
        }

        let path = self.sqlite_path.trim();
        if path.starts_with("sqlite:") || path.starts_with("file:") {
            return path.to_string();
        }
        format!("sqlite://{}?mode=rwc", path)
    }

    /// How long after the last authenticated request a user still counts as online.
    pub fn online_window(&self) -> Duration {
        Duration::minutes(self.online_window_minutes)
    }
}
