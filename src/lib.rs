//! Forum user listings and per-user forum options over a JSON HTTP API.

pub mod auth;
pub mod config;
pub mod db;
pub mod entity;
pub mod error;
pub mod forum_options;
pub mod listing;
pub mod presence;
pub mod response;
pub mod routes;
pub mod slug;
