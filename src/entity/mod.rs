pub mod online;
pub mod rank;
pub mod user;
pub mod user_follow;
