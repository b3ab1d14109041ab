use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "t_user")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub username: String,
    pub slug: String,
    pub email: Option<String>,
    pub password_hash: String,
    pub role: Option<String>,
    pub rank_id: Option<i32>,
    pub title: Option<String>,
    pub posts: i32,
    pub threads: i32,
    pub last_posted_on: Option<DateTimeUtc>,
    pub joined_on: Option<DateTimeUtc>,
    pub is_hiding_presence: bool,
    pub limits_private_thread_invites_to: i32,
    pub subscribe_to_started_threads: i32,
    pub subscribe_to_replied_threads: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
