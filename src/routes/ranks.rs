use actix_web::{web, HttpResponse};
use sea_orm::DatabaseConnection;

use crate::error::AppError;
use crate::listing;
use crate::response::ResponseDto;

use super::users::{to_rank_dto, RankDto};

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("").route(web::get().to(list)))
        .service(web::resource("/").route(web::get().to(list)));
}

async fn list(db: web::Data<DatabaseConnection>) -> Result<HttpResponse, AppError> {
    let ranks = listing::tab_ranks(db.get_ref()).await?;
    let list: Vec<RankDto> = ranks.into_iter().map(to_rank_dto).collect();
    Ok(HttpResponse::Ok().json(ResponseDto::success(Some(list))))
}
