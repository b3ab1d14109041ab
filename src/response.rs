use actix_web::{
    error::{JsonPayloadError, QueryPayloadError},
    HttpRequest, HttpResponse,
};
use serde::Serialize;

use crate::error::AppError;

#[derive(Serialize)]
pub struct ResponseDto<T: Serialize> {
    pub data: Option<T>,
    pub code: i32,
    pub msg: String,
}

impl<T: Serialize> ResponseDto<T> {
    pub fn success(data: Option<T>) -> Self {
        Self {
            data,
            code: 0,
            msg: "".to_string(),
        }
    }
}

pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    log::debug!("rejected json payload: {}", err);
    AppError::param_error("invalid request body").into()
}

pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    log::debug!("rejected query string: {}", err);
    AppError::param_error("invalid query string").into()
}

pub fn response_from_error(err: &AppError) -> HttpResponse {
    use actix_web::ResponseError;

    let mut builder = HttpResponse::build(err.status_code());
    match err {
        AppError::Validation(fields) => builder.json(ResponseDto {
            data: Some(fields),
            code: err.code(),
            msg: err.msg(),
        }),
        _ => builder.json(ResponseDto::<()> {
            data: None,
            code: err.code(),
            msg: err.msg(),
        }),
    }
}
