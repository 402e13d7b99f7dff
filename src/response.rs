//! Standard response envelope: `{"status": true, "status_code": n, ...body}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Successful controller outcome. The status is decoded into the transport response only here.
#[derive(Debug)]
pub struct Reply<T> {
    pub status: StatusCode,
    pub body: T,
}

#[derive(Serialize)]
struct Envelope<T> {
    status: bool,
    status_code: u16,
    #[serde(flatten)]
    body: T,
}

pub fn ok<T: Serialize>(body: T) -> Reply<T> {
    Reply {
        status: StatusCode::OK,
        body,
    }
}

pub fn created<T: Serialize>(body: T) -> Reply<T> {
    Reply {
        status: StatusCode::CREATED,
        body,
    }
}

impl<T: Serialize> IntoResponse for Reply<T> {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(Envelope {
                status: true,
                status_code: self.status.as_u16(),
                body: self.body,
            }),
        )
            .into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct MessageBody {
    pub message: &'static str,
}
