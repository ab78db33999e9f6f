//! Uniform response envelope
//!
//! Every `/books` response, success or failure, is wrapped as
//! `{ "status": "success" | "fail" | "error", "message"?, "data"? }`.
//! Success envelopes (200/201) carry `message` only when it is non-empty and
//! `data` only when a payload was supplied. Failure envelopes always carry
//! `message` and never carry `data`; their status is `error` for 500 and
//! `fail` otherwise.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::book::{BookCreated, BookDetail, BookList};

/// Envelope status tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum EnvelopeStatus {
    Success,
    Fail,
    Error,
}

impl EnvelopeStatus {
    fn for_code(code: StatusCode) -> Self {
        match code {
            StatusCode::OK | StatusCode::CREATED => EnvelopeStatus::Success,
            StatusCode::INTERNAL_SERVER_ERROR => EnvelopeStatus::Error,
            _ => EnvelopeStatus::Fail,
        }
    }
}

/// Placeholder payload for envelopes that never carry data
#[derive(Debug, Serialize, ToSchema)]
pub struct NoData {}

/// Wire envelope
#[derive(Debug, Serialize, ToSchema)]
#[aliases(
    BookCreatedEnvelope = Envelope<BookCreated>,
    BookListEnvelope = Envelope<BookList>,
    BookDetailEnvelope = Envelope<BookDetail>,
    MessageEnvelope = Envelope<NoData>
)]
pub struct Envelope<T>
where
    T: for<'a> ToSchema<'a>,
{
    pub status: EnvelopeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> Envelope<T>
where
    T: for<'a> ToSchema<'a>,
{
    /// Shape `(code, message, data)` into an envelope following the key-omission rules.
    pub fn build(code: StatusCode, message: Option<String>, data: Option<T>) -> Self {
        let status = EnvelopeStatus::for_code(code);
        if status == EnvelopeStatus::Success {
            Self {
                status,
                message: message.filter(|m| !m.is_empty()),
                data,
            }
        } else {
            // Failure envelopes always name the problem, even when it is empty
            Self {
                status,
                message: Some(message.unwrap_or_default()),
                data: None,
            }
        }
    }
}

/// An envelope paired with the status code the transport emits
#[derive(Debug)]
pub struct ApiResponse<T>
where
    T: for<'a> ToSchema<'a>,
{
    pub code: StatusCode,
    pub envelope: Envelope<T>,
}

impl<T> ApiResponse<T>
where
    T: for<'a> ToSchema<'a>,
{
    pub fn build(code: StatusCode, message: Option<String>, data: Option<T>) -> Self {
        Self {
            code,
            envelope: Envelope::build(code, message, data),
        }
    }

    /// 200 with data and no message
    pub fn ok(data: T) -> Self {
        Self::build(StatusCode::OK, None, Some(data))
    }

    /// 201 with a message and data
    pub fn created(message: impl Into<String>, data: T) -> Self {
        Self::build(StatusCode::CREATED, Some(message.into()), Some(data))
    }
}

impl ApiResponse<NoData> {
    /// 200 with a message and no data
    pub fn message(message: impl Into<String>) -> Self {
        Self::build(StatusCode::OK, Some(message.into()), None)
    }

    /// Failure envelope for a non-success status code
    pub fn failure(code: StatusCode, message: impl Into<String>) -> Self {
        Self::build(code, Some(message.into()), None)
    }
}

impl<T> IntoResponse for ApiResponse<T>
where
    T: Serialize + for<'a> ToSchema<'a>,
{
    fn into_response(self) -> Response {
        (self.code, Json(self.envelope)).into_response()
    }
}
