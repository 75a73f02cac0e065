//! Extractor wrappers whose rejections render as the crate's `{ "error" }` body.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::Error;

/// JSON request body. Malformed or mistyped bodies are a 400.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(Error))]
pub struct ApiJson<T>(pub T);

/// Query string parsed with `axum_extra`'s query extractor, which understands
/// repeated keys such as `locationType[]=REMOTE&locationType[]=HYBRID`.
#[derive(FromRequestParts)]
#[from_request(via(axum_extra::extract::Query), rejection(Error))]
pub struct ApiQuery<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(Error))]
pub struct ApiPath<T>(pub T);
