use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};

use crate::error::AppError;

/// Extracts the authenticated user's ID from request extensions.
///
/// This extractor is intended for routes protected by `AuthMiddleware`,
/// which validates the session token and inserts the verified user's ID into
/// request extensions.
///
/// If the user ID is not found in the extensions (e.g., the middleware did
/// not run), this extractor returns `AppError::Unauthorized`.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUserId(pub i32);

impl FromRequest for AuthenticatedUserId {
    type Error = ActixError; // AppError converts into ActixError via ResponseError
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<i32>().copied() {
            Some(user_id) => ready(Ok(AuthenticatedUserId(user_id))),
            None => {
                // Unreachable when AuthMiddleware is correctly applied;
                // Unauthorized is the safe answer if it somehow isn't.
                let err = AppError::Unauthorized("Authentication required".to_string());
                ready(Err(err.into()))
            }
        }
    }
}
