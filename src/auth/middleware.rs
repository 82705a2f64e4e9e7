use std::rc::Rc;

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    web, Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use sqlx::PgPool;

use crate::auth::token::{verify_token, SESSION_COOKIE};
use crate::error::AppError;

/// Session verification middleware.
///
/// Every request under the guarded scope must carry a session token, either
/// in the `token` cookie or in an `Authorization: Bearer` header (cookie
/// checked first). The token's signature and expiry are validated, the
/// encoded subject is resolved against the `users` table, and the verified
/// user id is inserted into request extensions for handlers to pick up via
/// the `AuthenticatedUserId` extractor.
///
/// A token whose subject no longer exists is rejected exactly like a token
/// with a bad signature, so deleted accounts are not distinguishable from
/// forgeries.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    // Rc so the service can be handed to the boxed future after the
    // asynchronous subject lookup completes.
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // Signup, login, and logout are the public surface; everything else
        // in the scope requires a verified identity.
        if req.path().starts_with("/api/auth/") {
            let fut = self.service.call(req);
            return Box::pin(fut);
        }

        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let token = extract_token(&req)
                .ok_or_else(|| AppError::Unauthorized("Missing token".into()))?;

            let claims = verify_token(&token)?;

            let pool = req
                .app_data::<web::Data<PgPool>>()
                .cloned()
                .ok_or_else(|| {
                    AppError::InternalServerError("Database pool not configured".into())
                })?;

            // The token only proves the subject existed at issuance; confirm
            // the account is still present before trusting it.
            let user_row = sqlx::query_as::<_, (i32,)>("SELECT id FROM users WHERE id = $1")
                .bind(claims.sub)
                .fetch_optional(pool.get_ref())
                .await
                .map_err(AppError::from)?;

            match user_row {
                Some((user_id,)) => {
                    req.extensions_mut().insert(user_id);
                    service.call(req).await
                }
                None => Err(AppError::Unauthorized("Invalid token".into()).into()),
            }
        })
    }
}

/// Pulls the session token out of a request: cookie first, then the
/// `Authorization: Bearer` header.
fn extract_token(req: &ServiceRequest) -> Option<String> {
    if let Some(cookie) = req.cookie(SESSION_COOKIE) {
        return Some(cookie.value().to_string());
    }

    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test;

    #[actix_rt::test]
    async fn test_extract_token_prefers_cookie() {
        let req = test::TestRequest::default()
            .cookie(actix_web::cookie::Cookie::new(SESSION_COOKIE, "from-cookie"))
            .insert_header((header::AUTHORIZATION, "Bearer from-header"))
            .to_srv_request();

        assert_eq!(extract_token(&req).as_deref(), Some("from-cookie"));
    }

    #[actix_rt::test]
    async fn test_extract_token_falls_back_to_bearer() {
        let req = test::TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Bearer from-header"))
            .to_srv_request();

        assert_eq!(extract_token(&req).as_deref(), Some("from-header"));
    }

    #[actix_rt::test]
    async fn test_extract_token_ignores_non_bearer_schemes() {
        let req = test::TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Basic dXNlcjpwYXNz"))
            .to_srv_request();

        assert_eq!(extract_token(&req), None);
    }

    #[actix_rt::test]
    async fn test_extract_token_absent() {
        let req = test::TestRequest::default().to_srv_request();
        assert_eq!(extract_token(&req), None);
    }
}
