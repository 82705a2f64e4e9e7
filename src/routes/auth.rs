use crate::{
    auth::{
        generate_token, hash_password, verify_password, AuthResponse, LoginRequest, SignupRequest,
        SignupResponse, SESSION_COOKIE,
    },
    config::Config,
    error::AppError,
    models::user::USER_COLUMNS,
    models::User,
};
use actix_web::{
    cookie::{time::Duration as CookieDuration, Cookie, SameSite},
    post, web, HttpResponse, Responder,
};
use serde_json::json;
use sqlx::{FromRow, PgPool};
use validator::Validate;

/// Credential row used only while checking a login attempt; never serialized.
#[derive(FromRow)]
struct CredentialRow {
    id: i32,
    password_hash: String,
}

/// Builds the session cookie carrying `token`.
///
/// HTTP-only and same-site-strict always; `Secure` only when the deployment
/// says it is served over TLS, so local development over plain HTTP works.
fn session_cookie(token: &str, config: &Config) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, token.to_owned())
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(config.cookie_secure)
        .max_age(CookieDuration::days(crate::auth::token::SESSION_TTL_DAYS))
        .finish()
}

/// Register a new account.
///
/// Creates the user with a bcrypt-hashed password and returns the created
/// user. No session is issued here; the client logs in afterwards.
#[post("/signup")]
pub async fn signup(
    pool: web::Data<PgPool>,
    signup_data: web::Json<SignupRequest>,
) -> Result<impl Responder, AppError> {
    // Validate input
    signup_data.validate()?;

    // Check if email already exists
    let existing_user = sqlx::query("SELECT id FROM users WHERE email = $1")
        .bind(&signup_data.email)
        .fetch_optional(&**pool)
        .await?;

    if existing_user.is_some() {
        return Err(AppError::BadRequest("Email already registered".into()));
    }

    // Hash password; the plaintext goes no further than this handler
    let password_hash = hash_password(&signup_data.password)?;

    let user = sqlx::query_as::<_, User>(&format!(
        "INSERT INTO users (name, email, password_hash, last_login) \
         VALUES ($1, $2, $3, now()) \
         RETURNING {USER_COLUMNS}"
    ))
    .bind(&signup_data.name)
    .bind(&signup_data.email)
    .bind(&password_hash)
    .fetch_one(&**pool)
    .await?;

    Ok(HttpResponse::Created().json(SignupResponse { user }))
}

/// Log in with email and password.
///
/// On success, issues a seven-day session token, sets it as an HTTP-only
/// cookie, and also returns it in the body for bearer-header clients.
/// Unknown email and wrong password are deliberately indistinguishable.
#[post("/login")]
pub async fn login(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    // Validate input
    login_data.validate()?;

    let credentials =
        sqlx::query_as::<_, CredentialRow>("SELECT id, password_hash FROM users WHERE email = $1")
            .bind(&login_data.email)
            .fetch_optional(&**pool)
            .await?;

    let credentials = match credentials {
        Some(row) => row,
        None => return Err(AppError::BadRequest("Invalid credentials".into())),
    };

    if !verify_password(&login_data.password, &credentials.password_hash)? {
        return Err(AppError::BadRequest("Invalid credentials".into()));
    }

    // Record the login and return the fresh user state
    let user = sqlx::query_as::<_, User>(&format!(
        "UPDATE users SET last_login = now() WHERE id = $1 RETURNING {USER_COLUMNS}"
    ))
    .bind(credentials.id)
    .fetch_one(&**pool)
    .await?;

    let token = generate_token(user.id)?;
    let cookie = session_cookie(&token, &config);

    Ok(HttpResponse::Ok()
        .cookie(cookie)
        .json(AuthResponse { token, user }))
}

/// Log out: clears the session cookie. Stateless tokens cannot be revoked,
/// so this only removes the cookie copy.
#[post("/logout")]
pub async fn logout(config: web::Data<Config>) -> Result<impl Responder, AppError> {
    let mut cookie = session_cookie("", &config);
    cookie.make_removal();

    Ok(HttpResponse::Ok()
        .cookie(cookie)
        .json(json!({ "message": "Logged out" })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            database_url: "postgres://unused".into(),
            server_port: 8080,
            server_host: "127.0.0.1".into(),
            client_origin: "http://localhost:5173".into(),
            cookie_secure: false,
        }
    }

    #[test]
    fn test_session_cookie_attributes() {
        let config = test_config();
        let cookie = session_cookie("abc.def.ghi", &config);

        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.value(), "abc.def.ghi");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Strict));
        assert_eq!(cookie.path(), Some("/"));
        // Plain-HTTP config: no Secure attribute
        assert_ne!(cookie.secure(), Some(true));
    }

    #[test]
    fn test_session_cookie_secure_when_configured() {
        let config = Config {
            cookie_secure: true,
            ..test_config()
        };
        let cookie = session_cookie("abc.def.ghi", &config);
        assert_eq!(cookie.secure(), Some(true));
    }
}
