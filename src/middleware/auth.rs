use axum::{
    extract::{Query, Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::models::user::User;
use crate::AppState;

pub const API_KEY_HEADER: &str = "X-API-Key";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

/// Signed-in user resolved from the bearer token.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

#[derive(Debug, Default, Deserialize)]
pub struct ApiKeyQuery {
    pub api_key: Option<String>,
}

fn bearer_token(headers: &HeaderMap) -> Result<&str, Error> {
    let Some(auth_header) = headers.get(AUTHORIZATION) else {
        return Err(Error::Unauthorized("missing_authorization".into()));
    };
    let Ok(auth_str) = auth_header.to_str() else {
        return Err(Error::Unauthorized("bad_authorization".into()));
    };
    auth_str
        .strip_prefix("Bearer ")
        .ok_or_else(|| Error::Unauthorized("unsupported_scheme".into()))
}

/// Decodes an HS256 token and returns the numeric user id from `sub`.
pub fn decode_user_id(token: &str, secret: &str) -> Result<i64, Error> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|_| Error::Unauthorized("invalid_token".into()))?;
    data.claims
        .sub
        .parse()
        .map_err(|_| Error::Unauthorized("invalid_token".into()))
}

pub async fn require_bearer_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let user_id = match bearer_token(req.headers())
        .and_then(|token| decode_user_id(token, &state.config.jwt_secret))
    {
        Ok(id) => id,
        Err(e) => return e.into_response(),
    };

    match state.user_service.find_active(user_id).await {
        Ok(Some(user)) => {
            req.extensions_mut().insert(CurrentUser(user));
            next.run(req).await
        }
        Ok(None) => Error::Unauthorized("unknown_user".into()).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Gates the read API. The key comes from `X-API-Key` or the `api_key`
/// query parameter; the matching record is put into request extensions.
pub async fn require_api_key(
    State(state): State<AppState>,
    Query(query): Query<ApiKeyQuery>,
    mut req: Request,
    next: Next,
) -> Response {
    let raw = req
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
        .or(query.api_key)
        .filter(|k| !k.trim().is_empty());

    let Some(raw) = raw else {
        return Error::Unauthorized("No API key provided".into()).into_response();
    };

    match state.api_key_service.authenticate(raw.trim()).await {
        Ok(Some(api_key)) => {
            req.extensions_mut().insert(api_key);
            next.run(req).await
        }
        Ok(None) => Error::Unauthorized("Invalid API key".into()).into_response(),
        Err(e) => e.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn token(sub: &str, secret: &str) -> String {
        let claims = Claims {
            sub: sub.to_string(),
            exp: (chrono::Utc::now().timestamp() + 3600) as usize,
        };
        encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes())).unwrap()
    }

    #[test]
    fn decodes_numeric_subject() {
        assert_eq!(decode_user_id(&token("42", "k"), "k").unwrap(), 42);
    }

    #[test]
    fn rejects_wrong_secret_and_non_numeric_subject() {
        assert!(decode_user_id(&token("42", "k"), "other").is_err());
        assert!(decode_user_id(&token("alice", "k"), "k").is_err());
    }

    #[test]
    fn bearer_scheme_is_required() {
        let mut headers = HeaderMap::new();
        assert!(bearer_token(&headers).is_err());
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert!(bearer_token(&headers).is_err());
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        assert_eq!(bearer_token(&headers).unwrap(), "abc");
    }
}
