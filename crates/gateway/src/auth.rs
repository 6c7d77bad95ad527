//! Bearer-token verification at the edge
//!
//! The gateway is the only component that sees tokens. A verified token's
//! claims are collapsed into a [`Principal`] and inserted as a request
//! extension; downstream services only ever see the identity headers.

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;

use th_core::principal::{Principal, Role};

use crate::routes::{failure, RouteError};
use crate::state::AppState;

/// Token claims in the shape the identity provider issues them.
#[derive(Debug, Deserialize)]
pub struct TokenClaims {
    pub sub: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub realm_access: Option<RealmAccess>,
    pub exp: usize,
}

#[derive(Debug, Deserialize)]
pub struct RealmAccess {
    #[serde(default)]
    pub roles: Vec<String>,
}

impl TokenClaims {
    /// Collapse the claim role list to a single role: any `admin` entry wins,
    /// everything else is plain `user`. Unknown role names carry no
    /// privilege.
    pub fn into_principal(self) -> Principal {
        let role = if self
            .realm_access
            .map(|access| access.roles.iter().any(|role| role == "admin"))
            .unwrap_or(false)
        {
            Role::Admin
        } else {
            Role::User
        };

        Principal {
            id: self.sub,
            email: self.email,
            roles: vec![role],
        }
    }
}

pub fn verify_token(
    secret: &str,
    token: &str,
) -> Result<Principal, jsonwebtoken::errors::Error> {
    let data = decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )?;
    Ok(data.claims.into_principal())
}

/// Middleware for every protected route. Missing or invalid tokens are the
/// only 401s the gateway itself produces.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, RouteError> {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| failure(StatusCode::UNAUTHORIZED, "Unauthorized - No token provided"))?;

    let principal = verify_token(&state.config().jwt_secret, token).map_err(|err| {
        tracing::debug!("Rejected bearer token: {}", err);
        failure(StatusCode::UNAUTHORIZED, "Unauthorized - Invalid token")
    })?;

    request.extensions_mut().insert(principal);
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        middleware,
        routing::get,
        Extension, Router,
    };
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;
    use tower::ServiceExt;

    use th_core::principal::{Principal, Role};

    use super::verify_token;
    use crate::state::{AppState, GatewayConfig};

    const SECRET: &str = "test-secret";

    fn make_token(secret: &str, roles: &[&str], exp_offset_secs: i64) -> String {
        let exp = (chrono::Utc::now().timestamp() + exp_offset_secs) as usize;
        let claims = json!({
            "sub": "sub-1",
            "email": "sub-1@x.com",
            "realm_access": { "roles": roles },
            "exp": exp,
        });
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn test_state() -> AppState {
        AppState::new(GatewayConfig {
            users_service_url: "http://localhost:1".to_string(),
            tasks_service_url: "http://localhost:1".to_string(),
            projects_service_url: "http://localhost:1".to_string(),
            jwt_secret: SECRET.to_string(),
        })
        .unwrap()
    }

    fn protected_app() -> Router {
        async fn whoami(Extension(principal): Extension<Principal>) -> String {
            format!("{}:{}", principal.id, principal.roles_header_value())
        }

        let state = test_state();
        Router::new()
            .route("/whoami", get(whoami))
            .layer(middleware::from_fn_with_state(
                state.clone(),
                super::require_auth,
            ))
            .with_state(state)
    }

    #[test]
    fn admin_claim_collapses_to_admin_role() {
        let token = make_token(SECRET, &["offline_access", "admin", "user"], 3600);
        let principal = verify_token(SECRET, &token).unwrap();
        assert_eq!(principal.roles, vec![Role::Admin]);
    }

    #[test]
    fn non_admin_claims_collapse_to_user_role() {
        let token = make_token(SECRET, &["offline_access", "superuser"], 3600);
        let principal = verify_token(SECRET, &token).unwrap();
        assert_eq!(principal.roles, vec![Role::User]);
        assert!(!principal.is_admin());
    }

    #[test]
    fn expired_token_is_rejected() {
        let token = make_token(SECRET, &["user"], -3600);
        assert!(verify_token(SECRET, &token).is_err());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = make_token("other-secret", &["user"], 3600);
        assert!(verify_token(SECRET, &token).is_err());
    }

    #[tokio::test]
    async fn missing_token_is_unauthorized() {
        let response = protected_app()
            .oneshot(
                Request::builder()
                    .uri("/whoami")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn garbage_token_is_unauthorized() {
        let response = protected_app()
            .oneshot(
                Request::builder()
                    .uri("/whoami")
                    .header("authorization", "Bearer not-a-token")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn valid_token_reaches_the_handler() {
        let token = make_token(SECRET, &["admin"], 3600);
        let response = protected_app()
            .oneshot(
                Request::builder()
                    .uri("/whoami")
                    .header("authorization", format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"sub-1:admin");
    }
}
