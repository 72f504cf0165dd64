use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::AppState;
use crate::auth::verify_token;
use crate::error::AppError;

/// Verified identity attached to the request once the bearer token checks
/// out. Handlers behind the auth layer can rely on it being present.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: i64,
    pub email: String,
}

pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok());

    let token = match auth_header.and_then(|h| h.strip_prefix("Bearer ")) {
        Some(token) if !token.is_empty() => token,
        _ => return Err(AppError::Unauthorized("Access token required".to_string())),
    };

    let claims = verify_token(token, &state.config.jwt_secret)?;

    req.extensions_mut().insert(AuthUser {
        id: claims.sub,
        email: claims.email,
    });

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{Request, StatusCode};
    use axum::{Extension, Router, body::Body, middleware::from_fn_with_state, routing::get};
    use sqlx::sqlite::SqlitePoolOptions;
    use tower::ServiceExt;

    use crate::auth::issue_token;
    use crate::config::Config;

    async fn test_state() -> AppState {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("connect in-memory sqlite");

        AppState {
            db: pool,
            config: Config {
                server_port: 0,
                database_url: "sqlite::memory:".to_string(),
                jwt_secret: "middleware-test-secret".to_string(),
            },
        }
    }

    fn test_app(state: AppState) -> Router {
        Router::new()
            .route(
                "/whoami",
                get(|Extension(user): Extension<AuthUser>| async move { user.id.to_string() }),
            )
            .route_layer(from_fn_with_state(state.clone(), require_auth))
            .with_state(state)
    }

    async fn request_with_header(app: Router, header: Option<&str>) -> StatusCode {
        let mut builder = Request::builder().method("GET").uri("/whoami");
        if let Some(value) = header {
            builder = builder.header("Authorization", value);
        }

        let response = app
            .oneshot(builder.body(Body::empty()).expect("request"))
            .await
            .expect("response");
        response.status()
    }

    #[tokio::test]
    async fn missing_header_is_unauthorized() {
        let state = test_state().await;
        let status = request_with_header(test_app(state), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn empty_bearer_is_unauthorized() {
        let state = test_state().await;
        let status = request_with_header(test_app(state), Some("Bearer ")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn malformed_token_is_unauthorized() {
        let state = test_state().await;
        let status = request_with_header(test_app(state), Some("Bearer not-a-jwt")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn valid_token_passes_and_exposes_user() {
        let state = test_state().await;
        let token = issue_token(42, "buyer@shop.example", &state.config.jwt_secret)
            .expect("issue token");

        let app = test_app(state);
        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/whoami")
                    .header("Authorization", format!("Bearer {token}"))
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        assert_eq!(&bytes[..], b"42");
    }
}
