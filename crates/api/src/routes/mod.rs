//! API route definitions.

use axum::{Router, middleware};

use crate::{AppState, middleware::auth_middleware};

pub mod auth;
pub mod budgets;
pub mod calculators;
pub mod expenses;
pub mod health;

/// Creates the API router; protected routes get the auth middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    let protected_routes = Router::new()
        .merge(auth::protected_routes())
        .merge(expenses::routes())
        .merge(budgets::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(calculators::routes())
        .merge(protected_routes)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Request, StatusCode, header::AUTHORIZATION},
    };
    use fintrack_shared::config::CorsConfig;
    use fintrack_shared::{JwtConfig, JwtService};
    use http_body_util::BodyExt;
    use sea_orm::DatabaseConnection;
    use serde_json::Value;
    use tower::ServiceExt;
    use uuid::Uuid;

    use crate::{AppState, create_router};

    fn test_state() -> AppState {
        AppState {
            db: Arc::new(DatabaseConnection::Disconnected),
            jwt_service: Arc::new(JwtService::new(JwtConfig {
                secret: "route-test-secret".to_string(),
                token_expires_secs: 3600,
            })),
        }
    }

    fn app(state: AppState) -> axum::Router {
        create_router(state, &CorsConfig::default())
    }

    async fn send(app: axum::Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn get_with_token(uri: &str, token: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(app(test_state()), get("/api/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn test_protected_route_without_token() {
        let (status, body) = send(app(test_state()), get("/api/budgets")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "missing_token");
    }

    #[tokio::test]
    async fn test_protected_route_with_garbage_token() {
        let (status, body) = send(
            app(test_state()),
            get_with_token("/api/expenses", "not-a-jwt"),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "invalid_token");
    }

    #[tokio::test]
    async fn test_token_from_other_secret_rejected() {
        let other = JwtService::new(JwtConfig {
            secret: "some-other-secret".to_string(),
            token_expires_secs: 3600,
        });
        let token = other.generate_token(Uuid::new_v4()).unwrap();

        let (status, _) = send(app(test_state()), get_with_token("/api/auth/me", &token)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_categories_with_valid_token() {
        let state = test_state();
        let token = state.jwt_service.generate_token(Uuid::new_v4()).unwrap();

        let (status, body) = send(
            app(state),
            get_with_token("/api/expenses/categories/list", &token),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"].as_array().map(Vec::len), Some(13));
        assert_eq!(body["data"][0], "Food & Dining");
    }

    #[tokio::test]
    async fn test_malformed_id_is_bad_request() {
        let state = test_state();
        let token = state.jwt_service.generate_token(Uuid::new_v4()).unwrap();

        let (status, _) = send(
            app(state),
            get_with_token("/api/budgets/not-a-uuid", &token),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
