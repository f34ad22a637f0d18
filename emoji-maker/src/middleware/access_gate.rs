//! Session gate in front of every route.
//!
//! - exempt paths (sign-in, health, metrics, static files) pass straight through
//! - no valid session on `/api/...` → 401 JSON
//! - no valid session on a page → redirect to sign-in, carrying the original path
//! - valid session → the user's profile row is provisioned (best effort) and
//!   `AuthUser` is attached to the request

use axum::extract::{Request, State};
use axum::http::header::LOCATION;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

use emoji_shared::types::AuthUser;
use emoji_shared::AppError;

use crate::services::profile_service;
use crate::AppState;

pub const SIGN_IN_PATH: &str = "/sign-in";

const EXEMPT_PATHS: &[&str] = &[SIGN_IN_PATH, "/health", "/metrics"];

/// Sign-in, health and metrics, plus anything outside `/api` that looks like a static file.
pub fn is_exempt(path: &str) -> bool {
    if EXEMPT_PATHS
        .iter()
        .any(|p| path == *p || path.starts_with(&format!("{p}/")))
    {
        return true;
    }
    if path.starts_with("/static/") {
        return true;
    }
    // API routes are always gated, dotted or not.
    !is_api(path) && path.rsplit('/').next().is_some_and(|segment| segment.contains('.'))
}

pub fn is_api(path: &str) -> bool {
    path == "/api" || path.starts_with("/api/")
}

/// `{sign_in_url}?redirect_url=<return_to>`, appending to an existing query if present.
pub fn sign_in_redirect(sign_in_url: &str, return_to: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(return_to.as_bytes()).collect();
    let separator = if sign_in_url.contains('?') { '&' } else { '?' };
    format!("{sign_in_url}{separator}redirect_url={encoded}")
}

pub async fn access_gate(State(state): State<Arc<AppState>>, mut req: Request, next: Next) -> Response {
    let path = req.uri().path().to_string();
    if is_exempt(&path) {
        return next.run(req).await;
    }

    let claims = match state.sessions.verify_headers(req.headers()) {
        Ok(claims) => claims,
        Err(err) => {
            tracing::debug!(path = %path, error = %err, "request rejected by access gate");
            if is_api(&path) {
                return AppError::unauthorized("Unauthorized").into_response();
            }
            let return_to = req
                .uri()
                .path_and_query()
                .map(|pq| pq.as_str().to_string())
                .unwrap_or(path);
            let location = sign_in_redirect(&state.config.identity_sign_in_url, &return_to);
            return (StatusCode::SEE_OTHER, [(LOCATION, location)]).into_response();
        }
    };

    let user = AuthUser::from(claims);
    profile_service::provision_best_effort(
        state.profiles.as_ref(),
        &user.id,
        state.config.profile_provision_timeout(),
    )
    .await;

    req.extensions_mut().insert(user);
    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::header::COOKIE;
    use tower::ServiceExt;

    use crate::test_support::{authed_get, body_json, get, TestApp};

    #[test]
    fn exempt_paths() {
        assert!(is_exempt("/sign-in"));
        assert!(is_exempt("/sign-in/factor-one"));
        assert!(is_exempt("/health"));
        assert!(is_exempt("/favicon.ico"));
        assert!(is_exempt("/static/app.css"));
        assert!(!is_exempt("/"));
        assert!(!is_exempt("/api/emojis"));
        assert!(!is_exempt("/sign-in-elsewhere"));
        assert!(!is_exempt("/api/emojis.json"));
        assert!(!is_exempt("/api/emojis/7/image.png"));
    }

    #[test]
    fn redirect_preserves_the_requested_path() {
        assert_eq!(
            sign_in_redirect("/sign-in", "/?tab=mine"),
            "/sign-in?redirect_url=%2F%3Ftab%3Dmine"
        );
        assert_eq!(
            sign_in_redirect("https://accounts.example.com/sign-in?app=emoji", "/"),
            "https://accounts.example.com/sign-in?app=emoji&redirect_url=%2F"
        );
    }

    #[tokio::test]
    async fn page_without_session_redirects_to_sign_in() {
        let app = TestApp::new();
        let response = app.router().oneshot(get("/")).await.unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers()[LOCATION],
            "/sign-in?redirect_url=%2F"
        );
        assert_eq!(app.profiles.insert_count(), 0);
    }

    #[tokio::test]
    async fn api_without_session_is_unauthorized() {
        let app = TestApp::new();
        let response = app
            .router()
            .oneshot(get("/api/emojis"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Unauthorized");
        assert_eq!(body["code"], "unauthorized");
    }

    #[tokio::test]
    async fn dotted_api_path_without_session_is_unauthorized() {
        let app = TestApp::new();
        let response = app.router().oneshot(get("/api/foo.json")).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["code"], "unauthorized");
    }

    #[tokio::test]
    async fn dotted_api_path_with_session_provisions_the_profile() {
        let app = TestApp::new();
        let response = app
            .router()
            .oneshot(authed_get("/api/foo.json", "U9"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(app.profiles.insert_count(), 1);
    }

    #[tokio::test]
    async fn forged_session_is_rejected() {
        let app = TestApp::new();
        let response = app
            .router()
            .oneshot(
                axum::http::Request::get("/api/emojis")
                    .header(COOKIE, "__session=not.a.jwt")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn first_visit_provisions_one_profile() {
        let app = TestApp::new();

        for _ in 0..2 {
            let response = app
                .router()
                .oneshot(authed_get("/api/emojis", "U9"))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        assert_eq!(app.profiles.insert_count(), 1);
        let profile = app.profiles.get("U9").unwrap();
        assert_eq!((profile.credits, profile.tier.as_str()), (3, "free"));
    }

    #[tokio::test]
    async fn profile_failure_does_not_fail_the_request() {
        let app = TestApp::new();
        app.profiles.fail();

        let response = app
            .router()
            .oneshot(authed_get("/api/emojis", "U9"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn sign_in_page_is_public() {
        let app = TestApp::new();
        let response = app
            .router()
            .oneshot(get("/sign-in?redirect_url=%2F"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
