use crate::controller::{
    application_controller, chat_controller, connection_controller, health_check_controller,
    matching_controller, notification_controller, session_controller,
};
use crate::live::handler::live_handler;
use crate::{params, AppState};
use axum::{
    routing::{delete, get, post, put},
    Router,
};

use utoipa::{
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_rapidoc::RapiDoc;

// The OpenAPI document. A path or schema only shows up in the rendered
// docs once it is listed here.
#[derive(OpenApi)]
#[openapi(
        info(
            title = "Mentorship Platform API"
        ),
        paths(
            health_check_controller::health_check,
            matching_controller::index,
            matching_controller::read_preferences,
            matching_controller::update_preferences,
            connection_controller::create,
            connection_controller::index,
            connection_controller::update_status,
            connection_controller::update_progress,
            chat_controller::create,
            chat_controller::index,
            chat_controller::mark_read,
            application_controller::create,
            application_controller::index,
            application_controller::update_status,
            application_controller::delete,
            notification_controller::index,
            notification_controller::mark_read,
            notification_controller::mark_all_read,
            session_controller::create,
            session_controller::index,
            session_controller::update_status,
        ),
        components(
            schemas(
                domain::applications::Model,
                domain::chat_messages::Model,
                domain::connections::Model,
                domain::matching_preferences::Model,
                domain::notifications::Model,
                domain::sessions::Model,
                domain::session_status::SessionStatus,
                domain::session::NewSession,
                domain::session::SessionUpdate,
                domain::connection::ProgressUpdate,
                domain::matching::MatchCandidate,
                domain::matching::Matches,
                domain::matching::PreferencesUpdate,
                domain::role::RequestType,
                params::application::CreateParams,
                params::application::UpdateStatusParams,
                params::chat::SubmitParams,
                params::connection::CreateParams,
                params::connection::UpdateStatusParams,
            )
        ),
        modifiers(&SecurityAddon),
        tags(
            (name = "mentorship_platform", description = "Mentor matching, connections and chat API")
        )
    )]
struct ApiDoc;

struct SecurityAddon;

// Every protected endpoint expects a bearer token from the identity provider.
impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            )
        }
    }
}

pub fn define_routes(app_state: AppState) -> Router {
    Router::new()
        .merge(health_routes())
        .merge(matching_routes(app_state.clone()))
        .merge(connection_routes(app_state.clone()))
        .merge(chat_routes(app_state.clone()))
        .merge(application_routes(app_state.clone()))
        .merge(notification_routes(app_state.clone()))
        .merge(session_routes(app_state.clone()))
        .merge(live_routes(app_state))
        .merge(RapiDoc::with_openapi("/api-docs/openapi.json", ApiDoc::openapi()).path("/rapidoc"))
}

fn health_routes() -> Router {
    Router::new().route("/health", get(health_check_controller::health_check))
}

fn matching_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/matches", get(matching_controller::index))
        .route(
            "/matching/preferences",
            get(matching_controller::read_preferences).put(matching_controller::update_preferences),
        )
        .with_state(app_state)
}

fn connection_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/connections", post(connection_controller::create))
        .route("/connections", get(connection_controller::index))
        .route(
            "/connections/{id}/status",
            put(connection_controller::update_status),
        )
        .route(
            "/connections/{id}/progress",
            put(connection_controller::update_progress),
        )
        .with_state(app_state)
}

fn chat_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/connections/{id}/messages", post(chat_controller::create))
        .route("/connections/{id}/messages", get(chat_controller::index))
        .route(
            "/connections/{id}/messages/read",
            put(chat_controller::mark_read),
        )
        .with_state(app_state)
}

fn application_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/applications", post(application_controller::create))
        .route("/applications", get(application_controller::index))
        .route(
            "/applications/{id}/status",
            put(application_controller::update_status),
        )
        .route("/applications/{id}", delete(application_controller::delete))
        .with_state(app_state)
}

fn notification_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/notifications", get(notification_controller::index))
        .route(
            "/notifications/read",
            put(notification_controller::mark_all_read),
        )
        .route(
            "/notifications/{id}/read",
            put(notification_controller::mark_read),
        )
        .with_state(app_state)
}

fn session_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/sessions", post(session_controller::create))
        .route("/sessions", get(session_controller::index))
        .route(
            "/sessions/{id}/status",
            put(session_controller::update_status),
        )
        .with_state(app_state)
}

fn live_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/live", get(live_handler))
        .with_state(app_state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::app_state;
    use axum::body::{to_bytes, Body};
    use axum::http::{header::AUTHORIZATION, header::CONTENT_TYPE, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn request(method: &str, uri: &str, user: Option<&str>, body: Option<Value>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(user) = user {
            builder = builder.header(AUTHORIZATION, format!("Bearer {user}"));
        }
        match body {
            Some(body) => builder
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_check_needs_no_credential() {
        let router = define_routes(app_state().await);

        let response = router
            .oneshot(request("GET", "/health", None, None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn protected_routes_reject_missing_credential() {
        let router = define_routes(app_state().await);

        let response = router
            .oneshot(request("GET", "/connections", None, None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn mentee_sees_seeded_mentors() {
        let router = define_routes(app_state().await);

        let response = router
            .oneshot(request("GET", "/matches", Some("seed-mentee-sam"), None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        let candidates = body["data"].as_array().expect("a single list");
        assert!(!candidates.is_empty());
        assert!(candidates
            .iter()
            .all(|c| c["candidate_id"] != json!("seed-mentee-sam")));
    }

    #[tokio::test]
    async fn connection_request_then_duplicate_conflicts() {
        let router = define_routes(app_state().await);
        let body = json!({"to_user_id": "seed-mentor-ada", "type": "mentor_request"});

        let first = router
            .clone()
            .oneshot(request(
                "POST",
                "/connections",
                Some("seed-mentee-sam"),
                Some(body.clone()),
            ))
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::CREATED);
        let created = json_body(first).await;
        assert_eq!(created["data"]["status"], json!("pending"));
        assert_eq!(created["data"]["mentor_id"], json!("seed-mentor-ada"));

        let second = router
            .oneshot(request(
                "POST",
                "/connections",
                Some("seed-mentee-sam"),
                Some(body),
            ))
            .await
            .unwrap();
        assert_eq!(second.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn unknown_request_type_is_rejected() {
        let router = define_routes(app_state().await);

        let response = router
            .oneshot(request(
                "POST",
                "/connections",
                Some("seed-mentee-sam"),
                Some(json!({"to_user_id": "seed-mentor-ada", "type": "peer_request"})),
            ))
            .await
            .unwrap();

        assert!(response.status().is_client_error());
    }

    #[tokio::test]
    async fn outsider_cannot_read_messages() {
        let router = define_routes(app_state().await);
        let created = router
            .clone()
            .oneshot(request(
                "POST",
                "/connections",
                Some("seed-mentee-sam"),
                Some(json!({"to_user_id": "seed-mentor-ada", "type": "mentor_request"})),
            ))
            .await
            .unwrap();
        let connection_id = json_body(created).await["data"]["id"]
            .as_str()
            .unwrap()
            .to_string();

        let response = router
            .oneshot(request(
                "GET",
                &format!("/connections/{connection_id}/messages"),
                Some("seed-mentee-kim"),
                None,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn notifications_follow_a_connection_request() {
        let router = define_routes(app_state().await);
        router
            .clone()
            .oneshot(request(
                "POST",
                "/connections",
                Some("seed-mentee-sam"),
                Some(json!({"to_user_id": "seed-mentor-ada", "type": "mentor_request"})),
            ))
            .await
            .unwrap();

        let inbox = router
            .clone()
            .oneshot(request("GET", "/notifications", Some("seed-mentor-ada"), None))
            .await
            .unwrap();
        let inbox = json_body(inbox).await;
        assert_eq!(inbox["data"][0]["type"], json!("connection_request"));

        let marked = router
            .oneshot(request(
                "PUT",
                "/notifications/read",
                Some("seed-mentor-ada"),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(json_body(marked).await["data"], json!(1));
    }

    #[tokio::test]
    async fn booked_session_appears_on_both_agendas() {
        let router = define_routes(app_state().await);
        let created = router
            .clone()
            .oneshot(request(
                "POST",
                "/connections",
                Some("seed-mentee-sam"),
                Some(json!({"to_user_id": "seed-mentor-ada", "type": "mentor_request"})),
            ))
            .await
            .unwrap();
        let connection_id = json_body(created).await["data"]["id"].clone();

        let booked = router
            .clone()
            .oneshot(request(
                "POST",
                "/sessions",
                Some("seed-mentee-sam"),
                Some(json!({
                    "connection_id": connection_id,
                    "scheduled_at": "2099-01-01T10:00:00Z",
                    "duration_minutes": 45,
                    "topic": "Testing async code"
                })),
            ))
            .await
            .unwrap();
        assert_eq!(booked.status(), StatusCode::CREATED);
        assert_eq!(json_body(booked).await["data"]["status"], json!("upcoming"));

        let agenda = router
            .oneshot(request("GET", "/sessions", Some("seed-mentor-ada"), None))
            .await
            .unwrap();
        let agenda = json_body(agenda).await;
        assert_eq!(agenda["data"].as_array().map(Vec::len), Some(1));
        assert_eq!(agenda["data"][0]["topic"], json!("Testing async code"));
    }

    #[tokio::test]
    async fn invalid_preferences_are_unprocessable() {
        let router = define_routes(app_state().await);

        let response = router
            .oneshot(request(
                "PUT",
                "/matching/preferences",
                Some("seed-mentee-sam"),
                Some(json!({"min_experience": 9, "max_experience": 3})),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn openapi_document_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/matches",
            "/connections",
            "/connections/{id}/status",
            "/connections/{id}/messages",
            "/applications/{id}",
            "/notifications/read",
            "/sessions",
            "/sessions/{id}/status",
        ] {
            assert!(doc.paths.paths.contains_key(path), "{path} is documented");
        }
    }
}
