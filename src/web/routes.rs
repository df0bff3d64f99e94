// src/web/routes.rs
use crate::{state::AppState, web::operation_handlers};
use axum::{routing::get, Router};

pub fn create_router(app_state: AppState) -> Router {
    // --- Coleção REST de operações ---
    // Métodos não suportados caem no fallback de cada rota (405 + Allow)
    let operation_routes = Router::new()
        .route(
            "/operations",
            get(operation_handlers::list_operations)
                .post(operation_handlers::create_operation)
                .fallback(operation_handlers::method_not_allowed),
        )
        .route(
            "/operations/{id}",
            get(operation_handlers::get_operation)
                .put(operation_handlers::update_operation)
                .patch(operation_handlers::update_operation)
                .delete(operation_handlers::delete_operation)
                .fallback(operation_handlers::method_not_allowed),
        );

    // --- Router Final ---
    Router::new()
        .merge(operation_routes)
        .fallback(operation_handlers::not_found)
        .with_state(app_state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::BlobStore;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    fn app(dir: &tempfile::TempDir) -> Router {
        let store = BlobStore::new(dir.path().join("db.json"), dir.path().join("seed.json"));
        create_router(AppState { store })
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<&str>) -> (StatusCode, axum::http::HeaderMap, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if body.is_some() {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
        }
        let request = builder
            .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, headers, json)
    }

    #[tokio::test]
    async fn crud_cycle_over_http() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(&dir);

        let (status, _, created) = send(
            &app,
            Method::POST,
            "/operations",
            Some(r#"{"name":"Navio","description":"Soja","type":"Desembarque","terminal":"Terminal Sul"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["status"], "Criada");
        let id = created["id"].as_str().unwrap().to_string();

        let (status, _, fetched) = send(&app, Method::GET, &format!("/operations/{}", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched, created);

        let (status, _, updated) = send(
            &app,
            Method::PATCH,
            &format!("/operations/{}", id),
            Some(r#"{"id":"trocado","status":"Finalizada"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["id"], id.as_str());
        assert_eq!(updated["status"], "Finalizada");

        let (status, _, body) = send(&app, Method::DELETE, &format!("/operations/{}", id), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(body, Value::Null);

        let (status, _, body) = send(&app, Method::GET, &format!("/operations/{}", id), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Not found");
    }

    #[tokio::test]
    async fn empty_post_body_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let (status, _, created) = send(&app(&dir), Method::POST, "/operations", None).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["terminal"], "Terminal Norte");
        assert_eq!(created["type"], "Embarque");
    }

    #[tokio::test]
    async fn unknown_method_is_405_with_allow_header() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(&dir);

        for uri in ["/operations", "/operations/abc"] {
            let (status, headers, body) = send(&app, Method::OPTIONS, uri, None).await;
            assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
            assert_eq!(headers.get(header::ALLOW).unwrap(), "GET,POST,PUT,PATCH,DELETE");
            assert_eq!(body["error"], "Method not allowed");
        }
    }

    #[tokio::test]
    async fn invalid_enum_value_is_bad_request() {
        let dir = tempfile::tempdir().unwrap();
        let (status, _, _) = send(
            &app(&dir),
            Method::POST,
            "/operations",
            Some(r#"{"name":"x","terminal":"Terminal Centro"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn list_supports_search_query() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(&dir);
        send(&app, Method::POST, "/operations", Some(r#"{"name":"Graneleiro","type":"Desembarque"}"#)).await;
        send(&app, Method::POST, "/operations", Some(r#"{"name":"Petroleiro"}"#)).await;

        let (status, _, all) = send(&app, Method::GET, "/operations", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(all.as_array().unwrap().len(), 2);

        let (_, _, found) = send(&app, Method::GET, "/operations?q=desemb", None).await;
        let found = found.as_array().unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0]["name"], "Graneleiro");
    }
}
