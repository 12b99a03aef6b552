use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::get,
    Router,
};

use bookshelf_http::{AppError, ValidJson, WebResponse};

use super::models::{AuthorRequest, AuthorResponse};
use super::service::AuthorService;

type ApiResult<T> = Result<WebResponse<T>, AppError>;

/// Author endpoints, relative to the module mount point.
pub fn router(service: Arc<AuthorService>) -> Router {
    Router::new()
        .route("/", get(list_authors).post(create_author))
        .route(
            "/{id}",
            get(get_author).put(update_author).delete(delete_author),
        )
        .route("/health", get(health_check))
        .with_state(service)
}

async fn health_check() -> &'static str {
    "authors module is healthy"
}

async fn create_author(
    State(service): State<Arc<AuthorService>>,
    ValidJson(request): ValidJson<AuthorRequest>,
) -> ApiResult<AuthorResponse> {
    let author = service.create(request).await?;
    Ok(WebResponse::success(author))
}

async fn get_author(
    State(service): State<Arc<AuthorService>>,
    Path(id): Path<String>,
) -> ApiResult<AuthorResponse> {
    let author = service.find_by_id(&id).await?;
    Ok(WebResponse::success(author))
}

async fn update_author(
    State(service): State<Arc<AuthorService>>,
    Path(id): Path<String>,
    ValidJson(request): ValidJson<AuthorRequest>,
) -> ApiResult<AuthorResponse> {
    let author = service.update(&id, request).await?;
    Ok(WebResponse::success(author))
}

async fn list_authors(State(service): State<Arc<AuthorService>>) -> ApiResult<Vec<AuthorResponse>> {
    let authors = service.find_all().await?;
    Ok(WebResponse::success(authors))
}

async fn delete_author(
    State(service): State<Arc<AuthorService>>,
    Path(id): Path<String>,
) -> ApiResult<AuthorResponse> {
    let author = service.delete(&id).await?;
    Ok(WebResponse::success(author))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{body_json, json_request, FakeCatalog};
    use axum::{body::Body, http::Request, http::StatusCode};
    use tower::ServiceExt;

    fn app(catalog: &FakeCatalog) -> Router {
        router(Arc::new(AuthorService::new(catalog.authors())))
    }

    fn orwell() -> serde_json::Value {
        serde_json::json!({"name": "Orwell", "bio": "English novelist", "birth_date": "1903-06-25"})
    }

    #[tokio::test]
    async fn create_then_get_round_trips_fields() {
        let catalog = FakeCatalog::default();
        let app = app(&catalog);

        let response = app
            .clone()
            .oneshot(json_request("POST", "/", &orwell()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let created = body_json(response).await;
        assert_eq!(created["code"], 200);
        assert_eq!(created["status"], true);
        assert_eq!(created["message"], "success");
        let id = created["data"]["id"].as_str().unwrap().to_string();
        assert!(!id.is_empty());

        let response = app
            .oneshot(Request::get(format!("/{id}")).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let fetched = body_json(response).await;
        assert_eq!(fetched["data"], created["data"]);
        assert_eq!(fetched["data"]["birth_date"], "1903-06-25");
    }

    #[tokio::test]
    async fn missing_field_is_rejected_before_storage() {
        let catalog = FakeCatalog::default();
        let body = serde_json::json!({"name": "Orwell", "bio": "English novelist"});

        let response = app(&catalog)
            .oneshot(json_request("POST", "/", &body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["data"]["error"], "validation_error");
        assert_eq!(body["data"]["details"][0]["field"], "birth_date");
        assert_eq!(catalog.author_writes(), 0);
    }

    #[tokio::test]
    async fn malformed_body_is_a_validation_error() {
        let catalog = FakeCatalog::default();
        let request = Request::post("/")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let response = app(&catalog).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["data"]["error"], "validation_error");
    }

    #[tokio::test]
    async fn duplicate_name_answers_400_conflict() {
        let catalog = FakeCatalog::default();
        let app = app(&catalog);
        app.clone()
            .oneshot(json_request("POST", "/", &orwell()))
            .await
            .unwrap();

        let response = app.oneshot(json_request("POST", "/", &orwell())).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["data"]["error"], "conflict");
    }

    #[tokio::test]
    async fn unknown_author_is_404_for_get_put_and_delete() {
        let catalog = FakeCatalog::default();
        let app = app(&catalog);

        for request in [
            Request::get("/missing").body(Body::empty()).unwrap(),
            json_request("PUT", "/missing", &orwell()),
            Request::delete("/missing").body(Body::empty()).unwrap(),
        ] {
            let response = app.clone().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::NOT_FOUND);
            let body = body_json(response).await;
            assert_eq!(body["status"], false);
            assert_eq!(body["data"]["error"], "not_found");
        }
    }

    #[tokio::test]
    async fn list_returns_all_authors() {
        let catalog = FakeCatalog::default();
        let app = app(&catalog);
        app.clone()
            .oneshot(json_request("POST", "/", &orwell()))
            .await
            .unwrap();

        let response = app
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
        assert_eq!(body["data"][0]["name"], "Orwell");
    }
}
