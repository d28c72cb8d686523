use std::sync::Arc;

use actix_web::{App, http::StatusCode, test, web};
use async_trait::async_trait;
use serde_json::{Value, json};

use shortlink::api::{LinksService, RedirectService};
use shortlink::errors::{Result, ShortlinkError};
use shortlink::services::ShortLinkService;
use shortlink::storage::{LinkStore, MemoryStore};

fn app_data() -> web::Data<ShortLinkService> {
    web::Data::new(ShortLinkService::new(Arc::new(MemoryStore::new())))
}

/// Store whose backend is unreachable: every operation fails.
struct UnreachableStore;

#[async_trait]
impl LinkStore for UnreachableStore {
    async fn save(&self, _slug: &str, _url: &str) -> Result<bool> {
        Err(ShortlinkError::storage_unavailable("backend down"))
    }

    async fn get(&self, _slug: &str) -> Result<Option<String>> {
        Err(ShortlinkError::storage_unavailable("backend down"))
    }

    async fn exists(&self, _slug: &str) -> Result<bool> {
        Err(ShortlinkError::storage_unavailable("backend down"))
    }

    fn backend_name(&self) -> &'static str {
        "unreachable"
    }
}

/// Store reporting every slug as taken, so allocation always exhausts its
/// retry budget.
struct SaturatedStore;

#[async_trait]
impl LinkStore for SaturatedStore {
    async fn save(&self, _slug: &str, _url: &str) -> Result<bool> {
        Ok(false)
    }

    async fn get(&self, _slug: &str) -> Result<Option<String>> {
        Ok(None)
    }

    async fn exists(&self, _slug: &str) -> Result<bool> {
        Ok(true)
    }

    fn backend_name(&self) -> &'static str {
        "saturated"
    }
}

macro_rules! test_app {
    ($data:expr) => {
        test::init_service(
            App::new()
                .app_data($data.clone())
                .route("/api/links", web::post().to(LinksService::post_link))
                .route("/s/{slug}", web::get().to(RedirectService::handle_redirect)),
        )
        .await
    };
}

#[actix_web::test]
async fn post_link_returns_201_with_short_url() {
    let app = test_app!(app_data());

    let req = test::TestRequest::post()
        .uri("/api/links")
        .set_json(json!({"url": "https://example.com/page"}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    let slug = body["slug"].as_str().unwrap();
    assert_eq!(slug.len(), 7);
    assert_eq!(body["originalUrl"], "https://example.com/page");
    assert!(
        body["shortUrl"]
            .as_str()
            .unwrap()
            .ends_with(&format!("/s/{slug}"))
    );
}

#[actix_web::test]
async fn post_link_normalizes_bare_host() {
    let app = test_app!(app_data());

    let req = test::TestRequest::post()
        .uri("/api/links")
        .set_json(json!({"url": "www.example.com"}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["originalUrl"], "https://www.example.com");
}

#[actix_web::test]
async fn post_link_rejects_invalid_urls() {
    let app = test_app!(app_data());

    for bad in ["", "not-a-url", "ftp://example.com", "javascript:alert(1)"] {
        let req = test::TestRequest::post()
            .uri("/api/links")
            .set_json(json!({ "url": bad }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "input: {bad}");
        let body: Value = test::read_body_json(resp).await;
        assert!(body["error"].as_str().is_some());
    }
}

#[actix_web::test]
async fn redirect_returns_301_to_original_url() {
    let data = app_data();
    let app = test_app!(data);

    let created = data
        .create_short_link("https://example.com/target")
        .await
        .unwrap();

    let req = test::TestRequest::get()
        .uri(&format!("/s/{}", created.slug))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(
        resp.headers().get("Location").unwrap(),
        "https://example.com/target"
    );
}

#[actix_web::test]
async fn post_link_returns_500_when_storage_is_unavailable() {
    let data = web::Data::new(ShortLinkService::new(Arc::new(UnreachableStore)));
    let app = test_app!(data);

    let req = test::TestRequest::post()
        .uri("/api/links")
        .set_json(json!({"url": "https://example.com"}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = test::read_body_json(resp).await;
    // backend details never leak to the client
    assert_eq!(body["error"], "internal server error");
}

#[actix_web::test]
async fn post_link_returns_500_when_slug_space_is_saturated() {
    let data = web::Data::new(ShortLinkService::new(Arc::new(SaturatedStore)));
    let app = test_app!(data);

    let req = test::TestRequest::post()
        .uri("/api/links")
        .set_json(json!({"url": "https://example.com"}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "internal server error");
}

#[actix_web::test]
async fn redirect_returns_500_when_storage_is_unavailable() {
    let data = web::Data::new(ShortLinkService::new(Arc::new(UnreachableStore)));
    let app = test_app!(data);

    let req = test::TestRequest::get().uri("/s/abc1234").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[actix_web::test]
async fn redirect_returns_404_for_unknown_slug() {
    let app = test_app!(app_data());

    let req = test::TestRequest::get().uri("/s/zzzzzzz").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
