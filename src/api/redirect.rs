//! Slug resolution endpoint: `GET /s/{slug}`

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, web};
use tracing::{debug, error};

use crate::services::ShortLinkService;

pub struct RedirectService;

impl RedirectService {
    pub async fn handle_redirect(
        path: web::Path<String>,
        service: web::Data<ShortLinkService>,
    ) -> impl Responder {
        let slug = path.into_inner();

        match service.get_original_url(&slug).await {
            Ok(Some(target)) => HttpResponse::build(StatusCode::MOVED_PERMANENTLY)
                .insert_header(("Location", target))
                .finish(),
            Ok(None) => {
                debug!("slug not found: {}", slug);
                Self::not_found()
            }
            Err(e) => {
                error!("redirect lookup failed for {}: {}", slug, e);
                HttpResponse::InternalServerError()
                    .insert_header(("Content-Type", "text/html; charset=utf-8"))
                    .body("Internal Server Error")
            }
        }
    }

    fn not_found() -> HttpResponse {
        HttpResponse::build(StatusCode::NOT_FOUND)
            .insert_header(("Content-Type", "text/html; charset=utf-8"))
            .insert_header(("Cache-Control", "public, max-age=60"))
            .body("Not Found")
    }
}
