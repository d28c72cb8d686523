//! Link creation endpoint: `POST /api/links`

use actix_web::{HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::errors::ShortlinkError;
use crate::services::ShortLinkService;

#[derive(Debug, Deserialize)]
pub struct CreateLinkBody {
    pub url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLinkResponse {
    pub short_url: String,
    pub slug: String,
    pub original_url: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub struct LinksService;

impl LinksService {
    pub async fn post_link(
        body: web::Json<CreateLinkBody>,
        service: web::Data<ShortLinkService>,
    ) -> impl Responder {
        match service.create_short_link(&body.url).await {
            Ok(created) => HttpResponse::Created().json(CreateLinkResponse {
                short_url: created.short_url,
                slug: created.slug,
                original_url: created.original_url,
            }),
            Err(ShortlinkError::InvalidInput(msg)) => {
                HttpResponse::BadRequest().json(ErrorResponse { error: msg })
            }
            Err(e) => {
                error!("link creation failed: {}", e);
                HttpResponse::InternalServerError().json(ErrorResponse {
                    error: "internal server error".to_string(),
                })
            }
        }
    }
}
