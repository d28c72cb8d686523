use actix_web::{App, HttpServer, web};
use dotenvy::dotenv;
use tracing::info;
use tracing_subscriber::EnvFilter;

use shortlink::api::{LinksService, RedirectService};
use shortlink::config;
use shortlink::services::ShortLinkService;
use shortlink::storage::StoreFactory;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = config::init_config();

    let store = StoreFactory::create(config)
        .await
        .map_err(std::io::Error::other)?;

    let service = web::Data::new(ShortLinkService::new(store));

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    info!("starting server at http://{}", bind_address);

    HttpServer::new(move || {
        App::new()
            .app_data(service.clone())
            .route("/api/links", web::post().to(LinksService::post_link))
            .route("/s/{slug}", web::get().to(RedirectService::handle_redirect))
            .route("/s/{slug}", web::head().to(RedirectService::handle_redirect))
    })
    .bind(bind_address)?
    .run()
    .await
}
