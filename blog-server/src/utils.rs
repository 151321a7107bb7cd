use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::middleware::{DefaultHeaders, Logger};
use actix_web::{App, HttpResponse, HttpServer, Responder, web};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::application::post_service::PostService;
use crate::infrastructure::config::AppConfig;
use crate::presentation::handlers;
use crate::presentation::middleware::{RequestIdMiddleware, TimingMiddleware};
use crate::presentation::templates::Pages;

pub async fn start_http_server(
    config: AppConfig,
    post_service: PostService,
    pages: Pages,
) -> anyhow::Result<()> {
    let bind_address = (config.host.clone(), config.port);
    let max_upload_bytes = config.max_upload_bytes;
    let post_service = web::Data::new(post_service);
    let pages = web::Data::new(pages);

    info!(
        host = %bind_address.0,
        port = bind_address.1,
        store = %config.store.url,
        "HTTP server starting"
    );

    HttpServer::new(move || build_app(post_service.clone(), pages.clone(), max_upload_bytes))
        .bind(bind_address)?
        .run()
        .await
        .map_err(anyhow::Error::new)?;

    Ok(())
}

/// The application with its middleware stack. The last `wrap` runs first, so
/// `RequestIdMiddleware` is registered after `TimingMiddleware`.
fn build_app(
    post_service: web::Data<PostService>,
    pages: web::Data<Pages>,
    max_upload_bytes: usize,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .wrap(Logger::default())
        .wrap(TimingMiddleware)
        .wrap(RequestIdMiddleware)
        .wrap(
            DefaultHeaders::new()
                .add(("X-Content-Type-Options", "nosniff"))
                .add(("Referrer-Policy", "no-referrer"))
                .add(("Permissions-Policy", "geolocation=()"))
                .add(("Cross-Origin-Opener-Policy", "same-origin")),
        )
        .app_data(web::PayloadConfig::new(max_upload_bytes))
        .app_data(post_service)
        .app_data(pages)
        .route("/health", web::get().to(health))
        .configure(handlers::routes)
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
}

async fn health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok",
        timestamp: Utc::now(),
    })
}
