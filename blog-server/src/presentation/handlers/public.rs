use actix_web::http::StatusCode;
use actix_web::http::header::LOCATION;
use actix_web::{HttpRequest, HttpResponse, get, web};
use blog_client::Lookup;
use tracing::{error, info};

use crate::application::post_service::PostService;
use crate::domain::error::DomainError;
use crate::presentation::middleware::request_id;
use crate::presentation::templates::Pages;

const BACK_TO_BLOG: (&str, &str) = ("/blog", "Back to the blog");

#[get("/")]
async fn home() -> HttpResponse {
    HttpResponse::Found()
        .insert_header((LOCATION, "/blog"))
        .finish()
}

#[get("/blog")]
async fn blog_list(
    service: web::Data<PostService>,
    pages: web::Data<Pages>,
) -> Result<HttpResponse, DomainError> {
    let posts = service.list_published().await;
    pages.blog_list(&posts)
}

#[get("/blog/{slug}")]
async fn blog_post(
    req: HttpRequest,
    service: web::Data<PostService>,
    pages: web::Data<Pages>,
    path: web::Path<String>,
) -> Result<HttpResponse, DomainError> {
    let slug = path.into_inner();
    match service.find_published(&slug).await {
        Lookup::Found(post) => pages.blog_post(&post),
        Lookup::NotFound => {
            info!(request_id = %request_id(&req), slug = %slug, "post not found");
            pages.status_page(
                StatusCode::NOT_FOUND,
                "Post not found",
                "The post you are looking for does not exist or is not published.",
                BACK_TO_BLOG,
            )
        }
        Lookup::TransportError(reason) => {
            error!(request_id = %request_id(&req), slug = %slug, %reason, "failed to load post");
            pages.status_page(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error loading post",
                "The post could not be loaded. Please try again later.",
                BACK_TO_BLOG,
            )
        }
    }
}
