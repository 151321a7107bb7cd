use actix_web::http::StatusCode;
use actix_web::http::header::{CONTENT_TYPE, LOCATION};
use actix_web::{HttpRequest, HttpResponse, ResponseError, get, post, web};
use tracing::{info, warn};
use uuid::Uuid;

use crate::application::post_service::PostService;
use crate::domain::error::DomainError;
use crate::domain::form::PostForm;
use crate::presentation::middleware::request_id;
use crate::presentation::submission::parse_submission;
use crate::presentation::templates::{CurrentImage, FormMode, FormView, Pages};

async fn admin_list(
    service: web::Data<PostService>,
    pages: web::Data<Pages>,
) -> Result<HttpResponse, DomainError> {
    let posts = service.list_all().await?;
    pages.admin_list(&posts)
}

#[get("/add")]
async fn add_form(pages: web::Data<Pages>) -> Result<HttpResponse, DomainError> {
    let form = PostForm::default();
    let view = FormView {
        mode: FormMode::Create,
        form: &form,
        current_image: None,
        alert: None,
    };
    pages.post_form(&view, StatusCode::OK)
}

#[post("/add")]
async fn add_post(
    req: HttpRequest,
    service: web::Data<PostService>,
    pages: web::Data<Pages>,
    body: web::Bytes,
) -> Result<HttpResponse, DomainError> {
    let submission = parse_submission(content_type(&req), body).await?;

    match service.create_post(&submission.form, submission.image).await {
        Ok(post) => {
            info!(
                request_id = %request_id(&req),
                post_id = %post.id,
                slug = %post.slug,
                "post created"
            );
            Ok(redirect_to_admin())
        }
        Err(err) => {
            warn!(request_id = %request_id(&req), error = %err, "post creation failed");
            let view = FormView {
                mode: FormMode::Create,
                form: &submission.form,
                current_image: None,
                alert: Some(&err),
            };
            pages.post_form(&view, err.status_code())
        }
    }
}

#[get("/edit/{id}")]
async fn edit_form(
    service: web::Data<PostService>,
    pages: web::Data<Pages>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    let post = service.get_post(path.into_inner()).await?;
    let form = PostForm::from_post(&post);
    let view = FormView {
        mode: FormMode::Edit(post.id),
        form: &form,
        current_image: CurrentImage::of(&post),
        alert: None,
    };
    pages.post_form(&view, StatusCode::OK)
}

#[post("/edit/{id}")]
async fn edit_post(
    req: HttpRequest,
    service: web::Data<PostService>,
    pages: web::Data<Pages>,
    path: web::Path<Uuid>,
    body: web::Bytes,
) -> Result<HttpResponse, DomainError> {
    let id = path.into_inner();
    let submission = parse_submission(content_type(&req), body).await?;

    match service.edit_post(id, &submission.form, submission.image).await {
        Ok(post) => {
            info!(
                request_id = %request_id(&req),
                post_id = %post.id,
                slug = %post.slug,
                "post updated"
            );
            Ok(redirect_to_admin())
        }
        Err(err @ DomainError::PostNotFound(_)) => Err(err),
        Err(err) => {
            warn!(request_id = %request_id(&req), post_id = %id, error = %err, "post update failed");
            let current = service.get_post(id).await.ok();
            let view = FormView {
                mode: FormMode::Edit(id),
                form: &submission.form,
                current_image: current.as_ref().and_then(CurrentImage::of),
                alert: Some(&err),
            };
            pages.post_form(&view, err.status_code())
        }
    }
}

fn content_type(req: &HttpRequest) -> &str {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
}

fn redirect_to_admin() -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((LOCATION, "/admin"))
        .finish()
}

pub fn scope() -> actix_web::Scope {
    web::scope("/admin")
        .route("", web::get().to(admin_list))
        .service(add_form)
        .service(add_post)
        .service(edit_form)
        .service(edit_post)
}
