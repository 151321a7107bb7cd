use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use blog_client::BlogClientError;
use tera::{Context, Tera};
use thiserror::Error;
use uuid::Uuid;

const ERROR_PAGE: &str = r#"<!doctype html>
<html lang="en">
<head><meta charset="utf-8"><title>{{ title }}</title></head>
<body>
<main>
<h1>{{ title }}</h1>
<p role="alert">{{ message }}</p>
<p><a href="/blog">Back to the blog</a></p>
</main>
</body>
</html>
"#;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{0}")]
    Validation(String),
    #[error("post not found: {0}")]
    PostNotFound(Uuid),
    #[error("image upload failed: {0}")]
    Upload(String),
    #[error("data store error: {0}")]
    Store(String),
    #[error("template error: {0}")]
    Template(String),
}

impl From<BlogClientError> for DomainError {
    fn from(err: BlogClientError) -> Self {
        DomainError::Store(err.to_string())
    }
}

impl From<tera::Error> for DomainError {
    fn from(err: tera::Error) -> Self {
        DomainError::Template(err.to_string())
    }
}

impl DomainError {
    /// Heading of the page or alert that reports this error.
    pub fn title(&self) -> &'static str {
        match self {
            DomainError::Validation(_) => "Please fix the form",
            DomainError::PostNotFound(_) => "Post not found",
            DomainError::Upload(_) => "Image upload failed",
            DomainError::Store(_) => "Error saving post",
            DomainError::Template(_) => "Something went wrong",
        }
    }
}

impl ResponseError for DomainError {
    fn status_code(&self) -> StatusCode {
        match self {
            DomainError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            DomainError::PostNotFound(_) => StatusCode::NOT_FOUND,
            DomainError::Upload(_) | DomainError::Store(_) => StatusCode::BAD_GATEWAY,
            DomainError::Template(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut context = Context::new();
        context.insert("title", self.title());
        context.insert("message", &self.to_string());

        let body = Tera::one_off(ERROR_PAGE, &context, true)
            .unwrap_or_else(|_| self.title().to_string());

        HttpResponse::build(self.status_code())
            .content_type(ContentType::html())
            .body(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use rstest::rstest;

    #[actix_web::test]
    async fn error_page_escapes_message() {
        let err = DomainError::Validation("<script>alert(1)</script>".into());
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = to_bytes(err.error_response().into_body()).await.unwrap();
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[rstest]
    #[case(DomainError::Validation("x".into()), StatusCode::UNPROCESSABLE_ENTITY)]
    #[case(DomainError::PostNotFound(Uuid::nil()), StatusCode::NOT_FOUND)]
    #[case(DomainError::Upload("x".into()), StatusCode::BAD_GATEWAY)]
    #[case(DomainError::Template("x".into()), StatusCode::INTERNAL_SERVER_ERROR)]
    fn status_codes(#[case] err: DomainError, #[case] expected: StatusCode) {
        assert_eq!(err.status_code(), expected);
    }

    #[test]
    fn store_errors_map_to_bad_gateway() {
        let err = DomainError::from(BlogClientError::InvalidRequest("bad".into()));
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
    }
}
