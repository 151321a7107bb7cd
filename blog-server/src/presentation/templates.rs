use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use actix_web::http::header::ContentType;
use blog_client::Post;
use serde::Serialize;
use tera::{Context, Tera};
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::form::PostForm;

const SUMMARY_CHARS: usize = 150;
const DATE_FORMAT: &str = "%B %-d, %Y";

const TEMPLATES: [(&str, &str); 6] = [
    ("base.html", include_str!("../../templates/base.html")),
    ("blog_list.html", include_str!("../../templates/blog_list.html")),
    ("blog_post.html", include_str!("../../templates/blog_post.html")),
    ("status.html", include_str!("../../templates/status.html")),
    ("admin_list.html", include_str!("../../templates/admin_list.html")),
    ("post_form.html", include_str!("../../templates/post_form.html")),
];

/// Compiled page templates, built once at start-up.
pub struct Pages {
    tera: Tera,
}

impl Pages {
    pub fn new() -> Result<Self, tera::Error> {
        let mut tera = Tera::default();
        tera.add_raw_templates(TEMPLATES)?;
        Ok(Self { tera })
    }

    pub fn render(&self, name: &str, context: &Context) -> Result<String, DomainError> {
        Ok(self.tera.render(name, context)?)
    }

    pub fn respond(
        &self,
        status: StatusCode,
        name: &str,
        context: &Context,
    ) -> Result<HttpResponse, DomainError> {
        let html = self.render(name, context)?;
        Ok(HttpResponse::build(status)
            .content_type(ContentType::html())
            .body(html))
    }

    pub fn blog_list(&self, posts: &[Post]) -> Result<HttpResponse, DomainError> {
        let summaries: Vec<PostSummary> = posts.iter().map(PostSummary::from).collect();
        let mut context = Context::new();
        context.insert("posts", &summaries);
        self.respond(StatusCode::OK, "blog_list.html", &context)
    }

    pub fn blog_post(&self, post: &Post) -> Result<HttpResponse, DomainError> {
        let mut context = Context::new();
        context.insert("post", &PostPage::from(post));
        self.respond(StatusCode::OK, "blog_post.html", &context)
    }

    pub fn status_page(
        &self,
        status: StatusCode,
        heading: &str,
        message: &str,
        back: (&str, &str),
    ) -> Result<HttpResponse, DomainError> {
        let mut context = Context::new();
        context.insert("heading", heading);
        context.insert("message", message);
        context.insert("back_href", back.0);
        context.insert("back_label", back.1);
        self.respond(status, "status.html", &context)
    }

    pub fn admin_list(&self, posts: &[Post]) -> Result<HttpResponse, DomainError> {
        let rows: Vec<AdminRow> = posts.iter().map(AdminRow::from).collect();
        let mut context = Context::new();
        context.insert("posts", &rows);
        self.respond(StatusCode::OK, "admin_list.html", &context)
    }

    pub fn post_form(
        &self,
        view: &FormView<'_>,
        status: StatusCode,
    ) -> Result<HttpResponse, DomainError> {
        let mut context = Context::new();
        context.insert("form", view.form);
        match view.mode {
            FormMode::Create => {
                context.insert("heading", "Add post");
                context.insert("action", "/admin/add");
                context.insert("submit_label", "Create post");
            }
            FormMode::Edit(id) => {
                context.insert("heading", "Edit post");
                context.insert("action", &format!("/admin/edit/{id}"));
                context.insert("submit_label", "Save changes");
            }
        }
        context.insert("current_image", &view.current_image);
        context.insert("alert", &view.alert.map(Alert::from));
        self.respond(status, "post_form.html", &context)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(Uuid),
}

/// Everything the create/edit form page shows.
pub struct FormView<'a> {
    pub mode: FormMode,
    pub form: &'a PostForm,
    pub current_image: Option<CurrentImage>,
    pub alert: Option<&'a DomainError>,
}

#[derive(Debug, Serialize)]
pub struct CurrentImage {
    pub url: String,
    pub name: String,
}

impl CurrentImage {
    pub fn of(post: &Post) -> Option<Self> {
        let url = post.image_url.clone()?;
        let name = post
            .image_name
            .clone()
            .unwrap_or_else(|| "featured image".into());
        Some(Self { url, name })
    }
}

#[derive(Serialize)]
struct Alert {
    title: &'static str,
    message: String,
}

impl From<&DomainError> for Alert {
    fn from(err: &DomainError) -> Self {
        Self {
            title: err.title(),
            message: err.to_string(),
        }
    }
}

#[derive(Serialize)]
struct PostSummary {
    title: String,
    slug: String,
    summary: String,
    image_url: Option<String>,
    published_on: String,
}

impl From<&Post> for PostSummary {
    fn from(post: &Post) -> Self {
        Self {
            title: post.title.clone(),
            slug: post.slug.clone(),
            summary: post.summary(SUMMARY_CHARS),
            image_url: post.image_url.clone(),
            published_on: post.created_at.format(DATE_FORMAT).to_string(),
        }
    }
}

#[derive(Serialize)]
struct PostPage {
    title: String,
    paragraphs: Vec<String>,
    image_url: Option<String>,
    image_alt: String,
    published_on: String,
}

impl From<&Post> for PostPage {
    fn from(post: &Post) -> Self {
        Self {
            title: post.title.clone(),
            paragraphs: post.paragraphs().into_iter().map(String::from).collect(),
            image_url: post.image_url.clone(),
            image_alt: post.image_name.clone().unwrap_or_else(|| post.title.clone()),
            published_on: post.created_at.format(DATE_FORMAT).to_string(),
        }
    }
}

#[derive(Serialize)]
struct AdminRow {
    id: Uuid,
    title: String,
    slug: String,
    status: String,
    created_on: String,
}

impl From<&Post> for AdminRow {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id,
            title: post.title.clone(),
            slug: post.slug.clone(),
            status: post.status.to_string(),
            created_on: post.created_at.format(DATE_FORMAT).to_string(),
        }
    }
}
