use std::sync::Mutex;

use async_trait::async_trait;
use blog_client::{
    BlogClientError, BlogStore, ImageUpload, Lookup, NewPost, Post, PostChanges, PostStatus,
};
use chrono::{DateTime, Utc};
use uuid::Uuid;

pub const PUBLIC_PREFIX: &str = "https://store.test/storage/v1/object/public/blog-images/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListPublished,
    ListAll,
    FindBySlug(String),
    FindById(Uuid),
    Insert(String),
    Update(Uuid),
    Upload(String),
    Delete(String),
}

/// In-memory `BlogStore` that records every call it receives.
#[derive(Default)]
pub struct RecordingStore {
    posts: Mutex<Vec<Post>>,
    calls: Mutex<Vec<Call>>,
    fail_reads: bool,
    fail_writes: bool,
    fail_uploads: bool,
    fail_deletes: bool,
}

impl RecordingStore {
    pub fn with_posts(posts: Vec<Post>) -> Self {
        Self {
            posts: Mutex::new(posts),
            ..Self::default()
        }
    }

    pub fn failing_reads(mut self) -> Self {
        self.fail_reads = true;
        self
    }

    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    pub fn failing_uploads(mut self) -> Self {
        self.fail_uploads = true;
        self
    }

    pub fn failing_deletes(mut self) -> Self {
        self.fail_deletes = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn posts(&self) -> Vec<Post> {
        self.posts.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn unavailable() -> BlogClientError {
        BlogClientError::Http {
            status: 503,
            message: "store unavailable".into(),
        }
    }

    fn newest_first(mut posts: Vec<Post>) -> Vec<Post> {
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        posts
    }

    fn single(matches: Vec<Post>) -> Lookup {
        match matches.len() {
            0 => Lookup::NotFound,
            1 => matches.into_iter().next().map_or(Lookup::NotFound, Lookup::Found),
            n => Lookup::TransportError(format!("result contains {n} rows")),
        }
    }
}

#[async_trait]
impl BlogStore for RecordingStore {
    fn public_url(&self, object_name: &str) -> String {
        format!("{PUBLIC_PREFIX}{object_name}")
    }

    async fn list_published(&self) -> Result<Vec<Post>, BlogClientError> {
        self.record(Call::ListPublished);
        if self.fail_reads {
            return Err(Self::unavailable());
        }
        let published = self.posts().into_iter().filter(Post::is_published).collect();
        Ok(Self::newest_first(published))
    }

    async fn list_all(&self) -> Result<Vec<Post>, BlogClientError> {
        self.record(Call::ListAll);
        if self.fail_reads {
            return Err(Self::unavailable());
        }
        Ok(Self::newest_first(self.posts()))
    }

    async fn find_published_by_slug(&self, slug: &str) -> Lookup {
        self.record(Call::FindBySlug(slug.to_string()));
        if self.fail_reads {
            return Lookup::TransportError("store unavailable".into());
        }
        Self::single(
            self.posts()
                .into_iter()
                .filter(|p| p.slug == slug && p.is_published())
                .collect(),
        )
    }

    async fn find_by_id(&self, id: Uuid) -> Lookup {
        self.record(Call::FindById(id));
        if self.fail_reads {
            return Lookup::TransportError("store unavailable".into());
        }
        Self::single(self.posts().into_iter().filter(|p| p.id == id).collect())
    }

    async fn insert_post(&self, post: &NewPost) -> Result<Post, BlogClientError> {
        self.record(Call::Insert(post.slug.clone()));
        if self.fail_writes {
            return Err(Self::unavailable());
        }
        let now = Utc::now();
        let created = Post {
            id: Uuid::new_v4(),
            title: post.title.clone(),
            content: post.content.clone(),
            excerpt: post.excerpt.clone(),
            image_url: post.image_url.clone(),
            image_name: post.image_name.clone(),
            slug: post.slug.clone(),
            status: post.status,
            created_at: now,
            updated_at: now,
        };
        self.posts.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn update_post(&self, id: Uuid, changes: &PostChanges) -> Result<Post, BlogClientError> {
        self.record(Call::Update(id));
        if self.fail_writes {
            return Err(Self::unavailable());
        }
        let mut posts = self.posts.lock().unwrap();
        let post = posts
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(BlogClientError::NotFound)?;
        post.title = changes.title.clone();
        post.content = changes.content.clone();
        post.excerpt = changes.excerpt.clone();
        post.image_url = changes.image_url.clone();
        post.image_name = changes.image_name.clone();
        post.slug = changes.slug.clone();
        post.status = changes.status;
        post.updated_at = changes.updated_at;
        Ok(post.clone())
    }

    async fn upload_image(
        &self,
        object_name: &str,
        _image: &ImageUpload,
    ) -> Result<String, BlogClientError> {
        self.record(Call::Upload(object_name.to_string()));
        if self.fail_uploads {
            return Err(Self::unavailable());
        }
        Ok(format!("{PUBLIC_PREFIX}{object_name}"))
    }

    async fn delete_image(&self, object_name: &str) -> Result<(), BlogClientError> {
        self.record(Call::Delete(object_name.to_string()));
        if self.fail_deletes {
            return Err(Self::unavailable());
        }
        Ok(())
    }
}

pub fn post_fixture(title: &str, status: PostStatus, created_at: &str) -> Post {
    let created_at: DateTime<Utc> = created_at.parse().unwrap();
    Post {
        id: Uuid::new_v4(),
        title: title.to_string(),
        content: format!("{title} first paragraph.\n\n{title} second paragraph."),
        excerpt: None,
        image_url: None,
        image_name: None,
        slug: blog_client::slugify(title),
        status,
        created_at,
        updated_at: created_at,
    }
}

const BOUNDARY: &str = "----blogformboundary7MA4YWxkTrZu0gW";

/// Encodes text fields and an optional `(file name, content type, bytes)` image part
/// the way a browser submits the post form. An empty content type omits the header.
pub fn multipart_body(
    fields: &[(&str, &str)],
    image: Option<(&str, &str, &[u8])>,
) -> (String, Vec<u8>) {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((file_name, content_type, bytes)) = image {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{file_name}\"\r\n"
            )
            .as_bytes(),
        );
        if !content_type.is_empty() {
            body.extend_from_slice(format!("Content-Type: {content_type}\r\n").as_bytes());
        }
        body.extend_from_slice(b"\r\n");
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    (format!("multipart/form-data; boundary={BOUNDARY}"), body)
}
