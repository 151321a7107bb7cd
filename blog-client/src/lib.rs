//! Client for the hosted posts table and image bucket backing the blog.

use async_trait::async_trait;
use uuid::Uuid;

mod config;
mod error;
mod http_client;
mod image;
mod post;
mod slug;

pub use config::StoreConfig;
pub use error::BlogClientError;
pub use http_client::BlogClientHttp;
pub use image::{ImageUpload, generate_object_name, object_name_from_url};
pub use post::{Lookup, NewPost, Post, PostChanges, PostStatus};
pub use slug::slugify;

/// Data access used by every page and form of the blog.
///
/// Implementations hold no state besides their connection settings, so a single
/// instance is shared by all requests.
#[async_trait]
pub trait BlogStore: Send + Sync {
    /// Public URL the store serves `object_name` under.
    fn public_url(&self, object_name: &str) -> String;
    /// Object name behind `image_url`, if the URL points into this store's bucket.
    fn object_name_of(&self, image_url: &str) -> Option<String> {
        let prefix = self.public_url("");
        if !image_url.starts_with(&prefix) {
            return None;
        }
        object_name_from_url(image_url)
    }
    /// Published posts, newest first.
    async fn list_published(&self) -> Result<Vec<Post>, BlogClientError>;
    /// Every post regardless of status, newest first.
    async fn list_all(&self) -> Result<Vec<Post>, BlogClientError>;
    async fn find_published_by_slug(&self, slug: &str) -> Lookup;
    async fn find_by_id(&self, id: Uuid) -> Lookup;
    async fn insert_post(&self, post: &NewPost) -> Result<Post, BlogClientError>;
    async fn update_post(&self, id: Uuid, changes: &PostChanges) -> Result<Post, BlogClientError>;
    /// Stores the file under `object_name` and returns its public URL.
    async fn upload_image(
        &self,
        object_name: &str,
        image: &ImageUpload,
    ) -> Result<String, BlogClientError>;
    async fn delete_image(&self, object_name: &str) -> Result<(), BlogClientError>;
}
