use std::sync::Arc;

use blog_client::{
    BlogClientError, BlogStore, ImageUpload, Lookup, NewPost, Post, PostChanges, slugify,
};
use chrono::Utc;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::form::PostForm;

/// An image that made it into the object store during the current request.
struct StoredImage {
    object_name: String,
    url: String,
    original_name: String,
}

/// Page and form operations of the blog, over a shared `BlogStore`.
#[derive(Clone)]
pub struct PostService {
    store: Arc<dyn BlogStore>,
}

impl PostService {
    pub fn new(store: Arc<dyn BlogStore>) -> Self {
        Self { store }
    }

    /// Published posts, newest first. A failed fetch is logged and shows as no posts.
    #[instrument(skip(self))]
    pub async fn list_published(&self) -> Vec<Post> {
        match self.store.list_published().await {
            Ok(posts) => posts,
            Err(e) => {
                error!(error = %e, "failed to load published posts");
                Vec::new()
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn list_all(&self) -> Result<Vec<Post>, DomainError> {
        Ok(self.store.list_all().await?)
    }

    #[instrument(skip(self))]
    pub async fn find_published(&self, slug: &str) -> Lookup {
        let lookup = self.store.find_published_by_slug(slug).await;
        if let Lookup::TransportError(reason) = &lookup {
            error!(slug, reason = %reason, "failed to load post");
        }
        lookup
    }

    pub async fn get_post(&self, id: Uuid) -> Result<Post, DomainError> {
        match self.store.find_by_id(id).await {
            Lookup::Found(post) => Ok(post),
            Lookup::NotFound => Err(DomainError::PostNotFound(id)),
            Lookup::TransportError(reason) => Err(DomainError::Store(reason)),
        }
    }

    #[instrument(skip(self, form, image), fields(title = %form.title))]
    pub async fn create_post(
        &self,
        form: &PostForm,
        image: Option<ImageUpload>,
    ) -> Result<Post, DomainError> {
        let fields = form.validate()?;

        let stored = match image {
            Some(image) => Some(self.store_image(&image).await?),
            None => None,
        };

        let new_post = NewPost {
            slug: slugify(&fields.title),
            title: fields.title,
            content: fields.content,
            excerpt: fields.excerpt,
            image_url: stored.as_ref().map(|s| s.url.clone()),
            image_name: stored.as_ref().map(|s| s.original_name.clone()),
            status: fields.status,
        };

        match self.store.insert_post(&new_post).await {
            Ok(post) => {
                info!(post_id = %post.id, slug = %post.slug, "post created");
                Ok(post)
            }
            Err(e) => {
                error!(error = %e, "failed to insert post");
                if let Some(stored) = stored {
                    self.discard_image(&stored.object_name).await;
                }
                Err(e.into())
            }
        }
    }

    /// Replaces the fields of post `id`. A newly selected image replaces the old one:
    /// the old object is deleted first, then the new one uploaded, then the row updated.
    #[instrument(skip(self, form, image), fields(title = %form.title))]
    pub async fn edit_post(
        &self,
        id: Uuid,
        form: &PostForm,
        image: Option<ImageUpload>,
    ) -> Result<Post, DomainError> {
        let fields = form.validate()?;
        let existing = self.get_post(id).await?;

        let stored = match image {
            Some(image) => {
                if let Some(url) = existing.image_url.as_deref() {
                    match self.store.object_name_of(url) {
                        Some(old) => self.discard_image(&old).await,
                        None => warn!(post_id = %id, url, "previous image is outside the bucket"),
                    }
                }
                Some(self.store_image(&image).await?)
            }
            None => None,
        };

        let (image_url, image_name) = match &stored {
            Some(stored) => (Some(stored.url.clone()), Some(stored.original_name.clone())),
            None => (existing.image_url, existing.image_name),
        };

        let changes = PostChanges {
            slug: slugify(&fields.title),
            title: fields.title,
            content: fields.content,
            excerpt: fields.excerpt,
            image_url,
            image_name,
            status: fields.status,
            updated_at: Utc::now(),
        };

        match self.store.update_post(id, &changes).await {
            Ok(post) => {
                info!(post_id = %post.id, slug = %post.slug, "post edited");
                Ok(post)
            }
            Err(e) => {
                error!(post_id = %id, error = %e, "failed to update post");
                if let Some(stored) = stored {
                    self.discard_image(&stored.object_name).await;
                }
                match e {
                    BlogClientError::NotFound => Err(DomainError::PostNotFound(id)),
                    other => Err(other.into()),
                }
            }
        }
    }

    async fn store_image(&self, image: &ImageUpload) -> Result<StoredImage, DomainError> {
        let object_name = image.object_name();
        let url = self
            .store
            .upload_image(&object_name, image)
            .await
            .map_err(|e| {
                error!(object = %object_name, error = %e, "image upload failed");
                DomainError::Upload(e.to_string())
            })?;

        Ok(StoredImage {
            object_name,
            url,
            original_name: image.file_name.clone(),
        })
    }

    /// Best-effort delete; failures are only logged.
    async fn discard_image(&self, object_name: &str) {
        if let Err(e) = self.store.delete_image(object_name).await {
            warn!(object = %object_name, error = %e, "failed to delete image");
        }
    }
}
