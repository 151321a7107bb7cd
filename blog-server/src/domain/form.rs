use blog_client::{Post, PostStatus};
use serde::Serialize;

use crate::domain::error::DomainError;

/// Raw values of the create/edit form, as typed by the admin.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PostForm {
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub status: PostStatus,
}

/// Form values that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct PostFields {
    pub title: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub status: PostStatus,
}

impl PostForm {
    pub fn from_post(post: &Post) -> Self {
        Self {
            title: post.title.clone(),
            content: post.content.clone(),
            excerpt: post.excerpt.clone().unwrap_or_default(),
            status: post.status,
        }
    }

    pub fn validate(&self) -> Result<PostFields, DomainError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(DomainError::Validation("Title is required".into()));
        }
        if self.content.trim().is_empty() {
            return Err(DomainError::Validation("Content is required".into()));
        }

        let excerpt = self.excerpt.trim();
        Ok(PostFields {
            title: title.to_string(),
            content: self.content.clone(),
            excerpt: (!excerpt.is_empty()).then(|| excerpt.to_string()),
            status: self.status,
        })
    }
}
