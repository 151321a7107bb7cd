use std::str::FromStr;

use chrono::{DateTime, Utc};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::BlogClientError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    #[default]
    #[display("draft")]
    Draft,
    #[display("published")]
    Published,
}

impl FromStr for PostStatus {
    type Err = BlogClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "draft" => Ok(PostStatus::Draft),
            "published" => Ok(PostStatus::Published),
            other => Err(BlogClientError::InvalidRequest(format!(
                "unknown post status: {other}"
            ))),
        }
    }
}

/// A row of the posts table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Display)]
#[display("Post {{ id: {}, slug: {}, status: {} }}", id, slug, status)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub image_name: Option<String>,
    pub slug: String,
    pub status: PostStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    pub fn is_published(&self) -> bool {
        self.status == PostStatus::Published
    }

    /// The excerpt, or the first `max_chars` characters of the content when there is none.
    pub fn summary(&self, max_chars: usize) -> String {
        if let Some(excerpt) = self.excerpt.as_deref().map(str::trim) {
            if !excerpt.is_empty() {
                return excerpt.to_string();
            }
        }

        let content = self.content.trim();
        let mut chars = content.chars();
        let prefix: String = chars.by_ref().take(max_chars).collect();
        if chars.next().is_some() {
            format!("{}...", prefix.trim_end())
        } else {
            prefix
        }
    }

    /// Content split on newlines, blank lines dropped.
    pub fn paragraphs(&self) -> Vec<&str> {
        self.content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect()
    }
}

/// Insert payload. `id` and the timestamps are assigned by the store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub image_url: Option<String>,
    pub image_name: Option<String>,
    pub slug: String,
    pub status: PostStatus,
}

/// Update payload; every editable field is written, `updated_at` included.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostChanges {
    pub title: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub image_url: Option<String>,
    pub image_name: Option<String>,
    pub slug: String,
    pub status: PostStatus,
    pub updated_at: DateTime<Utc>,
}

/// Outcome of a single-row lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    Found(Post),
    NotFound,
    TransportError(String),
}

impl Lookup {
    pub fn found(self) -> Option<Post> {
        match self {
            Lookup::Found(post) => Some(post),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post_with(content: &str, excerpt: Option<&str>) -> Post {
        let now = Utc::now();
        Post {
            id: Uuid::new_v4(),
            title: "Title".into(),
            content: content.into(),
            excerpt: excerpt.map(Into::into),
            image_url: None,
            image_name: None,
            slug: "title".into(),
            status: PostStatus::Published,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn summary_prefers_excerpt() {
        let post = post_with("long body", Some("  short  "));
        assert_eq!(post.summary(3), "short");
    }

    #[test]
    fn summary_truncates_content_on_char_boundaries() {
        let post = post_with("héllo wörld", None);
        assert_eq!(post.summary(5), "héllo...");
        assert_eq!(post.summary(50), "héllo wörld");
    }

    #[test]
    fn blank_excerpt_falls_back_to_content() {
        let post = post_with("body", Some("   "));
        assert_eq!(post.summary(10), "body");
    }

    #[test]
    fn paragraphs_skip_blank_lines() {
        let post = post_with("first\n\n  second  \r\nthird\n", None);
        assert_eq!(post.paragraphs(), vec!["first", "second", "third"]);
    }

    #[test]
    fn status_round_trips_through_text() {
        assert_eq!("published".parse::<PostStatus>().unwrap(), PostStatus::Published);
        assert_eq!(PostStatus::Draft.to_string(), "draft");
        assert!("archived".parse::<PostStatus>().is_err());
        assert_eq!(
            serde_json::to_string(&PostStatus::Published).unwrap(),
            "\"published\""
        );
    }

    #[test]
    fn row_without_optional_columns_deserializes() {
        let row = serde_json::json!({
            "id": "6f1c1b52-8f3b-4f5e-9b1e-2f0d8f6f1a11",
            "title": "Hello",
            "content": "Body",
            "slug": "hello",
            "status": "draft",
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        });
        let post: Post = serde_json::from_value(row).unwrap();
        assert_eq!(post.excerpt, None);
        assert_eq!(post.status, PostStatus::Draft);
    }
}
