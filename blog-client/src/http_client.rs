use crate::config::StoreConfig;
use crate::error::{ApiErrorBody, BlogClientError};
use crate::image::ImageUpload;
use crate::post::{Lookup, NewPost, Post, PostChanges};
use crate::BlogStore;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, error, info};
use uuid::Uuid;

const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";
const RETURN_REPRESENTATION: &str = "return=representation";

/// `BlogStore` over the hosted REST row API and storage API.
#[derive(Clone)]
pub struct BlogClientHttp {
    client: Arc<Client>,
    config: StoreConfig,
}

impl BlogClientHttp {
    pub fn connect(mut config: StoreConfig) -> Result<Self, BlogClientError> {
        config.url = config.url.trim_end_matches('/').to_string();

        let mut headers = HeaderMap::new();
        headers.insert("apikey", header_value(&config.api_key)?);
        headers.insert(
            AUTHORIZATION,
            header_value(&format!("Bearer {}", config.api_key))?,
        );

        let client = Client::builder().default_headers(headers).build()?;
        Ok(Self {
            client: Arc::new(client),
            config,
        })
    }

    fn rows_url(&self) -> String {
        format!("{}/rest/v1/{}", self.config.url, self.config.table)
    }

    fn bucket_url(&self) -> String {
        format!("{}/storage/v1/object/{}", self.config.url, self.config.bucket)
    }

    async fn fetch_rows(&self, query: &[(&str, String)]) -> Result<Vec<Post>, BlogClientError> {
        let resp = self.client.get(self.rows_url()).query(query).send().await?;
        read_json(resp).await
    }

    async fn fetch_single(&self, query: &[(&str, String)]) -> Lookup {
        let sent = self
            .client
            .get(self.rows_url())
            .query(query)
            .header(ACCEPT, SINGLE_OBJECT)
            .send()
            .await;

        let resp = match sent {
            Ok(resp) => resp,
            Err(e) => {
                error!("row lookup failed: {}", e);
                return Lookup::TransportError(e.to_string());
            }
        };

        if resp.status().is_success() {
            return match resp.json::<Post>().await {
                Ok(post) => Lookup::Found(post),
                Err(e) => Lookup::TransportError(e.to_string()),
            };
        }

        let status = resp.status().as_u16();
        let text = resp.text().await.unwrap_or_default();
        let body = ApiErrorBody::parse(&text);
        if body.is_no_rows() {
            debug!(status, "row lookup matched nothing");
            Lookup::NotFound
        } else {
            let reason = body.message.unwrap_or(text);
            error!(status, "row lookup failed: {}", reason);
            Lookup::TransportError(format!("HTTP error {status}: {reason}"))
        }
    }

    fn single_row_write(&self, req: RequestBuilder) -> RequestBuilder {
        req.header(ACCEPT, SINGLE_OBJECT)
            .header("Prefer", RETURN_REPRESENTATION)
    }
}

#[async_trait]
impl BlogStore for BlogClientHttp {
    fn public_url(&self, object_name: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.config.url, self.config.bucket, object_name
        )
    }

    async fn list_published(&self) -> Result<Vec<Post>, BlogClientError> {
        self.fetch_rows(&[
            ("select", "*".into()),
            ("status", "eq.published".into()),
            ("order", "created_at.desc".into()),
        ])
        .await
    }

    async fn list_all(&self) -> Result<Vec<Post>, BlogClientError> {
        self.fetch_rows(&[("select", "*".into()), ("order", "created_at.desc".into())])
            .await
    }

    async fn find_published_by_slug(&self, slug: &str) -> Lookup {
        self.fetch_single(&[
            ("select", "*".into()),
            ("slug", format!("eq.{slug}")),
            ("status", "eq.published".into()),
        ])
        .await
    }

    async fn find_by_id(&self, id: Uuid) -> Lookup {
        self.fetch_single(&[("select", "*".into()), ("id", format!("eq.{id}"))])
            .await
    }

    async fn insert_post(&self, post: &NewPost) -> Result<Post, BlogClientError> {
        let req = self.single_row_write(self.client.post(self.rows_url()));
        let resp = req.json(post).send().await?;
        let created: Post = read_json(resp).await?;

        info!(post_id = %created.id, slug = %created.slug, "post inserted");
        Ok(created)
    }

    async fn update_post(&self, id: Uuid, changes: &PostChanges) -> Result<Post, BlogClientError> {
        let req = self.single_row_write(
            self.client
                .patch(self.rows_url())
                .query(&[("id", format!("eq.{id}"))]),
        );
        let resp = req.json(changes).send().await?;
        let updated: Post = read_json(resp).await?;

        info!(post_id = %id, slug = %updated.slug, "post updated");
        Ok(updated)
    }

    async fn upload_image(
        &self,
        object_name: &str,
        image: &ImageUpload,
    ) -> Result<String, BlogClientError> {
        if object_name.is_empty() || object_name.contains('/') {
            return Err(BlogClientError::InvalidRequest(format!(
                "invalid object name: {object_name:?}"
            )));
        }

        let resp = self
            .client
            .post(format!("{}/{}", self.bucket_url(), object_name))
            .header(CONTENT_TYPE, image.content_type.as_str())
            .header("cache-control", "max-age=3600")
            .header("x-upsert", "false")
            .body(image.bytes.clone())
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(BlogClientError::from_http_response(resp).await);
        }

        info!(object = %object_name, size = image.bytes.len(), "image uploaded");
        Ok(self.public_url(object_name))
    }

    async fn delete_image(&self, object_name: &str) -> Result<(), BlogClientError> {
        let resp = self
            .client
            .delete(self.bucket_url())
            .json(&json!({ "prefixes": [object_name] }))
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(BlogClientError::from_http_response(resp).await);
        }

        info!(object = %object_name, "image deleted");
        Ok(())
    }
}

fn header_value(value: &str) -> Result<HeaderValue, BlogClientError> {
    HeaderValue::from_str(value)
        .map_err(|_| BlogClientError::InvalidRequest("api key is not a valid header value".into()))
}

async fn read_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, BlogClientError> {
    if resp.status().is_success() {
        Ok(resp.json().await?)
    } else {
        Err(BlogClientError::from_http_response(resp).await)
    }
}
