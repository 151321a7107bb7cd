use blog_client::StoreConfig;

const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub store: StoreConfig,
    pub max_upload_bytes: usize,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let host = var("HOST").unwrap_or_else(|| "127.0.0.1".into());
        let port = var("PORT")
            .unwrap_or_else(|| "8080".into())
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid PORT: {}", e))?;
        let url = var("BLOG_STORE_URL")
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| anyhow::anyhow!("BLOG_STORE_URL must be set"))?;
        let api_key = var("BLOG_STORE_KEY")
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| anyhow::anyhow!("BLOG_STORE_KEY must be set"))?;

        let mut store = StoreConfig::new(url.trim(), api_key.trim());
        if let Some(table) = var("BLOG_POSTS_TABLE").filter(|s| !s.trim().is_empty()) {
            store = store.with_table(table.trim());
        }
        if let Some(bucket) = var("BLOG_IMAGE_BUCKET").filter(|s| !s.trim().is_empty()) {
            store = store.with_bucket(bucket.trim());
        }

        let max_upload_bytes = match var("MAX_UPLOAD_BYTES") {
            Some(raw) => raw
                .parse()
                .map_err(|e| anyhow::anyhow!("invalid MAX_UPLOAD_BYTES: {}", e))?,
            None => DEFAULT_MAX_UPLOAD_BYTES,
        };

        Ok(Self {
            host,
            port,
            store,
            max_upload_bytes,
        })
    }
}
