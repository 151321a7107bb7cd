pub const DEFAULT_TABLE: &str = "posts";
pub const DEFAULT_BUCKET: &str = "blog-images";

/// Where the hosted table and object store live, and the key used to reach them.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub url: String,
    pub api_key: String,
    pub table: String,
    pub bucket: String,
}

impl StoreConfig {
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            url: url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            table: DEFAULT_TABLE.into(),
            bucket: DEFAULT_BUCKET.into(),
        }
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    pub fn with_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = bucket.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_trims_url_and_applies_defaults() {
        let config = StoreConfig::new("https://store.test/", "anon").with_bucket("covers");

        assert_eq!(config.url, "https://store.test");
        assert_eq!(config.table, DEFAULT_TABLE);
        assert_eq!(config.bucket, "covers");
    }
}
