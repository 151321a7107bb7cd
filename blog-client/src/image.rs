use std::path::Path;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use rand::Rng;
use rand::distributions::Alphanumeric;
use url::Url;

const SUFFIX_LEN: usize = 8;

/// An image file selected in an admin form.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl ImageUpload {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }

    /// A fresh object name for this file, unique per call.
    pub fn object_name(&self) -> String {
        generate_object_name(&self.file_name, Utc::now())
    }
}

/// `{unix millis}-{random suffix}.{ext}`, keeping the original file's extension.
pub fn generate_object_name(file_name: &str, at: DateTime<Utc>) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SUFFIX_LEN)
        .map(|b| char::from(b).to_ascii_lowercase())
        .collect();

    match extension(file_name) {
        Some(ext) => format!("{}-{}.{}", at.timestamp_millis(), suffix, ext),
        None => format!("{}-{}", at.timestamp_millis(), suffix),
    }
}

fn extension(file_name: &str) -> Option<String> {
    let ext = Path::new(file_name).extension()?.to_str()?;
    let ext: String = ext
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect::<String>()
        .to_ascii_lowercase();
    (!ext.is_empty()).then_some(ext)
}

/// Object name of a stored image: the last path segment of its public URL.
pub fn object_name_from_url(public_url: &str) -> Option<String> {
    let url = Url::parse(public_url).ok()?;
    let name = url.path_segments()?.next_back()?;
    (!name.is_empty()).then(|| name.to_string())
}
