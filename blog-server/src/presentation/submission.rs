use blog_client::{BlogClientError, ImageUpload, PostStatus};
use bytes::Bytes;
use futures_util::future::ready;
use futures_util::stream::once;
use multer::{Field, Multipart};

use crate::domain::error::DomainError;
use crate::domain::form::PostForm;

/// A submitted create/edit form: the text fields plus the selected image, if any.
#[derive(Debug)]
pub struct Submission {
    pub form: PostForm,
    pub image: Option<ImageUpload>,
}

/// Parses a `multipart/form-data` body posted by the create/edit form.
pub async fn parse_submission(content_type: &str, body: Bytes) -> Result<Submission, DomainError> {
    let boundary = multer::parse_boundary(content_type)
        .map_err(|_| DomainError::Validation("the form must be sent as multipart/form-data".into()))?;
    let mut multipart = Multipart::new(once(ready(Ok::<_, std::io::Error>(body))), boundary);

    let mut form = PostForm::default();
    let mut image = None;

    while let Some(field) = multipart.next_field().await.map_err(malformed)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "title" => form.title = field.text().await.map_err(malformed)?,
            "content" => form.content = field.text().await.map_err(malformed)?,
            "excerpt" => form.excerpt = field.text().await.map_err(malformed)?,
            "status" => {
                let raw = field.text().await.map_err(malformed)?;
                form.status = raw
                    .parse::<PostStatus>()
                    .map_err(|e: BlogClientError| DomainError::Validation(e.to_string()))?;
            }
            "image" => image = read_image(field).await?,
            _ => {}
        }
    }

    Ok(Submission { form, image })
}

/// `None` when the file input was left empty.
async fn read_image(field: Field<'static>) -> Result<Option<ImageUpload>, DomainError> {
    let file_name = match field.file_name().map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => return Ok(None),
    };
    let declared = field.content_type().map(|mime| mime.essence_str().to_string());
    let bytes = field.bytes().await.map_err(malformed)?;
    if bytes.is_empty() {
        return Ok(None);
    }

    let content_type = declared
        .filter(|ct| ct != "application/octet-stream")
        .unwrap_or_else(|| {
            mime_guess::from_path(&file_name)
                .first_or_octet_stream()
                .essence_str()
                .to_string()
        });
    if !content_type.starts_with("image/") {
        return Err(DomainError::Validation(format!(
            "{file_name} is not an image"
        )));
    }

    Ok(Some(ImageUpload::new(file_name, content_type, bytes)))
}

fn malformed(err: multer::Error) -> DomainError {
    DomainError::Validation(format!("malformed form submission: {err}"))
}
