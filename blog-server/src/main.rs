mod application;
mod domain;
mod infrastructure;
mod presentation;
#[cfg(test)]
mod test_support;
mod utils;

use std::sync::Arc;

use anyhow::Context;
use blog_client::{BlogClientHttp, BlogStore};

use crate::application::post_service::PostService;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::logging::init_logging;
use crate::presentation::templates::Pages;
use crate::utils::start_http_server;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let config = AppConfig::from_env().context("invalid configuration")?;
    let store: Arc<dyn BlogStore> = Arc::new(
        BlogClientHttp::connect(config.store.clone()).context("failed to build store client")?,
    );
    let post_service = PostService::new(store);
    let pages = Pages::new().context("failed to compile page templates")?;

    start_http_server(config, post_service, pages).await
}
