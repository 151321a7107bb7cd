pub mod admin;
pub mod public;

use actix_web::web;

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(public::home)
        .service(public::blog_list)
        .service(public::blog_post)
        .service(admin::scope());
}
