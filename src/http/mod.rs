use actix_web::web;

pub mod error;
pub mod routes;
pub mod validation;

use error::ApiError;

/// Registers the people routes and the JSON body handling they rely on
pub fn configure(cfg: &mut web::ServiceConfig) {
    let json_config = web::JsonConfig::default().error_handler(|err, _req| {
        log::debug!("Rejected request body: {}", err);
        ApiError::InvalidBody.into()
    });

    cfg.app_data(json_config)
        .service(routes::list_people)
        .service(routes::get_person)
        .service(routes::create_person)
        .service(routes::update_person)
        .service(routes::delete_person);
}
