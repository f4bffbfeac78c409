pub mod employee;
pub mod file;
pub mod page;

use actix_files::Files;
use actix_web::web;

use crate::config::UploadConfig;
use crate::errors::AppError;

/// Registers the UI, the employee API, uploads, and the uploaded-file mount.
/// Callers provide the store and upload config as app data.
pub fn configure(cfg: &mut web::ServiceConfig, upload: &UploadConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        AppError::BadRequest(format!("Invalid request body: {}", err)).into()
    }))
    .service(web::resource("/").route(web::get().to(page::index)))
    .service(
        web::resource("/api/employees")
            .route(web::get().to(employee::get_employees))
            .route(web::post().to(employee::create_employee)),
    )
    .service(
        web::resource("/api/employees/{id}")
            .route(web::put().to(employee::update_employee))
            .route(web::delete().to(employee::delete_employee)),
    )
    .service(web::resource("/api/uploads").route(web::post().to(file::upload_file)))
    .service(Files::new(file::UPLOAD_URL_PREFIX, upload.dir.clone()));
}
