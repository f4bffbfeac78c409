use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use futures_util::TryStreamExt;
use log::{error, info};
use serde::{Deserialize, Serialize};

use crate::config::UploadConfig;
use crate::errors::AppError;
use crate::utils::upload::{file_extension, store_upload};

pub const UPLOAD_FIELD: &str = "profile_image";
pub const UPLOAD_URL_PREFIX: &str = "/uploads";

#[derive(Serialize, Deserialize, Debug)]
pub struct FileUploadResponse {
    pub status: bool,
    pub message: String,
    pub url: String,
}

struct ReceivedFile {
    filename: String,
    content: web::BytesMut,
}

fn upload_failed() -> AppError {
    AppError::InternalServerError("Failed to upload Profile Image".to_string())
}

/// Reads the multipart body until the photo field is found; other fields are skipped.
/// The field must carry a filename to count as a file.
async fn read_photo_field(
    payload: &mut Multipart,
    max_bytes: usize,
) -> Result<Option<ReceivedFile>, AppError> {
    let malformed = |err: actix_multipart::MultipartError| {
        error!("Malformed upload body: {}", err);
        AppError::BadRequest("Failed to upload Profile Image".to_string())
    };

    while let Some(mut field) = payload.try_next().await.map_err(malformed)? {
        let disposition = field.content_disposition();
        if disposition.get_name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let filename = disposition
            .get_filename()
            .map(str::to_string)
            .filter(|name| !name.is_empty());

        let mut content = web::BytesMut::new();
        while let Some(chunk) = field.try_next().await.map_err(malformed)? {
            if content.len() + chunk.len() > max_bytes {
                return Err(AppError::PayloadTooLarge(format!(
                    "Profile Image exceeds {} bytes",
                    max_bytes
                )));
            }
            content.extend_from_slice(&chunk);
        }

        return match filename {
            Some(filename) => Ok(Some(ReceivedFile { filename, content })),
            // An empty file input still posts the field, with no name and no bytes.
            None if content.is_empty() => Ok(None),
            None => Err(AppError::BadRequest(
                "Failed to upload Profile Image".to_string(),
            )),
        };
    }

    Ok(None)
}

pub async fn upload_file(
    upload: web::Data<UploadConfig>,
    mut payload: Multipart,
) -> Result<HttpResponse, AppError> {
    let file = match read_photo_field(&mut payload, upload.max_bytes).await? {
        Some(file) => file,
        None => return Err(AppError::BadRequest("Profile photo not found".to_string())),
    };

    let extension = file_extension(Some(&file.filename), &file.content);
    let name = store_upload(&upload.dir, &extension, &file.content)
        .await
        .map_err(|err| {
            error!("Failed to write upload into {}: {}", upload.dir.display(), err);
            upload_failed()
        })?;

    info!("Stored profile image {} ({} bytes)", name, file.content.len());

    Ok(HttpResponse::Ok().json(FileUploadResponse {
        status: true,
        message: "Profile Image URL".to_string(),
        url: format!("{}/{}", UPLOAD_URL_PREFIX, name),
    }))
}
