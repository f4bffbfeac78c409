use std::env;
use std::path::PathBuf;

use crate::errors::AppError;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_HASH_KEY: &str = "employees_db";
pub const DEFAULT_UPLOAD_DIR: &str = "public/uploads";
pub const DEFAULT_UPLOAD_MAX_BYTES: usize = 5 * 1024 * 1024;

/// Where uploaded photos live on disk and how large they may be.
#[derive(Debug, Clone)]
pub struct UploadConfig {
    pub dir: PathBuf,
    pub max_bytes: usize,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub database_url: Option<String>,
    pub hash_key: String,
    pub upload: UploadConfig,
}

impl AppConfig {
    /// Reads the process environment. Call `dotenv()` first to pick up `.env`.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let max_bytes = match non_empty("UPLOAD_MAX_BYTES") {
            Some(raw) => raw.trim().parse::<usize>().map_err(|_| {
                AppError::InternalServerError(format!(
                    "UPLOAD_MAX_BYTES must be a byte count, got '{}'",
                    raw
                ))
            })?,
            None => DEFAULT_UPLOAD_MAX_BYTES,
        };

        Ok(Self {
            bind_addr: non_empty("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            database_url: non_empty("DATABASE_URL"),
            hash_key: non_empty("EMPLOYEE_HASH_KEY").unwrap_or_else(|| DEFAULT_HASH_KEY.to_string()),
            upload: UploadConfig {
                dir: PathBuf::from(
                    non_empty("UPLOAD_DIR").unwrap_or_else(|| DEFAULT_UPLOAD_DIR.to_string()),
                ),
                max_bytes,
            },
        })
    }
}
