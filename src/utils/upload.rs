use chrono::Utc;
use std::io;
use std::path::Path;
use tokio::fs::{self, File, OpenOptions};
use tokio::io::AsyncWriteExt;

const FALLBACK_EXTENSION: &str = "bin";
const MAX_NAME_ATTEMPTS: i64 = 1000;

/// Extension for a stored upload: taken from the client's filename when it has
/// a usable one, otherwise sniffed from the content.
pub fn file_extension(original_name: Option<&str>, content: &[u8]) -> String {
    let from_name = original_name
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()));

    match from_name {
        Some(ext) => ext.to_string(),
        None => infer::get(content)
            .map(|kind| kind.extension().to_string())
            .unwrap_or_else(|| FALLBACK_EXTENSION.to_string()),
    }
}

/// Creates `<epoch-ms>.<ext>` inside `dir`, bumping the timestamp while the
/// name is taken. Returns the open file and its name.
async fn reserve_file(dir: &Path, extension: &str) -> io::Result<(File, String)> {
    let mut stamp = Utc::now().timestamp_millis();

    for _ in 0..MAX_NAME_ATTEMPTS {
        let name = format!("{}.{}", stamp, extension);
        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(dir.join(&name))
            .await
        {
            Ok(file) => return Ok((file, name)),
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => stamp += 1,
            Err(err) => return Err(err),
        }
    }

    Err(io::Error::new(
        io::ErrorKind::AlreadyExists,
        format!("no free upload name near {}", stamp),
    ))
}

/// Writes `content` unmodified under a fresh timestamped name and returns that name.
pub async fn store_upload(dir: &Path, extension: &str, content: &[u8]) -> io::Result<String> {
    fs::create_dir_all(dir).await?;

    let (mut file, name) = reserve_file(dir, extension).await?;
    file.write_all(content).await?;
    file.flush().await?;

    Ok(name)
}
