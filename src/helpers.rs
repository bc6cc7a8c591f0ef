use crate::types::HttpClient;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use futures::io::AsyncWriteExt;
use reqwest::cookie::CookieStore;
use reqwest::header;
use reqwest_middleware::ClientBuilder;

pub const USER_AGENT_STRING: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Builds a client which reads and writes cookies through `cookie_store`.
pub fn get_default_client<T>(
    cookie_store: Arc<T>,
    user_agent_string: &'static str,
) -> Result<HttpClient, reqwest::Error>
where
    T: CookieStore + 'static,
{
    let mut headers = header::HeaderMap::new();

    headers.insert(header::USER_AGENT, header::HeaderValue::from_static(user_agent_string));

    let client = reqwest::ClientBuilder::new()
        .cookie_provider(cookie_store)
        .default_headers(headers)
        .build()?;

    Ok(ClientBuilder::new(client).build())
}

/// The per-user directory where data such as cookies are stored. Falls back to the working
/// directory when no home directory can be determined.
pub fn default_data_directory() -> PathBuf {
    directories::ProjectDirs::from("", "", "fut-api")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("fut-api"))
}

/// Writes a file atomically by writing to a temporary file first and renaming it into place.
pub async fn write_file_atomic<P>(
    filepath: P,
    bytes: &[u8],
) -> std::io::Result<()>
where
    P: AsRef<Path>,
{
    let filepath = filepath.as_ref();
    let mut temp_filepath = filepath.as_os_str().to_owned();

    temp_filepath.push(".tmp");

    let temp_filepath = PathBuf::from(temp_filepath);
    let mut temp_file = async_fs::File::create(&temp_filepath).await?;

    match temp_file.write_all(bytes).await {
        Ok(_) => {
            temp_file.flush().await?;
            temp_file.sync_all().await?;
            drop(temp_file);
            async_fs::rename(&temp_filepath, filepath).await?;

            Ok(())
        },
        Err(error) => {
            // something went wrong writing to this file...
            drop(temp_file);
            let _ = async_fs::remove_file(&temp_filepath).await;

            Err(error)
        },
    }
}
