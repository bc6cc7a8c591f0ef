use super::CookieJarSnapshot;
use crate::error::FileError;
use crate::helpers::write_file_atomic;
use std::fs;
use std::path::Path;

/// Loads a saved cookie jar. Any error reading or parsing the file results in `None`.
pub fn load_cookie_jar(filepath: &Path) -> Option<CookieJarSnapshot> {
    let data = match fs::read_to_string(filepath) {
        Ok(data) => data,
        Err(error) => {
            log::debug!("Could not read cookie file {}: {error}", filepath.display());
            return None;
        },
    };
    let value = match serde_json::from_str(&data) {
        Ok(value) => value,
        Err(error) => {
            log::debug!("Could not parse cookie file {}: {error}", filepath.display());
            return None;
        },
    };

    CookieJarSnapshot::from_value(&value)
}

/// Saves a cookie jar.
pub async fn save_cookie_jar(
    filepath: &Path,
    snapshot: &CookieJarSnapshot,
) -> Result<(), FileError> {
    let data = serde_json::to_vec(snapshot)?;

    write_file_atomic(filepath, &data).await?;

    Ok(())
}
