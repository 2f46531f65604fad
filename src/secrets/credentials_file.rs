use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub const TOKEN_ENV_VAR: &str = "ARVANCLOUD_API_TOKEN";

#[derive(Debug, Serialize, Deserialize)]
struct CredentialsFile {
    api_token: String,
}

/// Token from `ARVANCLOUD_API_TOKEN` if set, otherwise from the credentials file
pub fn resolve_token(path: &Path) -> Result<String> {
    if let Ok(token) = std::env::var(TOKEN_ENV_VAR) {
        let token = token.trim();
        if !token.is_empty() {
            debug!("Using API token from {}", TOKEN_ENV_VAR);
            return Ok(token.to_string());
        }
    }

    load_token(path)
}

pub fn load_token(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(anyhow!(
            "Credentials file not found: {}. Use 'arvancloud-dns set-token' or set {}.",
            path.display(),
            TOKEN_ENV_VAR
        ));
    }

    warn_if_readable_by_others(path);

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read credentials file: {}", path.display()))?;

    let creds: CredentialsFile = toml::from_str(&content)
        .with_context(|| format!("Failed to parse credentials file: {}", path.display()))?;

    let token = creds.api_token.trim();
    if token.is_empty() {
        return Err(anyhow!("Credentials file {} has an empty api_token", path.display()));
    }

    debug!("Loaded API token from {}", path.display());
    Ok(token.to_string())
}

pub fn store_token(path: &Path, token: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let content = toml::to_string_pretty(&CredentialsFile {
        api_token: token.to_string(),
    })
    .context("Failed to serialize credentials")?;

    fs::write(path, &content)
        .with_context(|| format!("Failed to write credentials file: {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = fs::Permissions::from_mode(0o600);
        fs::set_permissions(path, perms)
            .with_context(|| format!("Failed to set permissions on: {}", path.display()))?;
    }

    Ok(())
}

pub fn delete_token(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(anyhow!("No credentials file at {}", path.display()));
    }

    fs::remove_file(path)
        .with_context(|| format!("Failed to remove credentials file: {}", path.display()))
}

#[cfg(unix)]
fn warn_if_readable_by_others(path: &Path) {
    use std::os::unix::fs::PermissionsExt;

    if let Ok(metadata) = fs::metadata(path) {
        let mode = metadata.permissions().mode() & 0o777;
        if mode & 0o077 != 0 {
            warn!(
                "Credentials file {} has mode {:o}, should be 0600 or 0400",
                path.display(),
                mode
            );
        }
    }
}

#[cfg(not(unix))]
fn warn_if_readable_by_others(_path: &Path) {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_and_load_token() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("credentials.toml");

        store_token(&path, "apikey secret").unwrap();

        assert_eq!(load_token(&path).unwrap(), "apikey secret");
    }

    #[cfg(unix)]
    #[test]
    fn test_stored_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.toml");
        store_token(&path, "t").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600);
    }

    #[test]
    fn test_load_empty_token_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.toml");
        fs::write(&path, "api_token = \"  \"\n").unwrap();

        assert!(load_token(&path).is_err());
    }

    #[test]
    fn test_load_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_token(&dir.path().join("missing.toml")).unwrap_err();
        assert!(err.to_string().contains("set-token"));
    }

    #[test]
    fn test_delete_token() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.toml");
        store_token(&path, "t").unwrap();

        delete_token(&path).unwrap();
        assert!(!path.exists());
        assert!(delete_token(&path).is_err());
    }
}
