/// Drive link client — the single point of entry for Google Drive traffic.
///
/// ARCHITECTURAL RULE: No other module may talk to Drive directly. Design
/// files are stored as links only (file id + thumbnail URL); bytes never
/// transit this service.
use reqwest::Client;
use thiserror::Error;
use tracing::{debug, warn};

const THUMBNAIL_BASE: &str = "https://drive.google.com/thumbnail";
const DEFAULT_THUMBNAIL_WIDTH: u32 = 320;
const MAX_RETRIES: u32 = 3;

#[derive(Debug, Error)]
pub enum DriveError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Drive file {file_id} not found or not shared")]
    NotFound { file_id: String },

    #[error("Drive returned status {status}")]
    Status { status: u16 },

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },
}

/// Extracts a Drive file id from a bare id or any of the common link forms:
/// `…/file/d/<id>/view`, `…/open?id=<id>`, `…/uc?id=<id>&export=download`.
pub fn parse_file_id(input: &str) -> Option<String> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Some(rest) = input.split("/file/d/").nth(1) {
        let id: String = rest
            .chars()
            .take_while(|c| *c != '/' && *c != '?' && *c != '#')
            .collect();
        return valid_id(&id).then_some(id);
    }

    if input.contains("://") {
        // Query-parameter forms: the id= value wins.
        let query = input.split(['?', '#']).nth(1)?;
        for pair in query.split('&') {
            if let Some(id) = pair.strip_prefix("id=") {
                return valid_id(id).then(|| id.to_string());
            }
        }
        return None;
    }

    valid_id(input).then(|| input.to_string())
}

/// Drive ids are URL-safe base64-ish: letters, digits, `-`, `_`, ≥ 10 chars.
fn valid_id(id: &str) -> bool {
    id.len() >= 10 && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Canonical thumbnail endpoint URL for a file id.
pub fn thumbnail_url(file_id: &str, width: u32) -> String {
    format!("{THUMBNAIL_BASE}?id={file_id}&sz=w{width}")
}

/// Thin reqwest wrapper used to probe that a linked file actually resolves.
#[derive(Clone)]
pub struct DriveClient {
    client: Client,
}

impl DriveClient {
    pub fn new() -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(15))
                .build()
                .expect("Failed to build HTTP client"),
        }
    }

    /// Checks that the file id resolves on the public thumbnail endpoint.
    /// Retries on 429 and 5xx with exponential backoff; 404 means the file is
    /// missing or not shared.
    pub async fn probe(&self, file_id: &str) -> Result<(), DriveError> {
        let url = thumbnail_url(file_id, DEFAULT_THUMBNAIL_WIDTH);
        let mut last_error: Option<DriveError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 500ms, 1s
                let delay = std::time::Duration::from_millis(500 * (1 << (attempt - 1)));
                warn!(
                    "Drive probe attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = match self.client.get(&url).send().await {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(DriveError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                last_error = Some(DriveError::Status {
                    status: status.as_u16(),
                });
                continue;
            }

            if status.as_u16() == 404 || status.as_u16() == 403 {
                return Err(DriveError::NotFound {
                    file_id: file_id.to_string(),
                });
            }

            if !status.is_success() {
                return Err(DriveError::Status {
                    status: status.as_u16(),
                });
            }

            debug!("Drive probe ok for {file_id}");
            return Ok(());
        }

        Err(last_error.unwrap_or(DriveError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }
}

impl Default for DriveClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: &str = "1a2B3c4D5e6F7g8H9i0JkLmNoP";

    #[test]
    fn test_parse_bare_id() {
        assert_eq!(parse_file_id(ID).as_deref(), Some(ID));
    }

    #[test]
    fn test_parse_file_d_url() {
        let url = format!("https://drive.google.com/file/d/{ID}/view?usp=sharing");
        assert_eq!(parse_file_id(&url).as_deref(), Some(ID));
    }

    #[test]
    fn test_parse_open_id_url() {
        let url = format!("https://drive.google.com/open?id={ID}");
        assert_eq!(parse_file_id(&url).as_deref(), Some(ID));
    }

    #[test]
    fn test_parse_uc_download_url() {
        let url = format!("https://drive.google.com/uc?export=download&id={ID}");
        assert_eq!(parse_file_id(&url).as_deref(), Some(ID));
    }

    #[test]
    fn test_parse_rejects_short_or_junk() {
        assert_eq!(parse_file_id("abc"), None);
        assert_eq!(parse_file_id(""), None);
        assert_eq!(parse_file_id("https://example.com/file.pdf"), None);
        assert_eq!(parse_file_id("has spaces in it definitely"), None);
    }

    #[test]
    fn test_parse_trims_whitespace() {
        assert_eq!(parse_file_id(&format!("  {ID}\n")).as_deref(), Some(ID));
    }

    #[test]
    fn test_thumbnail_url_shape() {
        assert_eq!(
            thumbnail_url(ID, 320),
            format!("https://drive.google.com/thumbnail?id={ID}&sz=w320")
        );
    }
}
