use tracing::{error, info};
use uuid::Uuid;

use crate::error::{FixtureError, Result};

/// Simple Discord webhook client encapsulating the hook URL.
#[derive(Debug, Clone)]
pub struct Discord {
    hook_url: String,
}

impl Discord {
    /// Create a new Discord client with the provided webhook URL.
    pub fn new(hook_url: String) -> Self {
        Self { hook_url }
    }

    /// Post a simple text message to the webhook URL.
    pub fn post(&self, content: &str) -> Result<()> {
        let payload = serde_json::json!({ "content": content });
        match ureq::post(&self.hook_url).send_json(payload) {
            Ok(resp) => {
                info!(status = resp.status().as_u16(), "Posted message to Discord webhook");
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Failed to post to Discord webhook");
                Err(FixtureError::DeliveryFailed(format!("Failed to post to Discord webhook: {}", e)))
            }
        }
    }

    /// Post a message with one file attached (multipart/form-data).
    pub fn post_with_attachment(&self, content: &str, filename: &str, bytes: &[u8]) -> Result<()> {
        let boundary = new_boundary();
        let body = multipart_body(&boundary, content, filename, bytes);
        let content_type = format!("multipart/form-data; boundary={}", boundary);
        match ureq::post(&self.hook_url)
            .header("Content-Type", &content_type)
            .send(&body[..])
        {
            Ok(resp) => {
                info!(status = resp.status().as_u16(), filename, size = bytes.len(), "Posted attachment to Discord webhook");
                Ok(())
            }
            Err(e) => {
                error!(error = %e, filename, "Failed to post attachment to Discord webhook");
                Err(FixtureError::DeliveryFailed(format!("Failed to post attachment to Discord webhook: {}", e)))
            }
        }
    }
}

/// Multipart boundary, fresh for every request.
pub fn new_boundary() -> String {
    format!("fixture-card-{}", Uuid::new_v4().simple())
}

/// Discord expects the message as a `payload_json` part and the file as `files[0]`.
pub fn multipart_body(boundary: &str, content: &str, filename: &str, bytes: &[u8]) -> Vec<u8> {
    let payload = serde_json::json!({ "content": content }).to_string();
    let mime = if filename.ends_with(".png") { "image/png" } else { "application/octet-stream" };

    let mut body = Vec::with_capacity(bytes.len() + payload.len() + 512);
    body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
    body.extend_from_slice(b"Content-Disposition: form-data; name=\"payload_json\"\r\n");
    body.extend_from_slice(b"Content-Type: application/json\r\n\r\n");
    body.extend_from_slice(payload.as_bytes());
    body.extend_from_slice(format!("\r\n--{}\r\n", boundary).as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"files[0]\"; filename=\"{}\"\r\n", filename).as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", mime).as_bytes());
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());
    body
}
