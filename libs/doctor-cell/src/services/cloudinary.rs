use anyhow::{anyhow, Result};
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tracing::{debug, error};

use shared_config::AppConfig;

pub const DOCTOR_IMAGE_FOLDER: &str = "primecare_doctors";

/// Signed-upload client for the image CDN. Uploads carry a SHA-256
/// parameter signature; the returned dimensions feed the aspect-ratio
/// validation in the roster service.
pub struct CloudinaryClient {
    client: Client,
    base_url: String,
    cloud_name: String,
    api_key: String,
    api_secret: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadedImage {
    pub secure_url: String,
    pub public_id: String,
    pub width: u32,
    pub height: u32,
}

impl CloudinaryClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.cloudinary_base_url.clone(),
            cloud_name: config.cloudinary_cloud_name.clone(),
            api_key: config.cloudinary_api_key.clone(),
            api_secret: config.cloudinary_api_secret.clone(),
        }
    }

    /// Sign the request parameters: alphabetical `key=value` pairs joined
    /// with `&`, followed by the API secret, hashed with SHA-256.
    fn signature(&self, params: &[(&str, String)]) -> String {
        let mut sorted: Vec<&(&str, String)> = params.iter().collect();
        sorted.sort_by_key(|(key, _)| *key);
        let to_sign: Vec<String> = sorted
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect();

        let mut hasher = Sha256::new();
        hasher.update(to_sign.join("&").as_bytes());
        hasher.update(self.api_secret.as_bytes());
        let digest = hasher.finalize();
        digest.iter().map(|b| format!("{:02x}", b)).collect()
    }

    /// Upload a base64 data URI and return the hosted image details.
    pub async fn upload(&self, file_data: &str, public_id: &str) -> Result<UploadedImage> {
        debug!("Uploading doctor image with public id: {}", public_id);

        let timestamp = Utc::now().timestamp().to_string();
        let signed_params = [
            ("folder", DOCTOR_IMAGE_FOLDER.to_string()),
            ("overwrite", "true".to_string()),
            ("public_id", public_id.to_string()),
            ("timestamp", timestamp.clone()),
        ];
        let signature = self.signature(&signed_params);

        let form = [
            ("file", file_data.to_string()),
            ("api_key", self.api_key.clone()),
            ("timestamp", timestamp),
            ("folder", DOCTOR_IMAGE_FOLDER.to_string()),
            ("public_id", public_id.to_string()),
            ("overwrite", "true".to_string()),
            ("signature", signature),
            ("signature_algorithm", "sha256".to_string()),
        ];

        let url = format!("{}/v1_1/{}/image/upload", self.base_url, self.cloud_name);
        let response = self.client.post(&url).form(&form).send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await?;
            error!("Image upload failed ({}): {}", status, error_text);
            return Err(anyhow!("Image upload failed ({}): {}", status, error_text));
        }

        let uploaded = response.json::<UploadedImage>().await?;
        Ok(uploaded)
    }

    /// Remove a previously uploaded image. Used to discard uploads that
    /// fail the aspect-ratio validation.
    pub async fn destroy(&self, public_id: &str) -> Result<()> {
        let timestamp = Utc::now().timestamp().to_string();
        let signed_params = [
            ("public_id", public_id.to_string()),
            ("timestamp", timestamp.clone()),
        ];
        let signature = self.signature(&signed_params);

        let form = [
            ("public_id", public_id.to_string()),
            ("api_key", self.api_key.clone()),
            ("timestamp", timestamp),
            ("signature", signature),
            ("signature_algorithm", "sha256".to_string()),
        ];

        let url = format!("{}/v1_1/{}/image/destroy", self.base_url, self.cloud_name);
        let response = self.client.post(&url).form(&form).send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await?;
            return Err(anyhow!("Image destroy failed ({}): {}", status, error_text));
        }
        Ok(())
    }
}
