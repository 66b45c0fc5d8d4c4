use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use reqwest::{RequestBuilder, Response};

use super::GalleryBackend;
use crate::config::BackendConfig;
use crate::error::{GalleryError, Result};
use crate::state::data::{ImageRecord, NewImage};

/// Hosted backend speaking the Supabase REST dialect:
/// - Storage API for the image bytes (`/storage/v1/object/...`)
/// - PostgREST for the metadata table (`/rest/v1/<table>`)
#[cfg_attr(test, derive(Debug))]
pub struct SupabaseBackend {
    client: reqwest::Client,
    project_url: String,
    api_key: String,
    bucket: String,
    table: String,
}

impl SupabaseBackend {
    pub fn new(project_url: &str, api_key: &str, bucket: &str, table: &str) -> Result<Self> {
        let project_url = project_url.trim_end_matches('/').to_string();
        if !(project_url.starts_with("https://") || project_url.starts_with("http://")) {
            return Err(GalleryError::Config(format!(
                "project_url must be an http(s) url, got {:?}",
                project_url
            )));
        }

        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self {
            client,
            project_url,
            api_key: api_key.to_string(),
            bucket: bucket.to_string(),
            table: table.to_string(),
        })
    }

    pub fn from_config(config: &BackendConfig) -> Result<Self> {
        let project_url = config
            .project_url
            .as_deref()
            .ok_or_else(|| GalleryError::Config("backend.project_url is required".to_string()))?;
        let api_key = config
            .api_key
            .as_deref()
            .ok_or_else(|| GalleryError::Config("backend.api_key is required".to_string()))?;
        Self::new(project_url, api_key, &config.bucket, &config.table)
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.project_url, self.table)
    }

    fn object_url(&self, object_name: &str) -> String {
        format!("{}/storage/v1/object/{}/{}", self.project_url, self.bucket, object_name)
    }

    fn public_prefix(&self) -> String {
        format!("{}/storage/v1/object/public/{}/", self.project_url, self.bucket)
    }

    fn authorized(&self, req: RequestBuilder) -> RequestBuilder {
        req.header("apikey", &self.api_key).bearer_auth(&self.api_key)
    }

    /// Turn non-2xx responses into `GalleryError::Status` with the body text
    async fn checked(resp: Response) -> Result<Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(GalleryError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl GalleryBackend for SupabaseBackend {
    fn backend_tag(&self) -> &'static str {
        "supabase"
    }

    async fn list_images(&self) -> Result<Vec<ImageRecord>> {
        let req = self
            .client
            .get(self.table_url())
            .query(&[("select", "*"), ("order", "created_at.desc")]);
        let resp = Self::checked(self.authorized(req).send().await?).await?;
        Ok(resp.json::<Vec<ImageRecord>>().await?)
    }

    async fn store_object(
        &self,
        object_name: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String> {
        let content_type = HeaderValue::from_str(content_type)
            .map_err(|e| GalleryError::InvalidInput(format!("content type: {}", e)))?;
        let req = self
            .client
            .post(self.object_url(object_name))
            .header(CONTENT_TYPE, content_type)
            .header("x-upsert", "false")
            .body(bytes);
        Self::checked(self.authorized(req).send().await?).await?;
        Ok(object_name.to_string())
    }

    fn public_url(&self, reference: &str) -> String {
        format!("{}{}", self.public_prefix(), reference)
    }

    async fn insert_image(&self, image: &NewImage) -> Result<ImageRecord> {
        let req = self
            .client
            .post(self.table_url())
            .header("Prefer", "return=representation")
            .json(image);
        let resp = Self::checked(self.authorized(req).send().await?).await?;

        // PostgREST answers inserts with an array of the created rows
        let rows: Vec<ImageRecord> = resp.json().await?;
        rows.into_iter().next().ok_or_else(|| {
            GalleryError::Serialization("insert returned no rows".to_string())
        })
    }

    async fn delete_image(&self, id: &str) -> Result<()> {
        let req = self
            .client
            .delete(self.table_url())
            .query(&[("id", format!("eq.{}", id))])
            .header("Prefer", "return=representation");
        let resp = Self::checked(self.authorized(req).send().await?).await?;

        let rows: Vec<ImageRecord> = resp.json().await?;
        if rows.is_empty() {
            return Err(GalleryError::NotFound(format!("image {}", id)));
        }
        Ok(())
    }

    async fn remove_object(&self, reference: &str) -> Result<()> {
        let req = self.client.delete(self.object_url(reference));
        Self::checked(self.authorized(req).send().await?).await?;
        Ok(())
    }

    fn object_name_for_url(&self, url: &str) -> Option<String> {
        url.strip_prefix(&self.public_prefix())
            .filter(|name| !name.is_empty())
            .map(str::to_string)
    }

    async fn fetch_object(&self, url: &str) -> Result<Vec<u8>> {
        let resp = Self::checked(self.client.get(url).send().await?).await?;
        Ok(resp.bytes().await?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BackendKind;

    fn backend() -> SupabaseBackend {
        SupabaseBackend::new("https://demo.supabase.co/", "anon-key", "images", "images").unwrap()
    }

    #[test]
    fn test_endpoint_urls() {
        let b = backend();
        assert_eq!(b.table_url(), "https://demo.supabase.co/rest/v1/images");
        assert_eq!(
            b.object_url("1.png"),
            "https://demo.supabase.co/storage/v1/object/images/1.png"
        );
        assert_eq!(
            b.public_url("1.png"),
            "https://demo.supabase.co/storage/v1/object/public/images/1.png"
        );
    }

    #[test]
    fn test_object_name_from_public_url() {
        let b = backend();
        let url = b.public_url("1700000000000-abc.jpg");
        assert_eq!(
            b.object_name_for_url(&url).as_deref(),
            Some("1700000000000-abc.jpg")
        );
        assert_eq!(b.object_name_for_url("https://cdn.example.com/1.jpg"), None);
        assert_eq!(b.object_name_for_url(&b.public_prefix()), None);
    }

    #[test]
    fn test_config_requires_credentials() {
        let mut config = BackendConfig {
            kind: BackendKind::Supabase,
            ..BackendConfig::default()
        };
        assert!(matches!(
            SupabaseBackend::from_config(&config),
            Err(GalleryError::Config(_))
        ));

        config.project_url = Some("https://demo.supabase.co".to_string());
        assert!(SupabaseBackend::from_config(&config).is_err());

        config.api_key = Some("anon".to_string());
        assert!(SupabaseBackend::from_config(&config).is_ok());
    }

    #[test]
    fn test_rejects_non_http_project_url() {
        let err = SupabaseBackend::new("ftp://demo", "k", "images", "images").unwrap_err();
        assert!(matches!(err, GalleryError::Config(_)));
    }
}
