use chrono::{Datelike, NaiveDate};
use s3::creds::Credentials;
use s3::{Bucket, BucketConfiguration, Region};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::core::config::StorageConfig;
use crate::core::error::AppError;

/// Key and URL layout for stored objects.
///
/// Kept separate from the bucket handle so it can be used without a
/// live storage endpoint.
#[derive(Debug, Clone)]
pub struct ObjectPaths {
    endpoint: String,
    public_endpoint: String,
    bucket: String,
    prefix: String,
}

impl ObjectPaths {
    pub fn new(endpoint: &str, public_endpoint: &str, bucket: &str, prefix: &str) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            public_endpoint: public_endpoint.trim_end_matches('/').to_string(),
            bucket: bucket.to_string(),
            prefix: prefix.trim_matches('/').to_string(),
        }
    }

    /// `<prefix>/<project or "unassigned">/<yyyy>/<mm>/<uuid>.<ext>`
    pub fn generate_key(&self, project_id: Option<Uuid>, today: NaiveDate, extension: &str) -> String {
        let scope = project_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "unassigned".to_string());
        let extension = extension.trim_start_matches('.').to_ascii_lowercase();

        let mut key = String::new();
        if !self.prefix.is_empty() {
            key.push_str(&self.prefix);
            key.push('/');
        }
        key.push_str(&format!(
            "{}/{:04}/{:02}/{}.{}",
            scope,
            today.year(),
            today.month(),
            Uuid::now_v7(),
            extension
        ));
        key
    }

    /// Direct URL served through the public endpoint
    pub fn public_url(&self, key: &str) -> String {
        format!("{}/{}/{}", self.public_endpoint, self.bucket, key)
    }

    /// Reverse of [`public_url`](Self::public_url). Accepts either endpoint.
    pub fn key_from_url(&self, url: &str) -> Option<String> {
        [&self.public_endpoint, &self.endpoint]
            .iter()
            .map(|base| format!("{}/{}/", base, self.bucket))
            .find_map(|base| url.strip_prefix(base.as_str()).map(str::to_string))
            .filter(|key| !key.is_empty())
    }
}

/// S3-compatible bucket client
pub struct StorageClient {
    bucket: Box<Bucket>,
    region: Region,
    credentials: Credentials,
    paths: ObjectPaths,
}

impl StorageClient {
    /// Build the client and make sure the bucket exists
    pub async fn new(config: StorageConfig) -> Result<Self, AppError> {
        let credentials = Credentials::new(
            Some(&config.access_key),
            Some(&config.secret_key),
            None,
            None,
            None,
        )
        .map_err(|e| AppError::Storage(format!("Invalid storage credentials: {}", e)))?;

        let region = Region::Custom {
            region: config.region.clone(),
            endpoint: config.endpoint.clone(),
        };

        let mut bucket = Bucket::new(&config.bucket, region.clone(), credentials.clone())
            .map_err(|e| AppError::Storage(format!("Failed to open bucket: {}", e)))?;

        // http://endpoint/bucket rather than http://bucket.endpoint
        bucket.set_path_style();

        let paths = ObjectPaths::new(
            &config.endpoint,
            &config.public_endpoint,
            &config.bucket,
            &config.prefix,
        );

        let client = Self {
            bucket,
            region,
            credentials,
            paths,
        };

        client.ensure_bucket_exists().await;

        info!(
            "Storage client initialized for endpoint: {}, bucket: {}",
            config.endpoint,
            client.bucket.name()
        );

        Ok(client)
    }

    /// Create the bucket if missing. Failures are logged, not fatal.
    async fn ensure_bucket_exists(&self) {
        let result = Bucket::create_with_path_style(
            &self.bucket.name(),
            self.region.clone(),
            self.credentials.clone(),
            BucketConfiguration::default(),
        )
        .await;

        match result {
            Ok(_) => info!("Bucket '{}' created", self.bucket.name()),
            Err(e) => {
                let message = e.to_string();
                if message.contains("BucketAlreadyOwnedByYou")
                    || message.contains("BucketAlreadyExists")
                {
                    debug!("Bucket '{}' already exists", self.bucket.name());
                } else {
                    warn!(
                        "Could not create bucket '{}': {}. Assuming it exists.",
                        self.bucket.name(),
                        e
                    );
                }
            }
        }
    }

    pub fn paths(&self) -> &ObjectPaths {
        &self.paths
    }

    pub async fn upload(&self, key: &str, data: &[u8], content_type: &str) -> Result<(), AppError> {
        self.bucket
            .put_object_with_content_type(key, data, content_type)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to upload '{}': {}", key, e)))?;

        debug!("Uploaded '{}' to bucket '{}'", key, self.bucket.name());
        Ok(())
    }

    pub async fn delete(&self, key: &str) -> Result<(), AppError> {
        self.bucket
            .delete_object(key)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to delete '{}': {}", key, e)))?;

        debug!("Deleted '{}' from bucket '{}'", key, self.bucket.name());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths() -> ObjectPaths {
        ObjectPaths::new(
            "http://minio:9000",
            "https://cdn.example.com/",
            "fieldsite-photos",
            "photos",
        )
    }

    #[test]
    fn test_generate_key_layout() {
        let project = Uuid::new_v4();
        let today = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();

        let key = paths().generate_key(Some(project), today, ".JPG");
        let expected_prefix = format!("photos/{}/2024/03/", project);
        assert!(key.starts_with(&expected_prefix), "{key}");
        assert!(key.ends_with(".jpg"));

        let key = paths().generate_key(None, today, "png");
        assert!(key.starts_with("photos/unassigned/2024/03/"));
    }

    #[test]
    fn test_public_url_round_trips_to_key() {
        let p = paths();
        let url = p.public_url("photos/a/b.jpg");
        assert_eq!(url, "https://cdn.example.com/fieldsite-photos/photos/a/b.jpg");
        assert_eq!(p.key_from_url(&url).as_deref(), Some("photos/a/b.jpg"));

        let internal = "http://minio:9000/fieldsite-photos/photos/x.png";
        assert_eq!(p.key_from_url(internal).as_deref(), Some("photos/x.png"));
    }

    #[test]
    fn test_key_from_foreign_url_is_none() {
        assert!(paths()
            .key_from_url("https://elsewhere.example.com/fieldsite-photos/a.jpg")
            .is_none());
        assert!(paths()
            .key_from_url("https://cdn.example.com/fieldsite-photos/")
            .is_none());
    }
}
