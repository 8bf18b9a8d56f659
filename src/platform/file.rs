//! Local filesystem publisher implementation.
//!
//! Writes one JSON state document per package plus one file per
//! notification id, so anything that can read a directory can consume
//! tracker output.
//!
//! ## State Layout
//!
//! ```text
//! {root}/
//! ├── AJ123456789BR.json          # latest derived view + availability
//! └── notifications/
//!     └── anjun_gift_aj123456789br_update.json
//! ```

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::PackageConfig;
use crate::platform::{
    ATTRIBUTION, DeviceInfo, FieldUpdate, Notification, StatePublisher,
};

/// State document written for one package.
#[derive(Debug, Serialize)]
struct PackageState<'a> {
    tracking_number: &'a str,
    package_name: &'a str,
    updated_at: DateTime<Utc>,
    available: bool,
    attribution: &'static str,
    device: DeviceInfo,
    fields: &'a [FieldUpdate],
}

/// Notification document, kept one file per id.
#[derive(Debug, Serialize)]
struct NotificationRecord<'a> {
    id: &'a str,
    title: &'a str,
    message: &'a str,
    raised_at: DateTime<Utc>,
}

/// Local filesystem publisher backend.
#[derive(Debug, Clone)]
pub struct FileStatePublisher {
    root_dir: PathBuf,
}

impl FileStatePublisher {
    /// Create a publisher rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    /// State document key for a tracking number.
    fn state_key(tracking_number: &str) -> String {
        format!("{}.json", tracking_number.to_uppercase())
    }

    /// Notification document key; same id means same file.
    fn notification_key(id: &str) -> String {
        format!("notifications/{}.json", id)
    }

    /// Get the full path for a relative key.
    fn path(&self, key: &str) -> PathBuf {
        self.root_dir.join(key)
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(&self, path: &PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let path = self.path(key);
        self.ensure_dir(&path).await?;

        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    /// Write JSON data.
    async fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(value)?;
        self.write_bytes(key, &bytes).await
    }

    /// Read bytes, returning None if file doesn't exist.
    async fn read_bytes(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path(key);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    /// Read JSON data.
    async fn read_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.read_bytes(key).await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl StatePublisher for FileStatePublisher {
    async fn publish_fields(&self, package: &PackageConfig, updates: &[FieldUpdate]) -> Result<()> {
        let state = PackageState {
            tracking_number: &package.tracking_number,
            package_name: &package.name,
            updated_at: Utc::now(),
            available: true,
            attribution: ATTRIBUTION,
            device: DeviceInfo::for_package(package),
            fields: updates,
        };
        self.write_json(&Self::state_key(&package.tracking_number), &state)
            .await
    }

    async fn publish_notification(&self, notification: &Notification) -> Result<()> {
        let record = NotificationRecord {
            id: &notification.id,
            title: &notification.title,
            message: &notification.message,
            raised_at: Utc::now(),
        };
        self.write_json(&Self::notification_key(&notification.id), &record)
            .await
    }

    async fn publish_availability(&self, package: &PackageConfig, available: bool) -> Result<()> {
        let key = Self::state_key(&package.tracking_number);

        // Flip the flag in place so the last published fields stay readable.
        match self.read_json::<Value>(&key).await? {
            Some(mut state) => {
                if let Some(doc) = state.as_object_mut() {
                    doc.insert("available".to_string(), Value::from(available));
                    doc.insert(
                        "updated_at".to_string(),
                        serde_json::to_value(Utc::now())?,
                    );
                }
                self.write_json(&key, &state).await
            }
            None => {
                let stub = serde_json::json!({
                    "tracking_number": package.tracking_number,
                    "package_name": package.name,
                    "updated_at": Utc::now(),
                    "available": available,
                });
                self.write_json(&key, &stub).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{TrackingEvent, TrackingSnapshot, TrackingView};
    use crate::platform::entities::field_updates;
    use tempfile::TempDir;

    fn make_package() -> PackageConfig {
        PackageConfig {
            tracking_number: "AJ123456789BR".to_string(),
            name: "Birthday Gift".to_string(),
            interval_minutes: None,
        }
    }

    fn make_updates() -> Vec<FieldUpdate> {
        let snapshot = TrackingSnapshot {
            events: vec![TrackingEvent {
                date: Some("2024-05-01T10:00:00Z".to_string()),
                status: Some("Em trânsito".to_string()),
                address: Some("Cajamar - SP".to_string()),
                remark: None,
            }],
            collect_order: None,
        };
        field_updates(&make_package(), &TrackingView::from_snapshot(&snapshot))
    }

    #[tokio::test]
    async fn test_publish_fields_writes_state_document() {
        let tmp = TempDir::new().unwrap();
        let publisher = FileStatePublisher::new(tmp.path());

        publisher
            .publish_fields(&make_package(), &make_updates())
            .await
            .unwrap();

        let state: Value = publisher
            .read_json("AJ123456789BR.json")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(state["available"], true);
        assert_eq!(state["attribution"], "Data provided by Anjun Express");
        assert_eq!(state["device"]["manufacturer"], "Anjun Express");
        assert_eq!(state["fields"].as_array().unwrap().len(), 5);
        assert_eq!(state["fields"][0]["value"], "Em trânsito");
    }

    #[tokio::test]
    async fn test_same_notification_id_overwrites() {
        let tmp = TempDir::new().unwrap();
        let publisher = FileStatePublisher::new(tmp.path());

        let first = Notification {
            id: "anjun_gift_aj123_update".to_string(),
            title: "📦 Package Update: Gift".to_string(),
            message: "first".to_string(),
        };
        let second = Notification {
            message: "second".to_string(),
            ..first.clone()
        };

        publisher.publish_notification(&first).await.unwrap();
        publisher.publish_notification(&second).await.unwrap();

        let record: Value = publisher
            .read_json("notifications/anjun_gift_aj123_update.json")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record["message"], "second");

        let entries = std::fs::read_dir(tmp.path().join("notifications"))
            .unwrap()
            .count();
        assert_eq!(entries, 1);
    }

    #[tokio::test]
    async fn test_availability_flip_keeps_fields() {
        let tmp = TempDir::new().unwrap();
        let publisher = FileStatePublisher::new(tmp.path());
        let package = make_package();

        publisher
            .publish_fields(&package, &make_updates())
            .await
            .unwrap();
        publisher
            .publish_availability(&package, false)
            .await
            .unwrap();

        let state: Value = publisher
            .read_json("AJ123456789BR.json")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(state["available"], false);
        assert_eq!(state["fields"].as_array().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_availability_without_state_writes_stub() {
        let tmp = TempDir::new().unwrap();
        let publisher = FileStatePublisher::new(tmp.path());

        publisher
            .publish_availability(&make_package(), false)
            .await
            .unwrap();

        let state: Value = publisher
            .read_json("AJ123456789BR.json")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(state["available"], false);
        assert_eq!(state["tracking_number"], "AJ123456789BR");
        assert!(state.get("fields").is_none());
    }

    #[tokio::test]
    async fn test_state_key_uppercases_tracking() {
        let tmp = TempDir::new().unwrap();
        let publisher = FileStatePublisher::new(tmp.path());

        let package = PackageConfig {
            tracking_number: "aj123456789br".to_string(),
            ..make_package()
        };
        publisher
            .publish_fields(&package, &make_updates())
            .await
            .unwrap();

        assert!(tmp.path().join("AJ123456789BR.json").exists());
    }
}
