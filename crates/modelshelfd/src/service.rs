//! Asset service: the operations behind the HTTP routes.
//!
//! Stateless over the store. Every listing re-reads the directory and
//! re-derives names and classification, so changing the classifier tables
//! reclassifies existing uploads without touching them.

use crate::store::{AssetStore, RemoveOutcome};
use modelshelf_common::{AssetRecord, Classifier, MetadataResponse, ShelfResult, StaticClassifier};
use std::sync::Arc;
use tracing::{error, warn};

pub struct AssetService {
    store: AssetStore,
    classifier: Arc<dyn Classifier>,
}

impl AssetService {
    pub fn new(store: AssetStore) -> Self {
        Self::with_classifier(store, Arc::new(StaticClassifier::new()))
    }

    pub fn with_classifier(store: AssetStore, classifier: Arc<dyn Classifier>) -> Self {
        Self { store, classifier }
    }

    pub fn store(&self) -> &AssetStore {
        &self.store
    }

    /// Store an upload as-is and return its stored filename.
    pub async fn ingest_asset(&self, original_name: &str, content: &[u8]) -> ShelfResult<String> {
        self.store.ingest(original_name, content).await
    }

    /// Bare filenames. Empty when the store can't be read.
    pub async fn list_filenames(&self) -> Vec<String> {
        self.store.list().await
    }

    /// Filenames enriched with display name, category and description.
    pub async fn enumerate_assets(&self) -> MetadataResponse {
        match self.store.try_list().await {
            Ok(names) => MetadataResponse::ok(
                names
                    .iter()
                    .map(|name| AssetRecord::from_filename(name, self.classifier.as_ref()))
                    .collect(),
            ),
            Err(e) => {
                warn!("Metadata listing failed: {}", e);
                MetadataResponse::read_failure()
            }
        }
    }

    /// Delete a model. The outcome is for logging only, callers always report success.
    pub async fn remove_asset(&self, filename: &str) -> RemoveOutcome {
        let outcome = self.store.remove(filename).await;
        match &outcome {
            RemoveOutcome::Removed => {}
            RemoveOutcome::NotFound => warn!("Remove requested for missing model {}", filename),
            RemoveOutcome::Rejected => warn!("Remove rejected for {:?}", filename),
            RemoveOutcome::Failed(e) => error!("Failed to remove {}: {}", filename, e),
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modelshelf_common::{Category, FALLBACK_DESCRIPTION};
    use tempfile::TempDir;

    fn clock() -> u64 {
        1_712_000_000_000
    }

    fn service(temp: &TempDir) -> AssetService {
        AssetService::new(AssetStore::with_clock(temp.path(), clock))
    }

    /// Classifier that files everything under one category
    struct EverythingIsEquipment;

    impl Classifier for EverythingIsEquipment {
        fn classify(&self, _display_name: &str) -> Category {
            Category::Equipment
        }

        fn describe(&self, display_name: &str) -> String {
            format!("gear: {}", display_name)
        }
    }

    #[tokio::test]
    async fn test_ingest_then_list() {
        let temp = TempDir::new().unwrap();
        let svc = service(&temp);

        let name = svc.ingest_asset("helmet.glb", b"glb").await.unwrap();
        assert_eq!(name, "1712000000000-helmet.glb");

        let names = svc.list_filenames().await;
        assert_eq!(names.len(), 1);
        assert!(names[0].ends_with("helmet.glb"));
        let (prefix, _) = names[0].split_once('-').unwrap();
        assert!(prefix.chars().all(|c| c.is_ascii_digit()));
    }

    #[tokio::test]
    async fn test_helmet_is_general_not_equipment() {
        let temp = TempDir::new().unwrap();
        let svc = service(&temp);
        svc.ingest_asset("helmet.glb", b"glb").await.unwrap();

        let resp = svc.enumerate_assets().await;
        assert!(resp.success);
        assert!(resp.message.is_none());
        assert_eq!(resp.models.len(), 1);
        let record = &resp.models[0];
        assert_eq!(record.name, "Helmet");
        assert_eq!(record.filename, "1712000000000-helmet.glb");
        assert_eq!(record.category, Category::General);
        assert_eq!(record.description, FALLBACK_DESCRIPTION);
        assert!(record.thumbnail_url.is_none());
    }

    #[tokio::test]
    async fn test_enumerate_skips_other_files() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("readme.md"), b"x").unwrap();
        let svc = service(&temp);
        svc.ingest_asset("Cat.glb", b"glb").await.unwrap();

        let resp = svc.enumerate_assets().await;
        assert_eq!(resp.models.len(), 1);
        assert_eq!(resp.models[0].category, Category::Animals);
        assert_eq!(svc.list_filenames().await.len(), 1);
    }

    #[tokio::test]
    async fn test_enumerate_reports_read_failure() {
        let temp = TempDir::new().unwrap();
        let svc = AssetService::new(AssetStore::new(temp.path().join("gone")));

        let resp = svc.enumerate_assets().await;
        assert!(!resp.success);
        assert!(resp.models.is_empty());
        assert_eq!(resp.message.as_deref(), Some("Error reading models directory"));
        assert!(svc.list_filenames().await.is_empty());
    }

    #[tokio::test]
    async fn test_custom_classifier() {
        let temp = TempDir::new().unwrap();
        let svc = AssetService::with_classifier(
            AssetStore::with_clock(temp.path(), clock),
            Arc::new(EverythingIsEquipment),
        );
        svc.ingest_asset("cube.glb", b"glb").await.unwrap();

        let resp = svc.enumerate_assets().await;
        assert_eq!(resp.models[0].category, Category::Equipment);
        assert_eq!(resp.models[0].description, "gear: cube");
    }

    #[tokio::test]
    async fn test_remove_then_gone() {
        let temp = TempDir::new().unwrap();
        let svc = service(&temp);
        let name = svc.ingest_asset("cube.glb", b"glb").await.unwrap();

        assert!(svc.remove_asset(&name).await.is_removed());
        assert!(!svc.list_filenames().await.contains(&name));
        assert!(matches!(svc.remove_asset(&name).await, RemoveOutcome::NotFound));
    }
}
