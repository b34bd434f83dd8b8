use super::error::CatalogError;
use super::types::{CatalogEntry, EntryDraft, EntryPatch};
use async_trait::async_trait;

/// Object-safe interface to the external catalog collaborator.
///
/// The pipeline only ever talks to the catalog through this trait; tests run
/// against [`super::MockCatalogClient`] and production runs against
/// [`super::RestCatalogClient`]. Implementations must be shareable across
/// tasks via `Arc`.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    async fn get_entry(&self, id: &str) -> Result<CatalogEntry, CatalogError>;

    async fn create_entry(&self, draft: EntryDraft) -> Result<CatalogEntry, CatalogError>;

    async fn update_entry(&self, id: &str, patch: EntryPatch)
        -> Result<CatalogEntry, CatalogError>;

    async fn list_entries(&self) -> Result<Vec<CatalogEntry>, CatalogError>;

    async fn set_attribute(
        &self,
        entry_id: &str,
        namespace: &str,
        key: &str,
        value: &str,
    ) -> Result<(), CatalogError>;

    async fn delete_attribute(
        &self,
        entry_id: &str,
        namespace: &str,
        key: &str,
    ) -> Result<(), CatalogError>;

    async fn delete_entry(&self, id: &str) -> Result<(), CatalogError>;

    fn name(&self) -> &str;

    async fn health_check(&self) -> Result<bool, CatalogError> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::types::{DisplayMode, Visibility};

    struct TestClient;

    #[async_trait]
    impl CatalogClient for TestClient {
        async fn get_entry(&self, id: &str) -> Result<CatalogEntry, CatalogError> {
            Ok(CatalogEntry {
                id: id.to_string(),
                external_id: None,
                title: "Test".to_string(),
                description: String::new(),
                price: None,
                tags: vec![],
                images: vec![],
                options: vec![],
                variants: vec![],
                visibility: Visibility::Visible,
                display_mode: DisplayMode::Standard,
                attributes: vec![],
            })
        }

        async fn create_entry(&self, _draft: EntryDraft) -> Result<CatalogEntry, CatalogError> {
            Err(CatalogError::Api {
                message: "unsupported".to_string(),
                status: None,
            })
        }

        async fn update_entry(
            &self,
            _id: &str,
            _patch: EntryPatch,
        ) -> Result<CatalogEntry, CatalogError> {
            Err(CatalogError::Api {
                message: "unsupported".to_string(),
                status: None,
            })
        }

        async fn list_entries(&self) -> Result<Vec<CatalogEntry>, CatalogError> {
            Ok(vec![])
        }

        async fn set_attribute(
            &self,
            _entry_id: &str,
            _namespace: &str,
            _key: &str,
            _value: &str,
        ) -> Result<(), CatalogError> {
            Ok(())
        }

        async fn delete_attribute(
            &self,
            _entry_id: &str,
            _namespace: &str,
            _key: &str,
        ) -> Result<(), CatalogError> {
            Ok(())
        }

        async fn delete_entry(&self, _id: &str) -> Result<(), CatalogError> {
            Ok(())
        }

        fn name(&self) -> &str {
            "TestClient"
        }
    }

    #[tokio::test]
    async fn test_client_trait() {
        let client = TestClient;
        assert_eq!(client.name(), "TestClient");
        assert!(client.health_check().await.unwrap());
        assert_eq!(client.get_entry("e1").await.unwrap().id, "e1");
    }
}
