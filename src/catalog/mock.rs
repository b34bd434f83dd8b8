use super::client::CatalogClient;
use super::error::CatalogError;
use super::types::{
    CatalogEntry, DisplayMode, EntryDraft, EntryPatch, OptionDef, Variant, Visibility,
};
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// In-memory catalog client for unit and integration tests.
///
/// Holds entries in insertion order, records every call by operation name
/// and can be scripted to fail specific upcoming operations.
pub struct MockCatalogClient {
    state: Mutex<MockState>,
    name: String,
}

struct MockState {
    entries: Vec<CatalogEntry>,
    next_id: u64,
    calls: Vec<String>,
    failures: HashMap<String, VecDeque<Option<CatalogError>>>,
}

impl MockCatalogClient {
    pub fn new() -> Self {
        Self::with_name("MockCatalog")
    }

    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            state: Mutex::new(MockState {
                entries: Vec::new(),
                next_id: 100,
                calls: Vec::new(),
                failures: HashMap::new(),
            }),
            name: name.into(),
        }
    }

    /// Seeds an existing entry into the store.
    pub fn push_entry(&self, entry: CatalogEntry) {
        self.state.lock().unwrap().entries.push(entry);
    }

    /// Scripts the next call of `operation` to fail with `error`. Scripted
    /// outcomes for the same operation are consumed in order.
    pub fn fail_next(&self, operation: &str, error: CatalogError) {
        self.state
            .lock()
            .unwrap()
            .failures
            .entry(operation.to_string())
            .or_default()
            .push_back(Some(error));
    }

    /// Scripts the next call of `operation` to succeed, letting a later
    /// scripted failure target a specific call in a sequence.
    pub fn pass_next(&self, operation: &str) {
        self.state
            .lock()
            .unwrap()
            .failures
            .entry(operation.to_string())
            .or_default()
            .push_back(None);
    }

    /// Operation names in the order they were invoked.
    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Snapshot of all stored entries.
    pub fn entries(&self) -> Vec<CatalogEntry> {
        self.state.lock().unwrap().entries.clone()
    }

    /// Entries created through the client (generated ids), in creation order.
    pub fn created_entries(&self) -> Vec<CatalogEntry> {
        self.state
            .lock()
            .unwrap()
            .entries
            .iter()
            .filter(|e| e.id.starts_with("gen-"))
            .cloned()
            .collect()
    }

    /// Builds a minimal visible entry with one S/M/L size axis, for tests.
    pub fn entry_with_sizes(
        id: impl Into<String>,
        title: impl Into<String>,
        price: Decimal,
        sizes: &[&str],
    ) -> CatalogEntry {
        let id = id.into();
        let variants = sizes
            .iter()
            .enumerate()
            .map(|(i, size)| Variant {
                id: format!("{}-v{}", id, i + 1),
                sku: format!("{}-{}", id.to_uppercase(), size.to_uppercase()),
                option_values: vec![size.to_string()],
                price,
                compare_at_price: None,
                available: true,
                inventory_count: 10,
                weight_grams: Some(800),
            })
            .collect();

        CatalogEntry {
            id,
            external_id: None,
            title: title.into(),
            description: String::new(),
            price: Some(price),
            tags: vec![],
            images: vec![],
            options: vec![OptionDef {
                name: "Size".to_string(),
                values: sizes.iter().map(|s| s.to_string()).collect(),
            }],
            variants,
            visibility: Visibility::Visible,
            display_mode: DisplayMode::Standard,
            attributes: vec![],
        }
    }

    fn record(&self, state: &mut MockState, operation: &str) -> Result<(), CatalogError> {
        state.calls.push(operation.to_string());
        if let Some(queue) = state.failures.get_mut(operation) {
            if let Some(Some(error)) = queue.pop_front() {
                return Err(error);
            }
        }
        Ok(())
    }
}

impl Default for MockCatalogClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CatalogClient for MockCatalogClient {
    async fn get_entry(&self, id: &str) -> Result<CatalogEntry, CatalogError> {
        let mut state = self.state.lock().unwrap();
        self.record(&mut state, "get_entry")?;
        state
            .entries
            .iter()
            .find(|e| e.id == id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))
    }

    async fn create_entry(&self, draft: EntryDraft) -> Result<CatalogEntry, CatalogError> {
        let mut state = self.state.lock().unwrap();
        self.record(&mut state, "create_entry")?;

        let id = format!("gen-{}", state.next_id);
        state.next_id += 1;

        let variants = draft
            .variants
            .iter()
            .enumerate()
            .map(|(i, v)| Variant {
                id: format!("{}-v{}", id, i + 1),
                sku: v.sku.clone(),
                option_values: v.option_values.clone(),
                price: v.price,
                compare_at_price: None,
                available: v.available,
                inventory_count: v.inventory_count,
                weight_grams: v.weight_grams,
            })
            .collect::<Vec<_>>();

        let entry = CatalogEntry {
            id,
            external_id: None,
            title: draft.title,
            description: draft.description,
            price: variants.first().map(|v| v.price),
            tags: draft.tags,
            images: draft.images,
            options: draft.options,
            variants,
            visibility: draft.visibility,
            display_mode: DisplayMode::Standard,
            attributes: draft.attributes,
        };
        state.entries.push(entry.clone());
        Ok(entry)
    }

    async fn update_entry(
        &self,
        id: &str,
        patch: EntryPatch,
    ) -> Result<CatalogEntry, CatalogError> {
        let mut state = self.state.lock().unwrap();
        self.record(&mut state, "update_entry")?;

        let entry = state
            .entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))?;

        if let Some(title) = patch.title {
            entry.title = title;
        }
        if let Some(tags) = patch.tags {
            entry.tags = tags;
        }
        if let Some(display_mode) = patch.display_mode {
            entry.display_mode = display_mode;
        }
        if let Some(visibility) = patch.visibility {
            entry.visibility = visibility;
        }
        if let Some(variant_patches) = patch.variants {
            for vp in variant_patches {
                if let Some(variant) = entry.variants.iter_mut().find(|v| v.id == vp.id) {
                    if let Some(price) = vp.price {
                        variant.price = price;
                    }
                    if let Some(compare_at) = vp.compare_at_price {
                        variant.compare_at_price = Some(compare_at);
                    }
                }
            }
            entry.price = entry.variants.first().map(|v| v.price);
        }

        Ok(entry.clone())
    }

    async fn list_entries(&self) -> Result<Vec<CatalogEntry>, CatalogError> {
        let mut state = self.state.lock().unwrap();
        self.record(&mut state, "list_entries")?;
        Ok(state.entries.clone())
    }

    async fn set_attribute(
        &self,
        entry_id: &str,
        namespace: &str,
        key: &str,
        value: &str,
    ) -> Result<(), CatalogError> {
        let mut state = self.state.lock().unwrap();
        self.record(&mut state, "set_attribute")?;

        let entry = state
            .entries
            .iter_mut()
            .find(|e| e.id == entry_id)
            .ok_or_else(|| CatalogError::NotFound(entry_id.to_string()))?;

        if let Some(existing) = entry
            .attributes
            .iter_mut()
            .find(|a| a.namespace == namespace && a.key == key)
        {
            existing.value = value.to_string();
        } else {
            entry.attributes.push(super::types::Attribute {
                namespace: namespace.to_string(),
                key: key.to_string(),
                value: value.to_string(),
            });
        }
        Ok(())
    }

    async fn delete_attribute(
        &self,
        entry_id: &str,
        namespace: &str,
        key: &str,
    ) -> Result<(), CatalogError> {
        let mut state = self.state.lock().unwrap();
        self.record(&mut state, "delete_attribute")?;

        let entry = state
            .entries
            .iter_mut()
            .find(|e| e.id == entry_id)
            .ok_or_else(|| CatalogError::NotFound(entry_id.to_string()))?;
        entry
            .attributes
            .retain(|a| !(a.namespace == namespace && a.key == key));
        Ok(())
    }

    async fn delete_entry(&self, id: &str) -> Result<(), CatalogError> {
        let mut state = self.state.lock().unwrap();
        self.record(&mut state, "delete_entry")?;
        let before = state.entries.len();
        state.entries.retain(|e| e.id != id);
        if state.entries.len() == before {
            return Err(CatalogError::NotFound(id.to_string()));
        }
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
