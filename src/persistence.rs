use async_trait::async_trait;

use crate::error::Result;
use crate::types::itinerary::CreateItinerary;

/// Gateway a completed, validated itinerary is handed to for storage.
/// The pipeline only needs the "create" contract; identity assignment and
/// the response body belong to the store.
#[async_trait]
pub trait ItineraryStore: Send + Sync {
    async fn create(&self, record: CreateItinerary) -> Result<()>;
}

/// In-memory store used by tests and the CLI dry-run path.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    records: std::sync::Mutex<Vec<CreateItinerary>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<CreateItinerary> {
        self.records.lock().expect("store lock poisoned").clone()
    }
}

#[async_trait]
impl ItineraryStore for InMemoryStore {
    async fn create(&self, record: CreateItinerary) -> Result<()> {
        self.records.lock().expect("store lock poisoned").push(record);
        Ok(())
    }
}
