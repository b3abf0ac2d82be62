use crate::application::store::TimeBlockStore;
use crate::domain::models::TimeBlock;
use crate::infrastructure::error::InfraError;
use serde::{Deserialize, Serialize};
use tracing::debug;

const SNAPSHOT_SCHEMA: u8 = 1;

// Block metadata is not carried; restored blocks have an empty map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub schema: u8,
    pub blocks: Vec<TimeBlock>,
}

impl StoreSnapshot {
    pub fn to_json(&self) -> Result<String, InfraError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(raw: &str) -> Result<Self, InfraError> {
        let snapshot: StoreSnapshot = serde_json::from_str(raw)?;
        if snapshot.schema != SNAPSHOT_SCHEMA {
            return Err(InfraError::InvalidSnapshot(format!(
                "unsupported snapshot schema {}",
                snapshot.schema
            )));
        }
        Ok(snapshot)
    }
}

impl TimeBlockStore {
    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            schema: SNAPSHOT_SCHEMA,
            blocks: self.get_all_blocks(),
        }
    }

    pub fn from_snapshot(snapshot: StoreSnapshot) -> Self {
        let count = snapshot.blocks.len();
        let store = Self::from_blocks(snapshot.blocks);
        debug!(count, restored = store.size(), "time block store restored from snapshot");
        store
    }
}
