use crate::domain::error::InvalidRangeError;
use crate::domain::models::{TimeBlock, VisibleRange};
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

pub type ChangeListener = Arc<dyn Fn(&StoreChange) + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeKind {
    Added { block_id: String },
    AddedBatch { count: usize },
    Updated { block_id: String },
    Removed { block_id: String },
    RemovedForDate { date: NaiveDate, count: usize },
    Cleared,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreChange {
    pub version: u64,
    pub kind: ChangeKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub trait BlockKey {
    fn block_id(&self) -> &str;
}

impl BlockKey for str {
    fn block_id(&self) -> &str {
        self
    }
}

impl BlockKey for String {
    fn block_id(&self) -> &str {
        self
    }
}

impl BlockKey for TimeBlock {
    fn block_id(&self) -> &str {
        self.id()
    }
}

#[derive(Default)]
pub struct TimeBlockStore {
    blocks_by_date: BTreeMap<NaiveDate, Vec<TimeBlock>>,
    anchors: HashMap<String, NaiveDate>,
    version: u64,
    listeners: Vec<(SubscriptionId, ChangeListener)>,
    next_subscription: u64,
}

impl fmt::Debug for TimeBlockStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimeBlockStore")
            .field("blocks_by_date", &self.blocks_by_date)
            .field("version", &self.version)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl TimeBlockStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_blocks(blocks: impl IntoIterator<Item = TimeBlock>) -> Self {
        let mut store = Self::new();
        store.add_blocks(blocks);
        store
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn size(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    pub fn contains_block(&self, id: &str) -> bool {
        self.anchors.contains_key(id)
    }

    pub fn anchor_dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.blocks_by_date.keys().copied()
    }

    pub fn get_blocks_for_date(&self, date: NaiveDate) -> Vec<TimeBlock> {
        let mut blocks = self
            .blocks_by_date
            .get(&date)
            .cloned()
            .unwrap_or_default();
        blocks.sort_by_key(TimeBlock::start_time);
        blocks
    }

    // Day-granular: a block ending just after midnight on the boundary date
    // is still included.
    pub fn get_blocks_in_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<TimeBlock>, InvalidRangeError> {
        VisibleRange::new(start, end).validate()?;

        let mut seen = HashSet::new();
        let mut blocks = Vec::new();
        for block in self
            .blocks_by_date
            .range(start..=end)
            .flat_map(|(_, anchored)| anchored)
        {
            if block.end_date() >= start && block.start_date() <= end && seen.insert(block.id()) {
                blocks.push(block.clone());
            }
        }
        blocks.sort_by_key(TimeBlock::start_time);
        Ok(blocks)
    }

    pub(crate) fn blocks_anchored_through(
        &self,
        end: NaiveDate,
    ) -> impl Iterator<Item = &TimeBlock> + '_ {
        self.blocks_by_date
            .range(..=end)
            .flat_map(|(_, anchored)| anchored)
    }

    pub fn get_block_by_id(&self, id: &str) -> Option<&TimeBlock> {
        let anchor = self.anchors.get(id)?;
        self.blocks_by_date
            .get(anchor)?
            .iter()
            .find(|block| block.id() == id)
    }

    pub fn get_all_blocks(&self) -> Vec<TimeBlock> {
        let mut blocks: Vec<TimeBlock> = self.blocks_by_date.values().flatten().cloned().collect();
        blocks.sort_by_key(TimeBlock::start_time);
        blocks
    }

    pub fn add_block(&mut self, block: TimeBlock) {
        let block_id = block.id().to_string();
        let anchor_date = self.insert(block);
        self.bump(ChangeKind::Added {
            block_id: block_id.clone(),
        });
        debug!(
            block_id = %block_id,
            anchor_date = %anchor_date,
            version = self.version,
            "time block added"
        );
    }

    // One version bump per batch; later duplicates replace earlier ones.
    pub fn add_blocks(&mut self, blocks: impl IntoIterator<Item = TimeBlock>) -> usize {
        let mut stored = HashSet::new();
        for block in blocks {
            stored.insert(block.id().to_string());
            self.insert(block);
        }
        let count = stored.len();
        if count == 0 {
            trace!("empty batch ignored");
            return 0;
        }
        self.bump(ChangeKind::AddedBatch { count });
        debug!(count, version = self.version, "time blocks added");
        count
    }

    pub fn update_block(&mut self, block: TimeBlock) -> bool {
        let Some(previous_date) = self.anchors.get(block.id()).copied() else {
            trace!(block_id = block.id(), "update skipped: block not found");
            return false;
        };

        let block_id = block.id().to_string();
        let anchor_date = self.insert(block);
        self.bump(ChangeKind::Updated {
            block_id: block_id.clone(),
        });
        debug!(
            block_id = %block_id,
            previous_date = %previous_date,
            anchor_date = %anchor_date,
            version = self.version,
            "time block updated"
        );
        true
    }

    pub fn remove_block<K: BlockKey + ?Sized>(&mut self, key: &K) -> bool {
        let block_id = key.block_id();
        let Some(removed) = self.detach(block_id) else {
            trace!(block_id, "remove skipped: block not found");
            return false;
        };

        self.bump(ChangeKind::Removed {
            block_id: removed.id().to_string(),
        });
        debug!(
            block_id = removed.id(),
            anchor_date = %removed.start_date(),
            version = self.version,
            "time block removed"
        );
        true
    }

    pub fn remove_blocks_for_date(&mut self, date: NaiveDate) -> usize {
        let Some(removed) = self.blocks_by_date.remove(&date) else {
            return 0;
        };
        for block in &removed {
            self.anchors.remove(block.id());
        }

        let count = removed.len();
        self.bump(ChangeKind::RemovedForDate { date, count });
        debug!(date = %date, count, version = self.version, "time blocks removed for date");
        count
    }

    pub fn clear(&mut self) {
        self.blocks_by_date.clear();
        self.anchors.clear();
        self.bump(ChangeKind::Cleared);
        debug!(version = self.version, "time block store cleared");
    }

    pub fn subscribe(
        &mut self,
        listener: impl Fn(&StoreChange) + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.next_subscription += 1;
        let id = SubscriptionId(self.next_subscription);
        self.listeners.push((id, Arc::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(candidate, _)| *candidate != id);
        self.listeners.len() != before
    }

    fn insert(&mut self, block: TimeBlock) -> NaiveDate {
        self.detach(block.id());
        let anchor_date = block.start_date();
        self.anchors.insert(block.id().to_string(), anchor_date);
        self.blocks_by_date.entry(anchor_date).or_default().push(block);
        anchor_date
    }

    fn detach(&mut self, id: &str) -> Option<TimeBlock> {
        let anchor_date = self.anchors.remove(id)?;
        let blocks = self.blocks_by_date.get_mut(&anchor_date)?;
        let position = blocks.iter().position(|block| block.id() == id)?;
        let removed = blocks.remove(position);
        if blocks.is_empty() {
            self.blocks_by_date.remove(&anchor_date);
        }
        Some(removed)
    }

    fn bump(&mut self, kind: ChangeKind) {
        self.version += 1;
        let change = StoreChange {
            version: self.version,
            kind,
        };
        for (_, listener) in &self.listeners {
            listener(&change);
        }
    }
}
