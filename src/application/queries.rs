use crate::application::store::TimeBlockStore;
use crate::domain::error::InvalidRangeError;
use crate::domain::models::{BlockCategory, TimeBlock, VisibleRange};
use chrono::{Duration, NaiveDate};
use std::collections::BTreeMap;

pub fn blocks_in_visible_range(
    store: &TimeBlockStore,
    range: VisibleRange,
) -> Result<Vec<TimeBlock>, InvalidRangeError> {
    store.get_blocks_in_range(range.start, range.end)
}

pub fn blocks_for_category_on_date(
    store: &TimeBlockStore,
    date: NaiveDate,
    category: &BlockCategory,
) -> Vec<TimeBlock> {
    store
        .get_blocks_for_date(date)
        .into_iter()
        .filter(|block| block.category() == category)
        .collect()
}

// Every day of the range gets an entry, empty days included.
pub fn blocks_by_date(
    store: &TimeBlockStore,
    range: VisibleRange,
) -> Result<BTreeMap<NaiveDate, Vec<TimeBlock>>, InvalidRangeError> {
    let blocks = blocks_in_visible_range(store, range)?;
    let mut grouped: BTreeMap<NaiveDate, Vec<TimeBlock>> =
        range.dates().map(|date| (date, Vec::new())).collect();
    for block in blocks {
        grouped.entry(block.start_date()).or_default().push(block);
    }
    Ok(grouped)
}

pub fn has_overlaps(blocks: &[TimeBlock]) -> bool {
    blocks.iter().enumerate().any(|(index, block)| {
        blocks[index + 1..]
            .iter()
            .any(|other| block.overlaps_with(other))
    })
}

pub fn overlapping_pairs(blocks: &[TimeBlock]) -> Vec<(TimeBlock, TimeBlock)> {
    let mut pairs = Vec::new();
    for (index, block) in blocks.iter().enumerate() {
        for other in &blocks[index + 1..] {
            if block.overlaps_with(other) {
                pairs.push((block.clone(), other.clone()));
            }
        }
    }
    pairs
}

pub fn conflicts_for(store: &TimeBlockStore, candidate: &TimeBlock) -> Vec<TimeBlock> {
    let mut conflicts: Vec<TimeBlock> = store
        .blocks_anchored_through(candidate.end_date())
        .filter(|block| block.id() != candidate.id() && block.overlaps_with(candidate))
        .cloned()
        .collect();
    conflicts.sort_by_key(TimeBlock::start_time);
    conflicts
}

pub fn total_duration_on_date(store: &TimeBlockStore, date: NaiveDate) -> Duration {
    store
        .get_blocks_for_date(date)
        .iter()
        .fold(Duration::zero(), |total, block| total + block.duration())
}
