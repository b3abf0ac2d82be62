use crate::domain::error::{InvalidRangeError, ValidationError};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BlockCategory {
    #[default]
    Work,
    Meeting,
    Focus,
    Personal,
    Break,
    Custom(String),
}

impl BlockCategory {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Work => "work",
            Self::Meeting => "meeting",
            Self::Focus => "focus",
            Self::Personal => "personal",
            Self::Break => "break",
            Self::Custom(name) => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MetadataValue {
    Text(String),
    Number(f64),
    Flag(bool),
}

impl From<&str> for MetadataValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for MetadataValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for MetadataValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

pub type Metadata = BTreeMap<String, MetadataValue>;

// `metadata` is not serialized; a deserialized block carries an empty map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TimeBlockRecord", into = "TimeBlockRecord")]
pub struct TimeBlock {
    id: String,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    title: String,
    description: String,
    category: BlockCategory,
    color_hint: Option<String>,
    metadata: Metadata,
}

impl TimeBlock {
    pub fn new(
        id: impl Into<String>,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let id = id.into();
        validate_non_empty_id(&id)?;
        validate_bounds(start_time, end_time)?;
        Ok(Self {
            id,
            start_time,
            end_time,
            title: String::new(),
            description: String::new(),
            category: BlockCategory::default(),
            color_hint: None,
            metadata: Metadata::new(),
        })
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_category(mut self, category: BlockCategory) -> Self {
        self.category = category;
        self
    }

    pub fn with_color_hint(mut self, color_hint: Option<String>) -> Self {
        self.color_hint = color_hint;
        self
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn with_metadata_entry(
        mut self,
        key: impl Into<String>,
        value: impl Into<MetadataValue>,
    ) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn with_updated_time(
        &self,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        validate_bounds(start_time, end_time)?;
        Ok(Self {
            start_time,
            end_time,
            ..self.clone()
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    pub fn end_time(&self) -> DateTime<Utc> {
        self.end_time
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn category(&self) -> &BlockCategory {
        &self.category
    }

    pub fn color_hint(&self) -> Option<&str> {
        self.color_hint.as_deref()
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn metadata_value(&self, key: &str) -> Option<&MetadataValue> {
        self.metadata.get(key)
    }

    pub fn duration(&self) -> Duration {
        self.end_time - self.start_time
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_time.date_naive()
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_time.date_naive()
    }

    pub fn is_multi_day(&self) -> bool {
        self.start_date() != self.end_date()
    }

    // Half-open: blocks that merely touch do not overlap.
    pub fn overlaps_with(&self, other: &TimeBlock) -> bool {
        self.start_time < other.end_time && other.start_time < self.end_time
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TimeBlockRecord {
    id: String,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    category: BlockCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    color_hint: Option<String>,
}

impl TryFrom<TimeBlockRecord> for TimeBlock {
    type Error = ValidationError;

    fn try_from(record: TimeBlockRecord) -> Result<Self, Self::Error> {
        Ok(TimeBlock::new(record.id, record.start_time, record.end_time)?
            .with_title(record.title)
            .with_description(record.description)
            .with_category(record.category)
            .with_color_hint(record.color_hint))
    }
}

impl From<TimeBlock> for TimeBlockRecord {
    fn from(block: TimeBlock) -> Self {
        Self {
            id: block.id,
            start_time: block.start_time,
            end_time: block.end_time,
            title: block.title,
            description: block.description,
            category: block.category,
            color_hint: block.color_hint,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct VisibleRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl VisibleRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn single_day(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    pub fn validate(&self) -> Result<(), InvalidRangeError> {
        if self.start > self.end {
            return Err(InvalidRangeError {
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + use<> {
        let end = self.end;
        self.start.iter_days().take_while(move |date| *date <= end)
    }
}

fn validate_non_empty_id(id: &str) -> Result<(), ValidationError> {
    if id.trim().is_empty() {
        return Err(ValidationError::BlankId);
    }
    Ok(())
}

fn validate_bounds(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<(), ValidationError> {
    if end <= start {
        return Err(ValidationError::EndNotAfterStart { start, end });
    }
    Ok(())
}
