pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::bootstrap::{bootstrap, BootstrapResult};
pub use application::queries::{
    blocks_by_date, blocks_for_category_on_date, blocks_in_visible_range, conflicts_for,
    has_overlaps, overlapping_pairs, total_duration_on_date,
};
pub use application::shared_store::SharedTimeBlockStore;
pub use application::snapshot::StoreSnapshot;
pub use application::store::{
    BlockKey, ChangeKind, ChangeListener, StoreChange, SubscriptionId, TimeBlockStore,
};
pub use domain::error::{InvalidRangeError, ValidationError};
pub use domain::models::{BlockCategory, Metadata, MetadataValue, TimeBlock, VisibleRange};
pub use infrastructure::config::StoreConfig;
pub use infrastructure::error::InfraError;
