use crate::application::store::TimeBlockStore;
use crate::infrastructure::error::InfraError;
use std::sync::Mutex;

#[derive(Debug, Default)]
pub struct SharedTimeBlockStore {
    store: Mutex<TimeBlockStore>,
}

impl SharedTimeBlockStore {
    pub fn new(store: TimeBlockStore) -> Self {
        Self {
            store: Mutex::new(store),
        }
    }

    pub fn read<T>(&self, reader: impl FnOnce(&TimeBlockStore) -> T) -> Result<T, InfraError> {
        let store = self
            .store
            .lock()
            .map_err(|error| InfraError::LockPoisoned(format!("time block store lock poisoned: {error}")))?;
        Ok(reader(&store))
    }

    pub fn write<T>(
        &self,
        writer: impl FnOnce(&mut TimeBlockStore) -> T,
    ) -> Result<T, InfraError> {
        let mut store = self
            .store
            .lock()
            .map_err(|error| InfraError::LockPoisoned(format!("time block store lock poisoned: {error}")))?;
        Ok(writer(&mut store))
    }

    pub fn version(&self) -> Result<u64, InfraError> {
        self.read(TimeBlockStore::version)
    }

    pub fn into_inner(self) -> Result<TimeBlockStore, InfraError> {
        self.store
            .into_inner()
            .map_err(|error| InfraError::LockPoisoned(format!("time block store lock poisoned: {error}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::TimeBlock;
    use chrono::{DateTime, Duration, Utc};
    use std::sync::Arc;
    use std::thread;

    fn fixed_time(value: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(value)
            .expect("valid datetime")
            .with_timezone(&Utc)
    }

    #[test]
    fn concurrent_writers_each_bump_once() {
        let shared = Arc::new(SharedTimeBlockStore::default());
        let base = fixed_time("2026-02-16T08:00:00Z");

        let handles: Vec<_> = (0..8i64)
            .map(|worker| {
                let shared = Arc::clone(&shared);
                thread::spawn(move || {
                    let start = base + Duration::hours(worker);
                    let block = TimeBlock::new(format!("blk-{worker}"), start, start + Duration::minutes(30))
                        .expect("valid block");
                    shared.write(|store| store.add_block(block)).expect("write store");
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("writer thread");
        }

        assert_eq!(shared.read(TimeBlockStore::size).expect("read store"), 8);
        assert_eq!(shared.version().expect("read version"), 8);
    }

    #[test]
    fn poisoned_lock_surfaces_as_error() {
        let shared = Arc::new(SharedTimeBlockStore::default());
        let poisoner = Arc::clone(&shared);
        let _ = thread::spawn(move || {
            let _: Result<(), InfraError> = poisoner.write(|_| panic!("writer crashed"));
        })
        .join();

        assert!(matches!(shared.version(), Err(InfraError::LockPoisoned(_))));
    }
}
