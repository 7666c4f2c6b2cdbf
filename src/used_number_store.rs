use std::path::PathBuf;
use std::sync::RwLock;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed used-number data in {location}: {source}")]
    Malformed {
        location: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),
    #[error("Store lock poisoned: {0}")]
    Poisoned(String),
}

/// Durable home of the used-set. Reads and writes are whole-collection;
/// `save` replaces whatever was stored before.
pub trait UsedNumberStore {
    fn load(&self) -> Result<Vec<String>, StoreError>;
    fn save(&self, numbers: &[String]) -> Result<(), StoreError>;
}

impl<S: UsedNumberStore + ?Sized> UsedNumberStore for Box<S> {
    fn load(&self) -> Result<Vec<String>, StoreError> {
        (**self).load()
    }

    fn save(&self, numbers: &[String]) -> Result<(), StoreError> {
        (**self).save(numbers)
    }
}

pub struct InMemoryUsedNumberStore {
    numbers: RwLock<Vec<String>>,
}

impl InMemoryUsedNumberStore {
    pub fn new() -> Self {
        Self::with_numbers(Vec::new())
    }

    pub fn with_numbers(numbers: Vec<String>) -> Self {
        InMemoryUsedNumberStore {
            numbers: RwLock::new(numbers),
        }
    }
}

impl Default for InMemoryUsedNumberStore {
    fn default() -> Self {
        Self::new()
    }
}

impl UsedNumberStore for InMemoryUsedNumberStore {
    fn load(&self) -> Result<Vec<String>, StoreError> {
        let numbers = self.numbers.read().map_err(|e| StoreError::Poisoned(e.to_string()))?;
        Ok(numbers.clone())
    }

    fn save(&self, numbers: &[String]) -> Result<(), StoreError> {
        let mut stored = self.numbers.write().map_err(|e| StoreError::Poisoned(e.to_string()))?;
        *stored = numbers.to_vec();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_replaces_contents() {
        let store = InMemoryUsedNumberStore::with_numbers(vec!["628111111111".to_string()]);
        assert_eq!(store.load().unwrap(), vec!["628111111111".to_string()]);

        store.save(&["628122222222".to_string(), "628133333333".to_string()]).unwrap();
        assert_eq!(
            store.load().unwrap(),
            vec!["628122222222".to_string(), "628133333333".to_string()]
        );
    }

    #[test]
    fn test_boxed_store_delegates() {
        let store: Box<dyn UsedNumberStore> = Box::new(InMemoryUsedNumberStore::new());
        assert!(store.load().unwrap().is_empty());
        store.save(&["628111111111".to_string()]).unwrap();
        assert_eq!(store.load().unwrap().len(), 1);
    }
}
