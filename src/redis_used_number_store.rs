use redis::{Client, Commands};

use crate::used_number_store::{StoreError, UsedNumberStore};

pub const DEFAULT_REDIS_KEY: &str = "unique_phone:used_numbers";

/// Used-set kept as one JSON array under a single Redis key.
#[derive(Clone, Debug)]
pub struct RedisUsedNumberStore {
    client: Client,
    key: String,
}

impl RedisUsedNumberStore {
    pub fn new(redis_url: &str, key: impl Into<String>) -> Result<Self, StoreError> {
        let client = Client::open(redis_url)?;
        client.get_connection()?;
        Ok(RedisUsedNumberStore {
            client,
            key: key.into(),
        })
    }
}

impl UsedNumberStore for RedisUsedNumberStore {
    fn load(&self) -> Result<Vec<String>, StoreError> {
        let mut conn = self.client.get_connection()?;
        let result: Option<String> = conn.get(&self.key)?;
        match result {
            Some(value) => serde_json::from_str(&value).map_err(|source| StoreError::Malformed {
                location: format!("redis key {}", self.key),
                source,
            }),
            None => Ok(Vec::new()),
        }
    }

    fn save(&self, numbers: &[String]) -> Result<(), StoreError> {
        let mut conn = self.client.get_connection()?;
        let value = serde_json::to_string(numbers)?;
        conn.set::<_, _, ()>(&self.key, value)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    #[ignore = "requires a redis server on 127.0.0.1"]
    fn test_save_and_load() -> Result<(), Box<dyn std::error::Error>> {
        let key = format!("unique_phone:test:{}", Uuid::new_v4());
        let store = RedisUsedNumberStore::new("redis://127.0.0.1/", key.clone())?;

        assert!(store.load()?.is_empty());
        let numbers = vec!["628121234567".to_string(), "62851123456789".to_string()];
        store.save(&numbers)?;
        assert_eq!(store.load()?, numbers);

        let mut conn = store.client.get_connection()?;
        conn.del::<_, ()>(key.as_str())?;

        Ok(())
    }
}
