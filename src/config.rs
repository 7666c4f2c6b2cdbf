use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::json_file_store::JsonFileUsedNumberStore;
use crate::redis_used_number_store::{RedisUsedNumberStore, DEFAULT_REDIS_KEY};
use crate::used_number_store::{StoreError, UsedNumberStore};

pub type SharedStore = Box<dyn UsedNumberStore + Send + Sync>;

#[derive(Debug, Parser)]
#[command(name = "unique-phone", version, about = "Issues unique synthetic Indonesian mobile numbers")]
pub struct Cli {
    /// JSON file holding every number issued so far.
    #[arg(long, env = "UNIQUE_PHONE_STORE", default_value = "used_numbers.json", global = true)]
    pub store: PathBuf,

    /// Keep the used-set in Redis instead of the JSON file.
    #[arg(long, env = "UNIQUE_PHONE_REDIS_URL", global = true)]
    pub redis_url: Option<String>,

    #[arg(long, env = "UNIQUE_PHONE_REDIS_KEY", default_value = DEFAULT_REDIS_KEY, global = true)]
    pub redis_key: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand, PartialEq, Eq)]
pub enum Command {
    /// Serve the HTTP API.
    Serve {
        #[arg(long, env = "UNIQUE_PHONE_BIND", default_value = "0.0.0.0:8080")]
        bind: String,
    },
    /// Issue one number and print it.
    Issue,
    /// Print the carrier of a number.
    Classify { phone: String },
    /// Mark a number as used.
    Record { phone: String },
    /// Collapse duplicate entries in the used-set.
    Dedup,
}

impl Cli {
    pub fn open_store(&self) -> Result<SharedStore, StoreError> {
        match &self.redis_url {
            Some(url) => {
                tracing::info!(key = %self.redis_key, "using redis used-number store");
                Ok(Box::new(RedisUsedNumberStore::new(url, self.redis_key.clone())?))
            }
            None => {
                tracing::info!(path = %self.store.display(), "using json file used-number store");
                Ok(Box::new(JsonFileUsedNumberStore::new(&self.store)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["unique-phone", "issue"]).unwrap();
        assert_eq!(cli.command, Command::Issue);
        if std::env::var("UNIQUE_PHONE_REDIS_KEY").is_err() {
            assert_eq!(cli.redis_key, DEFAULT_REDIS_KEY);
        }
    }

    #[test]
    fn test_subcommands_and_global_flags() {
        let cli = Cli::try_parse_from(["unique-phone", "classify", "628511234567", "--store", "/tmp/used.json"]).unwrap();
        assert_eq!(
            cli.command,
            Command::Classify {
                phone: "628511234567".to_string()
            }
        );
        assert_eq!(cli.store, PathBuf::from("/tmp/used.json"));

        let cli = Cli::try_parse_from(["unique-phone", "serve", "--bind", "127.0.0.1:9000"]).unwrap();
        assert_eq!(
            cli.command,
            Command::Serve {
                bind: "127.0.0.1:9000".to_string()
            }
        );
    }

    #[test]
    fn test_json_store_is_default_backend() {
        let dir = std::env::temp_dir().join(format!("unique_phone_config_{}", uuid::Uuid::new_v4()));
        let path = dir.join("used.json");
        let cli = Cli::try_parse_from(["unique-phone", "dedup", "--store", path.to_str().unwrap()]).unwrap();
        if cli.redis_url.is_some() {
            return;
        }

        let store = cli.open_store().unwrap();
        assert!(store.load().unwrap().is_empty());
        assert!(path.exists());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
