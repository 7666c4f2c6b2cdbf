use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};
use thiserror::Error;

use crate::candidate_generator::{CandidateGenerator, RandomCandidateGenerator};
use crate::identifier::normalize;
use crate::metrics::IssuerMetrics;
use crate::used_number_store::{StoreError, UsedNumberStore};

#[derive(Debug, Error)]
pub enum IssueError {
    #[error("Unable to generate unique phone number after {attempts} attempts")]
    GenerationExhausted { attempts: u32 },
    #[error("Invalid phone number: {0:?}")]
    InvalidIdentifier(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Bounds for the collision retry loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Failed attempts after which the used-set is deduplicated once.
    pub dedup_after: Option<u32>,
    pub max_attempts: u32,
}

impl RetryPolicy {
    pub const fn durable() -> Self {
        RetryPolicy {
            dedup_after: Some(100),
            max_attempts: 200,
        }
    }

    pub const fn session() -> Self {
        RetryPolicy {
            dedup_after: None,
            max_attempts: 1000,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::durable()
    }
}

/// Collapses `numbers` to distinct entries, keeping first occurrences.
/// Returns how many entries were dropped.
pub fn dedup_numbers(numbers: &mut Vec<String>) -> usize {
    let before = numbers.len();
    let mut seen = HashSet::with_capacity(before);
    numbers.retain(|number| seen.insert(number.clone()));
    before - numbers.len()
}

/// Issues phone numbers that are unique against a [`UsedNumberStore`].
///
/// Every operation is a full read-check-write cycle against the store,
/// serialized by an internal lock. Several issuers sharing one store from
/// different processes are not coordinated.
pub struct NumberIssuer<S, G = RandomCandidateGenerator> {
    store: S,
    generator: G,
    policy: RetryPolicy,
    metrics: Option<IssuerMetrics>,
    lock: Mutex<()>,
}

impl<S: UsedNumberStore> NumberIssuer<S> {
    pub fn new(store: S) -> Self {
        Self::with_generator(store, RandomCandidateGenerator::new())
    }
}

impl<S: UsedNumberStore, G: CandidateGenerator> NumberIssuer<S, G> {
    pub fn with_generator(store: S, generator: G) -> Self {
        NumberIssuer {
            store,
            generator,
            policy: RetryPolicy::durable(),
            metrics: None,
            lock: Mutex::new(()),
        }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_metrics(mut self, metrics: IssuerMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn issue(&self) -> Result<String, IssueError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut used = self.store.load()?;
        let seen: HashSet<String> = used.iter().cloned().collect();

        let mut fresh = None;
        for attempt in 1..=self.policy.max_attempts {
            if self.policy.dedup_after.map(|after| after + 1) == Some(attempt) {
                tracing::warn!(attempt, "collision retries piling up, deduplicating used-set");
                let removed = dedup_numbers(&mut used);
                self.store.save(&used)?;
                self.observe(|m| m.dedup_passes.inc());
                tracing::info!(removed, remaining = used.len(), "used-set deduplicated");
            }

            let candidate = self.generator.generate();
            if !seen.contains(&candidate) {
                fresh = Some(candidate);
                break;
            }
            tracing::debug!(attempt, candidate = %candidate, "candidate already used");
            self.observe(|m| m.collisions.inc());
        }

        let phone = match fresh {
            Some(phone) => phone,
            None => {
                self.observe(|m| m.exhausted.inc());
                tracing::error!(attempts = self.policy.max_attempts, "unable to generate unique phone number");
                return Err(IssueError::GenerationExhausted {
                    attempts: self.policy.max_attempts,
                });
            }
        };

        used.push(phone.clone());
        self.store.save(&used)?;

        self.observe(|m| {
            m.issued.inc();
            m.used_set_size.set(used.len() as i64);
        });
        tracing::info!(phone = %phone, used = used.len(), "issued phone number");
        Ok(phone)
    }

    /// Marks a caller-supplied number as used. Returns `false` when it was
    /// already present, in which case nothing is written.
    pub fn record_used(&self, raw: &str) -> Result<bool, IssueError> {
        let phone = normalize(raw)?;
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut used = self.store.load()?;
        if used.contains(&phone) {
            tracing::debug!(phone = %phone, "phone number already recorded");
            return Ok(false);
        }
        used.push(phone.clone());
        self.store.save(&used)?;

        self.observe(|m| {
            m.recorded.inc();
            m.used_set_size.set(used.len() as i64);
        });
        tracing::info!(phone = %phone, used = used.len(), "recorded phone number as used");
        Ok(true)
    }

    /// Collapses the stored used-set to distinct entries and writes it back.
    pub fn dedup(&self) -> Result<usize, IssueError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut used = self.store.load()?;
        let removed = dedup_numbers(&mut used);
        self.store.save(&used)?;

        self.observe(|m| {
            m.dedup_passes.inc();
            m.used_set_size.set(used.len() as i64);
        });
        tracing::info!(removed, remaining = used.len(), "used-set deduplicated");
        Ok(removed)
    }

    fn observe(&self, f: impl FnOnce(&IssuerMetrics)) {
        if let Some(metrics) = &self.metrics {
            f(metrics);
        }
    }
}
