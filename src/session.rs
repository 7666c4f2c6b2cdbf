use std::collections::HashSet;

use crate::candidate_generator::{CandidateGenerator, RandomCandidateGenerator};
use crate::identifier::with_plus;
use crate::issuer::{IssueError, RetryPolicy};

/// Issues `+`-prefixed numbers unique within one in-memory session.
///
/// Shares the prefix table and suffix distribution with
/// [`NumberIssuer`](crate::issuer::NumberIssuer) but never touches a store.
pub struct SessionIssuer<G = RandomCandidateGenerator> {
    used: HashSet<String>,
    generator: G,
    policy: RetryPolicy,
}

impl SessionIssuer {
    pub fn new() -> Self {
        Self::with_generator(RandomCandidateGenerator::new())
    }
}

impl Default for SessionIssuer {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: CandidateGenerator> SessionIssuer<G> {
    pub fn with_generator(generator: G) -> Self {
        SessionIssuer {
            used: HashSet::new(),
            generator,
            policy: RetryPolicy::session(),
        }
    }

    pub fn issue(&mut self) -> Result<String, IssueError> {
        for _ in 0..self.policy.max_attempts {
            let phone = with_plus(&self.generator.generate());
            if self.used.insert(phone.clone()) {
                return Ok(phone);
            }
        }
        tracing::warn!(attempts = self.policy.max_attempts, "session ran out of unique phone numbers");
        Err(IssueError::GenerationExhausted {
            attempts: self.policy.max_attempts,
        })
    }

    pub fn used(&self) -> &HashSet<String> {
        &self.used
    }
}
