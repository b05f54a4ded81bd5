use rand::RngExt;
use tracing::warn;

use crate::domain::repository::ResultRepository;
use crate::domain::types::{DEFAULT_RID_MAX_ATTEMPTS, RID_ALPHABET, RID_LEN};
use crate::error::ResultsServiceError;

/// Draw one candidate identifier.
///
/// `rand::rng()` is a CSPRNG seeded from the OS, and `random_range` rejects
/// out-of-range draws, so every symbol is equally likely.
pub fn generate_rid() -> String {
    let mut rng = rand::rng();
    (0..RID_LEN)
        .map(|_| RID_ALPHABET[rng.random_range(0..RID_ALPHABET.len())] as char)
        .collect()
}

/// Produces external identifiers not yet used by any stored result.
///
/// The availability check is only a pre-filter; the unique index on `r_id`
/// decides, and callers regenerate on `DuplicateIdentifier`.
#[derive(Debug, Clone, Copy)]
pub struct IdentifierGenerator {
    pub max_attempts: u32,
}

impl Default for IdentifierGenerator {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_RID_MAX_ATTEMPTS,
        }
    }
}

impl IdentifierGenerator {
    pub async fn generate<R: ResultRepository>(
        &self,
        results: &R,
    ) -> Result<String, ResultsServiceError> {
        for attempt in 1..=self.max_attempts {
            let rid = generate_rid();
            if !results.rid_exists(&rid).await? {
                return Ok(rid);
            }
            warn!(attempt, "generated rid already taken; regenerating");
        }
        Err(ResultsServiceError::GenerationExhausted)
    }
}
