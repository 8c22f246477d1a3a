//! Statement identifier generation.

use rand::Rng;
use rand::distr::Alphanumeric;

/// Length of the random part of a statement id.
pub const ID_SUFFIX_LEN: usize = 8;

/// Produces candidate statement ids.
///
/// Candidates are not guaranteed unique; the store rejects collisions and the
/// assembler asks for another.
pub trait BillingIdGenerator: Send + Sync {
    /// Returns a fresh candidate id.
    fn generate(&self) -> String;
}

/// `PREFIX-XXXXXXXX` ids with an uppercase alphanumeric suffix.
#[derive(Debug, Clone)]
pub struct RandomBillingIdGenerator {
    prefix: String,
}

impl RandomBillingIdGenerator {
    /// Creates a generator for ids starting with `prefix`.
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl BillingIdGenerator for RandomBillingIdGenerator {
    fn generate(&self) -> String {
        let suffix: String = rand::rng()
            .sample_iter(&Alphanumeric)
            .take(ID_SUFFIX_LEN)
            .map(|b| char::from(b).to_ascii_uppercase())
            .collect();

        format!("{}-{suffix}", self.prefix)
    }
}
