//! Reproducible generation seeds.

use std::{
    fmt::{self, Display},
    str::FromStr,
};

use derive_more::{Display as DeriveDisplay, Error};
use rand::{RngExt as _, SeedableRng as _};
use rand_pcg::Pcg64;
use sha2::{Digest as _, Sha256};

/// A 32-byte seed that pins down an entire generation run.
///
/// The seed itself never feeds a random stream directly: each attempt
/// inside a run hashes the seed together with the attempt index (SHA-256)
/// and seeds a PCG-64 stream from the digest. Attempts are therefore
/// independent of each other but fully determined by the seed, so
/// re-running with the same seed reproduces the same puzzle regardless of
/// how many attempts the run needed.
///
/// # Text format
///
/// Seeds round-trip through 64 lowercase hex characters.
///
/// # Examples
///
/// ```
/// use ninefold_generator::PuzzleSeed;
///
/// let seed: PuzzleSeed = "c1d44bd6afaf8af64f126546884e19298acbdc33c3924a28136715de946ef3f1"
///     .parse()
///     .unwrap();
/// assert_eq!(
///     seed.to_string(),
///     "c1d44bd6afaf8af64f126546884e19298acbdc33c3924a28136715de946ef3f1"
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PuzzleSeed([u8; 32]);

impl PuzzleSeed {
    /// Creates a seed from raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Creates a fresh seed from the thread-local entropy source.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self(rand::rng().random())
    }

    /// Returns the raw seed bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Derives the random stream for one generation attempt.
    pub(crate) fn rng_for_attempt(&self, attempt: u32) -> Pcg64 {
        let mut hasher = Sha256::new();
        hasher.update(self.0);
        hasher.update(attempt.to_le_bytes());
        Pcg64::from_seed(hasher.finalize().into())
    }
}

impl Display for PuzzleSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

/// Error parsing a [`PuzzleSeed`] from text.
#[derive(Debug, Clone, PartialEq, Eq, DeriveDisplay, Error)]
pub enum ParseSeedError {
    /// The input was not exactly 64 characters long.
    #[display("expected 64 hex characters, found {_0}")]
    WrongLength(#[error(not(source))] usize),
    /// The input contained a non-hexadecimal character.
    #[display("invalid hex character: {_0:?}")]
    InvalidChar(#[error(not(source))] char),
}

impl FromStr for PuzzleSeed {
    type Err = ParseSeedError;

    fn from_str(s: &str) -> Result<Self, ParseSeedError> {
        if s.chars().count() != 64 {
            return Err(ParseSeedError::WrongLength(s.chars().count()));
        }
        if let Some(bad) = s.chars().find(|c| !c.is_ascii_hexdigit()) {
            return Err(ParseSeedError::InvalidChar(bad));
        }
        let mut bytes = [0u8; 32];
        for (i, byte) in bytes.iter_mut().enumerate() {
            let chunk = &s[i * 2..i * 2 + 2];
            *byte = u8::from_str_radix(chunk, 16).expect("chunk was checked to be hex");
        }
        Ok(Self(bytes))
    }
}
