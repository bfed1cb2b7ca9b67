use std::fmt;
use serde::{Deserialize, Serialize};

/// A short nucleotide sequence of at most [`Kmer::MAX_K`] symbols.
///
/// Ordering is symbol-by-symbol, so sorting k-mers gives alphabetical order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub struct Kmer {
    sequence: Vec<u8>,
}

impl Kmer {
    /// Symbol used for unknown or invalid nucleotides
    pub const MISSING_NUCLEOTIDE: u8 = b'_';

    /// Longest k-mer that can be stored
    pub const MAX_K: usize = 64;

    /// Create a k-mer from raw symbols, truncated to `MAX_K`
    pub fn new(sequence: &[u8]) -> Self {
        let len = sequence.len().min(Self::MAX_K);
        Kmer {
            sequence: sequence[..len].to_vec(),
        }
    }

    /// Create a k-mer of `k` missing symbols
    pub fn with_size(k: usize) -> Self {
        Kmer {
            sequence: vec![Self::MISSING_NUCLEOTIDE; k.min(Self::MAX_K)],
        }
    }

    pub fn size(&self) -> usize {
        self.sequence.len()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.sequence
    }

    pub fn sequence(&self) -> String {
        String::from_utf8_lossy(&self.sequence).into_owned()
    }

    /// True if any symbol is the missing nucleotide
    pub fn has_missing(&self) -> bool {
        self.sequence.contains(&Self::MISSING_NUCLEOTIDE)
    }

    /// Uppercase every symbol and replace the ones not found in
    /// `valid_nucleotides` with [`Kmer::MISSING_NUCLEOTIDE`].
    ///
    /// The valid set is compared case-insensitively.
    pub fn normalize(&mut self, valid_nucleotides: &str) {
        let valid: Vec<u8> = valid_nucleotides
            .bytes()
            .map(|b| b.to_ascii_uppercase())
            .collect();

        for symbol in self.sequence.iter_mut() {
            let upper = symbol.to_ascii_uppercase();
            *symbol = if valid.contains(&upper) {
                upper
            } else {
                Self::MISSING_NUCLEOTIDE
            };
        }
    }
}

impl fmt::Display for Kmer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.sequence))
    }
}

impl From<&str> for Kmer {
    fn from(text: &str) -> Self {
        Kmer::new(text.as_bytes())
    }
}

impl From<String> for Kmer {
    fn from(text: String) -> Self {
        Kmer::new(text.as_bytes())
    }
}

impl From<Kmer> for String {
    fn from(kmer: Kmer) -> Self {
        kmer.sequence()
    }
}
