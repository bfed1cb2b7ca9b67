use std::cmp::Ordering;
use std::fmt;
use std::io::Write;
use std::str::FromStr;

use bytes::{Buf, BufMut};
use serde::{Deserialize, Serialize};

use super::types::Kmer;
use crate::error::{ProfileError, Result};

/// A k-mer paired with its occurrence count
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KmerFreq {
    kmer: Kmer,
    frequency: u64,
}

impl KmerFreq {
    pub fn new(kmer: Kmer, frequency: u64) -> Self {
        KmerFreq { kmer, frequency }
    }

    pub fn kmer(&self) -> &Kmer {
        &self.kmer
    }

    pub fn kmer_mut(&mut self) -> &mut Kmer {
        &mut self.kmer
    }

    pub fn frequency(&self) -> u64 {
        self.frequency
    }

    pub fn set_frequency(&mut self, frequency: u64) {
        self.frequency = frequency;
    }

    pub fn add_frequency(&mut self, amount: u64) {
        self.frequency = self.frequency.saturating_add(amount);
    }

    /// Rank order: higher frequency first, then alphabetical k-mer
    pub fn cmp_rank(&self, other: &Self) -> Ordering {
        other
            .frequency
            .cmp(&self.frequency)
            .then_with(|| self.kmer.cmp(&other.kmer))
    }

    /// Write `"<kmer> <frequency>"` on its own line
    pub fn write_text<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writeln!(writer, "{}", self)
    }

    /// Append the binary form: k-mer length, k-mer bytes, frequency
    pub fn write_binary<B: BufMut>(&self, buf: &mut B) {
        let symbols = self.kmer.as_bytes();
        // Kmer::MAX_K fits in a byte
        buf.put_u8(symbols.len() as u8);
        buf.put_slice(symbols);
        buf.put_u64_le(self.frequency);
    }

    pub fn read_binary<B: Buf>(buf: &mut B) -> Result<Self> {
        if buf.remaining() < 1 {
            return Err(ProfileError::truncated("k-mer length"));
        }
        let len = buf.get_u8() as usize;
        if len > Kmer::MAX_K {
            return Err(ProfileError::malformed(format!(
                "k-mer length {} exceeds the maximum of {}",
                len,
                Kmer::MAX_K
            )));
        }
        if buf.remaining() < len {
            return Err(ProfileError::truncated("k-mer symbols"));
        }
        let mut symbols = vec![0u8; len];
        buf.copy_to_slice(&mut symbols);

        if buf.remaining() < 8 {
            return Err(ProfileError::truncated("frequency"));
        }
        let frequency = buf.get_u64_le();

        Ok(KmerFreq::new(Kmer::new(&symbols), frequency))
    }
}

impl fmt::Display for KmerFreq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kmer, self.frequency)
    }
}

impl FromStr for KmerFreq {
    type Err = ProfileError;

    fn from_str(line: &str) -> Result<Self> {
        // The frequency follows the last separator; the k-mer may be empty
        let Some((kmer, frequency)) = line.trim_end().rsplit_once([' ', '\t']) else {
            return Err(ProfileError::malformed(format!(
                "expected '<kmer> <frequency>', found {:?}",
                line
            )));
        };

        let frequency = frequency.parse::<u64>().map_err(|e| {
            ProfileError::malformed(format!("invalid frequency {:?}: {}", frequency, e))
        })?;

        Ok(KmerFreq::new(Kmer::from(kmer), frequency))
    }
}
