use std::fmt;
use std::ops::{AddAssign, Index, IndexMut};
use std::path::Path;
use std::str::FromStr;

use fxhash::FxHashMap;
use log::debug;

use super::storage::{BlockVec, GrowthPolicy};
use crate::error::{ProfileError, Result};
use crate::io::{self, ProfileBody, ProfileCodec, ProfileFormat, TextCodec};
use crate::kmer::{Kmer, KmerFreq};

/// Identifier given to profiles that have not been named
pub const UNKNOWN_PROFILE_ID: &str = "unknown";

/// An identified, ordered list of k-mers and their frequencies.
///
/// Entry order is meaningful: after [`Profile::sort`] the position of a
/// k-mer is its rank, and it is the order written to disk.
#[derive(Debug, Clone)]
pub struct Profile {
    /// Profile identifier
    profile_id: String,
    /// K-mer frequencies in rank or insertion order
    entries: BlockVec<KmerFreq>,
}

impl Profile {
    /// Create an empty profile named [`UNKNOWN_PROFILE_ID`]
    pub fn new() -> Self {
        Profile::with_policy(GrowthPolicy::default())
    }

    /// Create an empty profile whose storage follows `policy`
    pub fn with_policy(policy: GrowthPolicy) -> Self {
        Profile {
            profile_id: UNKNOWN_PROFILE_ID.to_string(),
            entries: BlockVec::new(policy),
        }
    }

    /// Create a profile of `size` entries, each an all-missing k-mer with
    /// frequency 0.
    pub fn with_size(size: usize) -> Result<Self> {
        let policy = GrowthPolicy::default();
        if size > policy.max_capacity {
            return Err(ProfileError::CapacityExceeded {
                requested: size,
                max: policy.max_capacity,
            });
        }
        let blank = KmerFreq::new(Kmer::with_size(1), 0);
        Ok(Profile {
            profile_id: UNKNOWN_PROFILE_ID.to_string(),
            entries: BlockVec::from_vec(vec![blank; size], policy)?,
        })
    }

    pub fn profile_id(&self) -> &str {
        &self.profile_id
    }

    pub fn set_profile_id(&mut self, id: impl Into<String>) {
        self.profile_id = id.into();
    }

    pub fn size(&self) -> usize {
        self.entries.len()
    }

    pub fn capacity(&self) -> usize {
        self.entries.capacity()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn policy(&self) -> &GrowthPolicy {
        self.entries.policy()
    }

    pub fn at(&self, index: usize) -> Result<&KmerFreq> {
        self.entries.get(index)
    }

    pub fn at_mut(&mut self, index: usize) -> Result<&mut KmerFreq> {
        self.entries.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, KmerFreq> {
        self.entries.iter()
    }

    pub fn as_slice(&self) -> &[KmerFreq] {
        self.entries.as_slice()
    }

    pub(crate) fn entries_mut(&mut self) -> &mut [KmerFreq] {
        self.entries.as_mut_slice()
    }

    /// Sum of all frequencies
    pub fn total_frequency(&self) -> u64 {
        self.entries.iter().map(KmerFreq::frequency).sum()
    }

    /// Remove every entry, keeping the identifier
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Add `kmer_freq` to the profile.
    ///
    /// An existing entry with the same k-mer absorbs the frequency in place;
    /// otherwise a copy is appended at the end. Fails with an out-of-range
    /// error, leaving the profile untouched, if growing would exceed the
    /// maximum capacity.
    pub fn append(&mut self, kmer_freq: KmerFreq) -> Result<()> {
        self.entries.merge_or_push(
            kmer_freq,
            |existing, new| existing.kmer() == new.kmer(),
            |existing, new| existing.add_frequency(new.frequency()),
        )?;
        Ok(())
    }

    /// Append every entry of `other`, in its order
    pub fn join(&mut self, other: &Profile) -> Result<()> {
        for kmer_freq in other.iter() {
            self.append(kmer_freq.clone())?;
        }
        Ok(())
    }

    /// Canonicalize every k-mer against `valid_nucleotides` and merge the
    /// entries that become identical into their first occurrence.
    pub fn normalize(&mut self, valid_nucleotides: &str) {
        for kmer_freq in self.entries.iter_mut() {
            kmer_freq.kmer_mut().normalize(valid_nucleotides);
        }

        let before = self.entries.len();
        let mut first_seen: FxHashMap<Kmer, usize> = FxHashMap::default();
        let mut duplicate = vec![false; before];
        let entries = self.entries.as_mut_slice();
        for i in 0..entries.len() {
            match first_seen.get(entries[i].kmer()) {
                Some(&first) => {
                    let frequency = entries[i].frequency();
                    entries[first].add_frequency(frequency);
                    duplicate[i] = true;
                }
                None => {
                    first_seen.insert(entries[i].kmer().clone(), i);
                }
            }
        }

        // retain visits elements in order, once each
        let mut flags = duplicate.into_iter();
        self.entries.retain(|_| !flags.next().unwrap_or(false));
        debug!(
            "Normalized profile {}: {} -> {} k-mers",
            self.profile_id,
            before,
            self.entries.len()
        );
    }

    /// Remove the entry at `pos`
    pub fn delete_pos(&mut self, pos: usize) -> Result<()> {
        self.entries.remove(pos)?;
        Ok(())
    }

    /// Drop entries whose frequency is at most `lower_bound`, and, when
    /// `delete_missing` is set, entries whose k-mer has a missing symbol.
    pub fn zip(&mut self, delete_missing: bool, lower_bound: u64) {
        let before = self.entries.len();
        self.entries.retain(|kmer_freq| {
            let missing = delete_missing && kmer_freq.kmer().has_missing();
            !(missing || kmer_freq.frequency() <= lower_bound)
        });
        debug!(
            "Zipped profile {}: removed {} k-mers",
            self.profile_id,
            before - self.entries.len()
        );
    }

    /// Write the identifier, the number of k-mers and one pair per line
    pub fn write<W: std::io::Write>(&self, writer: &mut W) -> Result<()> {
        TextCodec::encode(self, writer)
    }

    /// Replace this profile with the one read from `reader` in the format
    /// produced by [`Profile::write`].
    pub fn read<R: std::io::BufRead>(&mut self, reader: &mut R) -> Result<()> {
        self.clear();
        let body = TextCodec::decode(reader, self.policy().max_capacity)?;
        self.set_body(body)
    }

    /// Save to `path`, preceded by the magic string of `format`
    pub fn save<P: AsRef<Path>>(&self, path: P, format: ProfileFormat) -> Result<()> {
        io::save_profile(self, path.as_ref(), format)
    }

    /// Replace this profile with the one stored at `path`.
    ///
    /// On failure the profile is left empty.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.clear();
        let body = io::load_profile(path.as_ref(), self.policy().max_capacity)?;
        self.set_body(body)
    }

    pub(crate) fn set_body(&mut self, body: ProfileBody) -> Result<()> {
        let entries = BlockVec::from_vec(body.entries, *self.policy())?;
        self.profile_id = body.profile_id;
        self.entries = entries;
        Ok(())
    }
}

impl Default for Profile {
    fn default() -> Self {
        Profile::new()
    }
}

impl PartialEq for Profile {
    fn eq(&self, other: &Self) -> bool {
        self.profile_id == other.profile_id && self.as_slice() == other.as_slice()
    }
}

impl Index<usize> for Profile {
    type Output = KmerFreq;

    /// # Panics
    ///
    /// Panics if `index` is not below [`Profile::size`]; use
    /// [`Profile::at`] for a checked lookup.
    fn index(&self, index: usize) -> &KmerFreq {
        match self.entries.get(index) {
            Ok(kmer_freq) => kmer_freq,
            Err(e) => panic!("{}", e),
        }
    }
}

impl IndexMut<usize> for Profile {
    fn index_mut(&mut self, index: usize) -> &mut KmerFreq {
        match self.entries.get_mut(index) {
            Ok(kmer_freq) => kmer_freq,
            Err(e) => panic!("{}", e),
        }
    }
}

/// Same as [`Profile::append`], panicking if the capacity limit is hit
impl AddAssign<KmerFreq> for Profile {
    fn add_assign(&mut self, kmer_freq: KmerFreq) {
        if let Err(e) = self.append(kmer_freq) {
            panic!("{}", e);
        }
    }
}

/// Same as [`Profile::join`], panicking if the capacity limit is hit
impl AddAssign<&Profile> for Profile {
    fn add_assign(&mut self, other: &Profile) {
        if let Err(e) = self.join(other) {
            panic!("{}", e);
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.profile_id)?;
        writeln!(f, "{}", self.size())?;
        for kmer_freq in self.iter() {
            writeln!(f, "{}", kmer_freq)?;
        }
        Ok(())
    }
}

impl FromStr for Profile {
    type Err = ProfileError;

    fn from_str(text: &str) -> Result<Self> {
        let mut profile = Profile::new();
        profile.read(&mut text.as_bytes())?;
        Ok(profile)
    }
}
