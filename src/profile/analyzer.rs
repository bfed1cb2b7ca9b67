use fxhash::FxHashMap;
use log::debug;

use super::types::Profile;
use crate::error::{ProfileError, Result};
use crate::kmer::{Kmer, KmerFreq};

impl Profile {
    /// Order entries by decreasing frequency, breaking ties by ascending
    /// alphabetical order of the k-mer.
    pub fn sort(&mut self) {
        self.entries_mut().sort_by(KmerFreq::cmp_rank);
    }

    /// Position of the first entry holding `kmer`
    pub fn find_kmer(&self, kmer: &Kmer) -> Option<usize> {
        self.as_slice().iter().position(|entry| entry.kmer() == kmer)
    }

    /// Position of the first entry holding `kmer` between `initial_pos` and
    /// `final_pos`, both included. `final_pos` is clamped to the last entry.
    pub fn find_kmer_in(&self, kmer: &Kmer, initial_pos: usize, final_pos: usize) -> Option<usize> {
        let entries = self.as_slice();
        if entries.is_empty() || initial_pos > final_pos {
            return None;
        }
        let last = final_pos.min(entries.len() - 1);
        if initial_pos > last {
            return None;
        }
        entries[initial_pos..=last]
            .iter()
            .position(|entry| entry.kmer() == kmer)
            .map(|offset| initial_pos + offset)
    }

    /// Rank distance from this profile to `other`.
    ///
    /// Both profiles must already be sorted, so that each position is the
    /// k-mer's rank; this is not checked. For every k-mer of `self` the gap
    /// between its rank here and its rank in `other` is summed (a k-mer absent
    /// from `other` ranks at `other.size()`), then divided by the product of
    /// both sizes. Only the k-mers of `self` are visited, so the distance is
    /// not symmetric.
    pub fn distance(&self, other: &Profile) -> Result<f64> {
        if self.is_empty() || other.is_empty() {
            return Err(ProfileError::InvalidArgument(format!(
                "cannot compute the distance between profiles of sizes {} and {}",
                self.size(),
                other.size()
            )));
        }

        // First occurrence wins, matching a front-to-back search
        let mut ranks: FxHashMap<&Kmer, usize> = FxHashMap::default();
        for (rank, entry) in other.iter().enumerate() {
            ranks.entry(entry.kmer()).or_insert(rank);
        }

        let total: usize = self
            .iter()
            .enumerate()
            .map(|(rank, entry)| {
                let other_rank = ranks.get(entry.kmer()).copied().unwrap_or(other.size());
                rank.abs_diff(other_rank)
            })
            .sum();

        let distance = total as f64 / (self.size() as f64 * other.size() as f64);
        debug!(
            "Distance {} -> {}: {:.6}",
            self.profile_id(),
            other.profile_id(),
            distance
        );
        Ok(distance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use pretty_assertions::assert_eq;

    fn profile_of(pairs: &[(&str, u64)]) -> Profile {
        let mut profile = Profile::new();
        for &(kmer, frequency) in pairs {
            profile.append(KmerFreq::new(Kmer::from(kmer), frequency)).unwrap();
        }
        profile
    }

    fn assert_sorted(profile: &Profile) {
        for pair in profile.as_slice().windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            assert!(
                a.frequency() > b.frequency()
                    || (a.frequency() == b.frequency() && a.kmer() <= b.kmer()),
                "{} before {}",
                a,
                b
            );
        }
    }

    #[test]
    fn test_sort_by_frequency_then_kmer() {
        let mut profile = profile_of(&[("GT", 2), ("AA", 5), ("CA", 2), ("TT", 9), ("AC", 2)]);
        profile.sort();
        let order: Vec<String> = profile.iter().map(|e| e.to_string()).collect();
        assert_eq!(order, vec!["TT 9", "AA 5", "AC 2", "CA 2", "GT 2"]);
        assert_sorted(&profile);
    }

    #[test]
    fn test_sort_with_duplicates() {
        let mut profile = Profile::with_size(3).unwrap();
        profile[0] = KmerFreq::new(Kmer::from("CC"), 1);
        profile[1] = KmerFreq::new(Kmer::from("AA"), 1);
        profile[2] = KmerFreq::new(Kmer::from("CC"), 4);
        profile.sort();
        let order: Vec<String> = profile.iter().map(|e| e.to_string()).collect();
        assert_eq!(order, vec!["CC 4", "AA 1", "CC 1"]);
        assert_sorted(&profile);
    }

    #[test]
    fn test_find_kmer() {
        let profile = profile_of(&[("AA", 1), ("CC", 2), ("GG", 3)]);
        assert_eq!(profile.find_kmer(&Kmer::from("GG")), Some(2));
        assert_eq!(profile.find_kmer(&Kmer::from("TT")), None);
    }

    #[test]
    fn test_find_kmer_in_range() {
        let profile = profile_of(&[("AA", 1), ("CC", 2), ("GG", 3), ("TT", 4)]);
        let gg = Kmer::from("GG");
        assert_eq!(profile.find_kmer_in(&gg, 0, 1), None);
        assert_eq!(profile.find_kmer_in(&gg, 3, 3), None);
        assert_eq!(profile.find_kmer_in(&gg, 2, 2), Some(2));
        assert_eq!(profile.find_kmer_in(&gg, 1, 100), Some(2));
        assert_eq!(profile.find_kmer_in(&gg, 3, 1), None);
        assert_eq!(profile.find_kmer_in(&gg, 10, 20), None);
        assert_eq!(Profile::new().find_kmer_in(&gg, 0, 0), None);
    }

    #[test]
    fn test_self_distance_is_zero() {
        let mut profile = profile_of(&[("AA", 3), ("CC", 7), ("GG", 1)]);
        profile.sort();
        let copy = profile.clone();
        assert_eq!(profile.distance(&copy).unwrap(), 0.0);
    }

    #[test]
    fn test_distance_is_asymmetric() {
        let mut a = profile_of(&[("AA", 3), ("CC", 2), ("GG", 1)]);
        let mut b = profile_of(&[("TT", 9), ("CC", 5)]);
        a.sort();
        b.sort();

        // AA: |0 - 2|, CC: |1 - 1|, GG: |2 - 2|
        assert!((a.distance(&b).unwrap() - 2.0 / 6.0).abs() < 1e-12);
        // TT: |0 - 3|, CC: |1 - 1|
        assert!((b.distance(&a).unwrap() - 3.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_distance_matches_linear_search() {
        let mut a = profile_of(&[("AA", 3), ("CC", 2), ("GG", 1), ("TT", 1)]);
        let mut b = profile_of(&[("GG", 9), ("AC", 5), ("AA", 5)]);
        a.sort();
        b.sort();

        let total: usize = a
            .iter()
            .enumerate()
            .map(|(rank, entry)| {
                let other = b.find_kmer(entry.kmer()).unwrap_or(b.size());
                rank.abs_diff(other)
            })
            .sum();
        let expected = total as f64 / (a.size() * b.size()) as f64;
        assert_eq!(a.distance(&b).unwrap(), expected);
    }

    #[test]
    fn test_distance_of_empty_profile() {
        let empty = Profile::new();
        let profile = profile_of(&[("AA", 1)]);
        assert_eq!(empty.distance(&profile).unwrap_err().kind(), ErrorKind::InvalidArgument);
        assert_eq!(profile.distance(&empty).unwrap_err().kind(), ErrorKind::InvalidArgument);
    }
}
