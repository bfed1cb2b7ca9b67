use std::io::{BufRead, Write};

use super::{check_count, ProfileBody, ProfileCodec};
use crate::error::{ProfileError, Result};
use crate::kmer::KmerFreq;
use crate::profile::Profile;

/// Line-oriented encoding:
///
/// ```text
/// <identifier>
/// <number of k-mers>
/// <kmer> <frequency>
/// ...
/// ```
pub struct TextCodec;

impl ProfileCodec for TextCodec {
    const MAGIC: &'static str = "MP-KMER-T-1.0";

    fn encode<W: Write>(profile: &Profile, writer: &mut W) -> Result<()> {
        check_single_line(profile)?;
        writeln!(writer, "{}", profile.profile_id())?;
        writeln!(writer, "{}", profile.size())?;
        for kmer_freq in profile.iter() {
            kmer_freq.write_text(writer)?;
        }
        Ok(())
    }

    fn decode<R: BufRead>(reader: &mut R, limit: usize) -> Result<ProfileBody> {
        let profile_id = read_line(reader, "profile identifier")?;

        let count_line = read_data_line(reader, "k-mer count")?;
        let count = count_line.trim().parse::<i64>().map_err(|e| {
            ProfileError::malformed(format!("invalid k-mer count {:?}: {}", count_line, e))
        })?;
        let count = check_count(count, limit)?;

        let mut entries = Vec::with_capacity(count.min(4096));
        for _ in 0..count {
            let line = read_data_line(reader, "k-mer pair")?;
            entries.push(line.parse::<KmerFreq>()?);
        }

        Ok(ProfileBody { profile_id, entries })
    }
}

/// Line breaks in the identifier or a k-mer cannot be read back
fn check_single_line(profile: &Profile) -> Result<()> {
    let has_break = |bytes: &[u8]| bytes.iter().any(|&b| b == b'\n' || b == b'\r');
    if has_break(profile.profile_id().as_bytes()) {
        return Err(ProfileError::InvalidArgument(format!(
            "profile identifier {:?} contains a line break",
            profile.profile_id()
        )));
    }
    if let Some(kmer_freq) = profile.iter().find(|kmer_freq| has_break(kmer_freq.kmer().as_bytes())) {
        return Err(ProfileError::InvalidArgument(format!(
            "k-mer {:?} contains a line break",
            kmer_freq.kmer().sequence()
        )));
    }
    Ok(())
}

/// Next line without its terminator
fn read_line<R: BufRead>(reader: &mut R, what: &str) -> Result<String> {
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Err(ProfileError::truncated(what));
    }
    let trimmed = line.trim_end_matches(['\n', '\r']).len();
    line.truncate(trimmed);
    Ok(line)
}

/// Next non-blank line
fn read_data_line<R: BufRead>(reader: &mut R, what: &str) -> Result<String> {
    loop {
        let line = read_line(reader, what)?;
        if !line.trim().is_empty() {
            return Ok(line);
        }
    }
}
