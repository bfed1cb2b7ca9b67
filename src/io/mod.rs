//! On-disk profile formats.
//!
//! Every profile file starts with a magic string on its own line that
//! names the format of the rest of the file: [`TextCodec`] for the
//! line-oriented form and [`BinaryCodec`] for the compact one.

pub(crate) mod binary;
pub(crate) mod reader;
pub(crate) mod text;
pub(crate) mod writer;

use std::fmt;
use std::io::{BufRead, Write};

use crate::error::{ProfileError, Result};
use crate::kmer::KmerFreq;
use crate::profile::Profile;

pub use binary::BinaryCodec;
pub use reader::load_profile;
pub use text::TextCodec;
pub use writer::save_profile;

/// Identifier and entries decoded from a profile file, not yet installed
/// into a [`Profile`].
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileBody {
    pub profile_id: String,
    pub entries: Vec<KmerFreq>,
}

/// A profile encoding. The magic string is written by the caller.
pub trait ProfileCodec {
    const MAGIC: &'static str;

    /// Write everything that follows the magic string
    fn encode<W: Write>(profile: &Profile, writer: &mut W) -> Result<()>;

    /// Read everything that follows the magic string, rejecting declared
    /// k-mer counts above `limit`.
    fn decode<R: BufRead>(reader: &mut R, limit: usize) -> Result<ProfileBody>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileFormat {
    Text,
    Binary,
}

impl ProfileFormat {
    pub fn magic(&self) -> &'static str {
        match self {
            ProfileFormat::Text => TextCodec::MAGIC,
            ProfileFormat::Binary => BinaryCodec::MAGIC,
        }
    }

    /// Format announced by a magic string
    pub fn from_magic(magic: &[u8]) -> Option<Self> {
        [ProfileFormat::Text, ProfileFormat::Binary]
            .into_iter()
            .find(|format| format.magic().as_bytes() == magic)
    }
}

impl TryFrom<char> for ProfileFormat {
    type Error = ProfileError;

    fn try_from(mode: char) -> Result<Self> {
        match mode {
            't' => Ok(ProfileFormat::Text),
            'b' => Ok(ProfileFormat::Binary),
            other => Err(ProfileError::InvalidArgument(format!(
                "unknown save mode '{}', expected 't' or 'b'",
                other
            ))),
        }
    }
}

impl fmt::Display for ProfileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfileFormat::Text => write!(f, "text"),
            ProfileFormat::Binary => write!(f, "binary"),
        }
    }
}

/// Validate a declared k-mer count against `limit`
pub(crate) fn check_count(count: i64, limit: usize) -> Result<usize> {
    match usize::try_from(count) {
        Ok(count) if count <= limit => Ok(count),
        _ => Err(ProfileError::InvalidCount { count, max: limit }),
    }
}
