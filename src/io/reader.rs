use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::{info, warn};

use super::{BinaryCodec, ProfileBody, ProfileCodec, ProfileFormat, TextCodec};
use crate::error::{ProfileError, Result};

/// Read the profile stored at `path`, choosing the codec from the magic
/// string on the first line.
pub fn load_profile(path: &Path, limit: usize) -> Result<ProfileBody> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);

    let mut magic = Vec::new();
    reader.read_until(b'\n', &mut magic)?;
    while matches!(magic.last(), Some(b'\n' | b'\r')) {
        magic.pop();
    }

    let Some(format) = ProfileFormat::from_magic(&magic) else {
        let found = String::from_utf8_lossy(&magic).into_owned();
        warn!("Rejecting {}: unknown magic string {:?}", path.display(), found);
        return Err(ProfileError::InvalidMagic(found));
    };

    let body = match format {
        ProfileFormat::Text => TextCodec::decode(&mut reader, limit)?,
        ProfileFormat::Binary => BinaryCodec::decode(&mut reader, limit)?,
    };

    info!(
        "Loaded profile {} with {} k-mers from {} ({} format)",
        body.profile_id,
        body.entries.len(),
        path.display(),
        format
    );
    Ok(body)
}
