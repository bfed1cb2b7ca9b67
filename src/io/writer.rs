use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::info;

use super::{BinaryCodec, ProfileCodec, ProfileFormat, TextCodec};
use crate::error::Result;
use crate::profile::Profile;

/// Write `profile` to `path`: the magic string of `format` on the first
/// line, then the codec's encoding.
///
/// The body is encoded before the file is created, so a profile the codec
/// rejects leaves no file behind.
pub fn save_profile(profile: &Profile, path: &Path, format: ProfileFormat) -> Result<()> {
    let mut body = Vec::new();
    match format {
        ProfileFormat::Text => TextCodec::encode(profile, &mut body)?,
        ProfileFormat::Binary => BinaryCodec::encode(profile, &mut body)?,
    }

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    writeln!(writer, "{}", format.magic())?;
    writer.write_all(&body)?;
    writer.flush()?;

    info!(
        "Saved profile {} with {} k-mers to {} ({} format)",
        profile.profile_id(),
        profile.size(),
        path.display(),
        format
    );
    Ok(())
}
