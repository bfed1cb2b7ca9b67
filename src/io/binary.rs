use std::io::{BufRead, Write};

use bytes::{Buf, BufMut, BytesMut};
use log::warn;

use super::{check_count, ProfileBody, ProfileCodec};
use crate::error::{ProfileError, Result};
use crate::kmer::KmerFreq;
use crate::profile::Profile;

/// Compact little-endian encoding: `u32` identifier length, identifier
/// bytes, `i64` k-mer count, then each pair as written by
/// [`KmerFreq::write_binary`].
pub struct BinaryCodec;

impl ProfileCodec for BinaryCodec {
    const MAGIC: &'static str = "MP-KMER-B-1.0";

    fn encode<W: Write>(profile: &Profile, writer: &mut W) -> Result<()> {
        let id = profile.profile_id().as_bytes();
        let id_len = u32::try_from(id.len()).map_err(|_| {
            ProfileError::InvalidArgument(format!("profile identifier of {} bytes is too long", id.len()))
        })?;

        let mut buf = BytesMut::with_capacity(4 + id.len() + 8 + profile.size() * 16);
        buf.put_u32_le(id_len);
        buf.put_slice(id);
        buf.put_i64_le(profile.size() as i64);
        for kmer_freq in profile.iter() {
            kmer_freq.write_binary(&mut buf);
        }

        writer.write_all(&buf)?;
        Ok(())
    }

    fn decode<R: BufRead>(reader: &mut R, limit: usize) -> Result<ProfileBody> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        let mut buf = data.as_slice();

        if buf.remaining() < 4 {
            return Err(ProfileError::truncated("identifier length"));
        }
        let id_len = buf.get_u32_le() as usize;
        if buf.remaining() < id_len {
            return Err(ProfileError::truncated("profile identifier"));
        }
        let profile_id = String::from_utf8(buf[..id_len].to_vec())
            .map_err(|e| ProfileError::malformed(format!("profile identifier is not UTF-8: {}", e)))?;
        buf.advance(id_len);

        if buf.remaining() < 8 {
            return Err(ProfileError::truncated("k-mer count"));
        }
        let count = check_count(buf.get_i64_le(), limit)?;

        let mut entries = Vec::with_capacity(count.min(4096));
        for _ in 0..count {
            entries.push(KmerFreq::read_binary(&mut buf)?);
        }

        if buf.has_remaining() {
            warn!("Ignoring {} trailing bytes after profile {}", buf.remaining(), profile_id);
        }

        Ok(ProfileBody { profile_id, entries })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::kmer::Kmer;

    fn sample() -> Profile {
        let mut profile = Profile::new();
        profile.set_profile_id("Listeria");
        profile.append(KmerFreq::new(Kmer::from("ACGT"), 12)).unwrap();
        profile.append(KmerFreq::new(Kmer::from("A_GT"), 3)).unwrap();
        profile
    }

    #[test]
    fn test_layout() {
        let mut out = Vec::new();
        BinaryCodec::encode(&sample(), &mut out).unwrap();

        assert_eq!(&out[..4], &8u32.to_le_bytes());
        assert_eq!(&out[4..12], b"Listeria");
        assert_eq!(&out[12..20], &2i64.to_le_bytes());
        assert_eq!(out[20], 4);
        assert_eq!(&out[21..25], b"ACGT");
        assert_eq!(&out[25..33], &12u64.to_le_bytes());
        assert_eq!(out.len(), 20 + 2 * (1 + 4 + 8));
    }

    #[test]
    fn test_decode_encoded() {
        let profile = sample();
        let mut out = Vec::new();
        BinaryCodec::encode(&profile, &mut out).unwrap();

        let body = BinaryCodec::decode(&mut out.as_slice(), 10).unwrap();
        assert_eq!(body.profile_id, "Listeria");
        assert_eq!(body.entries, profile.as_slice());
    }

    #[test]
    fn test_decode_rejects_bad_counts() {
        let mut data = Vec::new();
        data.put_u32_le(0);
        data.put_i64_le(-5);
        let err = BinaryCodec::decode(&mut data.as_slice(), 10).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfRange);

        let mut data = Vec::new();
        data.put_u32_le(0);
        data.put_i64_le(11);
        let err = BinaryCodec::decode(&mut data.as_slice(), 10).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfRange);
    }

    #[test]
    fn test_decode_truncated() {
        let mut out = Vec::new();
        BinaryCodec::encode(&sample(), &mut out).unwrap();
        for len in [0, 3, 10, 19, out.len() - 1] {
            let err = BinaryCodec::decode(&mut &out[..len], 10).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::IoFailure, "length {}", len);
        }
    }
}
