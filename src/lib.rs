//! K-mer frequency profiles.
//!
//! A [`Profile`] is an identified list of k-mers with their occurrence
//! counts. Profiles are built with [`Profile::append`] and
//! [`Profile::join`], cleaned with [`Profile::normalize`] and
//! [`Profile::zip`], ranked with [`Profile::sort`], compared with
//! [`Profile::distance`] and persisted with [`Profile::save`] /
//! [`Profile::load`].

pub mod error;
pub mod io;
pub mod kmer;
pub mod profile;

pub use error::{ErrorKind, ProfileError, Result};
pub use io::{BinaryCodec, ProfileCodec, ProfileFormat, TextCodec};
pub use kmer::{Kmer, KmerFreq};
pub use profile::{GrowthPolicy, Profile};
