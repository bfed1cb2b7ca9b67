pub(crate) mod types;
pub(crate) mod freq;

pub use types::Kmer;
pub use freq::KmerFreq;
