pub(crate) mod storage;
pub(crate) mod types;
pub(crate) mod analyzer;

pub use storage::{BlockVec, GrowthPolicy, DIM_VECTOR_KMER_FREQ};
pub use types::{Profile, UNKNOWN_PROFILE_ID};
