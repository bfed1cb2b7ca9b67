use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Build, clean and compare k-mer frequency profiles")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to log file
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print a profile
    Show {
        /// Profile file (text or binary)
        input: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Only print the first N k-mers
        #[arg(long)]
        top: Option<usize>,
    },

    /// Rewrite a profile in another file format
    Convert {
        input: PathBuf,
        output: PathBuf,

        /// Format of the output file
        #[arg(short, long, value_enum, default_value = "text")]
        mode: SaveMode,
    },

    /// Uppercase k-mers, mark invalid nucleotides as missing and merge duplicates
    Normalize {
        input: PathBuf,
        output: PathBuf,

        /// Nucleotides considered valid
        #[arg(long, default_value = "ACGT")]
        valid: String,

        /// Format of the output file
        #[arg(short, long, value_enum, default_value = "text")]
        mode: SaveMode,
    },

    /// Remove rare k-mers and, optionally, k-mers with missing nucleotides
    Zip {
        input: PathBuf,
        output: PathBuf,

        /// Also remove k-mers containing a missing nucleotide
        #[arg(short, long)]
        delete_missing: bool,

        /// Remove k-mers with a frequency less than or equal to this value
        #[arg(short, long, default_value = "0")]
        lower_bound: u64,

        /// Format of the output file
        #[arg(short, long, value_enum, default_value = "text")]
        mode: SaveMode,
    },

    /// Merge several profiles into one sorted profile
    Join {
        /// Output file
        output: PathBuf,

        /// Profiles to merge, in order
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Identifier of the merged profile (defaults to the first input's)
        #[arg(long)]
        id: Option<String>,

        /// Normalize the merged profile against these nucleotides
        #[arg(long)]
        valid: Option<String>,

        /// Format of the output file
        #[arg(short, long, value_enum, default_value = "text")]
        mode: SaveMode,
    },

    /// Rank distance from a reference profile to other profiles
    Distance {
        /// Reference profile
        reference: PathBuf,

        /// Profiles to compare with the reference
        #[arg(required = true)]
        others: Vec<PathBuf>,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
pub enum SaveMode {
    #[value(alias = "t")]
    Text,
    #[value(alias = "b")]
    Binary,
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

impl From<SaveMode> for kmer_profile::ProfileFormat {
    fn from(mode: SaveMode) -> Self {
        match mode {
            SaveMode::Text => Self::Text,
            SaveMode::Binary => Self::Binary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_save_mode_conversion() {
        assert!(matches!(
            SaveMode::Binary.into(),
            kmer_profile::ProfileFormat::Binary
        ));
    }

    #[test]
    fn test_mode_aliases() {
        let cli = Cli::try_parse_from(["kmer-profile", "convert", "a.prf", "b.prf", "-m", "b"]).unwrap();
        match cli.command {
            Commands::Convert { mode, .. } => assert_eq!(mode, SaveMode::Binary),
            other => panic!("unexpected command {:?}", other),
        }
    }
}
