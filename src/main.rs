mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use kmer_profile::{KmerFreq, Profile, ProfileFormat};

use crate::cli::{Cli, Commands, OutputFormat};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let mut builder = env_logger::Builder::from_default_env();
    if let Some(log_file) = cli.log_file {
        let file = File::create(log_file)?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();

    match cli.command {
        Commands::Show { input, format, top } => handle_show(&input, format, top)?,
        Commands::Convert { input, output, mode } => {
            let profile = load(&input)?;
            save(&profile, &output, mode.into())?;
        }
        Commands::Normalize { input, output, valid, mode } => {
            let mut profile = load(&input)?;
            let before = profile.size();
            profile.normalize(&valid);
            info!("Normalized {}: {} -> {} k-mers", input.display(), before, profile.size());
            save(&profile, &output, mode.into())?;
        }
        Commands::Zip { input, output, delete_missing, lower_bound, mode } => {
            let mut profile = load(&input)?;
            let before = profile.size();
            profile.zip(delete_missing, lower_bound);
            info!("Zipped {}: {} -> {} k-mers", input.display(), before, profile.size());
            save(&profile, &output, mode.into())?;
        }
        Commands::Join { output, inputs, id, valid, mode } => {
            let profile = handle_join(&inputs, id, valid.as_deref())?;
            save(&profile, &output, mode.into())?;
        }
        Commands::Distance { reference, others } => handle_distance(&reference, others)?,
    }

    Ok(())
}

fn load(path: &Path) -> Result<Profile> {
    let mut profile = Profile::new();
    profile
        .load(path)
        .with_context(|| format!("Failed to load profile: {}", path.display()))?;
    Ok(profile)
}

fn save(profile: &Profile, path: &Path, format: ProfileFormat) -> Result<()> {
    profile
        .save(path, format)
        .with_context(|| format!("Failed to save profile: {}", path.display()))
}

#[derive(Serialize)]
struct ProfileReport<'a> {
    id: &'a str,
    size: usize,
    total_frequency: u64,
    kmers: &'a [KmerFreq],
}

fn handle_show(input: &Path, format: OutputFormat, top: Option<usize>) -> Result<()> {
    let profile = load(input)?;
    let shown = top.unwrap_or(profile.size()).min(profile.size());
    let kmers = &profile.as_slice()[..shown];

    let stdout = std::io::stdout();
    let mut writer = stdout.lock();
    match format {
        OutputFormat::Text => {
            if shown == profile.size() {
                write!(writer, "{}", profile)?;
            } else {
                writeln!(writer, "{}", profile.profile_id())?;
                writeln!(writer, "{}", shown)?;
                for kmer_freq in kmers {
                    writeln!(writer, "{}", kmer_freq)?;
                }
            }
        }
        OutputFormat::Json => {
            let report = ProfileReport {
                id: profile.profile_id(),
                size: profile.size(),
                total_frequency: profile.total_frequency(),
                kmers,
            };
            serde_json::to_writer_pretty(&mut writer, &report)?;
            writeln!(writer)?;
        }
        OutputFormat::Tsv => {
            writeln!(writer, "rank\tkmer\tfrequency")?;
            for (rank, kmer_freq) in kmers.iter().enumerate() {
                writeln!(writer, "{}\t{}\t{}", rank, kmer_freq.kmer(), kmer_freq.frequency())?;
            }
        }
    }

    Ok(())
}

fn handle_join(inputs: &[PathBuf], id: Option<String>, valid: Option<&str>) -> Result<Profile> {
    info!("Joining {} profiles...", inputs.len());
    let mut joined = Profile::new();
    for (idx, input) in inputs.iter().enumerate() {
        let profile = load(input)?;
        if idx == 0 {
            joined.set_profile_id(profile.profile_id());
        }
        joined
            .join(&profile)
            .with_context(|| format!("Failed to join profile: {}", input.display()))?;
    }

    if let Some(id) = id {
        joined.set_profile_id(id);
    }
    if let Some(valid) = valid {
        joined.normalize(valid);
    }
    joined.sort();

    info!("Joined profile {} has {} k-mers", joined.profile_id(), joined.size());
    Ok(joined)
}

fn handle_distance(reference: &Path, others: Vec<PathBuf>) -> Result<()> {
    let rows = compute_distances(reference, &others)?;

    println!("reference\tprofile\tdistance");
    for (reference_id, other_id, distance) in rows {
        println!("{}\t{}\t{:.6}", reference_id, other_id, distance);
    }

    Ok(())
}

/// Distance from the sorted reference to each sorted profile in `others`
fn compute_distances(reference: &Path, others: &[PathBuf]) -> Result<Vec<(String, String, f64)>> {
    let mut reference_profile = load(reference)?;
    reference_profile.sort();

    let mut rows = Vec::with_capacity(others.len());
    for path in others {
        let mut other = load(path)?;
        other.sort();

        let distance = reference_profile.distance(&other).with_context(|| {
            format!(
                "Failed to compare {} with {}",
                reference.display(),
                path.display()
            )
        })?;
        rows.push((
            reference_profile.profile_id().to_string(),
            other.profile_id().to_string(),
            distance,
        ));
    }

    Ok(rows)
}
