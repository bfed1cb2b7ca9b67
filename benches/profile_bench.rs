use criterion::{black_box, criterion_group, criterion_main, Criterion};
use kmer_profile::{Kmer, KmerFreq, Profile};

const NUCLEOTIDES: &[u8] = b"ACGT";

fn all_kmers(k: u32) -> Vec<KmerFreq> {
    (0..4usize.pow(k))
        .map(|index| {
            let mut code = index;
            let mut symbols = Vec::with_capacity(k as usize);
            for _ in 0..k {
                symbols.push(NUCLEOTIDES[code % 4]);
                code /= 4;
            }
            KmerFreq::new(Kmer::new(&symbols), (index as u64 * 7919) % 101)
        })
        .collect()
}

fn build_profile(pairs: &[KmerFreq]) -> Profile {
    let mut profile = Profile::new();
    for pair in pairs {
        profile.append(pair.clone()).unwrap();
    }
    profile
}

fn profile_benchmark(c: &mut Criterion) {
    let pairs = all_kmers(5);

    c.bench_function("append 1024 5-mers", |b| {
        b.iter(|| build_profile(black_box(&pairs)))
    });

    let mut reference = build_profile(&pairs);
    reference.sort();
    let mut sample = build_profile(&pairs[..512]);
    sample.sort();

    c.bench_function("distance 512 vs 1024", |b| {
        b.iter(|| black_box(&sample).distance(black_box(&reference)).unwrap())
    });

    c.bench_function("normalize 1024 5-mers", |b| {
        b.iter(|| {
            let mut profile = reference.clone();
            profile.normalize(black_box("ACG"));
            profile
        })
    });
}

criterion_group!(benches, profile_benchmark);
criterion_main!(benches);
