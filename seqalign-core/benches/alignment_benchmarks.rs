use criterion::{black_box, criterion_group, criterion_main, Criterion};
use seqalign_core::{
    find_approximate, AlignmentType, Metric, MultipleAligner, PairwiseAligner, ScoringMatrix, SuffixTree,
};

fn generate_test_sequence(length: usize, seed: u64) -> Vec<u8> {
    // xorshift keeps the input deterministic without extra dependencies
    let mut state = seed.max(1);
    (0..length)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            b"ACGT"[(state % 4) as usize]
        })
        .collect()
}

fn bench_pairwise_modes(c: &mut Criterion) {
    let query = generate_test_sequence(1000, 1);
    let target = generate_test_sequence(1000, 2);
    let aligner = PairwiseAligner::new(ScoringMatrix::dna_blastn());

    let mut group = c.benchmark_group("pairwise_1kb");
    for mode in [AlignmentType::Global, AlignmentType::Local, AlignmentType::SemiGlobal] {
        group.bench_function(mode.to_string(), |b| {
            b.iter(|| black_box(aligner.align(black_box(&query), black_box(&target), mode)))
        });
    }
    group.finish();
}

fn bench_score_only(c: &mut Criterion) {
    let query = generate_test_sequence(2000, 3);
    let target = generate_test_sequence(2000, 4);
    let aligner = PairwiseAligner::new(ScoringMatrix::dna_blastn());

    c.bench_function("score_only_2kb", |b| {
        b.iter(|| black_box(aligner.score_only(black_box(&query), black_box(&target), AlignmentType::Global)))
    });
}

fn bench_batch(c: &mut Criterion) {
    let pairs: Vec<(Vec<u8>, Vec<u8>)> = (0..32)
        .map(|i| (generate_test_sequence(300, 10 + i), generate_test_sequence(300, 100 + i)))
        .collect();
    let aligner = PairwiseAligner::default();

    c.bench_function("batch_32x300", |b| {
        b.iter(|| black_box(aligner.align_batch(black_box(&pairs), AlignmentType::Global)))
    });
}

fn bench_star_alignment(c: &mut Criterion) {
    let sequences: Vec<Vec<u8>> = (0..8).map(|i| generate_test_sequence(200, 50 + i)).collect();
    let aligner = MultipleAligner::default();

    c.bench_function("star_8x200", |b| b.iter(|| black_box(aligner.align(black_box(&sequences)))));
}

fn bench_matching(c: &mut Criterion) {
    let text = generate_test_sequence(10000, 7);
    let pattern = text[5000..5020].to_vec();

    c.bench_function("suffix_tree_build_10kb", |b| b.iter(|| black_box(SuffixTree::new(black_box(&text)))));

    let tree = SuffixTree::new(&text);
    c.bench_function("suffix_tree_find_all", |b| b.iter(|| black_box(tree.find_all(black_box(&pattern)))));

    let mut group = c.benchmark_group("approximate_10kb");
    for metric in [Metric::Hamming, Metric::Edit] {
        group.bench_function(metric.to_string(), |b| {
            b.iter(|| black_box(find_approximate(black_box(&text), black_box(&pattern), 2, metric)))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_pairwise_modes,
    bench_score_only,
    bench_batch,
    bench_star_alignment,
    bench_matching
);
criterion_main!(benches);
