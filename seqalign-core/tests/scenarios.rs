use seqalign_core::io::read_sequences;
use seqalign_core::{
    align, find_approximate, hamming_distance, AlignError, AlignmentFormatter, AlignmentStatistics, AlignmentType,
    Alphabet, CancellationToken, Metric, MultipleAligner, PairwiseAligner, ScoringMatrix, Sequence, SuffixTree,
};
use std::io::Write;
use tempfile::NamedTempFile;

fn write_fasta(records: &[(&str, &str)]) -> NamedTempFile {
    let mut f = NamedTempFile::new().expect("create temp fasta");
    for (id, seq) in records {
        writeln!(f, ">{}", id).unwrap();
        writeln!(f, "{}", seq).unwrap();
    }
    f.flush().unwrap();
    f
}

#[test]
fn textbook_global_alignment_and_statistics() {
    let scoring = ScoringMatrix::new(1, -1, -1, -1);
    let result = align("GCATGCG", "GATTACA", &scoring, AlignmentType::Global).expect("align");

    assert_eq!(result.score, 0);
    assert_eq!(result.aligned_seq1, "GCA-TGCG");
    assert_eq!(result.aligned_seq2, "G-ATTACA");

    let stats = result.statistics();
    assert_eq!(stats.alignment_length, 8);
    assert_eq!(stats.matches, 4);
    assert_eq!(stats.mismatches, 2);
    assert_eq!(stats.gaps, 2);
}

#[test]
fn empty_against_nonempty() {
    let result = align("", "ACGT", &ScoringMatrix::default(), AlignmentType::Global).expect("align");
    assert_eq!(result.aligned_seq1, "----");
    assert_eq!(result.aligned_seq2, "ACGT");
    assert_eq!(result.score, -2 + 3 * -1);
}

#[test]
fn statistics_of_hand_written_rows() {
    let stats = AlignmentStatistics::from_aligned("AC-GT", "ACTGT", None).expect("equal rows");
    assert_eq!(stats.matches, 4);
    assert_eq!(stats.mismatches, 0);
    assert_eq!(stats.gaps, 1);
    assert_eq!(stats.alignment_length, 5);
    assert!((stats.gap_percent - 0.2).abs() < 1e-12);
}

#[test]
fn star_alignment_of_identical_sequences() {
    let result = MultipleAligner::new(ScoringMatrix::default())
        .align(&["ACGT", "ACGT", "ACGT"])
        .expect("msa");
    assert!(result.aligned_sequences.iter().all(|s| s == "ACGT"));
    assert_eq!(result.consensus, "ACGT");
    assert_eq!(result.total_score, 8);
}

#[test]
fn hamming_distances() {
    assert_eq!(hamming_distance("AAAA", "AAAT").unwrap(), 1);
    assert!(matches!(
        hamming_distance("AAA", "AAAA"),
        Err(AlignError::LengthMismatch { left: 3, right: 4 })
    ));
}

#[test]
fn local_alignment_prefers_first_maximum() {
    let scoring = ScoringMatrix::new(1, -5, -5, -5);
    let result = align("AAAXXXAAA", "AAA", &scoring, AlignmentType::Local).expect("align");
    assert_eq!(result.score, 3);
    assert_eq!(result.start1, 0);
}

#[test]
fn fasta_to_alignment_pipeline() {
    let fasta = write_fasta(&[("query desc", "ACGTACGT"), ("reference", "TTTACGTACGTTTT")]);
    let sequences = read_sequences(fasta.path(), Alphabet::Dna).expect("read fasta");
    assert_eq!(sequences.len(), 2);
    assert_eq!(sequences[0].id(), "query");

    let aligner = PairwiseAligner::new(ScoringMatrix::dna_blastn());
    let result = aligner
        .align(&sequences[0], &sequences[1], AlignmentType::SemiGlobal)
        .expect("align");
    assert_eq!(result.score, 16);
    assert_eq!((result.start2, result.end2), (3, 11));

    let text = AlignmentFormatter::new(60)
        .with_names(sequences[0].id(), sequences[1].id())
        .format(&result, None);
    assert!(text.contains("reference      4 ACGTACGT 11"));
}

#[test]
fn suffix_tree_and_approximate_search_agree_on_exact_hits() {
    let genome = Sequence::dna("g", "GATTACAGATTACATTAGACCAGATTA").unwrap();
    let tree = SuffixTree::new(&genome);

    let exact = tree.find_all("GATTA").unwrap();
    let approximate: Vec<usize> = find_approximate(&genome, "GATTA", 0, Metric::Hamming)
        .unwrap()
        .into_iter()
        .map(|m| m.position)
        .collect();
    assert_eq!(exact, approximate);
    assert_eq!(exact, vec![0, 7, 22]);
}

#[test]
fn cancellation_from_another_thread() {
    let token = CancellationToken::new();
    let handle = token.clone();
    handle.cancel();

    let long = "ACGT".repeat(500);
    let err = std::thread::spawn(move || {
        PairwiseAligner::default().align_cancellable(&long, &long, AlignmentType::Global, &token)
    })
    .join()
    .unwrap()
    .unwrap_err();
    assert!(err.is_cancelled());
}
