use super::*;
use crate::cancel::CancellationToken;
use crate::types::Sequence;
use std::cell::Cell;

fn unit_scoring() -> ScoringMatrix {
    ScoringMatrix::new(1, -1, -1, -1)
}

/// Strip gaps from an aligned row.
fn ungapped(aligned: &str) -> String {
    aligned.chars().filter(|&c| c != '-').collect()
}

fn assert_well_formed(result: &AlignmentResult, seq1: &str, seq2: &str) {
    assert_eq!(result.aligned_seq1.len(), result.aligned_seq2.len());
    assert_eq!(ungapped(&result.aligned_seq1), &seq1[result.start1..result.end1]);
    assert_eq!(ungapped(&result.aligned_seq2), &seq2[result.start2..result.end2]);
}

#[test]
fn test_global_textbook_pair() {
    let result = align("GCATGCG", "GATTACA", &unit_scoring(), AlignmentType::Global).unwrap();

    assert_eq!(result.score, 0);
    assert_eq!(result.aligned_seq1, "GCA-TGCG");
    assert_eq!(result.aligned_seq2, "G-ATTACA");
    assert_eq!((result.start1, result.end1), (0, 7));
    assert_eq!((result.start2, result.end2), (0, 7));
    assert_eq!(result.cigar(), "1=1D1=1I1=1X1=1X");
    assert_well_formed(&result, "GCATGCG", "GATTACA");
}

#[test]
fn test_global_empty_inputs() {
    let scoring = ScoringMatrix::default();

    let result = align("", "ACGT", &scoring, AlignmentType::Global).unwrap();
    assert_eq!(result.aligned_seq1, "----");
    assert_eq!(result.aligned_seq2, "ACGT");
    assert_eq!(result.score, -5);

    let result = align("ACGT", "", &scoring, AlignmentType::Global).unwrap();
    assert_eq!(result.aligned_seq1, "ACGT");
    assert_eq!(result.aligned_seq2, "----");
    assert_eq!(result.score, scoring.gap_cost(4));

    let result = align("", "", &scoring, AlignmentType::Global).unwrap();
    assert_eq!(result.score, 0);
    assert!(result.is_empty());
}

#[test]
fn test_empty_pair_in_every_mode() {
    for mode in [AlignmentType::Global, AlignmentType::Local, AlignmentType::SemiGlobal] {
        let result = align("", "", &ScoringMatrix::default(), mode).unwrap();
        assert_eq!(result.score, 0, "{}", mode);
        assert!(result.is_empty(), "{}", mode);
        assert_eq!((result.start1, result.end1, result.start2, result.end2), (0, 0, 0, 0));
    }
}

#[test]
fn test_global_single_mismatch() {
    let scoring = ScoringMatrix::default();
    let result = align("A", "C", &scoring, AlignmentType::Global).unwrap();
    assert_eq!(result.score, scoring.mismatch);
    assert_eq!(result.aligned_seq1, "A");
    assert_eq!(result.aligned_seq2, "C");
}

#[test]
fn test_gap_in_seq2_preferred_on_tie() {
    // "-AT"/"TA-" and "AT-"/"-TA" both score -1; traceback takes the
    // gap-in-seq2 column first from the end
    let scoring = ScoringMatrix::simple(1, -3, -1);
    let result = align("AT", "TA", &scoring, AlignmentType::Global).unwrap();
    assert_eq!(result.score, -1);
    assert_eq!(result.aligned_seq1, "-AT");
    assert_eq!(result.aligned_seq2, "TA-");
}

#[test]
fn test_global_single_affine_gap() {
    let scoring = ScoringMatrix::new(2, -1, -4, -1);
    let result = align("ACGTTTACGT", "ACGTACGT", &scoring, AlignmentType::Global).unwrap();

    // One run of two gaps beats two separate runs under affine costs
    assert_eq!(result.score, 11);
    assert_eq!(result.aligned_seq1, "ACGTTTACGT");
    assert_eq!(result.aligned_seq2, "ACG--TACGT");
}

#[test]
fn test_global_identical_sequences() {
    let result = align("ACGTACGT", "ACGTACGT", &ScoringMatrix::default(), AlignmentType::Global).unwrap();
    assert_eq!(result.score, 8);
    assert_eq!(result.cigar(), "8=");
}

#[test]
fn test_global_deletion() {
    let result = align("ACGTACGT", "ACGACGT", &ScoringMatrix::default(), AlignmentType::Global).unwrap();
    assert_eq!(result.score, 5);
    assert_eq!(result.aligned_seq1, "ACGTACGT");
    assert_eq!(result.aligned_seq2, "ACG-ACGT");
    assert_eq!(result.cigar(), "3=1D4=");
}

#[test]
fn test_global_score_is_symmetric() {
    let scoring = ScoringMatrix::default();
    let pairs = [("GATTACA", "GCATGCU"), ("ACGT", "TGCA"), ("AAAAAA", "AA")];
    for (a, b) in pairs {
        let forward = align(a, b, &scoring, AlignmentType::Global).unwrap();
        let reverse = align(b, a, &scoring, AlignmentType::Global).unwrap();
        assert_eq!(forward.score, reverse.score, "{} vs {}", a, b);
    }
}

#[test]
fn test_local_finds_embedded_match() {
    let scoring = ScoringMatrix::new(1, -5, -5, -5);
    let result = align("AAAXXXAAA", "AAA", &scoring, AlignmentType::Local).unwrap();

    assert_eq!(result.score, 3);
    assert_eq!(result.aligned_seq1, "AAA");
    assert_eq!(result.aligned_seq2, "AAA");
    // first maximum in scan order wins over the equal run at the end
    assert_eq!((result.start1, result.end1), (0, 3));
    assert_eq!((result.start2, result.end2), (0, 3));
}

#[test]
fn test_local_core_region() {
    let scoring = ScoringMatrix::dna_blastn();
    let result = align("TTTTACGTACGTTTTT", "GGACGTACGTGG", &scoring, AlignmentType::Local).unwrap();

    assert_eq!(result.score, 16);
    assert_eq!(result.aligned_seq1, "ACGTACGT");
    assert_eq!((result.start1, result.end1), (4, 12));
    assert_eq!((result.start2, result.end2), (2, 10));
    assert_well_formed(&result, "TTTTACGTACGTTTTT", "GGACGTACGTGG");
}

#[test]
fn test_local_first_maximum_tie_break() {
    let result = align("ACGT", "TGCA", &ScoringMatrix::default(), AlignmentType::Local).unwrap();
    assert_eq!(result.score, 1);
    assert_eq!(result.aligned_seq1, "A");
    assert_eq!((result.start1, result.end1), (0, 1));
    assert_eq!((result.start2, result.end2), (3, 4));
}

#[test]
fn test_local_no_positive_cell() {
    let scoring = ScoringMatrix::default();

    let result = align("AAAA", "TTTT", &scoring, AlignmentType::Local).unwrap();
    assert_eq!(result.score, 0);
    assert!(result.is_empty());

    let result = align("", "ACGT", &scoring, AlignmentType::Local).unwrap();
    assert_eq!(result.score, 0);
    assert!(result.aligned_seq1.is_empty());
    assert!(result.aligned_seq2.is_empty());
}

#[test]
fn test_semi_global_free_reference_ends() {
    let result = align("ACGT", "TTACGTTT", &ScoringMatrix::default(), AlignmentType::SemiGlobal).unwrap();

    assert_eq!(result.score, 4);
    assert_eq!(result.aligned_seq1, "ACGT");
    assert_eq!(result.aligned_seq2, "ACGT");
    assert_eq!((result.start1, result.end1), (0, 4));
    assert_eq!((result.start2, result.end2), (2, 6));
}

#[test]
fn test_semi_global_free_query_ends() {
    let aligner = PairwiseAligner::with_config(
        ScoringMatrix::default(),
        AlignerConfig {
            free_ends: FreeEnds::Sequence1,
        },
    );
    let result = aligner.align("TTACGTTT", "ACGT", AlignmentType::SemiGlobal).unwrap();

    assert_eq!(result.score, 4);
    assert_eq!((result.start1, result.end1), (2, 6));
    assert_eq!((result.start2, result.end2), (0, 4));
    assert_well_formed(&result, "TTACGTTT", "ACGT");
}

#[test]
fn test_semi_global_query_is_fully_aligned() {
    // The query must be consumed even when the reference is empty
    let result = align("ACGT", "", &ScoringMatrix::default(), AlignmentType::SemiGlobal).unwrap();
    assert_eq!(result.aligned_seq1, "ACGT");
    assert_eq!(result.aligned_seq2, "----");
    assert_eq!(result.score, -5);
}

#[test]
fn test_score_only_matches_full_alignment() {
    let aligner = PairwiseAligner::new(ScoringMatrix::dna_blastn());
    let pairs = [
        ("GCATGCG", "GATTACA"),
        ("ACGTACGTTT", "TTACGTAC"),
        ("", "ACGT"),
        ("AAAAAAAA", "AAAA"),
    ];

    for mode in [AlignmentType::Global, AlignmentType::Local, AlignmentType::SemiGlobal] {
        for (a, b) in pairs {
            let full = aligner.align(a, b, mode).unwrap();
            assert_eq!(aligner.score_only(a, b, mode).unwrap(), full.score, "{} {} vs {}", mode, a, b);
        }
    }
}

#[test]
fn test_accepts_sequences_and_bytes() {
    let seq1 = Sequence::dna("a", "acgt").unwrap();
    let seq2 = Sequence::dna("b", "ACGT").unwrap();
    let aligner = PairwiseAligner::default();

    let from_sequences = aligner.align(&seq1, &seq2, AlignmentType::Global).unwrap();
    let from_bytes = aligner.align(b"ACGT", b"ACGT", AlignmentType::Global).unwrap();
    assert_eq!(from_sequences, from_bytes);
}

#[test]
fn test_lowercase_input_matches() {
    let result = align("acgt", "ACGT", &ScoringMatrix::default(), AlignmentType::Global).unwrap();
    assert_eq!(result.score, 4);
    assert_eq!(result.aligned_seq1, "acgt");
}

#[test]
fn test_gap_symbol_in_input_is_rejected() {
    let err = align("AC-GT", "ACGT", &ScoringMatrix::default(), AlignmentType::Global).unwrap_err();
    assert!(matches!(err, AlignError::InvalidArgument { ref argument, .. } if argument == "seq1"));
}

#[test]
fn test_cancelled_token_aborts() {
    let token = CancellationToken::new();
    token.cancel();

    let aligner = PairwiseAligner::default();
    let err = aligner
        .align_cancellable("ACGT", "ACGT", AlignmentType::Global, &token)
        .unwrap_err();
    assert_eq!(err, AlignError::Cancelled);
}

#[test]
fn test_cancellation_mid_fill() {
    let seq = "ACGT".repeat(50);
    let polls = Cell::new(0usize);
    let signal = || {
        polls.set(polls.get() + 1);
        polls.get() > 10
    };

    let aligner = PairwiseAligner::default();
    let err = aligner
        .align_cancellable(&seq, &seq, AlignmentType::Local, &signal)
        .unwrap_err();
    assert!(err.is_cancelled());
    // polled once per row, stopped well before the last one
    assert_eq!(polls.get(), 11);
}

#[test]
fn test_uncancelled_signal_completes() {
    let token = CancellationToken::new();
    let result = PairwiseAligner::default()
        .align_cancellable("GATTACA", "GATTACA", AlignmentType::Global, &token)
        .unwrap();
    assert_eq!(result.score, 7);
}

#[test]
fn test_batch_preserves_order() {
    let pairs = vec![
        ("ACGT".to_string(), "ACGT".to_string()),
        ("AC-GT".to_string(), "ACGT".to_string()),
        ("AAAA".to_string(), "AA".to_string()),
    ];
    let results = PairwiseAligner::default().align_batch(&pairs, AlignmentType::Global);

    assert_eq!(results.len(), 3);
    assert_eq!(results[0].as_ref().unwrap().score, 4);
    assert!(results[1].is_err());
    assert_eq!(results[2].as_ref().unwrap().score, -1);
}

#[test]
fn test_alignment_type_from_str() {
    assert_eq!("global".parse::<AlignmentType>().unwrap(), AlignmentType::Global);
    assert_eq!("SW".parse::<AlignmentType>().unwrap(), AlignmentType::Local);
    assert_eq!("semi-global".parse::<AlignmentType>().unwrap(), AlignmentType::SemiGlobal);
    assert!("banded".parse::<AlignmentType>().is_err());
    assert_eq!("seq1".parse::<FreeEnds>().unwrap(), FreeEnds::Sequence1);
}

#[test]
fn test_result_serializes() {
    let result = align("ACGT", "ACGT", &ScoringMatrix::default(), AlignmentType::SemiGlobal).unwrap();
    let json = serde_json::to_string(&result).unwrap();
    assert!(json.contains("\"alignment_type\":\"semi-global\""));
    let back: AlignmentResult = serde_json::from_str(&json).unwrap();
    assert_eq!(back, result);
}
