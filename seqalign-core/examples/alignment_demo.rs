//! seqalign demo
//!
//! Aligns a pair of sequences in every mode, runs a small star alignment
//! and searches a text with the suffix tree and approximate matcher.

use seqalign_core::{
    find_approximate, AlignmentFormatter, AlignmentType, Metric, MultipleAligner, PairwiseAligner, ScoringMatrix,
    Sequence, SuffixTree,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("seqalign demo");
    println!("=============\n");

    let query = Sequence::dna("query", "ACGTTGCATGCATCGT")?;
    let target = Sequence::dna("target", "GGACGTGCATGCATCGTAA")?;

    let aligner = PairwiseAligner::new(ScoringMatrix::dna_blastn());
    let formatter = AlignmentFormatter::new(40).with_names(query.id(), target.id());

    for mode in [AlignmentType::Global, AlignmentType::Local, AlignmentType::SemiGlobal] {
        let result = aligner.align(&query, &target, mode)?;
        println!("{} (score {}, CIGAR {})", mode, result.score, result.cigar());
        println!("{}", formatter.format(&result, None));
        println!("{}\n", result.statistics());
    }

    println!("Star alignment");
    println!("--------------");
    let msa = MultipleAligner::new(ScoringMatrix::default()).align(&["GATTACA", "GATACA", "GATTTACA", "CATTACA"])?;
    for (id, row) in msa.ids.iter().zip(&msa.aligned_sequences) {
        println!("{:<10} {}", id, row);
    }
    println!("{:<10} {}", "consensus", msa.consensus);
    println!("total score: {}\n", msa.total_score);

    println!("Matching");
    println!("--------");
    let text = "GATTACAGATTACATTAGACCAGATTA";
    let tree = SuffixTree::new(text);
    println!("exact GATTA at {:?}", tree.find_all("GATTA")?);
    if let Some(repeat) = tree.longest_repeat() {
        println!("longest repeat: {} at {}", &text[repeat.clone()], repeat.start);
    }
    for hit in find_approximate(text, "GATCA", 1, Metric::Edit)? {
        println!("GATCA ~ position {} (distance {})", hit.position, hit.distance);
    }

    Ok(())
}
