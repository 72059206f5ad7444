//! Distance measures and approximate pattern search
//!
//! Symbols are compared ASCII case-insensitively throughout.

use crate::error::{AlignError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Distance used by [`find_approximate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    /// Substitutions only; windows have the pattern's length
    #[default]
    Hamming,
    /// Unit-cost substitutions, insertions and deletions
    Edit,
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Hamming => write!(f, "hamming"),
            Metric::Edit => write!(f, "edit"),
        }
    }
}

impl FromStr for Metric {
    type Err = AlignError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "hamming" => Ok(Metric::Hamming),
            "edit" | "levenshtein" => Ok(Metric::Edit),
            other => Err(AlignError::invalid_argument(
                "metric",
                format!("unknown metric '{}'", other),
            )),
        }
    }
}

/// A start position in the text where the pattern matches within budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApproximateMatch {
    pub position: usize,
    pub distance: usize,
}

#[inline]
fn same(a: u8, b: u8) -> bool {
    a.eq_ignore_ascii_case(&b)
}

/// Number of differing positions between equal-length sequences.
pub fn hamming_distance<A, B>(a: &A, b: &B) -> Result<usize>
where
    A: AsRef<[u8]> + ?Sized,
    B: AsRef<[u8]> + ?Sized,
{
    let (a, b) = (a.as_ref(), b.as_ref());
    if a.len() != b.len() {
        return Err(AlignError::length_mismatch(a.len(), b.len()));
    }
    Ok(a.iter().zip(b).filter(|(x, y)| !same(**x, **y)).count())
}

/// Levenshtein distance with unit costs, in two rows of memory.
pub fn edit_distance<A, B>(a: &A, b: &B) -> usize
where
    A: AsRef<[u8]> + ?Sized,
    B: AsRef<[u8]> + ?Sized,
{
    let (a, b) = (a.as_ref(), b.as_ref());
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut cur = vec![0usize; b.len() + 1];

    for (i, &x) in a.iter().enumerate() {
        cur[0] = i + 1;
        for (j, &y) in b.iter().enumerate() {
            let substitution = prev[j] + usize::from(!same(x, y));
            cur[j + 1] = substitution.min(prev[j + 1] + 1).min(cur[j] + 1);
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    prev[b.len()]
}

/// All start positions where `pattern` occurs in `text` with at most
/// `max_distance` differences, in ascending order.
///
/// With [`Metric::Edit`] the reported distance is the best over every
/// prefix of `text[position..]`, so a match may be shorter or longer than
/// the pattern.
pub fn find_approximate<T, P>(
    text: &T,
    pattern: &P,
    max_distance: usize,
    metric: Metric,
) -> Result<Vec<ApproximateMatch>>
where
    T: AsRef<[u8]> + ?Sized,
    P: AsRef<[u8]> + ?Sized,
{
    let (text, pattern) = (text.as_ref(), pattern.as_ref());
    if pattern.is_empty() {
        return Err(AlignError::invalid_argument("pattern", "must not be empty"));
    }

    let matches = match metric {
        Metric::Hamming => hamming_scan(text, pattern, max_distance),
        Metric::Edit => edit_scan(text, pattern, max_distance),
    };

    log::debug!(
        "{} search for pattern of length {} (k = {}): {} matches",
        metric,
        pattern.len(),
        max_distance,
        matches.len()
    );
    Ok(matches)
}

/// Number of positions [`find_approximate`] would report.
pub fn count_approximate<T, P>(text: &T, pattern: &P, max_distance: usize, metric: Metric) -> Result<usize>
where
    T: AsRef<[u8]> + ?Sized,
    P: AsRef<[u8]> + ?Sized,
{
    find_approximate(text, pattern, max_distance, metric).map(|matches| matches.len())
}

fn hamming_scan(text: &[u8], pattern: &[u8], max_distance: usize) -> Vec<ApproximateMatch> {
    if pattern.len() > text.len() {
        return Vec::new();
    }

    text.windows(pattern.len())
        .enumerate()
        .filter_map(|(position, window)| {
            let mut distance = 0;
            for (&a, &b) in window.iter().zip(pattern) {
                if !same(a, b) {
                    distance += 1;
                    if distance > max_distance {
                        return None;
                    }
                }
            }
            Some(ApproximateMatch { position, distance })
        })
        .collect()
}

fn edit_scan(text: &[u8], pattern: &[u8], max_distance: usize) -> Vec<ApproximateMatch> {
    let m = pattern.len();
    let mut matches = Vec::new();
    let mut prev = vec![0usize; m + 1];
    let mut cur = vec![0usize; m + 1];

    for position in 0..text.len() {
        let window_end = text.len().min(position.saturating_add(m).saturating_add(max_distance));
        let window = &text[position..window_end];

        // Column 0: pattern prefixes against the empty text prefix
        for (p, cell) in prev.iter_mut().enumerate() {
            *cell = p;
        }
        let mut best = prev[m];

        for (j, &symbol) in window.iter().enumerate() {
            cur[0] = j + 1;
            let mut column_min = cur[0];
            for p in 1..=m {
                let substitution = prev[p - 1] + usize::from(!same(pattern[p - 1], symbol));
                cur[p] = substitution.min(prev[p] + 1).min(cur[p - 1] + 1);
                column_min = column_min.min(cur[p]);
            }
            std::mem::swap(&mut prev, &mut cur);
            best = best.min(prev[m]);

            // Column minima never decrease, so nothing further can fit
            if best == 0 || column_min > max_distance {
                break;
            }
        }

        if best <= max_distance {
            matches.push(ApproximateMatch {
                position,
                distance: best,
            });
        }
    }
    matches
}
