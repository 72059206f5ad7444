//! Gotoh three-state matrix fill shared by every alignment mode
//!
//! Scores live in rolling rows (O(m) memory); the optional trace matrix
//! records one byte per cell so traceback never re-derives moves from
//! score equalities. The mode only changes the borders and which cell
//! the traceback starts from.

use super::{AlignmentType, FreeEnds};
use crate::cancel::CancelSignal;
use crate::error::{AlignError, Result};
use crate::scoring::ScoringMatrix;

/// Sentinel for unreachable gap states. Far enough from `i32::MIN` that a
/// few saturating additions cannot wrap it into a plausible score.
pub(crate) const NEG_INF: i32 = i32::MIN / 4;

// Trace cell layout: bits 0-1 hold the predecessor of the best (H) state,
// bit 2 is set when E (gap in sequence 2) was opened from H rather than
// extended, bit 3 likewise for F (gap in sequence 1).
pub(crate) const SRC_NONE: u8 = 0;
pub(crate) const SRC_DIAG: u8 = 1;
pub(crate) const SRC_UP: u8 = 2;
pub(crate) const SRC_LEFT: u8 = 3;
pub(crate) const SRC_MASK: u8 = 0b0011;
pub(crate) const E_OPEN: u8 = 0b0100;
pub(crate) const F_OPEN: u8 = 0b1000;

/// Row-major `(n + 1) x (m + 1)` trace pointers.
pub(crate) struct TraceMatrix {
    cols: usize,
    cells: Vec<u8>,
}

impl TraceMatrix {
    pub(crate) fn new(rows: usize, cols: usize) -> Self {
        Self {
            cols,
            cells: vec![SRC_NONE; rows * cols],
        }
    }

    #[inline]
    pub(crate) fn get(&self, i: usize, j: usize) -> u8 {
        self.cells[i * self.cols + j]
    }

    #[inline]
    fn set(&mut self, i: usize, j: usize, value: u8) {
        self.cells[i * self.cols + j] = value;
    }
}

/// Where the traceback starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EndRule {
    /// Bottom-right cell
    Corner,
    /// First maximum in a row-major scan of the whole matrix
    MatrixMax,
    /// First maximum of the last row, scanning left to right
    LastRowMax,
    /// First maximum of the last column, scanning top to bottom
    LastColMax,
}

/// Border initialisation and end-cell rule for one mode.
#[derive(Debug, Clone, Copy)]
struct Layout {
    free_row0: bool,
    free_col0: bool,
    local: bool,
    end: EndRule,
}

impl Layout {
    fn for_mode(mode: AlignmentType, free_ends: FreeEnds) -> Self {
        match (mode, free_ends) {
            (AlignmentType::Global, _) => Self {
                free_row0: false,
                free_col0: false,
                local: false,
                end: EndRule::Corner,
            },
            (AlignmentType::Local, _) => Self {
                free_row0: true,
                free_col0: true,
                local: true,
                end: EndRule::MatrixMax,
            },
            // Sequence 2 may overhang at both ends: skipping its prefix is
            // free (row 0) and so is its suffix (best cell of the last row).
            (AlignmentType::SemiGlobal, FreeEnds::Sequence2) => Self {
                free_row0: true,
                free_col0: false,
                local: false,
                end: EndRule::LastRowMax,
            },
            (AlignmentType::SemiGlobal, FreeEnds::Sequence1) => Self {
                free_row0: false,
                free_col0: true,
                local: false,
                end: EndRule::LastColMax,
            },
        }
    }
}

pub(crate) struct FillOutcome {
    pub score: i32,
    /// Cell the traceback starts from, as `(i, j)`
    pub end: (usize, usize),
}

/// Fill the DP matrices for `seq1` (rows) against `seq2` (columns).
///
/// Tie-break within a cell: diagonal, then up (gap in sequence 2), then
/// left (gap in sequence 1). Inside a gap state, opening from H wins over
/// extending on equal scores.
pub(crate) fn fill<S: CancelSignal + ?Sized>(
    seq1: &[u8],
    seq2: &[u8],
    scoring: &ScoringMatrix,
    mode: AlignmentType,
    free_ends: FreeEnds,
    mut trace: Option<&mut TraceMatrix>,
    signal: &S,
) -> Result<FillOutcome> {
    let n = seq1.len();
    let m = seq2.len();
    let cols = m + 1;
    let layout = Layout::for_mode(mode, free_ends);
    let gap_open = scoring.gap_open;
    let gap_extend = scoring.gap_extend;

    if signal.is_cancelled() {
        return Err(AlignError::Cancelled);
    }

    let mut h_prev = vec![0i32; cols];
    let mut e_prev = vec![NEG_INF; cols];
    let mut h_cur = vec![0i32; cols];
    let mut e_cur = vec![NEG_INF; cols];

    if !layout.free_row0 {
        for j in 1..cols {
            h_prev[j] = scoring.gap_cost(j);
            if let Some(t) = trace.as_mut() {
                t.set(0, j, SRC_LEFT | if j == 1 { F_OPEN } else { 0 });
            }
        }
    }

    let (mut best_score, mut best_cell) = match layout.end {
        EndRule::LastColMax => (h_prev[m], (0, m)),
        _ => (0, (0, 0)),
    };

    for i in 1..=n {
        if signal.is_cancelled() {
            log::debug!("alignment cancelled at row {} of {}", i, n);
            return Err(AlignError::Cancelled);
        }

        let a = seq1[i - 1];

        if layout.free_col0 {
            h_cur[0] = 0;
            e_cur[0] = NEG_INF;
        } else {
            h_cur[0] = scoring.gap_cost(i);
            e_cur[0] = h_cur[0];
            if let Some(t) = trace.as_mut() {
                t.set(i, 0, SRC_UP | if i == 1 { E_OPEN } else { 0 });
            }
        }

        let mut f = NEG_INF;
        for j in 1..cols {
            let mut bits = 0u8;

            // E: gap in sequence 2, consumes seq1[i - 1]
            let open = h_prev[j].saturating_add(gap_open);
            let extend = e_prev[j].saturating_add(gap_extend);
            let e = if i == 1 || open >= extend {
                bits |= E_OPEN;
                open
            } else {
                extend
            };

            // F: gap in sequence 1, consumes seq2[j - 1]
            let open = h_cur[j - 1].saturating_add(gap_open);
            let extend = f.saturating_add(gap_extend);
            f = if j == 1 || open >= extend {
                bits |= F_OPEN;
                open
            } else {
                extend
            };

            let diag = h_prev[j - 1].saturating_add(scoring.score_pair(a, seq2[j - 1]));
            let (mut h, mut src) = (diag, SRC_DIAG);
            if e > h {
                h = e;
                src = SRC_UP;
            }
            if f > h {
                h = f;
                src = SRC_LEFT;
            }
            if layout.local && h <= 0 {
                h = 0;
                src = SRC_NONE;
            }

            h_cur[j] = h;
            e_cur[j] = e;
            if let Some(t) = trace.as_mut() {
                t.set(i, j, src | bits);
            }

            if layout.end == EndRule::MatrixMax && h > best_score {
                best_score = h;
                best_cell = (i, j);
            }
        }

        if layout.end == EndRule::LastColMax && h_cur[m] > best_score {
            best_score = h_cur[m];
            best_cell = (i, m);
        }

        std::mem::swap(&mut h_prev, &mut h_cur);
        std::mem::swap(&mut e_prev, &mut e_cur);
    }

    // h_prev now holds row n
    let (score, end) = match layout.end {
        EndRule::Corner => (h_prev[m], (n, m)),
        EndRule::MatrixMax | EndRule::LastColMax => (best_score, best_cell),
        EndRule::LastRowMax => {
            let mut best_j = 0;
            for j in 1..cols {
                if h_prev[j] > h_prev[best_j] {
                    best_j = j;
                }
            }
            (h_prev[best_j], (n, best_j))
        }
    };

    Ok(FillOutcome { score, end })
}
