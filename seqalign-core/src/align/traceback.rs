use super::dp::{TraceMatrix, E_OPEN, F_OPEN, SRC_DIAG, SRC_LEFT, SRC_MASK, SRC_UP};
use super::GAP;

/// Which of the three Gotoh states the walk is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Best,
    GapInSeq2,
    GapInSeq1,
}

pub(crate) struct Traceback {
    pub aligned1: Vec<u8>,
    pub aligned2: Vec<u8>,
    /// Cell where the walk stopped, as `(i, j)`
    pub start: (usize, usize),
}

/// Walk the trace pointers back from `end` until a cell with no
/// predecessor is reached. Borders encode the mode: the origin for global
/// alignment, any zero cell for local, the free row or column for
/// semi-global.
pub(crate) fn trace_back(
    trace: &TraceMatrix,
    seq1: &[u8],
    seq2: &[u8],
    end: (usize, usize),
) -> Traceback {
    let (mut i, mut j) = end;
    let mut aligned1 = Vec::with_capacity(i + j);
    let mut aligned2 = Vec::with_capacity(i + j);
    let mut state = State::Best;

    loop {
        let cell = trace.get(i, j);
        match state {
            State::Best => match cell & SRC_MASK {
                SRC_DIAG => {
                    aligned1.push(seq1[i - 1]);
                    aligned2.push(seq2[j - 1]);
                    i -= 1;
                    j -= 1;
                }
                SRC_UP => state = State::GapInSeq2,
                SRC_LEFT => state = State::GapInSeq1,
                _ => break,
            },
            State::GapInSeq2 => {
                aligned1.push(seq1[i - 1]);
                aligned2.push(GAP);
                if cell & E_OPEN != 0 {
                    state = State::Best;
                }
                i -= 1;
            }
            State::GapInSeq1 => {
                aligned1.push(GAP);
                aligned2.push(seq2[j - 1]);
                if cell & F_OPEN != 0 {
                    state = State::Best;
                }
                j -= 1;
            }
        }
    }

    aligned1.reverse();
    aligned2.reverse();

    Traceback {
        aligned1,
        aligned2,
        start: (i, j),
    }
}
