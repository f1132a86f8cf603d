pub mod structs;

mod gap_penalty;
pub use gap_penalty::{
    AffineGap, FixedGap, GapModel, GapPenalty, GapState, DEFAULT_GAP_EXTEND, DEFAULT_GAP_OPEN,
};

mod fill;
pub use fill::{fill_matrix, fill_matrix_with};

mod traceback;
pub use traceback::{traceback, MaximaSelection, StopRule, Traceback, TracebackParams};

mod smith_waterman;
pub use smith_waterman::smith_waterman;
