pub mod score_matrix;
pub use score_matrix::{InvalidInputError, ScoreMatrix};

pub mod sequence;
pub use sequence::Sequence;
