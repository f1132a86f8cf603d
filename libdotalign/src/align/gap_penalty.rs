use serde::{Deserialize, Serialize};

use crate::structs::InvalidInputError;

pub const DEFAULT_GAP_OPEN: i64 = -1;
pub const DEFAULT_GAP_EXTEND: i64 = 0;

/// A gap-penalty strategy for the matrix builder.
///
/// Every cell of the matrix carries a `State`. A gap that runs out of a
/// cell pays `cost(state)`, and the cell it lands in takes the state
/// returned by `extend(state)`. A cell reached along the diagonal takes
/// the `Default` state, which is also the state of the origin cell.
pub trait GapPenalty {
    type State: Copy + Default;

    fn cost(&self, state: Self::State) -> i64;
    fn extend(&self, from: Self::State) -> Self::State;

    fn validate(&self) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Gaps are free: the recurrence is `max(0, diagonal, top, left)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedGap;

impl GapPenalty for FixedGap {
    type State = ();

    #[inline]
    fn cost(&self, _: ()) -> i64 {
        0
    }

    #[inline]
    fn extend(&self, _: ()) {}
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GapState {
    /// No gap is running through this cell.
    #[default]
    Closed,
    /// The cell was reached by the first position of a gap run.
    Opened,
    /// The cell was reached by a later position of a gap run.
    Extended,
}

/// Gap runs pay `gap_open` once and `gap_extend` for every position
/// after that.
///
/// The charge for a gap position is taken from the state of the cell the
/// gap leaves: leaving a `Closed` cell is free, leaving an `Opened` cell
/// costs `gap_open` and leaving an `Extended` cell costs `gap_extend`.
/// A run of `n >= 2` gap positions therefore costs
/// `gap_open + (n - 2) * gap_extend`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AffineGap {
    pub gap_open: i64,
    pub gap_extend: i64,
}

impl Default for AffineGap {
    fn default() -> Self {
        Self {
            gap_open: DEFAULT_GAP_OPEN,
            gap_extend: DEFAULT_GAP_EXTEND,
        }
    }
}

impl AffineGap {
    pub fn new(gap_open: i64, gap_extend: i64) -> Self {
        Self {
            gap_open,
            gap_extend,
        }
    }
}

impl GapPenalty for AffineGap {
    type State = GapState;

    #[inline]
    fn cost(&self, state: GapState) -> i64 {
        match state {
            GapState::Closed => 0,
            GapState::Opened => self.gap_open,
            GapState::Extended => self.gap_extend,
        }
    }

    #[inline]
    fn extend(&self, from: GapState) -> GapState {
        match from {
            GapState::Closed => GapState::Opened,
            GapState::Opened | GapState::Extended => GapState::Extended,
        }
    }

    fn validate(&self) -> anyhow::Result<()> {
        // a positive penalty would lift the zero boundary
        if self.gap_open > 0 || self.gap_extend > 0 {
            return Err(InvalidInputError::PositiveGapPenalty {
                gap_open: self.gap_open,
                gap_extend: self.gap_extend,
            }
            .into());
        }
        Ok(())
    }
}

/// Runtime selection between the gap-penalty strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GapModel {
    Fixed,
    Affine(AffineGap),
}

impl Default for GapModel {
    fn default() -> Self {
        GapModel::Affine(AffineGap::default())
    }
}
