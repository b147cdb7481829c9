use crate::{
    foundation::core::{FRAMES_PER_SECOND, HALF_SECOND_FRAMES, Rgb8, SIX_FRAMES, palette},
    sheet::model::SheetData,
};

/// Which periodic timing boundaries a frame number falls on.
///
/// All three periods are anchored at remainder 1 (frames 1, 25, 49, ... open a second). The
/// remainder is truncating, so negative frame numbers never land on a boundary.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct BoundaryFlags {
    pub second: bool,
    pub half_second: bool,
    pub six_frame: bool,
}

impl BoundaryFlags {
    pub fn for_frame(frame: i64) -> Self {
        Self {
            second: frame % FRAMES_PER_SECOND == 1,
            half_second: frame % HALF_SECOND_FRAMES == 1,
            six_frame: frame % SIX_FRAMES == 1,
        }
    }

    /// Collapse the flags into the single tier that wins by precedence.
    pub fn tier(self) -> TimingTier {
        if self.second {
            TimingTier::Second
        } else if self.half_second {
            TimingTier::HalfSecond
        } else if self.six_frame {
            TimingTier::SixFrame
        } else {
            TimingTier::Plain
        }
    }
}

/// The one rule style applied to the top edge of a row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum TimingTier {
    /// Full-second boundary (every 24 frames).
    Second,
    /// Half-second boundary (every 12 frames).
    HalfSecond,
    /// Quarter-second boundary (every 6 frames).
    SixFrame,
    /// Ordinary row separator.
    Plain,
}

/// Stroke used to draw a tier's rule.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RuleStyle {
    pub width: f64,
    pub color: Rgb8,
    pub dashed: bool,
}

impl TimingTier {
    pub fn rule(self) -> RuleStyle {
        match self {
            Self::Second => RuleStyle {
                width: 2.0,
                color: palette::SLATE_800,
                dashed: false,
            },
            Self::HalfSecond => RuleStyle {
                width: 1.0,
                color: palette::SLATE_400,
                dashed: false,
            },
            Self::SixFrame => RuleStyle {
                width: 1.0,
                color: palette::SLATE_300,
                dashed: true,
            },
            Self::Plain => RuleStyle {
                width: 1.0,
                color: palette::SLATE_200,
                dashed: false,
            },
        }
    }
}

/// Tier for the row at `row_index` holding `frame`.
///
/// The first row never gets boundary styling: it already sits under the table's top border.
pub fn classify_row(row_index: usize, frame: i64) -> TimingTier {
    if row_index == 0 {
        return TimingTier::Plain;
    }
    BoundaryFlags::for_frame(frame).tier()
}

/// Tiers for every row of `sheet`, keyed on each row's stored frame number.
pub fn classify_rows(sheet: &SheetData) -> Vec<TimingTier> {
    sheet
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| classify_row(i, row.frame))
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/timing/classify.rs"]
mod tests;
