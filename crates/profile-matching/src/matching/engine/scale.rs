use serde::Serialize;

/// Upper bound of a raw assessment score.
pub const MAX_RAW_SCORE: i64 = 100;

/// Raw assessment score, guaranteed to lie in `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RawScore(u8);

impl RawScore {
    /// Validate a submitted value. Out-of-range values are rejected, never clamped.
    pub fn new(value: i64) -> Result<Self, ScoreOutOfRange> {
        if (0..=MAX_RAW_SCORE).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(ScoreOutOfRange { value })
        }
    }

    pub const fn value(self) -> u8 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("score {value} is outside 0..=100")]
pub struct ScoreOutOfRange {
    pub value: i64,
}

/// Ordinal competency scale a raw score is bucketed into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleLevel {
    KurangBaik,
    CukupBaik,
    Baik,
    SangatBaik,
}

impl ScaleLevel {
    pub fn from_raw(score: RawScore) -> Self {
        match score.value() {
            80.. => Self::SangatBaik,
            65..=79 => Self::Baik,
            45..=64 => Self::CukupBaik,
            _ => Self::KurangBaik,
        }
    }

    pub const fn value(self) -> u8 {
        match self {
            Self::KurangBaik => 1,
            Self::CukupBaik => 2,
            Self::Baik => 3,
            Self::SangatBaik => 4,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::KurangBaik => "Kurang Baik",
            Self::CukupBaik => "Cukup Baik",
            Self::Baik => "Baik",
            Self::SangatBaik => "Sangat Baik",
        }
    }
}
