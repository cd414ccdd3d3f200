use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Geographic coordinate carried by every grid point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Validated grid dimensions. Construction is the fail-fast gate: a value of
/// this type always describes a non-empty grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GridDimensions {
    rows: usize,
    cols: usize,
}

impl GridDimensions {
    pub const fn new(rows: usize, cols: usize) -> Result<Self, GridError> {
        if rows == 0 || cols == 0 {
            return Err(GridError::InvalidDimensions { rows, cols });
        }
        Ok(Self { rows, cols })
    }

    pub const fn rows(self) -> usize {
        self.rows
    }

    pub const fn cols(self) -> usize {
        self.cols
    }

    pub const fn point_count(self) -> usize {
        self.rows * self.cols
    }

    /// Renders the legacy "RxC" descriptor, e.g. "5x5".
    pub fn label(self) -> String {
        format!("{}x{}", self.rows, self.cols)
    }

    /// The square grid sizes offered by the tracker UI, smallest first.
    pub fn presets() -> Vec<Self> {
        [3usize, 5, 7, 9, 11, 13, 15, 17, 21]
            .into_iter()
            .map(Self::square_unchecked)
            .collect()
    }

    /// Square grid for statically known, non-zero side lengths.
    pub(crate) const fn square_unchecked(side: usize) -> Self {
        Self {
            rows: side,
            cols: side,
        }
    }
}

impl FromStr for GridDimensions {
    type Err = GridError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let descriptor = value.trim();
        let (rows, cols) = descriptor
            .split_once(['x', 'X'])
            .ok_or_else(|| GridError::InvalidDescriptor(descriptor.to_owned()))?;

        let rows = rows
            .trim()
            .parse::<usize>()
            .map_err(|_| GridError::InvalidDescriptor(descriptor.to_owned()))?;
        let cols = cols
            .trim()
            .parse::<usize>()
            .map_err(|_| GridError::InvalidDescriptor(descriptor.to_owned()))?;

        Self::new(rows, cols)
    }
}

impl fmt::Display for GridDimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

/// A tracked competitor. Supplied as configuration; samples reference it by
/// name only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Competitor {
    pub name: String,
}

impl Competitor {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Keyword metrics supplied by an external rank source; read-only here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyword {
    pub term: String,
    pub average_rank: f64,
    pub visibility: f64,
}

/// Local-pack ranking factor scores, each in 0..10.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankFactors {
    pub proximity: f64,
    pub prominence: f64,
    pub relevance: f64,
}

/// One competitor's sampled standing at a single grid point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitorSample {
    pub name: String,
    pub rank: u8,
    pub factors: RankFactors,
}

/// One sampled location in the geo grid. Position is a pure function of the
/// grid geometry; rank and visibility come from the sample source. Grids are
/// regenerated whole, never mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridPoint {
    pub row: usize,
    pub col: usize,
    pub position: LatLng,
    pub rank: u8,
    pub visible: bool,
    pub competitors: Vec<CompetitorSample>,
}

/// Rank at or above which a point counts as a local-pack appearance.
pub const TOP_THREE_CUTOFF: u8 = 3;

/// Input errors for grid construction and grid-wide computations.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    #[error("grid dimensions {rows}x{cols} must both be at least 1")]
    InvalidDimensions { rows: usize, cols: usize },
    #[error("'{0}' is not a valid RxC grid descriptor")]
    InvalidDescriptor(String),
    #[error("metric requires a non-empty grid")]
    EmptyGrid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_parses_and_round_trips() {
        let dims: GridDimensions = "7x7".parse().expect("valid descriptor");
        assert_eq!(dims.rows(), 7);
        assert_eq!(dims.cols(), 7);
        assert_eq!(dims.label(), "7x7");

        let rect: GridDimensions = " 3X5 ".parse().expect("case and whitespace tolerated");
        assert_eq!(rect.point_count(), 15);
    }

    #[test]
    fn descriptor_rejects_zero_and_garbage() {
        assert!(matches!(
            "0x5".parse::<GridDimensions>(),
            Err(GridError::InvalidDimensions { rows: 0, cols: 5 })
        ));
        assert!(matches!(
            "axb".parse::<GridDimensions>(),
            Err(GridError::InvalidDescriptor(_))
        ));
        assert!(matches!(
            "7".parse::<GridDimensions>(),
            Err(GridError::InvalidDescriptor(_))
        ));
    }

    #[test]
    fn presets_match_tracker_ladder() {
        let presets = GridDimensions::presets();
        assert_eq!(presets.len(), 9);
        assert_eq!(presets[0].label(), "3x3");
        assert_eq!(presets[8].label(), "21x21");
    }
}
