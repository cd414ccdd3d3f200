use super::domain::{Competitor, CompetitorSample, GridDimensions, GridPoint, LatLng, RankFactors};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Fallback map center used by demos and synthetic history frames.
pub const DEFAULT_CENTER: LatLng = LatLng::new(39.0997, -94.5786);

/// Spacing between neighboring grid points, in degrees.
pub const DEFAULT_SPACING_DEG: f64 = 0.01;

/// Probability that the tracked business is visible at a sampled point.
pub const DEFAULT_VISIBILITY_RATE: f64 = 0.7;

const MAX_RANK: f64 = 20.0;
const MAX_FACTOR_SCORE: f64 = 10.0;

/// Capability interface for the randomness behind rank/visibility sampling.
///
/// Grid generation never touches ambient randomness directly; callers inject
/// a source so production can use entropy while tests replay fixed draws.
pub trait SampleSource {
    /// Next uniform value in [0, 1).
    fn next_unit(&mut self) -> f64;
}

/// Entropy- or seed-backed source for real sampling runs.
pub struct SeededSampler {
    rng: StdRng,
}

impl SeededSampler {
    /// Reproducible source: the same seed replays the same grid.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl SampleSource for SeededSampler {
    fn next_unit(&mut self) -> f64 {
        self.rng.gen()
    }
}

/// Scripted source that replays a fixed sequence of draws, wrapping around
/// when exhausted. Deterministic grid replay under test is part of the
/// sampling contract, so this lives in the library rather than test code.
pub struct SequenceSource {
    values: Vec<f64>,
    cursor: usize,
}

impl SequenceSource {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values, cursor: 0 }
    }
}

impl SampleSource for SequenceSource {
    fn next_unit(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value
    }
}

/// Position of cell (row, col) in a grid centered on `center`.
pub fn point_position(
    center: LatLng,
    spacing_deg: f64,
    dims: GridDimensions,
    row: usize,
    col: usize,
) -> LatLng {
    let lat_offset = row as f64 - (dims.rows() / 2) as f64;
    let lng_offset = col as f64 - (dims.cols() / 2) as f64;
    LatLng::new(
        center.lat + lat_offset * spacing_deg,
        center.lng + lng_offset * spacing_deg,
    )
}

/// Generates spatial sample grids around a configured center.
///
/// Output is row-major (row outer, column inner); downstream consumers such
/// as best/worst-point selection and export ordering rely on that order.
#[derive(Debug, Clone)]
pub struct GridSampler {
    center: LatLng,
    spacing_deg: f64,
    visibility_rate: f64,
}

impl Default for GridSampler {
    fn default() -> Self {
        Self {
            center: DEFAULT_CENTER,
            spacing_deg: DEFAULT_SPACING_DEG,
            visibility_rate: DEFAULT_VISIBILITY_RATE,
        }
    }
}

impl GridSampler {
    pub fn new(center: LatLng, spacing_deg: f64, visibility_rate: f64) -> Self {
        Self {
            center,
            spacing_deg,
            visibility_rate,
        }
    }

    pub const fn center(&self) -> LatLng {
        self.center
    }

    pub const fn spacing_deg(&self) -> f64 {
        self.spacing_deg
    }

    /// Samples a full grid. Positions are deterministic; rank and visibility
    /// are drawn from `source` in a fixed order per point (own rank, own
    /// visibility, then rank/proximity/prominence/relevance per competitor)
    /// so that scripted sources replay exactly.
    pub fn generate(
        &self,
        dims: GridDimensions,
        competitors: &[Competitor],
        source: &mut dyn SampleSource,
    ) -> Vec<GridPoint> {
        let mut points = Vec::with_capacity(dims.point_count());

        for row in 0..dims.rows() {
            for col in 0..dims.cols() {
                let rank = sample_rank(source);
                let visible = source.next_unit() < self.visibility_rate;
                let competitors = competitors
                    .iter()
                    .map(|competitor| CompetitorSample {
                        name: competitor.name.clone(),
                        rank: sample_rank(source),
                        factors: RankFactors {
                            proximity: sample_factor(source),
                            prominence: sample_factor(source),
                            relevance: sample_factor(source),
                        },
                    })
                    .collect();

                points.push(GridPoint {
                    row,
                    col,
                    position: point_position(self.center, self.spacing_deg, dims, row, col),
                    rank,
                    visible,
                    competitors,
                });
            }
        }

        points
    }
}

fn sample_rank(source: &mut dyn SampleSource) -> u8 {
    (source.next_unit() * MAX_RANK) as u8 + 1
}

fn sample_factor(source: &mut dyn SampleSource) -> f64 {
    source.next_unit() * MAX_FACTOR_SCORE
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dims(rows: usize, cols: usize) -> GridDimensions {
        GridDimensions::new(rows, cols).expect("valid test dimensions")
    }

    #[test]
    fn grid_is_row_major_with_unique_cells() {
        let sampler = GridSampler::default();
        let mut source = SeededSampler::from_seed(7);
        let grid = sampler.generate(dims(4, 3), &[], &mut source);

        assert_eq!(grid.len(), 12);
        let expected: Vec<(usize, usize)> = (0..4).flat_map(|r| (0..3).map(move |c| (r, c))).collect();
        let actual: Vec<(usize, usize)> = grid.iter().map(|p| (p.row, p.col)).collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn positions_are_centered_and_deterministic() {
        let sampler = GridSampler::new(LatLng::new(0.0, 0.0), 1.0, DEFAULT_VISIBILITY_RATE);
        let mut source = SeededSampler::from_seed(1);
        let grid = sampler.generate(dims(3, 3), &[], &mut source);

        let center = &grid[4];
        assert_eq!((center.row, center.col), (1, 1));
        assert!(center.position.lat.abs() < f64::EPSILON);
        assert!(center.position.lng.abs() < f64::EPSILON);

        let corner = &grid[0];
        assert!((corner.position.lat - -1.0).abs() < f64::EPSILON);
        assert!((corner.position.lng - -1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn same_seed_replays_the_same_grid() {
        let sampler = GridSampler::default();
        let competitors = vec![Competitor::new("Rival One"), Competitor::new("Rival Two")];

        let first = sampler.generate(
            dims(5, 5),
            &competitors,
            &mut SeededSampler::from_seed(42),
        );
        let second = sampler.generate(
            dims(5, 5),
            &competitors,
            &mut SeededSampler::from_seed(42),
        );

        assert_eq!(first, second);
    }

    #[test]
    fn scripted_draws_control_rank_and_visibility() {
        let sampler = GridSampler::default();
        // rank draw 0.0 -> rank 1, visibility draw 0.0 -> visible (< 0.7);
        // rank draw 0.99 -> rank 20, visibility draw 0.9 -> not visible.
        let mut source = SequenceSource::new(vec![0.0, 0.0, 0.99, 0.9]);
        let grid = sampler.generate(dims(1, 2), &[], &mut source);

        assert_eq!(grid[0].rank, 1);
        assert!(grid[0].visible);
        assert_eq!(grid[1].rank, 20);
        assert!(!grid[1].visible);
    }

    #[test]
    fn each_point_samples_every_competitor() {
        let sampler = GridSampler::default();
        let competitors = vec![Competitor::new("A"), Competitor::new("B")];
        let mut source = SeededSampler::from_seed(3);
        let grid = sampler.generate(dims(2, 2), &competitors, &mut source);

        for point in &grid {
            assert_eq!(point.competitors.len(), 2);
            assert_eq!(point.competitors[0].name, "A");
            for sample in &point.competitors {
                assert!((1..=20).contains(&sample.rank));
                assert!((0.0..10.0).contains(&sample.factors.proximity));
                assert!((0.0..10.0).contains(&sample.factors.prominence));
                assert!((0.0..10.0).contains(&sample.factors.relevance));
            }
        }
    }
}
