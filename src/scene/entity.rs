//! Entity Motion Model: where each entity is and how bent out of shape.
//!
//! Two entities share one art template and approach each other from the
//! screen edges at a fixed rate per frame. The tick interval sets how fast
//! frames go by; the distance per frame never changes.

use super::machine::{Phase, Step};
use super::Geometry;

/// Columns an entity moves per approach frame.
pub const APPROACH_RATE: f32 = 0.5;

/// Which edge an entity starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// Starts at column 0 and moves right.
    Left,
    /// Starts flush with the right edge and moves left.
    Right,
}

/// How far an entity's rows are skewed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Distortion {
    /// Rows drawn as-is.
    #[default]
    Intact,
    /// Rows staircase by half a column per row (collision).
    Skewed,
    /// Rows staircase by a third of a column per row (decay).
    Wrecked,
}

impl Distortion {
    /// Numeric level: 0 intact, growing as the scene falls apart.
    pub const fn level(self) -> u8 {
        match self {
            Self::Intact => 0,
            Self::Skewed => 1,
            Self::Wrecked => 2,
        }
    }

    const fn divisor(self) -> Option<usize> {
        match self {
            Self::Intact => None,
            Self::Skewed => Some(2),
            Self::Wrecked => Some(3),
        }
    }

    /// Distortion applied while `phase` is active.
    pub const fn for_phase(phase: Phase) -> Self {
        match phase {
            Phase::Approach | Phase::Reset => Self::Intact,
            Phase::Collision => Self::Skewed,
            Phase::Decay => Self::Wrecked,
        }
    }
}

/// One animated entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Entity {
    side: Side,
    /// Horizontal position of the art's left edge, sub-column precision.
    x: f32,
    /// Rows below the base row.
    sink: i32,
    distortion: Distortion,
}

impl Entity {
    /// An entity at its starting position for `geometry`.
    pub fn new(side: Side, geometry: &Geometry) -> Self {
        Self {
            side,
            x: approach_position(side, geometry, 0),
            sink: 0,
            distortion: Distortion::Intact,
        }
    }

    /// Move and reshape the entity for the tick described by `step`.
    pub fn advance(&mut self, geometry: &Geometry, step: &Step) {
        self.x = approach_position(self.side, geometry, step.frame);
        self.sink = step.sink;
        self.distortion = Distortion::for_phase(step.phase);
    }

    /// Starting edge.
    pub const fn side(&self) -> Side {
        self.side
    }

    /// Horizontal position.
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Column of the art's left edge.
    #[allow(clippy::cast_possible_truncation)]
    pub fn column(&self) -> i32 {
        self.x.floor() as i32
    }

    /// Vertical offset below the base row.
    pub const fn sink(&self) -> i32 {
        self.sink
    }

    /// Current distortion.
    pub const fn distortion(&self) -> Distortion {
        self.distortion
    }

    /// Screen row of the art's first row.
    pub const fn top_row(&self, geometry: &Geometry) -> i32 {
        geometry.base_row() + self.sink
    }

    /// Blank columns inserted before art row `row` of `height`.
    ///
    /// The left entity leans one way and the right entity the other, so the
    /// pair tilts toward each other. Integer division gives a staircase.
    pub const fn row_padding(&self, row: usize, height: usize) -> usize {
        let Some(divisor) = self.distortion.divisor() else {
            return 0;
        };
        match self.side {
            Side::Left => row / divisor,
            Side::Right => height.saturating_sub(row) / divisor,
        }
    }
}

/// Position of an entity on `side` after `frame` approach frames.
#[allow(clippy::cast_precision_loss)]
pub fn approach_position(side: Side, geometry: &Geometry, frame: u32) -> f32 {
    let travelled = frame as f32 * APPROACH_RATE;
    match side {
        Side::Left => travelled,
        Side::Right => f32::from(geometry.width) - f32::from(geometry.art_width) - travelled,
    }
}

/// Whether the two entities' extents touch at `frame`.
#[allow(clippy::cast_possible_truncation)]
pub fn overlapping(geometry: &Geometry, frame: u32) -> bool {
    let left = approach_position(Side::Left, geometry, frame).floor() as i32;
    let right = approach_position(Side::Right, geometry, frame).floor() as i32;
    left + i32::from(geometry.art_width) >= right
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Art;

    fn geometry() -> Geometry {
        Geometry::new(100, &Art::boat()).unwrap()
    }

    fn step(phase: Phase, frame: u32, sink: i32) -> Step {
        Step {
            phase,
            frame,
            sink,
            ..Step::default()
        }
    }

    #[test]
    fn test_start_positions() {
        let g = geometry();
        assert!((Entity::new(Side::Left, &g).x() - 0.0).abs() < f32::EPSILON);
        assert_eq!(Entity::new(Side::Right, &g).column(), 100 - 24);
    }

    #[test]
    fn test_mirrored_approach() {
        let g = geometry();
        let mut left = Entity::new(Side::Left, &g);
        let mut right = Entity::new(Side::Right, &g);
        let s = step(Phase::Approach, 9, 0);
        left.advance(&g, &s);
        right.advance(&g, &s);
        assert!((left.x() - 4.5).abs() < f32::EPSILON);
        assert!((right.x() - 71.5).abs() < f32::EPSILON);
        assert_eq!(left.column(), 4);
        assert_eq!(right.column(), 71);
    }

    #[test]
    fn test_overlap_threshold() {
        let g = geometry();
        // 100 wide, 24 wide art: the gap closes once frame * 0.5 * 2 >= 52
        assert!(!overlapping(&g, 51));
        assert!(overlapping(&g, 52));
    }

    #[test]
    fn test_skew_padding() {
        let g = geometry();
        let mut left = Entity::new(Side::Left, &g);
        let mut right = Entity::new(Side::Right, &g);
        assert_eq!(left.row_padding(5, 6), 0);

        let s = step(Phase::Collision, 0, 0);
        left.advance(&g, &s);
        right.advance(&g, &s);
        let left_pads: Vec<usize> = (0..6).map(|i| left.row_padding(i, 6)).collect();
        let right_pads: Vec<usize> = (0..6).map(|i| right.row_padding(i, 6)).collect();
        assert_eq!(left_pads, vec![0, 0, 1, 1, 2, 2]);
        assert_eq!(right_pads, vec![3, 2, 2, 1, 1, 0]);
    }

    #[test]
    fn test_decay_distortion_and_sink() {
        let g = geometry();
        let mut left = Entity::new(Side::Left, &g);
        left.advance(&g, &step(Phase::Decay, 52, 3));
        assert_eq!(left.distortion(), Distortion::Wrecked);
        assert!(left.distortion() > Distortion::Skewed);
        assert_eq!(left.distortion().level(), 2);
        assert_eq!(left.sink(), 3);
        assert_eq!(left.top_row(&g), g.base_row() + 3);
        let pads: Vec<usize> = (0..6).map(|i| left.row_padding(i, 6)).collect();
        assert_eq!(pads, vec![0, 0, 0, 1, 1, 1]);
    }
}
