//! State layout for free-floating rigid bodies
//!
//! Every body owns 12 contiguous state entries (6 pose, 6 velocity) and
//! 6 contiguous noise entries. Bodies are stored in insertion order.

use ::core::ops::Range;

/// Pose entries per body: 3 translation + 3 orientation.
pub const POSE_DIM: usize = 6;

/// Velocity entries per body: 3 linear + 3 angular.
pub const VELOCITY_DIM: usize = 6;

/// State entries per body.
pub const PART_STATE_DIM: usize = POSE_DIM + VELOCITY_DIM;

/// Noise entries per body: 3 linear + 3 angular.
pub const PART_NOISE_DIM: usize = noise_dim_of(PART_STATE_DIM);

/// Number of noise dimensions driving a state of the given dimension.
///
/// Integer division: a state of size 0 has no noise dimensions.
#[inline]
pub const fn noise_dim_of(state_dim: usize) -> usize {
    state_dim / 2
}

// ============================================================================
// Size Descriptor
// ============================================================================

/// Size of a vector, either known ahead of time or only once the model is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dim {
    /// Size is known ahead of time
    Fixed(usize),
    /// Size is determined at construction time
    Dynamic,
}

impl Dim {
    /// Noise dimension matching this state dimension.
    ///
    /// A dynamic state size stays dynamic.
    #[inline]
    pub const fn noise_dim(self) -> Dim {
        match self {
            Dim::Fixed(n) => Dim::Fixed(noise_dim_of(n)),
            Dim::Dynamic => Dim::Dynamic,
        }
    }

    /// Returns the concrete size, if known.
    #[inline]
    pub const fn value(self) -> Option<usize> {
        match self {
            Dim::Fixed(n) => Some(n),
            Dim::Dynamic => None,
        }
    }

    #[inline]
    pub const fn is_dynamic(self) -> bool {
        matches!(self, Dim::Dynamic)
    }
}

// ============================================================================
// State Layout
// ============================================================================

/// Index layout of a multi-body state vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StateLayout {
    part_count: usize,
}

impl StateLayout {
    /// Creates the layout for `part_count` bodies.
    #[inline]
    pub const fn new(part_count: usize) -> Self {
        Self { part_count }
    }

    #[inline]
    pub const fn part_count(&self) -> usize {
        self.part_count
    }

    /// Total state dimension (`12 * part_count`).
    #[inline]
    pub const fn state_dim(&self) -> usize {
        PART_STATE_DIM * self.part_count
    }

    /// Total noise dimension (half the state dimension).
    #[inline]
    pub const fn noise_dim(&self) -> usize {
        noise_dim_of(self.state_dim())
    }

    /// Number of pose entries across all bodies.
    #[inline]
    pub const fn pose_dim(&self) -> usize {
        POSE_DIM * self.part_count
    }

    /// Number of velocity entries across all bodies.
    #[inline]
    pub const fn velocity_dim(&self) -> usize {
        VELOCITY_DIM * self.part_count
    }

    /// State size descriptor for this layout.
    #[inline]
    pub const fn state_size(&self) -> Dim {
        Dim::Fixed(self.state_dim())
    }

    /// State indices belonging to body `part`.
    ///
    /// # Panics
    /// Panics if `part >= part_count`.
    pub fn part_range(&self, part: usize) -> Range<usize> {
        self.check_part(part);
        let start = PART_STATE_DIM * part;
        start..start + PART_STATE_DIM
    }

    /// State indices of the pose of body `part`.
    ///
    /// # Panics
    /// Panics if `part >= part_count`.
    pub fn pose_range(&self, part: usize) -> Range<usize> {
        let start = self.part_range(part).start;
        start..start + POSE_DIM
    }

    /// State indices of the velocity of body `part`.
    ///
    /// # Panics
    /// Panics if `part >= part_count`.
    pub fn velocity_range(&self, part: usize) -> Range<usize> {
        let start = self.part_range(part).start + POSE_DIM;
        start..start + VELOCITY_DIM
    }

    /// Noise indices belonging to body `part`.
    ///
    /// # Panics
    /// Panics if `part >= part_count`.
    pub fn noise_range(&self, part: usize) -> Range<usize> {
        self.check_part(part);
        let start = PART_NOISE_DIM * part;
        start..start + PART_NOISE_DIM
    }

    fn check_part(&self, part: usize) {
        assert!(
            part < self.part_count,
            "Part index {} out of range for {} parts",
            part,
            self.part_count
        );
    }
}
