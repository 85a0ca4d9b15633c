#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure targeting geometry shared by every tower.
//!
//! Towers hand this system the positions of the enemies that are still valid
//! targets and receive the index of the one to shoot. Indices refer to the
//! caller's slice for the duration of a single scan; nothing here retains
//! them.

use glam::Vec2;

/// Turret art faces north at zero rotation while `atan2` measures from east.
const TURRET_FORWARD_OFFSET_DEGREES: f32 = 90.0;

/// Enemy considered during a single targeting scan.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Candidate {
    /// Position of the enemy within the caller's slice.
    pub index: usize,
    /// World position of the enemy.
    pub position: Vec2,
}

impl Candidate {
    /// Creates a new targeting candidate.
    #[must_use]
    pub const fn new(index: usize, position: Vec2) -> Self {
        Self { index, position }
    }
}

/// Selects the candidate closest to `origin` whose Euclidean distance does not
/// exceed `range`.
///
/// Ties keep the candidate encountered first, so results depend on the order
/// in which the caller supplies candidates.
#[must_use]
pub fn nearest_within_range<I>(origin: Vec2, range: f32, candidates: I) -> Option<usize>
where
    I: IntoIterator<Item = Candidate>,
{
    let mut best: Option<BestCandidate> = None;

    for candidate in candidates {
        let distance = origin.distance(candidate.position);
        if distance > range {
            continue;
        }

        let current = BestCandidate {
            distance,
            index: candidate.index,
        };

        match &mut best {
            Some(existing) => {
                if current.precedes(existing) {
                    *existing = current;
                }
            }
            None => best = Some(current),
        }
    }

    best.map(|candidate| candidate.index)
}

/// Turret rotation, in degrees, that points from `origin` toward `target`.
#[must_use]
pub fn angle_to_target(origin: Vec2, target: Vec2) -> f32 {
    let delta = target - origin;
    normalize_degrees(delta.y.atan2(delta.x).to_degrees() + TURRET_FORWARD_OFFSET_DEGREES)
}

/// Wraps an angle into the `[-180, 180)` degree interval.
#[must_use]
pub fn normalize_degrees(angle: f32) -> f32 {
    (angle + 180.0).rem_euclid(360.0) - 180.0
}

/// Turns `current` toward `target` by at most `max_step` degrees along the
/// shorter arc, snapping onto `target` when it lies within the step.
#[must_use]
pub fn rotate_toward(current: f32, target: f32, max_step: f32) -> f32 {
    let current = normalize_degrees(current);
    let target = normalize_degrees(target);
    let difference = normalize_degrees(target - current);

    if difference.abs() <= max_step {
        return target;
    }

    normalize_degrees(current + max_step.copysign(difference))
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct BestCandidate {
    distance: f32,
    index: usize,
}

impl BestCandidate {
    fn precedes(&self, other: &Self) -> bool {
        self.distance < other.distance
    }
}
