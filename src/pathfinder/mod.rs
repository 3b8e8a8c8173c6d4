//! Dijkstra-based shortest-path search over the hex grid, bounded by an L1
//! radius, plus a path-stepper that replays the result with a
//! turn-minimising bias.

use crate::hex::HexCoord;
use crate::mapdata::{OutOfRange, RangeMap};
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::fmt;

/// A path-step / total-path cost, or the `NO_CONNECTION` sentinel.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct Distance(u32);

impl Distance {
    /// Distinguished value that can never occur as a real distance given
    /// the L1 bound and realistic edge weights.
    pub const NO_CONNECTION: Distance = Distance(u32::MAX);

    pub const fn new(value: u32) -> Self {
        Distance(value)
    }

    pub const fn value(self) -> u32 {
        self.0
    }

    pub const fn is_connected(self) -> bool {
        self.0 != Self::NO_CONNECTION.0
    }

    fn checked_add(self, other: Distance) -> Distance {
        if !self.is_connected() || !other.is_connected() {
            Distance::NO_CONNECTION
        } else {
            Distance(self.0 + other.0)
        }
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_connected() {
            write!(f, "{}", self.0)
        } else {
            write!(f, "NO_CONNECTION")
        }
    }
}

/// Dijkstra search from a fixed target outward, bounded by an L1 radius.
///
/// `Compute` proceeds from `target` outward even though the caller's edge
/// function is always invoked in the natural forward direction of the
/// eventual path (see `edge_weight` below) -- so that asymmetric costs
/// (e.g. entering vs leaving a tile) behave exactly as a forward search
/// from `source` would, without having to re-run the search per source.
pub struct PathFinder {
    target: HexCoord,
    distances: Option<RangeMap<Distance>>,
    computed_tiles: usize,
}

impl PathFinder {
    pub fn new(target: HexCoord) -> Self {
        PathFinder {
            target,
            distances: None,
            computed_tiles: 0,
        }
    }

    pub fn target(&self) -> HexCoord {
        self.target
    }

    /// Number of tiles whose distance was finalised during the last
    /// `compute` call. Testing/instrumentation only.
    pub fn computed_tiles(&self) -> usize {
        self.computed_tiles
    }

    /// Computes the distance field from `target` to `source` and returns
    /// the distance (or `Distance::NO_CONNECTION` if unreachable). Only
    /// tiles within `l1_range` of `target` are considered, bounding the
    /// work done regardless of `edge_weight`'s behaviour.
    ///
    /// `edge_weight(from, to)` must return the travel cost of stepping from
    /// `from` to `to` (both on the map, always neighbours), or
    /// `Distance::NO_CONNECTION` if there is no edge. It is never called for
    /// non-neighbouring pairs.
    pub fn compute<F>(&mut self, source: HexCoord, mut edge_weight: F, l1_range: i32) -> Distance
    where
        F: FnMut(HexCoord, HexCoord) -> Distance,
    {
        self.computed_tiles = 0;

        if HexCoord::distance_l1(source, self.target) > l1_range as u32 {
            self.distances = None;
            return Distance::NO_CONNECTION;
        }

        let mut distances = RangeMap::new(self.target, l1_range, Distance::NO_CONNECTION);
        *distances.access(self.target).unwrap() = Distance::new(0);

        let mut queue = BinaryHeap::new();
        queue.push(Reverse((Distance::new(0), self.target)));

        let result = loop {
            let Some(Reverse((dist, coord))) = queue.pop() else {
                break Distance::NO_CONNECTION;
            };

            if !distances.is_in_range(coord) {
                continue;
            }
            if *distances.get(coord).unwrap() != dist {
                // Stale entry: a better distance was already found for this tile.
                continue;
            }

            self.computed_tiles += 1;
            if coord == source {
                break dist;
            }

            for n in coord.neighbours() {
                if !distances.is_in_range(n) {
                    continue;
                }
                // Reversed search: expanding target-ward from `coord` to `n`
                // corresponds to the forward step from `n` to `coord`.
                let step = edge_weight(n, coord);
                if !step.is_connected() {
                    continue;
                }
                let tentative = dist.checked_add(step);
                let slot = distances.access(n).unwrap();
                if tentative.value() < slot.value() {
                    *slot = tentative;
                    queue.push(Reverse((tentative, n)));
                }
            }
        };

        self.distances = Some(distances);
        result
    }

    fn distance_at(&self, c: HexCoord) -> Result<Distance, OutOfRange> {
        self.distances
            .as_ref()
            .expect("compute must be called before inspecting distances")
            .get(c)
            .copied()
    }

    /// Returns a `Stepper` to walk the shortest path from `source` to
    /// `target`. Must only be called after a successful `compute(source,
    /// ..)` (i.e. one that did not return `NO_CONNECTION`).
    pub fn step_path(&self, source: HexCoord) -> Stepper<'_> {
        let dist = self
            .distance_at(source)
            .expect("step_path: source is outside the computed range");
        assert!(
            dist.is_connected(),
            "step_path: source has no connection to the target"
        );
        Stepper {
            finder: self,
            position: source,
            last_direction: crate::hex::Difference::ZERO,
        }
    }
}

/// Walks the shortest path found by a `PathFinder`, from `source` to
/// `target`, greedily continuing in a straight line when multiple optimal
/// next steps exist -- this minimises the number of waypoints emitted.
pub struct Stepper<'a> {
    finder: &'a PathFinder,
    position: HexCoord,
    last_direction: crate::hex::Difference,
}

impl<'a> Stepper<'a> {
    pub fn position(&self) -> HexCoord {
        self.position
    }

    pub fn has_more(&self) -> bool {
        self.position != self.finder.target
    }

    /// Picks the next tile along the shortest path (preferring to continue
    /// in `last_direction` when that stays optimal) without mutating any
    /// state. Must only be called while `has_more()` is true.
    fn choose_step<F>(&self, mut edge_weight: F) -> (HexCoord, Distance)
    where
        F: FnMut(HexCoord, HexCoord) -> Distance,
    {
        assert!(self.has_more(), "Stepper: no step from the target");

        let cur = self
            .finder
            .distance_at(self.position)
            .expect("stepper position is out of the computed range");

        let mut try_candidate = |n: HexCoord| -> Option<Distance> {
            let step = edge_weight(self.position, n);
            if !step.is_connected() {
                return None;
            }
            let dist_n = self.finder.distance_at(n).ok()?;
            if !dist_n.is_connected() {
                return None;
            }
            if dist_n.checked_add(step) == cur {
                Some(step)
            } else {
                None
            }
        };

        let mut chosen: Option<(HexCoord, Distance)> = None;

        if !self.last_direction.is_zero() {
            let straight = self.position + self.last_direction;
            if let Some(step) = try_candidate(straight) {
                chosen = Some((straight, step));
            }
        }

        if chosen.is_none() {
            for n in self.position.neighbours() {
                if let Some(step) = try_candidate(n) {
                    chosen = Some((n, step));
                    break;
                }
            }
        }

        chosen.expect("no valid shortest-path step from the current position")
    }

    /// Previews the cost of the step `next` would take, without advancing
    /// the stepper. Callers that must not commit to a step they cannot
    /// afford (e.g. a unit with insufficient movement points left this
    /// tick) check this before calling `next`.
    pub fn peek_cost<F>(&self, edge_weight: F) -> Distance
    where
        F: FnMut(HexCoord, HexCoord) -> Distance,
    {
        self.choose_step(edge_weight).1
    }

    /// Advances one tile along the shortest path and returns that step's
    /// cost. Must only be called while `has_more()` is true.
    pub fn next<F>(&mut self, edge_weight: F) -> Distance
    where
        F: FnMut(HexCoord, HexCoord) -> Distance,
    {
        let (next_pos, step) = self.choose_step(edge_weight);
        self.last_direction = next_pos - self.position;
        self.position = next_pos;
        step
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hex::HexCoord;

    /// Edge-weight matching the worked scenario: tiles with y=1 and x<=2 are
    /// obstacles, except (1,1); any edge touching (1,1) costs 6; everything
    /// else costs 1.
    fn is_x(c: HexCoord) -> bool {
        c == HexCoord::new(1, 1)
    }

    fn is_obstacle(c: HexCoord) -> bool {
        !is_x(c) && c.y() == 1 && c.x() <= 2
    }

    fn scenario_edge_weight(from: HexCoord, to: HexCoord) -> Distance {
        if is_obstacle(to) {
            Distance::NO_CONNECTION
        } else if is_x(from) || is_x(to) {
            Distance::new(6)
        } else {
            Distance::new(1)
        }
    }

    #[test]
    fn basic_path_matches_worked_example() {
        let target = HexCoord::new(-1, 2);
        let source = HexCoord::new(0, 0);
        let mut finder = PathFinder::new(target);
        let dist = finder.compute(source, scenario_edge_weight, 10);
        assert_eq!(dist, Distance::new(8));

        let mut stepper = finder.step_path(source);
        let expected = [
            (1, 0),
            (2, 0),
            (3, 0),
            (3, 1),
            (2, 2),
            (1, 2),
            (0, 2),
            (-1, 2),
        ];
        for (x, y) in expected {
            assert!(stepper.has_more());
            let step = stepper.next(scenario_edge_weight);
            assert_eq!(step, Distance::new(1));
            assert_eq!(stepper.position(), HexCoord::new(x, y));
        }
        assert!(!stepper.has_more());
    }

    #[test]
    fn forced_through_expensive_tile_with_tight_radius() {
        let target = HexCoord::new(-1, 2);
        let source = HexCoord::new(0, 0);
        let mut finder = PathFinder::new(target);
        let dist = finder.compute(source, scenario_edge_weight, 3);
        assert_eq!(dist, Distance::new(14));

        let mut stepper = finder.step_path(source);
        let steps = [
            ((1, 0), 1),
            ((1, 1), 6),
            ((0, 2), 6),
            ((-1, 2), 1),
        ];
        for ((x, y), cost) in steps {
            let step = stepper.next(scenario_edge_weight);
            assert_eq!(step, Distance::new(cost));
            assert_eq!(stepper.position(), HexCoord::new(x, y));
        }
        assert!(!stepper.has_more());
    }

    #[test]
    fn fast_reject_skips_computation_entirely() {
        let target = HexCoord::new(100, 100);
        let source = HexCoord::new(200, 200);
        let mut finder = PathFinder::new(target);
        let dist = finder.compute(source, scenario_edge_weight, 2);
        assert_eq!(dist, Distance::NO_CONNECTION);
        assert_eq!(finder.computed_tiles(), 0);
    }

    #[test]
    fn stepper_is_deterministic_across_runs() {
        let target = HexCoord::new(-1, 2);
        let source = HexCoord::new(0, 0);
        let mut finder = PathFinder::new(target);
        finder.compute(source, scenario_edge_weight, 10);

        let collect = || {
            let mut stepper = finder.step_path(source);
            let mut positions = vec![stepper.position()];
            while stepper.has_more() {
                stepper.next(scenario_edge_weight);
                positions.push(stepper.position());
            }
            positions
        };

        assert_eq!(collect(), collect());
    }
}
