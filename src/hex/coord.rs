use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

/// An axial coordinate on a flat-topped hex grid.
///
/// The implicit cubic third coordinate is `z = -x - y`. Any stable total
/// order works for consensus purposes; this one derives lexicographically
/// from `(x, y)`.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Serialize, Deserialize)]
pub struct HexCoord {
    x: i16,
    y: i16,
}

/// A typed delta between two [`HexCoord`]s. Same layout as `HexCoord` but a
/// distinct type: a `Difference` cannot be used as a position.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub struct Difference {
    x: i16,
    y: i16,
}

/// Neighbour offsets in the fixed, deterministic order used everywhere a
/// tie between otherwise-equal candidates must be broken the same way on
/// every machine: +x, -x, +y, -y, +x-y, -x+y.
const NEIGHBOUR_OFFSETS: [(i16, i16); 6] = [(1, 0), (-1, 0), (0, 1), (0, -1), (1, -1), (-1, 1)];

impl HexCoord {
    pub const fn new(x: i16, y: i16) -> Self {
        HexCoord { x, y }
    }

    #[inline]
    pub const fn x(self) -> i16 {
        self.x
    }

    #[inline]
    pub const fn y(self) -> i16 {
        self.y
    }

    #[inline]
    pub const fn z(self) -> i16 {
        -self.x - self.y
    }

    /// The six neighbouring coordinates, in the fixed deterministic order.
    pub fn neighbours(self) -> [HexCoord; 6] {
        NEIGHBOUR_OFFSETS.map(|(dx, dy)| HexCoord::new(self.x + dx, self.y + dy))
    }

    /// L1 distance between two hex cells: half the cubic Manhattan distance.
    pub fn distance_l1(a: HexCoord, b: HexCoord) -> u32 {
        let d = b - a;
        let (dx, dy) = (d.x as i32, d.y as i32);
        ((dx.abs() + dy.abs() + (dx + dy).abs()) / 2) as u32
    }

    /// If `target` lies in one of the six principal directions from `self`,
    /// returns that unit direction and the (positive) number of steps.
    pub fn is_principal_direction_to(self, target: HexCoord) -> Option<(Difference, i16)> {
        let delta = target - self;
        if delta.x == 0 && delta.y == 0 {
            return None;
        }

        let candidates: [(Difference, i16); 6] = [
            (Difference::new(1, 0), delta.x),
            (Difference::new(-1, 0), -delta.x),
            (Difference::new(0, 1), delta.y),
            (Difference::new(0, -1), -delta.y),
            (Difference::new(1, -1), delta.x),
            (Difference::new(-1, 1), -delta.x),
        ];

        for (unit, k) in candidates {
            if k > 0 && unit * k == delta {
                return Some((unit, k));
            }
        }
        None
    }
}

impl Difference {
    pub const fn new(x: i16, y: i16) -> Self {
        Difference { x, y }
    }

    pub const ZERO: Difference = Difference::new(0, 0);

    #[inline]
    pub const fn x(self) -> i16 {
        self.x
    }

    #[inline]
    pub const fn y(self) -> i16 {
        self.y
    }

    pub const fn is_zero(self) -> bool {
        self.x == 0 && self.y == 0
    }

    /// Rotates clockwise by `steps` multiples of 60 degrees. Negative steps
    /// rotate counter-clockwise. `steps` is reduced modulo 6.
    pub fn rotate_cw(self, steps: i32) -> Difference {
        let normalised = steps.rem_euclid(6);
        let mut cur = self;
        for _ in 0..normalised {
            cur = Difference::new(cur.x + cur.y, -cur.x);
        }
        cur
    }
}

impl Add<Difference> for HexCoord {
    type Output = HexCoord;

    fn add(self, rhs: Difference) -> HexCoord {
        HexCoord::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for HexCoord {
    type Output = Difference;

    fn sub(self, rhs: HexCoord) -> Difference {
        Difference::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<i16> for Difference {
    type Output = Difference;

    fn mul(self, rhs: i16) -> Difference {
        Difference::new(self.x * rhs, self.y * rhs)
    }
}

impl Mul<Difference> for i16 {
    type Output = Difference;

    fn mul(self, rhs: Difference) -> Difference {
        rhs * self
    }
}
