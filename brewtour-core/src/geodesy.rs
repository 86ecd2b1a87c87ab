//! Great-circle distances between WGS84 coordinates.
//!
//! Distances are computed with the haversine formula on a sphere of the
//! Earth's mean radius and reported in kilometres.

use std::{
    fmt,
    iter::Sum,
    ops::{Add, AddAssign},
};

use geo::Coord;

/// Mean Earth radius in metres used by [`haversine_distance`].
pub const EARTH_RADIUS_METRES: f64 = 6_371_009.0;

const METRES_PER_KILOMETRE: f64 = 1_000.0;

/// A non-negative travel distance in kilometres.
///
/// Arithmetic keeps full floating-point precision. Only the [`Display`]
/// rendering drops the fractional part, producing labels such as `1632km`.
///
/// [`Display`]: fmt::Display
///
/// # Examples
/// ```
/// use brewtour_core::Distance;
///
/// let leg = Distance::from_km(12.75);
/// let total = leg + Distance::from_km(0.5);
/// assert_eq!(total.km(), 13.25);
/// assert_eq!(total.to_string(), "13km");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Distance(f64);

impl Distance {
    /// The empty distance.
    pub const ZERO: Self = Self(0.0);

    /// Wrap a kilometre value, e.g. a configured fuel budget.
    ///
    /// The value is not validated; callers pass finite, non-negative input.
    #[must_use]
    pub const fn from_km(km: f64) -> Self {
        Self(km)
    }

    /// The distance in kilometres with full precision.
    #[must_use]
    pub const fn km(self) -> f64 {
        self.0
    }

    /// Whole kilometres, discarding the fractional part.
    #[must_use]
    pub fn whole_km(self) -> f64 {
        self.0.trunc()
    }

    /// Half of this distance.
    ///
    /// Used to derive the candidate search radius from a round-trip budget.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "radius derivation halves a floating-point budget"
    )]
    pub fn half(self) -> Self {
        Self(self.0 / 2.0)
    }
}

impl Add for Distance {
    type Output = Self;

    #[expect(clippy::float_arithmetic, reason = "distances are summed as f64")]
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Distance {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sum for Distance {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}km", self.whole_km())
    }
}

/// Great-circle distance between two coordinates.
///
/// Inputs are WGS84 degrees (`x = longitude`, `y = latitude`). The result is
/// symmetric and zero for identical coordinates. Precision degrades close to
/// antipodal points but the value stays finite.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use brewtour_core::haversine_distance;
///
/// let london = Coord { x: -0.109664, y: 51.533081 };
/// let kaunas = Coord { x: 23.894786, y: 54.901332 };
/// assert_eq!(haversine_distance(london, kaunas).whole_km(), 1632.0);
/// ```
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "the haversine formula is floating-point trigonometry"
)]
pub fn haversine_distance(from: Coord<f64>, to: Coord<f64>) -> Distance {
    let lat1 = from.y.to_radians();
    let lat2 = to.y.to_radians();
    let delta_lat = lat2 - lat1;
    let delta_lon = to.x.to_radians() - from.x.to_radians();

    let h = haversin(delta_lat) + lat1.cos() * lat2.cos() * haversin(delta_lon);
    // Rounding can push `h` marginally past 1 near antipodes.
    let h = h.clamp(0.0, 1.0);

    let metres = 2.0 * EARTH_RADIUS_METRES * h.sqrt().asin();
    Distance(metres / METRES_PER_KILOMETRE)
}

#[expect(clippy::float_arithmetic, reason = "sin²(θ/2)")]
fn haversin(theta: f64) -> f64 {
    (theta / 2.0).sin().powi(2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const LONDON: Coord<f64> = Coord {
        x: -0.109_664,
        y: 51.533_081,
    };
    const KAUNAS: Coord<f64> = Coord {
        x: 23.894_786,
        y: 54.901_332,
    };

    #[rstest]
    fn london_to_kaunas_is_1632_km() {
        let distance = haversine_distance(LONDON, KAUNAS);
        assert_eq!(distance.whole_km(), 1632.0);
        assert_eq!(distance.to_string(), "1632km");
    }

    #[rstest]
    #[case(LONDON)]
    #[case(KAUNAS)]
    #[case(Coord { x: 0.0, y: 0.0 })]
    #[case(Coord { x: 180.0, y: -90.0 })]
    fn identical_points_are_zero_apart(#[case] point: Coord<f64>) {
        assert_eq!(haversine_distance(point, point), Distance::ZERO);
    }

    #[rstest]
    fn one_degree_of_latitude_is_about_111_km() {
        let distance = haversine_distance(Coord { x: 0.0, y: 0.0 }, Coord { x: 0.0, y: 1.0 });
        assert!((distance.km() - 111.195).abs() < 0.01, "got {distance:?}");
    }

    #[rstest]
    fn antipodes_stay_finite() {
        let distance = haversine_distance(Coord { x: 0.0, y: 0.0 }, Coord { x: 180.0, y: 0.0 });
        let half_circumference = std::f64::consts::PI * EARTH_RADIUS_METRES / 1_000.0;
        assert!(distance.km().is_finite());
        assert!((distance.km() - half_circumference).abs() < 1.0e-6);
    }

    #[rstest]
    fn display_truncates_but_arithmetic_keeps_precision() {
        let total: Distance = [0.6, 0.6, 0.6].into_iter().map(Distance::from_km).sum();
        assert!((total.km() - 1.8).abs() < 1.0e-12);
        assert_eq!(total.to_string(), "1km");
    }

    #[rstest]
    #[case(0.99, "0km")]
    #[case(1_632.79, "1632km")]
    #[case(2.0, "2km")]
    fn display_drops_fractional_kilometres(#[case] km: f64, #[case] expected: &str) {
        assert_eq!(Distance::from_km(km).to_string(), expected);
    }

    #[rstest]
    fn half_splits_budget() {
        assert_eq!(Distance::from_km(2_000.0).half(), Distance::from_km(1_000.0));
    }
}
