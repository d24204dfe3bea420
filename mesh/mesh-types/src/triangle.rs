//! Triangle type for geometric calculations.

use nalgebra::{Point3, Vector3};

/// A triangle with concrete vertex positions.
///
/// This is a utility type for geometric calculations. It stores the actual
/// vertex positions rather than indices.
///
/// Winding is **counter-clockwise (CCW) when viewed from the front**
/// (normal points toward viewer).
///
/// # Example
///
/// ```
/// use mesh_types::{Triangle, Point3};
///
/// let tri = Triangle::new(
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// );
///
/// // Area of a right triangle with legs 1 and 1
/// assert!((tri.area() - 0.5).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    /// First vertex.
    pub v0: Point3<f64>,
    /// Second vertex.
    pub v1: Point3<f64>,
    /// Third vertex.
    pub v2: Point3<f64>,
}

impl Triangle {
    /// Create a new triangle from three points.
    #[inline]
    #[must_use]
    pub const fn new(v0: Point3<f64>, v1: Point3<f64>, v2: Point3<f64>) -> Self {
        Self { v0, v1, v2 }
    }

    /// Compute the (unnormalized) face normal via cross product.
    ///
    /// The direction follows the right-hand rule with CCW winding.
    /// The magnitude equals twice the triangle's area.
    #[inline]
    #[must_use]
    pub fn normal_unnormalized(&self) -> Vector3<f64> {
        let e1 = self.v1 - self.v0;
        let e2 = self.v2 - self.v0;
        e1.cross(&e2)
    }

    /// Compute the unit face normal.
    ///
    /// Returns `None` for degenerate triangles (zero area).
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::{Triangle, Point3};
    ///
    /// let degen = Triangle::new(
    ///     Point3::new(0.0, 0.0, 0.0),
    ///     Point3::new(1.0, 0.0, 0.0),
    ///     Point3::new(2.0, 0.0, 0.0),
    /// );
    /// assert!(degen.normal().is_none());
    /// ```
    #[must_use]
    pub fn normal(&self) -> Option<Vector3<f64>> {
        let n = self.normal_unnormalized();
        let len_sq = n.norm_squared();
        if len_sq > f64::EPSILON {
            Some(n / len_sq.sqrt())
        } else {
            None
        }
    }

    /// Compute the area of the triangle.
    #[inline]
    #[must_use]
    pub fn area(&self) -> f64 {
        self.normal_unnormalized().norm() * 0.5
    }

    /// Interior angles in radians at `v0`, `v1` and `v2`, in that order.
    ///
    /// A corner whose adjacent edges include a zero-length edge has no defined
    /// angle; it is reported as `0.0` so it reads as maximally thin.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::{Triangle, Point3};
    /// use std::f64::consts::FRAC_PI_2;
    ///
    /// let tri = Triangle::new(
    ///     Point3::new(0.0, 0.0, 0.0),
    ///     Point3::new(1.0, 0.0, 0.0),
    ///     Point3::new(0.0, 1.0, 0.0),
    /// );
    /// let [a, b, c] = tri.angles();
    /// assert!((a - FRAC_PI_2).abs() < 1e-12);
    /// assert!((a + b + c - std::f64::consts::PI).abs() < 1e-12);
    /// ```
    #[must_use]
    pub fn angles(&self) -> [f64; 3] {
        [
            corner_angle(self.v0, self.v1, self.v2),
            corner_angle(self.v1, self.v2, self.v0),
            corner_angle(self.v2, self.v0, self.v1),
        ]
    }
}

/// Angle at `apex` between the rays towards `a` and `b`.
fn corner_angle(apex: Point3<f64>, a: Point3<f64>, b: Point3<f64>) -> f64 {
    let (Some(u), Some(w)) = ((a - apex).try_normalize(0.0), (b - apex).try_normalize(0.0)) else {
        return 0.0;
    };
    u.dot(&w).clamp(-1.0, 1.0).acos()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

    fn right_triangle() -> Triangle {
        Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        )
    }

    #[test]
    fn right_triangle_angles() {
        let [a, b, c] = right_triangle().angles();
        assert_relative_eq!(a, FRAC_PI_2, epsilon = 1e-12);
        assert_relative_eq!(b, FRAC_PI_4, epsilon = 1e-12);
        assert_relative_eq!(c, FRAC_PI_4, epsilon = 1e-12);
    }

    #[test]
    fn angles_sum_to_pi() {
        let tri = Triangle::new(
            Point3::new(0.3, -1.0, 2.0),
            Point3::new(4.0, 0.5, -1.0),
            Point3::new(-2.0, 3.0, 0.7),
        );
        let sum: f64 = tri.angles().iter().sum();
        assert_relative_eq!(sum, PI, epsilon = 1e-12);
    }

    #[test]
    fn thin_triangle_has_small_angle() {
        let one_degree = 1.0_f64.to_radians();
        let tri = Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(one_degree.cos(), one_degree.sin(), 0.0),
        );
        assert_relative_eq!(tri.angles()[0].to_degrees(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn coincident_corner_reports_zero() {
        let tri = Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        );
        let [a, b, _] = tri.angles();
        assert!(a.abs() < f64::EPSILON);
        assert!(b.abs() < f64::EPSILON);
    }

    #[test]
    fn normal_and_area() {
        let tri = right_triangle();
        let n = tri.normal();
        assert!(n.is_some());
        assert_relative_eq!(n.map_or(0.0, |n| n.z), 1.0);
        assert_relative_eq!(tri.area(), 0.5);
        assert_relative_eq!(tri.normal_unnormalized().norm(), 1.0);
    }
}
