//! Geodesic distance on the WGS-84 ellipsoid.
//!
//! Uses Vincenty's inverse formula, which is accurate to well under a
//! millimetre for the short distances a classroom geofence deals with. For
//! nearly antipodal points the iteration may not converge; those fall back
//! to a great-circle (haversine) distance on the mean earth radius.

use crate::domain::value_objects::Coordinate;

/// WGS-84 semi-major axis (meters)
const WGS84_A: f64 = 6_378_137.0;
/// WGS-84 flattening
const WGS84_F: f64 = 1.0 / 298.257_223_563;
/// WGS-84 semi-minor axis (meters)
const WGS84_B: f64 = WGS84_A * (1.0 - WGS84_F);
/// IUGG mean earth radius (meters)
const MEAN_EARTH_RADIUS: f64 = 6_371_008.8;

const MAX_ITERATIONS: usize = 200;
const CONVERGENCE: f64 = 1e-12;

/// Distance in meters between two coordinates
///
/// Exactly symmetric, and zero for identical points.
pub fn distance_meters(a: &Coordinate, b: &Coordinate) -> f64 {
    // Evaluate with the endpoints in a canonical order so that
    // distance(a, b) and distance(b, a) are bit-for-bit identical.
    let (p, q) = if (a.lat(), a.lon()) <= (b.lat(), b.lon()) {
        (a, b)
    } else {
        (b, a)
    };

    if p == q {
        return 0.0;
    }

    vincenty_inverse(p, q).unwrap_or_else(|| haversine(p, q))
}

fn vincenty_inverse(p: &Coordinate, q: &Coordinate) -> Option<f64> {
    let mut d_lon = q.lon() - p.lon();
    if d_lon > 180.0 {
        d_lon -= 360.0;
    } else if d_lon < -180.0 {
        d_lon += 360.0;
    }
    let l = d_lon.to_radians();
    let u1 = ((1.0 - WGS84_F) * p.lat().to_radians().tan()).atan();
    let u2 = ((1.0 - WGS84_F) * q.lat().to_radians().tan()).atan();
    let (sin_u1, cos_u1) = u1.sin_cos();
    let (sin_u2, cos_u2) = u2.sin_cos();

    let mut lambda = l;
    for _ in 0..MAX_ITERATIONS {
        let (sin_lambda, cos_lambda) = lambda.sin_cos();
        let sin_sigma = ((cos_u2 * sin_lambda).powi(2)
            + (cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda).powi(2))
        .sqrt();
        if sin_sigma == 0.0 {
            // coincident points
            return Some(0.0);
        }
        let cos_sigma = sin_u1 * sin_u2 + cos_u1 * cos_u2 * cos_lambda;
        let sigma = sin_sigma.atan2(cos_sigma);
        let sin_alpha = cos_u1 * cos_u2 * sin_lambda / sin_sigma;
        let cos_sq_alpha = 1.0 - sin_alpha * sin_alpha;
        // On the equator cos²α is zero and the term is undefined; it drops out.
        let cos_2sigma_m = if cos_sq_alpha != 0.0 {
            cos_sigma - 2.0 * sin_u1 * sin_u2 / cos_sq_alpha
        } else {
            0.0
        };
        let c = WGS84_F / 16.0 * cos_sq_alpha * (4.0 + WGS84_F * (4.0 - 3.0 * cos_sq_alpha));

        let lambda_prev = lambda;
        lambda = l
            + (1.0 - c)
                * WGS84_F
                * sin_alpha
                * (sigma
                    + c * sin_sigma
                        * (cos_2sigma_m + c * cos_sigma * (-1.0 + 2.0 * cos_2sigma_m.powi(2))));

        if (lambda - lambda_prev).abs() < CONVERGENCE {
            let u_sq = cos_sq_alpha * (WGS84_A.powi(2) - WGS84_B.powi(2)) / WGS84_B.powi(2);
            let big_a =
                1.0 + u_sq / 16384.0 * (4096.0 + u_sq * (-768.0 + u_sq * (320.0 - 175.0 * u_sq)));
            let big_b = u_sq / 1024.0 * (256.0 + u_sq * (-128.0 + u_sq * (74.0 - 47.0 * u_sq)));
            let delta_sigma = big_b
                * sin_sigma
                * (cos_2sigma_m
                    + big_b / 4.0
                        * (cos_sigma * (-1.0 + 2.0 * cos_2sigma_m.powi(2))
                            - big_b / 6.0
                                * cos_2sigma_m
                                * (-3.0 + 4.0 * sin_sigma.powi(2))
                                * (-3.0 + 4.0 * cos_2sigma_m.powi(2))));
            return Some(WGS84_B * big_a * (sigma - delta_sigma));
        }
    }

    tracing::debug!(from = %p, to = %q, "Vincenty did not converge, using haversine");
    None
}

fn haversine(p: &Coordinate, q: &Coordinate) -> f64 {
    let phi1 = p.lat().to_radians();
    let phi2 = q.lat().to_radians();
    let d_phi = phi2 - phi1;
    let d_lambda = (q.lon() - p.lon()).to_radians();

    let h = (d_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    2.0 * MEAN_EARTH_RADIUS * h.sqrt().min(1.0).asin()
}
