//! Apparent geocentric solar longitude and the equation of time.
//!
//! Low-precision series from Meeus, *Astronomical Algorithms* ch. 25 and 28,
//! good to about 0.01° over 1900–2100, which places solar terms within a
//! couple of minutes. UT is converted to TT with a fixed ΔT.

use crate::julian::centuries_since_j2000;

/// Fixed ΔT (TT − UT) in seconds used for 1900–2100.
pub const DELTA_T_SECONDS: f64 = 69.0;

/// Mean solar motion in degrees per day.
pub const MEAN_SOLAR_MOTION_DEG_PER_DAY: f64 = 360.0 / 365.242_19;

fn normalize_360(deg: f64) -> f64 {
    deg.rem_euclid(360.0)
}

/// Apparent solar longitude in degrees [0, 360) at a UT Julian Date.
pub fn apparent_longitude_deg(jd_ut: f64) -> f64 {
    let t = centuries_since_j2000(jd_ut + DELTA_T_SECONDS / 86_400.0);

    let l0 = 280.466_46 + t * (36_000.769_83 + 0.000_303_2 * t);
    let m = (357.529_11 + t * (35_999.050_29 - 0.000_153_7 * t)).to_radians();
    let c = (1.914_602 - t * (0.004_817 + 0.000_014 * t)) * m.sin()
        + (0.019_993 - 0.000_101 * t) * (2.0 * m).sin()
        + 0.000_289 * (3.0 * m).sin();
    let true_lon = l0 + c;
    let omega = (125.04 - 1_934.136 * t).to_radians();
    normalize_360(true_lon - 0.005_69 - 0.004_78 * omega.sin())
}

/// Equation of time in minutes (apparent minus mean solar time).
pub fn equation_of_time_minutes(jd_ut: f64) -> f64 {
    let t = centuries_since_j2000(jd_ut);
    let l0 = (280.466_46 + t * (36_000.769_83 + 0.000_303_2 * t)).to_radians();
    let m = (357.529_11 + t * (35_999.050_29 - 0.000_153_7 * t)).to_radians();
    let e = 0.016_708_634 - t * (0.000_042_037 + 0.000_000_126_7 * t);
    let eps = (23.439_291 - 0.013_004_2 * t).to_radians();
    let y = (eps / 2.0).tan().powi(2);

    let eot_rad = y * (2.0 * l0).sin() - 2.0 * e * m.sin()
        + 4.0 * e * y * m.sin() * (2.0 * l0).cos()
        - 0.5 * y * y * (4.0 * l0).sin()
        - 1.25 * e * e * (2.0 * m).sin();
    4.0 * eot_rad.to_degrees()
}
