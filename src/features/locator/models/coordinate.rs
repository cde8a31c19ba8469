use exif::Rational;

/// Decimal GPS position in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GpsCoordinate {
    pub lat: f64,
    pub lon: f64,
}

impl GpsCoordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// `"lat, lon"` with 6 decimals
    pub fn display(&self) -> String {
        format!("{:.6}, {:.6}", self.lat, self.lon)
    }
}

/// Convert an EXIF degrees/minutes/seconds triple to decimal degrees.
///
/// `reference` is the hemisphere flag; `S` and `W` negate the result.
/// Returns `None` when the triple is short or a component has a zero
/// denominator.
pub fn dms_to_decimal(dms: &[Rational], reference: &str) -> Option<f64> {
    let [degrees, minutes, seconds] = [dms.first()?, dms.get(1)?, dms.get(2)?].map(rational_to_f64);
    let decimal = degrees? + minutes? / 60.0 + seconds? / 3600.0;

    if matches!(reference.trim(), "S" | "W") {
        Some(-decimal)
    } else {
        Some(decimal)
    }
}

fn rational_to_f64(r: &Rational) -> Option<f64> {
    if r.denom == 0 {
        return None;
    }
    Some(r.num as f64 / r.denom as f64)
}
