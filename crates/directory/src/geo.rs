//! Geographic filtering primitives.
//!
//! Proximity queries run in two phases: a coarse rectangular pre-filter
//! that the store can answer from an index, then an exact great-circle
//! check on the survivors. The rectangle is deliberately loose so phase
//! one never rejects a true positive.

/// Nominal kilometres per degree of latitude.
pub const KM_PER_DEGREE_LAT: f64 = 111.0;

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Floor for the latitude cosine so the longitude span stays finite near
/// the poles.
const MIN_LAT_COS: f64 = 0.01;

/// Inclusive lat/lon rectangle. Bounds are taken literally in degree
/// space; no great-circle correction is applied.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
}

impl BoundingBox {
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        self.lat_min <= lat && lat <= self.lat_max && self.lon_min <= lon && lon <= self.lon_max
    }
}

/// Rectangle guaranteed to cover the circle of `radius_km` around the
/// center point.
pub fn bounding_box(lat: f64, lon: f64, radius_km: f64) -> BoundingBox {
    let lat_delta = radius_km / KM_PER_DEGREE_LAT;
    let lon_delta = radius_km / (KM_PER_DEGREE_LAT * lat.to_radians().cos().max(MIN_LAT_COS));
    BoundingBox {
        lat_min: lat - lat_delta,
        lat_max: lat + lat_delta,
        lon_min: lon - lon_delta,
        lon_max: lon + lon_delta,
    }
}

/// Haversine great-circle distance between two points, in kilometres.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_r = lat1.to_radians();
    let lat2_r = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();
    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_r.cos() * lat2_r.cos() * (delta_lon / 2.0).sin().powi(2);
    // min() guards against rounding pushing sqrt(a) past 1.0.
    let c = 2.0 * a.sqrt().min(1.0).asin();
    EARTH_RADIUS_KM * c
}

pub fn within_radius(lat1: f64, lon1: f64, lat2: f64, lon2: f64, radius_km: f64) -> bool {
    haversine_km(lat1, lon1, lat2, lon2) <= radius_km
}

#[cfg(test)]
mod tests {
    use super::*;

    const MOSCOW: (f64, f64) = (55.7558, 37.6173);
    const ST_PETERSBURG: (f64, f64) = (59.9343, 30.3351);

    #[test]
    fn distance_to_self_is_zero() {
        assert_eq!(haversine_km(MOSCOW.0, MOSCOW.1, MOSCOW.0, MOSCOW.1), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let forward = haversine_km(MOSCOW.0, MOSCOW.1, ST_PETERSBURG.0, ST_PETERSBURG.1);
        let back = haversine_km(ST_PETERSBURG.0, ST_PETERSBURG.1, MOSCOW.0, MOSCOW.1);
        assert!((forward - back).abs() < 1e-9);
    }

    #[test]
    fn moscow_to_st_petersburg_is_roughly_635_km() {
        let distance = haversine_km(MOSCOW.0, MOSCOW.1, ST_PETERSBURG.0, ST_PETERSBURG.1);
        assert!((distance - 635.0).abs() < 10.0, "got {distance}");
    }

    #[test]
    fn bounding_box_is_a_superset_of_the_circle() {
        let radius_km = 25.0;
        let bbox = bounding_box(MOSCOW.0, MOSCOW.1, radius_km);
        for step in 0..360 {
            let angle = f64::from(step).to_radians();
            // Points slightly inside the circle along every bearing.
            let lat = MOSCOW.0 + (radius_km * 0.99 / KM_PER_DEGREE_LAT) * angle.cos();
            let lon = MOSCOW.1
                + (radius_km * 0.99 / (KM_PER_DEGREE_LAT * MOSCOW.0.to_radians().cos()))
                    * angle.sin();
            if within_radius(MOSCOW.0, MOSCOW.1, lat, lon, radius_km) {
                assert!(bbox.contains(lat, lon), "lost point at bearing {step}");
            }
        }
    }

    #[test]
    fn longitude_span_is_clamped_near_the_poles() {
        let bbox = bounding_box(89.99, 0.0, 10.0);
        let span = bbox.lon_max - bbox.lon_min;
        assert!(span.is_finite());
        // cos is floored at 0.01, so the span cannot exceed 2 * 10/(111*0.01).
        assert!(span <= 2.0 * 10.0 / (KM_PER_DEGREE_LAT * 0.01) + 1e-9);
    }

    #[test]
    fn rectangle_bounds_are_inclusive() {
        let bbox = BoundingBox {
            lat_min: 55.7,
            lat_max: 55.8,
            lon_min: 37.5,
            lon_max: 37.7,
        };
        assert!(bbox.contains(55.7, 37.5));
        assert!(bbox.contains(55.8, 37.7));
        assert!(!bbox.contains(55.69, 37.6));
        assert!(!bbox.contains(55.75, 37.71));
    }
}
