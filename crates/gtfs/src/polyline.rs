/// Decodes a Google-encoded polyline into `(latitude, longitude)` pairs.
///
/// See <https://developers.google.com/maps/documentation/utilities/polylinealgorithm>.
pub fn decode(encoded: &str) -> Vec<(f64, f64)> {
    let bytes = encoded.as_bytes();
    let mut index = 0usize;
    let mut lat = 0i64;
    let mut lng = 0i64;
    let mut points = Vec::new();

    while index < bytes.len() {
        let Some(delta_lat) = decode_value(bytes, &mut index) else {
            break;
        };
        lat += delta_lat;

        let Some(delta_lng) = decode_value(bytes, &mut index) else {
            break;
        };
        lng += delta_lng;

        points.push((lat as f64 / 1e5, lng as f64 / 1e5));
    }

    points
}

fn decode_value(bytes: &[u8], index: &mut usize) -> Option<i64> {
    let mut result: i64 = 0;
    let mut shift = 0u32;
    loop {
        let byte = *bytes.get(*index)?;
        *index += 1;
        let chunk = (byte as i64 - 63) & 0x1f;
        result |= chunk << shift;
        shift += 5;
        if byte as i64 - 63 < 0x20 {
            break;
        }
    }
    Some(if result & 1 != 0 { !(result >> 1) } else { result >> 1 })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_a_known_polyline() {
        let points = decode("_p~iF~ps|U_ulLnnqC_mqNvxq`@");
        assert_eq!(points.len(), 3);
        let (lat, lng) = points[0];
        assert!((lat - 38.5).abs() < 1e-3);
        assert!((lng - (-120.2)).abs() < 1e-3);
    }
}
