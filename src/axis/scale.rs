use crate::error::ScaleError;

// ---------------------------------------------------------------------------
// Two-point linear rescaling
// ---------------------------------------------------------------------------

/// Map `values` onto `[y1, y2]` along the line through `(values[0], y1)` and
/// `(values[last], y2)`.
///
/// Each output is `y1 + (x - x0) / (xn - x0) * (y2 - y1)`.  The interpolation
/// is anchored on whichever endpoint is nearer so that the first and last
/// outputs are exactly `y1` and `y2`.
pub fn scale(values: &[f64], y1: f64, y2: f64) -> Result<Vec<f64>, ScaleError> {
    let (x0, xn) = match values {
        [first, .., last] => (*first, *last),
        _ => return Err(ScaleError::TooShort(values.len())),
    };
    let span = xn - x0;
    if span == 0.0 {
        return Err(ScaleError::ZeroWidth(x0));
    }
    let dy = y2 - y1;

    Ok(values
        .iter()
        .map(|&x| {
            let t = (x - x0) / span;
            if t <= 0.5 {
                y1 + t * dy
            } else {
                y2 - (1.0 - t) * dy
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_onto_new_range() {
        let out = scale(&[0.0, 1.0, 2.0, 3.0, 4.0], 10.0, 30.0).unwrap();
        assert_eq!(out, vec![10.0, 15.0, 20.0, 25.0, 30.0]);
    }

    #[test]
    fn endpoints_are_exact() {
        let xs: Vec<f64> = (0..199).map(|i| i as f64 * 0.37 + 1.1).collect();
        for &(y1, y2) in &[(0.1, 0.3), (-7.25, 1e6), (3.3, -3.3), (0.0, 0.7)] {
            let out = scale(&xs, y1, y2).unwrap();
            assert_eq!(out[0], y1);
            assert_eq!(*out.last().unwrap(), y2);
        }
    }

    #[test]
    fn preserves_monotonicity() {
        let xs: Vec<f64> = (0..200).map(|i| (i as f64).sqrt()).collect();
        let up = scale(&xs, 0.0, 12.5).unwrap();
        assert!(up.windows(2).all(|w| w[0] <= w[1]));
        let down = scale(&xs, 12.5, 0.0).unwrap();
        assert!(down.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn descending_input_is_fine() {
        let out = scale(&[4.0, 2.0, 0.0], 0.0, 1.0).unwrap();
        assert_eq!(out, vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn degenerate_ranges_are_errors() {
        assert_eq!(scale(&[], 0.0, 1.0), Err(ScaleError::TooShort(0)));
        assert_eq!(scale(&[3.0], 0.0, 1.0), Err(ScaleError::TooShort(1)));
        assert_eq!(
            scale(&[2.0, 5.0, 2.0], 0.0, 1.0),
            Err(ScaleError::ZeroWidth(2.0))
        );
    }
}
