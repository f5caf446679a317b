//! Scalar/vector broadcasting along the ensemble axis.

use ndarray::Array1;
use pipeline_types::error::{PipelineError, PipelineResult};

/// Common length of a set of inputs.
///
/// Length-1 inputs broadcast; any two longer inputs must agree.
pub fn broadcast_len(lengths: &[usize]) -> PipelineResult<usize> {
    let mut n = 1;
    for &len in lengths {
        if len == 0 {
            return Err(PipelineError::InconsistentDimensions(
                "empty input array".to_string(),
            ));
        }
        if len == 1 {
            continue;
        }
        if n == 1 {
            n = len;
        } else if len != n {
            return Err(PipelineError::InconsistentDimensions(format!(
                "input arrays of length {n} and {len} cannot be combined"
            )));
        }
    }
    Ok(n)
}

/// Element `i` of a possibly broadcast input.
#[inline]
pub fn broadcast_at(values: &Array1<f64>, i: usize) -> f64 {
    if values.len() == 1 {
        values[0]
    } else {
        values[i]
    }
}

/// Expand a length-1 array to `n` members; other lengths must equal `n`.
pub fn broadcast_to(values: &Array1<f64>, n: usize) -> PipelineResult<Array1<f64>> {
    match values.len() {
        len if len == n => Ok(values.clone()),
        1 => Ok(Array1::from_elem(n, values[0])),
        len => Err(PipelineError::InconsistentDimensions(format!(
            "array of length {len} cannot be broadcast to {n}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_broadcast_len() {
        assert_eq!(broadcast_len(&[1, 1]).unwrap(), 1);
        assert_eq!(broadcast_len(&[1, 5, 5]).unwrap(), 5);
        assert!(broadcast_len(&[4, 5]).is_err());
        assert!(broadcast_len(&[0]).is_err());
    }

    #[test]
    fn test_broadcast_to() {
        let b = broadcast_to(&array![2.5], 3).unwrap();
        assert_eq!(b, array![2.5, 2.5, 2.5]);
        assert_eq!(broadcast_to(&array![1.0, 2.0], 2).unwrap(), array![1.0, 2.0]);
        assert!(broadcast_to(&array![1.0, 2.0], 3).is_err());
    }

    #[test]
    fn test_broadcast_at() {
        let s = array![7.0];
        let v = array![1.0, 2.0, 3.0];
        assert_eq!(broadcast_at(&s, 2), 7.0);
        assert_eq!(broadcast_at(&v, 2), 3.0);
    }
}
