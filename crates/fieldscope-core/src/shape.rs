//! Shape validation for user-supplied field data.
//!
//! Inputs arrive as dynamic-rank [`ndarray`] views. Each validator either
//! returns the data in the flat, row-major layout the store expects, or a
//! [`FieldscopeError::Shape`] describing what was expected.

use glam::Vec3;
use ndarray::ArrayViewD;

use crate::error::{FieldscopeError, Result};

fn shape_error(name: &str, expected: String, values: &ArrayViewD<'_, f32>) -> FieldscopeError {
    FieldscopeError::Shape {
        name: name.to_string(),
        expected,
        actual: values.shape().to_vec(),
    }
}

/// Canonicalizes scalar image data for a `width x height` image.
///
/// Accepts a 1d `[width*height]` array or a 2d `[width, height]` array; the
/// latter is flattened in row-major order.
pub fn scalar_image_values(
    name: &str,
    width: usize,
    height: usize,
    values: &ArrayViewD<'_, f32>,
) -> Result<Vec<f32>> {
    let ok = match values.shape() {
        [n] => *n == width * height,
        [w, h] => *w == width && *h == height,
        _ => false,
    };
    if !ok {
        return Err(shape_error(
            name,
            format!("a 2d [{width}, {height}] or 1d [{}] array", width * height),
            values,
        ));
    }
    Ok(values.iter().copied().collect())
}

/// Canonicalizes color image data for a `width x height` image.
///
/// Accepts a 2d `[width*height, 3]` array or a 3d `[width, height, 3]` array,
/// returning one RGB triple per pixel in row-major order.
pub fn color_image_values(
    name: &str,
    width: usize,
    height: usize,
    values: &ArrayViewD<'_, f32>,
) -> Result<Vec<Vec3>> {
    let ok = match values.shape() {
        [n, 3] => *n == width * height,
        [w, h, 3] => *w == width && *h == height,
        _ => false,
    };
    if !ok {
        return Err(shape_error(
            name,
            format!(
                "a 3d [{width}, {height}, 3] or 2d [{}, 3] array",
                width * height
            ),
            values,
        ));
    }
    let flat: Vec<f32> = values.iter().copied().collect();
    Ok(flat
        .chunks_exact(3)
        .map(|c| Vec3::new(c[0], c[1], c[2]))
        .collect())
}

/// Canonicalizes dense per-vertex values for a volume grid with `n_values` vertices.
///
/// Only a 1d `[n_values]` array is accepted.
pub fn grid_values(name: &str, n_values: usize, values: &ArrayViewD<'_, f32>) -> Result<Vec<f32>> {
    match values.shape() {
        [n] if *n == n_values => Ok(values.iter().copied().collect()),
        _ => Err(shape_error(name, format!("a 1d [{n_values}] array"), values)),
    }
}

/// Checks that `values` is one-dimensional and returns it flattened.
pub fn one_dimensional(name: &str, values: &ArrayViewD<'_, f32>) -> Result<Vec<f32>> {
    if values.ndim() != 1 {
        return Err(shape_error(name, "a 1d array".to_string(), values));
    }
    Ok(values.iter().copied().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array, Array1, Array2, Array3, IxDyn};
    use proptest::prelude::*;

    #[test]
    fn test_scalar_image_2d_is_row_major() {
        // [w=2, h=3]
        let arr = Array2::from_shape_vec((2, 3), vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0])
            .unwrap()
            .into_dyn();
        let flat = scalar_image_values("img", 2, 3, &arr.view()).unwrap();
        assert_eq!(flat, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_scalar_image_transposed_view_uses_logical_order() {
        let base = Array2::from_shape_vec((3, 2), vec![0.0, 3.0, 1.0, 4.0, 2.0, 5.0]).unwrap();
        let arr = base.t().into_dyn();
        let flat = scalar_image_values("img", 2, 3, &arr).unwrap();
        assert_eq!(flat, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_scalar_image_rejects_swapped_dims() {
        let arr = Array2::<f32>::zeros((3, 2)).into_dyn();
        let err = scalar_image_values("img", 2, 3, &arr.view()).unwrap_err();
        match err {
            FieldscopeError::Shape { name, actual, .. } => {
                assert_eq!(name, "img");
                assert_eq!(actual, vec![3, 2]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_scalar_image_rejects_rank_3() {
        let arr = Array3::<f32>::zeros((2, 3, 1)).into_dyn();
        assert!(scalar_image_values("img", 2, 3, &arr.view()).is_err());
    }

    #[test]
    fn test_color_image_shapes_agree() {
        let data: Vec<f32> = (0..18).map(|i| i as f32).collect();
        let flat = Array2::from_shape_vec((6, 3), data.clone()).unwrap().into_dyn();
        let cube = Array3::from_shape_vec((2, 3, 3), data).unwrap().into_dyn();

        let a = color_image_values("img", 2, 3, &flat.view()).unwrap();
        let b = color_image_values("img", 2, 3, &cube.view()).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 6);
        assert_eq!(a[1], Vec3::new(3.0, 4.0, 5.0));
    }

    #[test]
    fn test_color_image_rejects_rgba() {
        let arr = Array2::<f32>::zeros((6, 4)).into_dyn();
        assert!(color_image_values("img", 2, 3, &arr.view()).is_err());
        let arr = Array1::<f32>::zeros(18).into_dyn();
        assert!(color_image_values("img", 2, 3, &arr.view()).is_err());
    }

    #[test]
    fn test_grid_values() {
        let arr = Array1::<f32>::zeros(27).into_dyn();
        assert_eq!(grid_values("f", 27, &arr.view()).unwrap().len(), 27);

        for bad in [26, 28] {
            let arr = Array1::<f32>::zeros(bad).into_dyn();
            let err = grid_values("f", 27, &arr.view()).unwrap_err();
            assert!(err.to_string().contains("[27]"));
        }

        let arr = Array2::<f32>::zeros((27, 1)).into_dyn();
        assert!(grid_values("f", 27, &arr.view()).is_err());
    }

    #[test]
    fn test_one_dimensional() {
        let arr = Array1::from(vec![1.0, 2.0]).into_dyn();
        assert_eq!(one_dimensional("f", &arr.view()).unwrap(), vec![1.0, 2.0]);
        let arr = Array::<f32, _>::zeros(IxDyn(&[2, 2]));
        assert!(one_dimensional("f", &arr.view()).is_err());
    }

    proptest! {
        #[test]
        fn prop_scalar_image_accepts_both_layouts(w in 1usize..12, h in 1usize..12) {
            let data: Vec<f32> = (0..w * h).map(|i| i as f32 * 0.5).collect();
            let flat = Array1::from(data.clone()).into_dyn();
            let grid = Array2::from_shape_vec((w, h), data.clone()).unwrap().into_dyn();

            prop_assert_eq!(scalar_image_values("img", w, h, &flat.view()).unwrap(), data.clone());
            prop_assert_eq!(scalar_image_values("img", w, h, &grid.view()).unwrap(), data);
        }

        #[test]
        fn prop_scalar_image_rejects_wrong_length(
            w in 1usize..12,
            h in 1usize..12,
            delta in 1usize..5,
        ) {
            let flat = Array1::<f32>::zeros(w * h + delta).into_dyn();
            let is_shape_error = matches!(
                scalar_image_values("img", w, h, &flat.view()),
                Err(FieldscopeError::Shape { .. })
            );
            prop_assert!(is_shape_error);
        }
    }
}
