use num::Float;

/// Similar to numpy.interp for a single point: inputs outside `xp` take the nearest edge value.
///
/// `xp` must be non-empty and weakly increasing. Where `xp` repeats a coordinate the curve jumps,
/// and the right-hand value wins at the repeated point.
pub(crate) fn interp_one<F: Float>(x: F, xp: &[F], fp: &[F]) -> F {
    debug_assert_eq!(xp.len(), fp.len());

    let i = xp.partition_point(|&p| p <= x);

    // Base cases
    if i == 0 {
        return fp[0];
    }
    if i == xp.len() {
        return fp[fp.len() - 1];
    }

    // xp[i - 1] <= x < xp[i], so the segment has nonzero width
    let (x1, y1) = (xp[i - 1], fp[i - 1]);
    let (x2, y2) = (xp[i], fp[i]);

    y1 + (x - x1) * (y2 - y1) / (x2 - x1)
}

/// Similar to numpy.interp
pub(crate) fn interp<F: Float>(x_input: impl IntoIterator<Item = F>, xp: &[F], fp: &[F]) -> Vec<F> {
    x_input.into_iter().map(|x| interp_one(x, xp, fp)).collect()
}

/// Applies `op` elementwise across two equal length curves
pub(crate) fn zip_with<F: Float>(u: &[F], v: &[F], op: impl Fn(F, F) -> F) -> Vec<F> {
    debug_assert_eq!(u.len(), v.len());

    u.iter().zip(v).map(|(&u, &v)| op(u, v)).collect()
}

#[test]
fn test_interp() {
    let x = [0., 1., 1.5, 2.72, 3.24];
    let xs = [1., 2., 3.];
    let ys = [3., 2., 0.];

    assert_eq!(interp(x, &xs, &ys), vec![3., 3., 2.5, 0.5599999999999996, 0.]);

    let x = [2.5, -1., 7.5];
    let xs = [0., 1., 2., 3., 4.5];
    let ys = [0., 2., 5., 3., 2.];

    assert_eq!(interp(x, &xs, &ys), vec![4., 0., 2.]);
}

#[test]
fn test_interp_repeated_coordinate() {
    let xs = [0., 1., 1., 2.];
    let ys = [0., 0., 1., 1.];

    assert_eq!(interp_one(0.5, &xs, &ys), 0.);
    assert_eq!(interp_one(1., &xs, &ys), 1.);
    assert_eq!(interp_one(1.5, &xs, &ys), 1.);
}

#[test]
fn test_zip_with() {
    assert_eq!(zip_with(&[0.1, 0.7], &[0.5, 0.2], f64::max), vec![0.5, 0.7]);
}
