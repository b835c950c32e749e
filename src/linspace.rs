/// Evenly spaced samples over a closed interval, computed like `numpy.linspace`
#[derive(Clone, Debug)]
pub(crate) struct Linspace {
    start: f64,
    end: f64,
    step: f64,
    index: usize,
    len: usize,
}

impl Linspace {
    pub(crate) fn new(min: f64, max: f64, n: usize) -> Self {
        let step = if n > 1 { (max - min) / (n - 1) as f64 } else { 0. };

        Linspace { start: min, end: max, step, index: 0, len: n }
    }
}

impl Iterator for Linspace {
    type Item = f64;

    #[inline]
    fn next(&mut self) -> Option<f64> {
        if self.index >= self.len {
            return None;
        }

        let i = self.index;
        self.index += 1;

        // Pin the last sample so rounding never pushes it past the bound
        if i + 1 == self.len && self.len > 1 {
            Some(self.end)
        } else {
            Some(self.start + self.step * i as f64)
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.len - self.index;
        (n, Some(n))
    }
}

impl ExactSizeIterator for Linspace {}

#[test]
fn test_linspace() {
    let points: Vec<_> = Linspace::new(60., 95., 36).collect();

    assert_eq!(points.len(), 36);
    assert_eq!(points[0], 60.);
    assert_eq!(points[10], 70.);
    assert_eq!(points[35], 95.);

    let points: Vec<_> = Linspace::new(0., 1., 3).collect();

    assert_eq!(points, vec![0., 0.5, 1.]);
    assert_eq!(Linspace::new(0., 1., 0).count(), 0);
}
