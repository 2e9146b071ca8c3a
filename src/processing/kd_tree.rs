use kiddo::KdTree;
use kiddo::SquaredEuclidean;

/// 2D KD-tree over a series' points for nearest-point tooltip lookup.
///
/// Points are stored scaled by the data extent on each axis, so distances
/// are comparable even when Y spans thousands and X spans a handful of
/// positions.
pub struct HoverTree {
    tree: KdTree<f64, 2>,
    x_span: f64,
    y_span: f64,
    len: usize,
}

impl HoverTree {
    /// Build a tree from x,y points, scaled by their own extent.
    /// Non-finite points are skipped; the item stored for each point is its
    /// original index.
    pub fn build(x: &[f64], y: &[f64]) -> Self {
        let x_span = extent(x.iter().copied());
        let y_span = extent(y.iter().copied());
        Self::with_spans(x, y, x_span, y_span)
    }

    /// Build with explicit axis spans, so several trees share one scale.
    pub fn with_spans(x: &[f64], y: &[f64], x_span: f64, y_span: f64) -> Self {
        let finite: Vec<(usize, f64, f64)> = x
            .iter()
            .zip(y.iter())
            .enumerate()
            .filter(|(_, (xv, yv))| xv.is_finite() && yv.is_finite())
            .map(|(i, (&xv, &yv))| (i, xv, yv))
            .collect();

        let mut tree: KdTree<f64, 2> = KdTree::new();
        for &(i, xv, yv) in &finite {
            tree.add(&[xv / x_span, yv / y_span], i as u64);
        }

        Self {
            tree,
            x_span,
            y_span,
            len: finite.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Nearest point to (qx, qy) as (original_index, normalized distance).
    pub fn nearest(&self, qx: f64, qy: f64) -> Option<(usize, f64)> {
        if self.is_empty() {
            return None;
        }
        let result = self
            .tree
            .nearest_one::<SquaredEuclidean>(&[qx / self.x_span, qy / self.y_span]);
        Some((result.item as usize, result.distance.sqrt()))
    }
}

/// Max minus min of the finite values, or 1.0 when they don't spread.
pub fn extent(vals: impl Iterator<Item = f64>) -> f64 {
    let (lo, hi) = vals.filter(|v| v.is_finite()).fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    let span = hi - lo;
    if span.is_finite() && span > 1e-15 {
        span
    } else {
        1.0
    }
}
