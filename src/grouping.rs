//! Clustering of overlapping detection boxes.
//!
//! [`group_rectangles`] merges boxes whose edges all lie within a relative
//! tolerance of each other, averages every cluster and drops clusters with
//! too little support or nested inside a better-supported one.

use crate::types::Rect;
use nalgebra::Point2;

/// Groups similar rectangles and returns one averaged box per cluster.
///
/// Two boxes are similar when every edge differs by at most
/// `eps * (min(w1, w2) + min(h1, h2)) / 2`. Clusters with
/// `members <= group_threshold` are discarded, so callers that want to keep
/// isolated boxes push each box twice and pass `group_threshold = 1`.
pub fn group_rectangles(rects: &[Rect], group_threshold: usize, eps: f64) -> Vec<Rect> {
    if rects.is_empty() {
        return Vec::new();
    }
    let labels = partition(rects, |a, b| similar(a, b, eps));
    let n_classes = labels.iter().copied().max().map_or(0, |m| m + 1);

    let mut sums = vec![[0i64; 4]; n_classes];
    let mut counts = vec![0usize; n_classes];
    for (r, &label) in rects.iter().zip(&labels) {
        let s = &mut sums[label];
        s[0] += r.x as i64;
        s[1] += r.y as i64;
        s[2] += r.width as i64;
        s[3] += r.height as i64;
        counts[label] += 1;
    }

    let mut clusters: Vec<(Rect, usize)> = Vec::with_capacity(n_classes);
    for (s, &n) in sums.iter().zip(&counts) {
        if n <= group_threshold {
            continue;
        }
        let inv = 1.0 / n as f64;
        let avg = |v: i64| (v as f64 * inv).round() as i32;
        clusters.push((Rect::new(avg(s[0]), avg(s[1]), avg(s[2]), avg(s[3])), n));
    }

    let mut out = Vec::with_capacity(clusters.len());
    for (i, &(inner, n_inner)) in clusters.iter().enumerate() {
        let nested = clusters.iter().enumerate().any(|(j, &(outer, n_outer))| {
            i != j
                && (n_outer > n_inner.max(3) || n_inner < 3)
                && inside_with_margin(&inner, &outer, eps)
        });
        if !nested {
            out.push(inner);
        }
    }
    out
}

/// True when any rectangle contains `pt` (half-open).
pub fn in_any_rect(rects: &[Rect], pt: Point2<f32>) -> bool {
    rects.iter().any(|r| r.contains(pt))
}

fn similar(a: &Rect, b: &Rect, eps: f64) -> bool {
    let delta = eps * (a.width.min(b.width) + a.height.min(b.height)) as f64 * 0.5;
    let close = |u: i32, v: i32| ((u - v).abs() as f64) <= delta;
    close(a.x, b.x)
        && close(a.y, b.y)
        && close(a.right(), b.right())
        && close(a.bottom(), b.bottom())
}

fn inside_with_margin(inner: &Rect, outer: &Rect, eps: f64) -> bool {
    let dx = (outer.width as f64 * eps).round() as i32;
    let dy = (outer.height as f64 * eps).round() as i32;
    inner.x >= outer.x - dx
        && inner.y >= outer.y - dy
        && inner.right() <= outer.right() + dx
        && inner.bottom() <= outer.bottom() + dy
}

/// Labels the transitive closure of `same` with dense class ids in order of
/// first appearance.
fn partition<F>(items: &[Rect], same: F) -> Vec<usize>
where
    F: Fn(&Rect, &Rect) -> bool,
{
    let n = items.len();
    let mut parent: Vec<usize> = (0..n).collect();

    fn find(parent: &mut [usize], mut i: usize) -> usize {
        while parent[i] != i {
            parent[i] = parent[parent[i]];
            i = parent[i];
        }
        i
    }

    for i in 0..n {
        for j in (i + 1)..n {
            if same(&items[i], &items[j]) {
                let (ri, rj) = (find(&mut parent, i), find(&mut parent, j));
                if ri != rj {
                    parent[rj] = ri;
                }
            }
        }
    }

    let mut dense = vec![usize::MAX; n];
    let mut next = 0usize;
    let mut labels = Vec::with_capacity(n);
    for i in 0..n {
        let root = find(&mut parent, i);
        if dense[root] == usize::MAX {
            dense[root] = next;
            next += 1;
        }
        labels.push(dense[root]);
    }
    labels
}
