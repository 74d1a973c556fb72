use crate::klib::ClusterStore;
use ndarray::ArrayView1;
use std::ops::Range;

/// Euclidean distance between two coordinate vectors.
pub fn distance(a: ArrayView1<f32>, b: ArrayView1<f32>) -> f32 {
    a.iter()
        .zip(b.iter())
        .fold(0.0f32, |acc, (x, y)| {
            let d = x - y;
            acc + d * d
        })
        .sqrt()
}

/// Assignment pass over `[range.start, range.end)`.
///
/// The baseline for each point is its current assignment's distance;
/// a strictly closer centroid takes the point and is marked dirty, so
/// ties keep the earlier assignment. Returns the range-local too_far
/// flag: some point's best distance still exceeds the threshold.
pub fn populate(store: &mut ClusterStore, range: Range<usize>) -> bool {
    let mut too_far = false;
    for i in range {
        let mut best = distance(store.centroids.row(store.map[i]), store.points.row(i));
        for c in 0..store.ncentroids {
            if c == store.map[i] {
                continue;
            }
            let candidate = distance(store.centroids.row(c), store.points.row(i));
            if candidate < best {
                store.map[i] = c;
                best = candidate;
                store.dirty[c] = true;
            }
        }
        if best > store.mindistance {
            too_far = true;
        }
    }
    too_far
}

/// Recomputation pass: every dirty cluster's centroid becomes the sum
/// of its in-range members, scaled to the mean only when the
/// population exceeds one. An emptied cluster stays zeroed and a
/// singleton keeps its member's raw coordinates; neither is averaged.
/// Returns has_changed and clears the whole dirty set either way.
pub fn compute_centroids(store: &mut ClusterStore, range: Range<usize>) -> bool {
    let mut has_changed = false;
    for c in 0..store.ncentroids {
        if !store.dirty[c] {
            continue;
        }
        store.centroids.row_mut(c).fill(0.0);
        let mut population = 0usize;
        for i in range.clone() {
            if store.map[i] != c {
                continue;
            }
            let mut row = store.centroids.row_mut(c);
            row += &store.points.row(i);
            population += 1;
        }
        if population > 1 {
            let scale = 1.0 / population as f32;
            store.centroids.row_mut(c).mapv_inplace(|v| v * scale);
        }
        has_changed = true;
    }
    store.dirty.iter_mut().for_each(|d| *d = false);
    has_changed
}

/// Sum of squared point-to-assigned-centroid distances; non-increasing
/// across iterations of the fixed-point loop.
pub fn assignment_cost(store: &ClusterStore) -> f64 {
    (0..store.npoints)
        .map(|i| {
            let d = distance(store.centroids.row(store.map[i]), store.points.row(i)) as f64;
            d * d
        })
        .sum()
}
