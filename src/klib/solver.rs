use crate::klib::{assignment_cost, compute_centroids, populate, ClusterStore};

/// Outcome of a kernel run: the final assignment map and how many
/// (assignment, recomputation) steps the fixed-point loop took.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KernelRun {
    pub map: Vec<usize>,
    pub iterations: usize,
}

/// Single-process convergence loop: step over the whole point set
/// while some point is still too far from its centroid AND some mean
/// was recomputed. Either flag going false ends the run.
pub fn run_sequential(store: &mut ClusterStore) -> KernelRun {
    if store.is_degenerate() {
        return KernelRun {
            map: store.map.clone(),
            iterations: 0,
        };
    }

    let mut iterations = 0;
    loop {
        let too_far = populate(store, 0..store.npoints);
        let has_changed = compute_centroids(store, 0..store.npoints);
        iterations += 1;
        debug!(
            "iteration {}: too_far={} has_changed={} cost={}",
            iterations,
            too_far,
            has_changed,
            assignment_cost(store)
        );
        if !(too_far && has_changed) {
            break;
        }
    }

    KernelRun {
        map: store.map.clone(),
        iterations,
    }
}
