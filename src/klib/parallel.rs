use crate::klib::{
    compute_centroids, populate, ClusterStore, Collective, KernelArgs, KernelRun, ParArgs,
    Randnum, ThreadCollective,
};
use crossbeam_channel::bounded;
use std::thread;
use std::thread::JoinHandle;

/// Data-parallel convergence loop: one OS thread per rank, each owning
/// a full replica of the store and a contiguous partition of the point
/// range. Rank 0's run is the result; the other partitions of its map
/// keep their initial assignments since no map gather takes place.
pub fn run_parallel(args: &ParArgs) -> KernelRun {
    let workers = args.workers.max(1);
    let (result_sender, result_receiver) = bounded(1);

    debug!("spawning {} workers", workers);
    let handles: Vec<JoinHandle<()>> = ThreadCollective::ranks(workers)
        .into_iter()
        .map(|channel| {
            let m_args = args.kernel.clone();
            let m_sender = result_sender.clone();
            thread::spawn(move || {
                let run = worker(&m_args, &channel);
                if channel.rank() == 0 {
                    m_sender.send(run).unwrap();
                }
            })
        })
        .collect();
    drop(result_sender);

    let run = result_receiver.recv().unwrap();
    for handle in handles {
        handle.join().unwrap();
    }
    run
}

/// Contiguous partition for one rank: npoints / nranks points each,
/// remainder folded into the last rank's slice.
fn partition(npoints: usize, rank: usize, nranks: usize) -> (usize, usize) {
    let local = npoints / nranks;
    let start = rank * local;
    let end = if rank == nranks - 1 {
        npoints
    } else {
        start + local
    };
    (start, end)
}

/// One rank's whole life: regenerate the identical point set from the
/// shared seed, run identical initialization, then iterate local
/// passes with a reduction round after each. The stop condition uses
/// the post-reduction flags, so every rank leaves in lockstep.
fn worker<C: Collective>(args: &KernelArgs, channel: &C) -> KernelRun {
    let mut rng = Randnum::from_seed(args.seed);
    let mut store = ClusterStore::generate(args, &mut rng);
    store.init_centroids(&mut rng);

    if store.is_degenerate() {
        return KernelRun {
            map: store.map.clone(),
            iterations: 0,
        };
    }

    let (start, end) = partition(store.npoints, channel.rank(), channel.nranks());
    let mut iterations = 0;
    loop {
        let mut too_far = populate(&mut store, start..end);
        let mut has_changed = compute_centroids(&mut store, start..end);

        channel.allreduce_max_flags(&mut store.dirty);
        too_far = channel.allreduce_max_flag(too_far);
        has_changed = channel.allreduce_max_flag(has_changed);
        // each rank contributes its locally averaged centroids; the
        // sum is what all ranks iterate on next
        let centroids = store
            .centroids
            .as_slice_mut()
            .expect("centroid matrix is contiguous");
        channel.allreduce_sum(centroids);

        iterations += 1;
        if !(too_far && has_changed) {
            break;
        }
    }

    KernelRun {
        map: store.map.clone(),
        iterations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::klib::run_sequential;
    use ndarray::arr2;

    fn args(npoints: usize, dimension: usize, ncentroids: usize, mindistance: f32, seed: i32) -> ParArgs {
        ParArgs {
            kernel: KernelArgs {
                npoints,
                dimension,
                ncentroids,
                mindistance,
                seed,
                debug: false,
            },
            workers: 1,
        }
    }

    #[test]
    fn partitions_cover_the_range() {
        assert_eq!(partition(10, 0, 3), (0, 3));
        assert_eq!(partition(10, 1, 3), (3, 6));
        assert_eq!(partition(10, 2, 3), (6, 10));
        // fewer points than workers: everything lands on the last rank
        assert_eq!(partition(2, 0, 4), (0, 0));
        assert_eq!(partition(2, 3, 4), (0, 2));
    }

    #[test]
    fn one_worker_matches_sequential() {
        let m_args = args(40, 3, 5, 0.5, 23);
        let par = run_parallel(&m_args);

        let mut rng = Randnum::from_seed(23);
        let mut store = ClusterStore::generate(&m_args.kernel, &mut rng);
        store.init_centroids(&mut rng);
        let seq = run_sequential(&mut store);

        assert_eq!(par, seq);
    }

    #[test]
    fn multi_worker_runs_are_deterministic() {
        let mut m_args = args(60, 2, 4, 0.5, 31);
        m_args.workers = 3;
        let a = run_parallel(&m_args);
        let b = run_parallel(&m_args);
        assert_eq!(a, b);
        assert_eq!(a.map.len(), 60);
        assert!(a.map.iter().all(|&c| c < 4));
    }

    #[test]
    fn degenerate_inputs_skip_the_loop() {
        let mut m_args = args(0, 2, 3, 0.0, 1);
        m_args.workers = 2;
        let run = run_parallel(&m_args);
        assert!(run.map.is_empty());
        assert_eq!(run.iterations, 0);
    }

    /// Known deviation from textbook Lloyd's: the centroid reduction
    /// sums each rank's locally averaged partial, so a cluster with
    /// members in more than one partition converges on the sum of the
    /// partition means rather than the global mean.
    #[test]
    fn split_cluster_reduces_to_sum_of_partition_means() {
        let points = arr2(&[[0.0f32], [2.0], [10.0], [20.0]]);
        let ranges = [(0usize, 2usize), (2, 4)];

        let handles: Vec<_> = ThreadCollective::ranks(2)
            .into_iter()
            .map(|channel| {
                let m_points = points.clone();
                thread::spawn(move || {
                    let mut store = ClusterStore {
                        npoints: 4,
                        dimension: 1,
                        ncentroids: 1,
                        mindistance: 0.0,
                        points: m_points,
                        centroids: arr2(&[[0.0f32]]),
                        map: vec![0; 4],
                        dirty: vec![true],
                    };
                    let (start, end) = ranges[channel.rank()];
                    compute_centroids(&mut store, start..end);
                    let centroids = store.centroids.as_slice_mut().unwrap();
                    channel.allreduce_sum(centroids);
                    store.centroids[[0, 0]]
                })
            })
            .collect();

        for handle in handles {
            let reduced = handle.join().unwrap();
            // partition means are 1.0 and 15.0; the global mean would be 8.0
            assert_eq!(reduced, 16.0);
        }
    }
}
