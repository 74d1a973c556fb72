use crate::klib::{run_parallel, run_sequential, ClusterStore, KernelArgs, KernelRun, ParArgs, Randnum};
use std::io::Write;
use std::time::Instant;

/// Single-process form: generation, initialization, and the whole
/// fixed-point loop on the calling thread.
pub fn seq_main(args: KernelArgs) {
    let clock = Instant::now();
    let mut rng = Randnum::from_seed(args.seed);
    let mut store = ClusterStore::generate(&args, &mut rng);
    store.init_centroids(&mut rng);
    let run = run_sequential(&mut store);
    report(&run, clock);
}

/// Parallel form: rank 0's map is what gets printed.
pub fn par_main(args: ParArgs) {
    let clock = Instant::now();
    let run = run_parallel(&args);
    report(&run, clock);
}

/// One cluster index per point on stdout, then a blank line and the
/// elapsed-time line. Logging stays on stderr so this is the only
/// stdout the kernel produces.
fn report(run: &KernelRun, clock: Instant) {
    info!("converged after {} iterations", run.iterations);
    let stdout = std::io::stdout();
    let mut out = std::io::BufWriter::new(stdout.lock());
    for &cluster in &run.map {
        writeln!(out, "{}", cluster).unwrap();
    }
    writeln!(out).unwrap();
    writeln!(
        out,
        "Kernel executed in {:.6} seconds.",
        clock.elapsed().as_secs_f64()
    )
    .unwrap();
}
