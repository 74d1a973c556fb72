mod cli;
pub use crate::klib::cli::{Cli, Commands, KernelArgs, KernelParams, ParArgs};

mod collective;
pub use crate::klib::collective::{Collective, ThreadCollective};

mod driver;
pub use crate::klib::driver::{par_main, seq_main};

mod engine;
pub use crate::klib::engine::{assignment_cost, compute_centroids, distance, populate};

mod parallel;
pub use crate::klib::parallel::run_parallel;

mod randnum;
pub use crate::klib::randnum::Randnum;

mod solver;
pub use crate::klib::solver::{run_sequential, KernelRun};

mod store;
pub use crate::klib::store::ClusterStore;
