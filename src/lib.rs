#[macro_use]
extern crate log;

mod klib;
pub use self::{
    klib::assignment_cost, klib::compute_centroids, klib::distance, klib::par_main,
    klib::populate, klib::run_parallel, klib::run_sequential, klib::seq_main, klib::Cli,
    klib::ClusterStore, klib::Collective, klib::Commands, klib::KernelArgs, klib::KernelParams,
    klib::KernelRun, klib::ParArgs, klib::Randnum, klib::ThreadCollective,
};
