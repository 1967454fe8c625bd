pub mod noise_loop;
pub mod runner;

pub use noise_loop::{NoiseLoopJob, NoiseLoopSummary};
pub use runner::{JobRunner, RunningJobs};
