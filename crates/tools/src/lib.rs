pub mod stress;

pub use stress::{
    load_config, run_stress, StressConfig, StressReport, SyntheticGenerator, SyntheticPosition,
    ThreadReport,
};
