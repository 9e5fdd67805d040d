//! Bounded subprocess execution

mod runner;

pub use runner::{
    CHECK_TIMEOUT, INTERACTIVE_TIMEOUT, MAX_OUTPUT_SIZE, ProcessError, ProcessOutput, ProcessSpec,
    SubprocessRunner,
};
