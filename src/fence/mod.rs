//! Option handling and command dispatch, as driven by a fencing daemon.

mod dispatch;
mod options;

pub use dispatch::{run, Outcome};
pub use options::{
    Action, Options, RawOptions, DEFAULT_DELAY_SECS, DEFAULT_LOGIN, DEFAULT_TIMEOUT_SECS,
    MAX_DELAY_SECS,
};
