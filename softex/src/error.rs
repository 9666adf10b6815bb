use std::io;

use softflow::VcdError;
use thiserror::Error;

use crate::analysis::AnalysisError;
use crate::config::ConfigError;

#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("trace error: {0}")]
    Vcd(#[from] VcdError),

    #[error("analysis error: {0}")]
    Analysis(#[from] AnalysisError),

    #[error("file system error: {0}")]
    Io(#[from] io::Error),

    #[error("command did not finish within {limit} cycles (controller in {state})")]
    CycleLimit { limit: u64, state: String },
}
