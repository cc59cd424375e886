use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A configuration invariant that failed. Messages are stable and name the flag.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("missing input: please specify a read file")]
    MissingInput,

    #[error("missing output: please specify the output name (-o)")]
    MissingOutput,

    #[error("the number of threads must be > 0 (-t)")]
    ThreadCount,

    #[error("the number of rounds for correction must be > 0 (-r)")]
    CorrectionRounds,

    #[error("the number of rounds for assembly cleaning must be > 0 (-a)")]
    CleaningRounds,

    #[error("the length of removed adapters must be >= 0 (-z)")]
    AdapterLength,

    #[error("the length of k_mer must be < 64 (-k)")]
    KmerLength,

    #[error("max overlap drop ratio must be [0.0, 1.0) (-x)")]
    MaxDropRate,

    #[error("min overlap drop ratio must be [0.0, 1.0) (-y)")]
    MinDropRate,

    #[error("min overlap drop ratio must be less than max overlap drop ratio (-x/-y)")]
    DropRateOrder,

    #[error("the size of popped small bubbles must be >= 0 (-p)")]
    SmallBubbleSize,

    #[error("the size of popped large bubbles must be >= 0 (-m)")]
    LargeBubbleSize,

    #[error("max_hang_Len must be >= 0")]
    MaxHangLength,

    #[error("max_hang_rate must be >= 0")]
    MaxHangRate,

    #[error("gap_fuzz must be >= 0")]
    GapFuzz,

    #[error("min_overlap_Len must be >= 0")]
    MinOverlapLength,

    #[error("min_overlap_coverage must be >= 0")]
    MinOverlapCoverage,

    #[error("the length of removal tips must be >= 0 (-n)")]
    MaxShortTip,

    #[error("{} does not exist (-P)", .0.display())]
    PaternalIndex(PathBuf),

    #[error("{} does not exist (-M)", .0.display())]
    MaternalIndex(PathBuf),
}

impl ValidationError {
    /// Command-line flag the failed check is about, if it has one.
    pub fn flag(&self) -> Option<&'static str> {
        use ValidationError::*;
        match self {
            MissingInput => None,
            MissingOutput => Some("-o"),
            ThreadCount => Some("-t"),
            CorrectionRounds => Some("-r"),
            CleaningRounds => Some("-a"),
            AdapterLength => Some("-z"),
            KmerLength => Some("-k"),
            MaxDropRate => Some("-x"),
            MinDropRate => Some("-y"),
            DropRateOrder => Some("-x/-y"),
            SmallBubbleSize => Some("-p"),
            LargeBubbleSize => Some("-m"),
            MaxShortTip => Some("-n"),
            PaternalIndex(_) => Some("-P"),
            MaternalIndex(_) => Some("-M"),
            // no command-line flag sets these
            MaxHangLength | MaxHangRate | GapFuzz | MinOverlapLength | MinOverlapCoverage => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum CliError {
    #[error("missing option argument in \"{0}\"")]
    MissingArgument(String),

    #[error("unknown option in \"{0}\"")]
    UnknownOption(String),

    #[error("invalid value \"{value}\" for option \"{flag}\"")]
    InvalidValue { flag: String, value: String },

    #[error("{0}")]
    Usage(String),

    /// A read file could not be opened. The run cannot go on without it.
    #[error("Cannot find the input read file: {}", path.display())]
    InputFileNotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl CliError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, CliError::InputFileNotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, CliError>;
