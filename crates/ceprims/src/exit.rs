use std::fmt;
use std::io;

use ceprims_event::EventError;
use ceprims_format::FormatError;
use ceprims_record::RecordError;

// Process exit codes. 64 follows sysexits EX_USAGE.
pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn usage(message: impl Into<String>) -> Self {
        Self::new(USAGE, message)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::NotFound => FAILURE,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn event_error(context: &str, err: EventError) -> CliError {
    CliError::new(DATA_INVALID, format!("{context}: {err}"))
}

pub fn format_error(context: &str, err: FormatError) -> CliError {
    match err {
        FormatError::Event(err) => event_error(context, err),
        FormatError::UnsupportedFormat(_) => CliError::usage(format!("{context}: {err}")),
    }
}

pub fn record_error(context: &str, err: RecordError) -> CliError {
    match err {
        RecordError::Event(err) => event_error(context, err),
        RecordError::Format(err) => format_error(context, err),
        RecordError::Config(_) => CliError::usage(format!("{context}: {err}")),
        RecordError::Payload(_) | RecordError::UnknownType(_) | RecordError::MissingData(_) => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
    }
}
