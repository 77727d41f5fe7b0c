use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::ops::Deref;
use std::panic::Location;

/// Classification of a failed decode.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The input does not start with the `.Z` magic bytes.
    BadMagic,
    /// A code that is impossible in the current dictionary state, or a failed read.
    CorruptInput,
    /// The header asks for codes wider than 16 bits.
    MaxBitsExceeded,
    /// Inconsistent decoder state, e.g. a non-literal as the very first code.
    #[default]
    Other,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ErrorKind::BadMagic => "bad magic number",
            ErrorKind::CorruptInput => "corrupt input",
            ErrorKind::MaxBitsExceeded => "maxbits exceeded",
            ErrorKind::Other => "other error",
        })
    }
}

#[derive(Debug)]
pub struct ZError {
    pub kind: ErrorKind,
    pub message: Option<String>,
    pub context: Option<String>,
    pub source: Option<Box<dyn Error + Send + Sync>>,
    pub location: &'static Location<'static>,
}

pub type Res<T> = Result<T, ZError>;

impl ZError {
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}

impl Error for ZError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self.source {
            Some(ref err) => Some(err.deref()),
            None => None,
        }
    }
}

impl Display for ZError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} on line {}", self.kind, self.location)?;
        if let Some(context) = &self.context {
            write!(f, " ({})", context)?
        }
        if let Some(message) = &self.message {
            write!(f, ": {}", message)?
        }
        if let Some(cause) = &self.source {
            write!(f, "\ncaused by {}", cause)?
        }
        Ok(())
    }
}

impl From<ZError> for std::io::Error {
    fn from(value: ZError) -> Self {
        std::io::Error::new(std::io::ErrorKind::InvalidData, value)
    }
}

impl From<ErrorBuilder> for ZError {
    #[track_caller]
    fn from(
        ErrorBuilder {
            kind,
            message,
            context,
            source,
        }: ErrorBuilder,
    ) -> Self {
        let location = Location::caller();
        log::warn!("{}: {} {:?} {:?}", location, kind, context, message);
        Self {
            kind,
            message,
            context,
            source,
            location,
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct ErrorBuilder {
    pub kind: ErrorKind,
    pub message: Option<String>,
    pub context: Option<String>,
    pub source: Option<Box<dyn Error + Send + Sync>>,
}

pub(crate) trait ResultBuilder<T>: Sized {
    fn message<F: FnOnce(Option<&str>) -> String>(self, msg: F) -> Result<T, ErrorBuilder>;
    fn kind(self, kind: ErrorKind) -> Result<T, ErrorBuilder>;
}

impl<T> ResultBuilder<T> for Result<T, ErrorBuilder> {
    fn message<F: FnOnce(Option<&str>) -> String>(self, msg: F) -> Self {
        self.map_err(|e| ErrorBuilder {
            message: Some(msg(e.message.as_deref())),
            ..e
        })
    }

    fn kind(self, kind: ErrorKind) -> Self {
        self.map_err(|e| ErrorBuilder { kind, ..e })
    }
}

impl<T> ResultBuilder<T> for Option<T> {
    fn message<F: FnOnce(Option<&str>) -> String>(self, msg: F) -> Result<T, ErrorBuilder> {
        self.ok_or_else(|| ErrorBuilder {
            message: Some(msg(None)),
            ..Default::default()
        })
    }

    fn kind(self, kind: ErrorKind) -> Result<T, ErrorBuilder> {
        self.ok_or_else(|| ErrorBuilder {
            kind,
            ..Default::default()
        })
    }
}

pub(crate) trait WithContext<T, E: Error, C: ErrorContext> {
    fn at(self, context: &C) -> Result<T, ErrorBuilder>;
}

impl<T, E: Error + 'static + Send + Sync, C: ErrorContext> WithContext<T, E, C> for Result<T, E> {
    fn at(self, context: &C) -> Result<T, ErrorBuilder> {
        self.map_err(|e| ErrorBuilder {
            context: context.describe(),
            source: Some(Box::new(e)),
            ..Default::default()
        })
    }
}

pub(crate) trait ErrorContext {
    fn describe(&self) -> Option<String> {
        None
    }

    fn raise<T>(&self, kind: ErrorKind, msg: String) -> Result<T, ErrorBuilder> {
        Err(ErrorBuilder {
            kind,
            message: Some(msg),
            context: self.describe(),
            ..Default::default()
        })
    }

    fn assert_le<T: PartialOrd + Display>(&self, kind: ErrorKind, l: T, r: T) -> Result<(), ErrorBuilder> {
        if l <= r {
            Ok(())
        } else {
            self.raise(kind, format!("Expected {} <= {}", l, r))
        }
    }

    fn assert_lt<T: PartialOrd + Display>(&self, kind: ErrorKind, l: T, r: T) -> Result<(), ErrorBuilder> {
        if l < r {
            Ok(())
        } else {
            self.raise(kind, format!("Expected {} < {}", l, r))
        }
    }
}
