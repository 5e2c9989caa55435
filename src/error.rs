use std::{error, fmt, io};

/// Errors raised while constructing bodies, trees or simulation parameters.
#[derive(Debug)]
pub enum Error {
    /// A body was given a mass that is not a positive finite number.
    InvalidMass(f64),
    /// A quadtree leaf must be able to hold at least one point.
    ZeroCapacity,
    /// A tunable parameter is out of its valid range.
    InvalidParameter { name: &'static str, value: f64 },
    Io(io::Error),
    Config(toml::de::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidMass(mass) => write!(f, "mass must be positive and finite, got {mass}"),
            Self::ZeroCapacity => write!(f, "quadtree capacity must be at least 1"),
            Self::InvalidParameter { name, value } => {
                write!(f, "invalid value {value} for parameter `{name}`")
            }
            Self::Io(err) => write!(f, "i/o error: {err}"),
            Self::Config(err) => write!(f, "invalid configuration: {err}"),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Config(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
