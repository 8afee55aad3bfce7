#[derive(Debug)]
pub enum Error {
    InvalidParameters(String),
    InvalidIdentity {
        name: String,
        msg: String,
    },
    LateJoin {
        peer: usize,
    },
    UnknownPeer {
        peer: usize,
    },
    Protocol(String),
    Frame(String),
    Io(std::io::Error),
}

impl Error {
    pub fn invalid_parameters(msg: &str) -> Self {
        Error::InvalidParameters(msg.to_string())
    }

    pub fn invalid_identity(name: &str, msg: &str) -> Self {
        Error::InvalidIdentity {
            name: name.to_string(),
            msg: msg.to_string(),
        }
    }

    pub fn protocol(msg: &str) -> Self {
        Error::Protocol(msg.to_string())
    }

    pub fn frame(msg: &str) -> Self {
        Error::Frame(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidParameters(msg) => write!(f, "Invalid parameters: {}", msg),
            Error::InvalidIdentity { name, msg } => {
                write!(f, "Invalid worker identity {:?}: {}", name, msg)
            }
            Error::LateJoin { peer } => {
                write!(f, "Join from peer {} after the quorum was met", peer)
            }
            Error::UnknownPeer { peer } => {
                write!(f, "Message from peer {} outside the joined worker set", peer)
            }
            Error::Protocol(msg) => write!(f, "Protocol error: {}", msg),
            Error::Frame(msg) => write!(f, "Malformed frame: {}", msg),
            Error::Io(err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}
