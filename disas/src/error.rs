use std::{fmt, io};

#[derive(Debug)]
pub enum Error {
    Input { path: String, source: io::Error },
    Output { path: String, source: io::Error },
    Walk(armdis::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Input { path, source } if source.kind() == io::ErrorKind::NotFound => {
                write!(fmt, "The file \"{path}\" doesn't exist. Aborting.")
            }
            Self::Input { path, source } => {
                write!(fmt, "The file \"{path}\" could not be read ({source}). Aborting.")
            }
            Self::Output { path, .. } => {
                write!(fmt, "The file \"{path}\" could not be created. Aborting.")
            }
            Self::Walk(err) => write!(fmt, "Disassembly failed: {err}."),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Input { source, .. } | Self::Output { source, .. } => Some(source),
            Self::Walk(err) => Some(err),
        }
    }
}

impl From<armdis::Error> for Error {
    fn from(err: armdis::Error) -> Self {
        Self::Walk(err)
    }
}
