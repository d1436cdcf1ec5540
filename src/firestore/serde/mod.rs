//! Conversion of Rust values into Firestore documents.

mod serialize;

use std::fmt;

use serde::ser;

pub(crate) use serialize::serialize_to_document;

#[derive(Debug)]
pub enum Error {
    Message(String),
    /// Only values that serialize to a map (structs, maps) can be stored as
    /// a document.
    InvalidDocument,
    NonStringKey,
    Unsupported(&'static str),
}

impl ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Self::Message(msg.to_string())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Message(msg) => formatter.write_str(msg),
            Self::InvalidDocument => formatter.write_str("a document must serialize to a map"),
            Self::NonStringKey => formatter.write_str("map keys must be strings"),
            Self::Unsupported(what) => write!(formatter, "{what} cannot be stored in Firestore"),
        }
    }
}

impl std::error::Error for Error {}
