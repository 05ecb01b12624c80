/*!
error module defines the error types used in lu-translator.
*/
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TranslatorError {
    /// A line read from the input stream is not a valid JSON document.
    ///
    /// ## Occurs during:
    ///  - Decoding of a line by the message reader
    ///  - Typed decoding of a JSON value into an ExaBGP message
    #[error("invalid json: {0}")]
    InvalidJson(#[from] serde_json::Error),
    /// The message is valid JSON but lacks keys required by its declared `type`.
    ///
    /// ## Occurs during:
    ///  - Classification of an `update` or `state` message
    #[error("malformed message: {0}")]
    MalformedMessage(String),
    /// An announced or withdrawn prefix could not be parsed as an IP network.
    #[error("unable to parse prefix: {0:?}")]
    InvalidPrefix(String),
    /// An announced or withdrawn nexthop could not be parsed as an IP address.
    #[error("unable to parse nexthop: {0:?}")]
    InvalidNexthop(String),
    /// A mandatory path attribute is missing from the update's attribute block.
    ///
    /// ## Occurs during:
    ///  - Normalization of announced attributes
    #[error("missing mandatory attribute {0}")]
    MissingAttribute(&'static str),
    /// A path attribute or label is present but its value cannot be normalized.
    #[error("invalid value {value:?} for attribute {name}")]
    InvalidAttribute { name: &'static str, value: String },
    /// The input stream failed. This ends ingestion.
    #[error("input stream fault: {0}")]
    StreamFault(#[source] io::Error),
    /// Writing a route snapshot to the downstream sink failed.
    #[error("export failed: {0}")]
    ExportError(#[source] io::Error),
}

impl TranslatorError {
    /// Returns true for errors that must stop the ingestion loop.
    pub fn is_fatal(&self) -> bool {
        matches!(self, TranslatorError::StreamFault(_))
    }

    /// Returns true for errors caused by a mandatory or malformed path attribute.
    pub fn is_attribute_error(&self) -> bool {
        matches!(
            self,
            TranslatorError::MissingAttribute(_) | TranslatorError::InvalidAttribute { .. }
        )
    }
}
