/*!
Parsing of speaker messages: classification of decoded JSON documents and normalization of their
path attributes.
*/
pub mod attributes;
pub mod exabgp;

pub use attributes::{parse_as_path, parse_attributes, parse_communities, parse_label_stack};
pub use exabgp::{classify, Announcement, ExabgpMessage, TranslatorEvent, Withdrawal};
