/*!
Typed view of the JSON documents written by the ExaBGP JSON encoder.

Only the fields the translator consumes are modelled. Address-family sections of an update are
kept as raw [Value]s so that families with a different shape never fail decoding of the message;
only the configured family is decoded further (see [decode_family]).
*/
use crate::error::TranslatorError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::net::IpAddr;

/// One decoded message, dispatched on its `type` field.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ExabgpMessage {
    /// Session state change, e.g. `{"type":"state","neighbor":{"state":"up",...}}`
    State { neighbor: StateNeighbor },
    /// Routing update, e.g. `{"type":"update","neighbor":{"message":{"update":{...}}}}`
    Update { neighbor: UpdateNeighbor },
    /// Any other message type (`notification`, `open`, `keepalive`, ...).
    #[serde(other)]
    Other,
}

impl ExabgpMessage {
    /// Decode a JSON document into a typed message. Missing keys required by the declared `type`
    /// are reported as [TranslatorError::MalformedMessage].
    pub fn from_value(value: Value) -> Result<ExabgpMessage, TranslatorError> {
        serde_json::from_value(value).map_err(|e| TranslatorError::MalformedMessage(e.to_string()))
    }
}

/// Addresses of the BGP session a message belongs to.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Address {
    pub local: Option<IpAddr>,
    pub peer: Option<IpAddr>,
}

/// AS numbers of the BGP session, rendered as strings or numbers depending on the speaker version.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct SessionAsn {
    pub local: Option<Value>,
    pub peer: Option<Value>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StateNeighbor {
    pub ip: Option<IpAddr>,
    #[serde(default)]
    pub address: Address,
    #[serde(default)]
    pub asn: SessionAsn,
    pub state: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateNeighbor {
    pub ip: Option<IpAddr>,
    #[serde(default)]
    pub address: Address,
    #[serde(default)]
    pub asn: SessionAsn,
    pub message: NeighborMessage,
}

/// Peer address of a session: `address.peer` when present, `ip` otherwise.
fn peer_of(ip: Option<IpAddr>, address: &Address) -> Option<IpAddr> {
    address.peer.or(ip)
}

impl StateNeighbor {
    pub fn peer(&self) -> Option<IpAddr> {
        peer_of(self.ip, &self.address)
    }
}

impl UpdateNeighbor {
    pub fn peer(&self) -> Option<IpAddr> {
        peer_of(self.ip, &self.address)
    }
}

/// Body of an update message: either an UPDATE or an End-of-RIB marker.
#[derive(Debug, Serialize, Deserialize)]
pub struct NeighborMessage {
    pub update: Option<RawUpdate>,
    pub eor: Option<Value>,
}

/// UPDATE content. `announce` and `withdraw` map an address-family key (`"ipv4 nlri-mpls"`) to the
/// family's NLRI structure.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct RawUpdate {
    pub attribute: Option<Value>,
    pub announce: Option<BTreeMap<String, Value>>,
    pub withdraw: Option<BTreeMap<String, Value>>,
}

impl RawUpdate {
    pub fn announced(&self, family: &str) -> Option<&Value> {
        self.announce.as_ref().and_then(|m| m.get(family))
    }

    pub fn withdrawn(&self, family: &str) -> Option<&Value> {
        self.withdraw.as_ref().and_then(|m| m.get(family))
    }
}

/// Path attributes as rendered by ExaBGP. Every field is optional here; the normalizer decides
/// which ones are mandatory.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RawAttributes {
    pub origin: Option<String>,
    pub med: Option<u32>,
    pub local_preference: Option<u32>,
    pub as_path: Option<RawAsPath>,
    pub community: Option<Vec<(u32, u32)>>,
    pub originator_id: Option<String>,
    pub cluster_list: Option<Vec<String>>,
}

impl RawAttributes {
    pub fn from_value(value: &Value) -> Result<RawAttributes, TranslatorError> {
        RawAttributes::deserialize(value).map_err(|e| TranslatorError::InvalidAttribute {
            name: "attribute",
            value: e.to_string(),
        })
    }
}

/// AS-PATH as a whitespace separated string (`"100 200"`) or as a list of numbers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawAsPath {
    Text(String),
    List(Vec<u32>),
}

/// One entry of a label list. Some speaker versions nest labels one level deeper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawLabel {
    Single(u64),
    Nested(Vec<u64>),
}

/// Per-prefix NLRI payload, e.g. `{"label":[18]}`.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawLabels {
    #[serde(default)]
    pub label: Vec<RawLabel>,
}

/// `prefix → labels` map of one nexthop group.
pub type PrefixLabels = BTreeMap<String, RawLabels>;

/// `nexthop → prefix → labels` structure of a Labeled-Unicast family section.
pub type NexthopMap = BTreeMap<String, PrefixLabels>;

/// Decode the structure of one address-family section.
pub fn decode_family<T: DeserializeOwned>(section: &Value) -> Result<T, TranslatorError> {
    T::deserialize(section).map_err(|e| TranslatorError::MalformedMessage(e.to_string()))
}
