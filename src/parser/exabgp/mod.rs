/*!
Classification of ExaBGP messages into typed translator events.

A message is first decoded into an [ExabgpMessage], then [classify] turns it into zero or more
[TranslatorEvent]s. Only the configured Labeled-Unicast family is looked at; any other family
or message type yields no event.
*/
use crate::error::TranslatorError;
use crate::models::{PeerState, SessionState};
use log::debug;
use serde_json::Value;
use std::net::IpAddr;

pub mod messages;

pub use messages::*;

/// Announced NLRI of one update, together with the update's shared attribute block.
#[derive(Debug, Clone, PartialEq)]
pub struct Announcement {
    pub peer: Option<IpAddr>,
    /// Raw `attribute` block; `None` if the update carried none.
    pub attributes: Option<Value>,
    pub nexthops: NexthopMap,
}

/// Withdrawn NLRI of one update.
///
/// Withdrawals are normally keyed by nexthop like announcements. Some speaker versions omit the
/// nexthop level; such prefixes end up in `prefixes` and withdraw every route of that prefix.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Withdrawal {
    pub peer: Option<IpAddr>,
    pub nexthops: NexthopMap,
    pub prefixes: PrefixLabels,
}

impl Withdrawal {
    /// Number of `(nexthop, prefix)` pairs and bare prefixes carried.
    pub fn len(&self) -> usize {
        self.nexthops.values().map(|p| p.len()).sum::<usize>() + self.prefixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TranslatorEvent {
    SessionStateChanged(SessionState),
    RoutesAnnounced(Announcement),
    RoutesWithdrawn(Withdrawal),
}

/// Classify one message into events for the `nlri` address family.
///
/// Each returned item is independent: a section that fails to decode is reported as an `Err`
/// item while the other sections of the same message still produce events. Withdrawals come
/// before announcements, so a message that withdraws and re-announces a key leaves it present.
/// A prefix found in both sections of one update is therefore treated as announced.
pub fn classify(
    message: &ExabgpMessage,
    nlri: &str,
) -> Vec<Result<TranslatorEvent, TranslatorError>> {
    match message {
        ExabgpMessage::State { neighbor } => {
            debug!(
                "session state of peer {:?} (asn {:?}) changed to {}",
                neighbor.peer(),
                neighbor.asn.peer,
                neighbor.state
            );
            vec![Ok(TranslatorEvent::SessionStateChanged(SessionState {
                peer: neighbor.peer(),
                state: PeerState::from(neighbor.state.as_str()),
            }))]
        }
        ExabgpMessage::Update { neighbor } => {
            let update = match (&neighbor.message.update, &neighbor.message.eor) {
                (Some(update), _) => update,
                (None, Some(eor)) => {
                    debug!("end-of-rib from peer {:?}: {}", neighbor.peer(), eor);
                    return vec![];
                }
                (None, None) => {
                    return vec![Err(TranslatorError::MalformedMessage(
                        "update message without update or eor body".to_string(),
                    ))]
                }
            };

            let mut events = vec![];
            if let Some(section) = update.withdrawn(nlri) {
                events.push(decode_withdrawal(section).map(|(nexthops, prefixes)| {
                    TranslatorEvent::RoutesWithdrawn(Withdrawal {
                        peer: neighbor.peer(),
                        nexthops,
                        prefixes,
                    })
                }));
            }
            if let Some(section) = update.announced(nlri) {
                events.push(decode_family::<NexthopMap>(section).map(|nexthops| {
                    TranslatorEvent::RoutesAnnounced(Announcement {
                        peer: neighbor.peer(),
                        attributes: update.attribute.clone(),
                        nexthops,
                    })
                }));
            }
            if events.is_empty() {
                debug!("update carries no {} nlri, ignored", nlri);
            }
            events
        }
        ExabgpMessage::Other => vec![],
    }
}

/// Split a withdraw section into nexthop groups and bare prefixes.
///
/// A key containing `/` is a prefix withdrawn without nexthop; any other key is a nexthop whose
/// value is a `prefix → labels` map.
fn decode_withdrawal(section: &Value) -> Result<(NexthopMap, PrefixLabels), TranslatorError> {
    let entries = section.as_object().ok_or_else(|| {
        TranslatorError::MalformedMessage(format!("withdraw section is not an object: {}", section))
    })?;

    let mut nexthops = NexthopMap::new();
    let mut prefixes = PrefixLabels::new();
    for (key, value) in entries {
        if key.contains('/') {
            prefixes.insert(key.clone(), decode_family(value)?);
        } else {
            nexthops.insert(key.clone(), decode_family(value)?);
        }
    }
    Ok((nexthops, prefixes))
}
