/*!
The authoritative in-memory table of Labeled-Unicast routes.

The table holds at most one [Route] per [RouteKey]. It is mutated only through [RouteTable::upsert],
[RouteTable::remove], [RouteTable::invalidate_peer] or by applying a [TranslatorEvent] with
[RouteTable::apply]. Readers take a [RouteTable::snapshot] instead of iterating the live map.
*/
use crate::error::TranslatorError;
use crate::models::*;
use crate::parser::exabgp::{Announcement, RawAttributes, Withdrawal};
use crate::parser::{parse_attributes, parse_label_stack, TranslatorEvent};
use ipnet::IpNet;
use log::{debug, info, warn};
use std::collections::HashMap;
use std::net::IpAddr;

/// Outcome of applying one event to the table.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TableChange {
    /// Routes inserted or replaced.
    pub upserted: usize,
    /// Routes removed.
    pub removed: usize,
    /// `(nexthop, prefix)` pairs dropped because the prefix, nexthop or labels did not parse.
    pub skipped: usize,
}

impl TableChange {
    /// Whether the table content changed.
    pub fn is_changed(&self) -> bool {
        self.upserted > 0 || self.removed > 0
    }

    pub fn merge(&mut self, other: TableChange) {
        self.upserted += other.upserted;
        self.removed += other.removed;
        self.skipped += other.skipped;
    }
}

#[derive(Debug, Default, Clone)]
pub struct RouteTable {
    routes: HashMap<RouteKey, Route>,
}

impl RouteTable {
    pub fn new() -> RouteTable {
        RouteTable::default()
    }

    /// Insert a route, replacing any route with the same key wholesale. Returns the replaced route.
    pub fn upsert(&mut self, route: Route) -> Option<Route> {
        self.routes.insert(route.route_key.clone(), route)
    }

    /// Remove the route with the given key. Removing an absent key is a no-op returning `None`.
    pub fn remove(&mut self, key: &RouteKey) -> Option<Route> {
        self.routes.remove(key)
    }

    /// Remove every route of `prefix`, whatever its nexthop.
    pub fn remove_prefix(&mut self, prefix: &IpNet) -> usize {
        let before = self.routes.len();
        self.routes.retain(|_, route| &route.prefix != prefix);
        before - self.routes.len()
    }

    /// Remove every route learned from `peer`. Routes of other sessions are untouched.
    pub fn invalidate_peer(&mut self, peer: IpAddr) -> usize {
        let before = self.routes.len();
        self.routes.retain(|_, route| route.peer != Some(peer));
        before - self.routes.len()
    }

    pub fn get(&self, key: &RouteKey) -> Option<&Route> {
        self.routes.get(key)
    }

    pub fn contains_key(&self, key: &RouteKey) -> bool {
        self.routes.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// An owned copy of all routes, sorted by route key.
    pub fn snapshot(&self) -> Vec<Route> {
        let mut routes: Vec<Route> = self.routes.values().cloned().collect();
        routes.sort_by(|a, b| a.route_key.cmp(&b.route_key));
        routes
    }

    /// Apply one classified event.
    ///
    /// An announcement whose attributes fail to normalize is rejected as a whole and leaves the
    /// table unchanged. A single unparsable prefix, nexthop or label stack only drops that pair.
    pub fn apply(&mut self, event: &TranslatorEvent) -> Result<TableChange, TranslatorError> {
        match event {
            TranslatorEvent::RoutesAnnounced(announcement) => self.announce(announcement),
            TranslatorEvent::RoutesWithdrawn(withdrawal) => Ok(self.withdraw(withdrawal)),
            TranslatorEvent::SessionStateChanged(state) => Ok(self.session_changed(state)),
        }
    }

    fn announce(&mut self, announcement: &Announcement) -> Result<TableChange, TranslatorError> {
        let raw_attributes = match &announcement.attributes {
            Some(value) => RawAttributes::from_value(value)?,
            None => return Err(TranslatorError::MissingAttribute("attribute")),
        };

        let mut change = TableChange::default();
        let mut routes = vec![];
        for (nexthop_str, prefixes) in &announcement.nexthops {
            let nexthop = match parse_nexthop(nexthop_str) {
                Ok(n) => n,
                Err(e) => {
                    warn!("{}, dropping {} announced prefixes", e, prefixes.len());
                    change.skipped += prefixes.len();
                    continue;
                }
            };
            let attributes = parse_attributes(&raw_attributes, nexthop)?;

            for (prefix_str, labels) in prefixes {
                let route = parse_prefix(prefix_str).and_then(|prefix| {
                    Ok(Route::new(
                        prefix,
                        nexthop,
                        announcement.peer,
                        attributes.clone(),
                        parse_label_stack(labels)?,
                    ))
                });
                match route {
                    Ok(route) => routes.push(route),
                    Err(e) => {
                        warn!("{}, dropping announced prefix {}", e, prefix_str);
                        change.skipped += 1;
                    }
                }
            }
        }

        for route in routes {
            debug!("announce {}", route);
            if self.upsert(route).is_some() {
                debug!("replaced previous route");
            }
            change.upserted += 1;
        }
        Ok(change)
    }

    fn withdraw(&mut self, withdrawal: &Withdrawal) -> TableChange {
        let mut change = TableChange::default();
        for (nexthop_str, prefixes) in &withdrawal.nexthops {
            let nexthop = match parse_nexthop(nexthop_str) {
                Ok(n) => n,
                Err(e) => {
                    warn!("{}, dropping {} withdrawn prefixes", e, prefixes.len());
                    change.skipped += prefixes.len();
                    continue;
                }
            };
            for prefix_str in prefixes.keys() {
                let prefix = match parse_prefix(prefix_str) {
                    Ok(p) => p,
                    Err(e) => {
                        warn!("{}, dropping withdrawn prefix", e);
                        change.skipped += 1;
                        continue;
                    }
                };
                let key = RouteKey::new(&prefix, &nexthop);
                match self.remove(&key) {
                    Some(_) => {
                        debug!("withdraw {}", key);
                        change.removed += 1;
                    }
                    None => info!("withdraw of unknown route {}, ignored", key),
                }
            }
        }

        for prefix_str in withdrawal.prefixes.keys() {
            match parse_prefix(prefix_str) {
                Ok(prefix) => {
                    let removed = self.remove_prefix(&prefix);
                    if removed == 0 {
                        info!("withdraw of unknown prefix {}, ignored", prefix);
                    }
                    change.removed += removed;
                }
                Err(e) => {
                    warn!("{}, dropping withdrawn prefix", e);
                    change.skipped += 1;
                }
            }
        }
        change
    }

    fn session_changed(&mut self, state: &SessionState) -> TableChange {
        let mut change = TableChange::default();
        match (&state.state, state.peer) {
            (PeerState::Down, Some(peer)) => {
                change.removed = self.invalidate_peer(peer);
                info!(
                    "session with {} went down, removed {} routes learned from it",
                    peer, change.removed
                );
            }
            (PeerState::Down, None) => {
                warn!("session down without peer address, route table left unchanged");
            }
            (s, peer) => {
                info!("session with {:?} is {}", peer, s);
            }
        }
        change
    }
}

fn parse_prefix(prefix: &str) -> Result<IpNet, TranslatorError> {
    prefix
        .parse::<IpNet>()
        .map_err(|_| TranslatorError::InvalidPrefix(prefix.to_string()))
}

fn parse_nexthop(nexthop: &str) -> Result<IpAddr, TranslatorError> {
    nexthop
        .parse::<IpAddr>()
        .map_err(|_| TranslatorError::InvalidNexthop(nexthop.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::exabgp::{NexthopMap, PrefixLabels, RawLabel, RawLabels};
    use serde_json::json;

    fn labels(values: &[u64]) -> RawLabels {
        RawLabels {
            label: values.iter().copied().map(RawLabel::Single).collect(),
        }
    }

    /// Build a nexthop map from `(nexthop, prefix, label)` triples.
    fn nexthops(entries: &[(&str, &str, u64)]) -> NexthopMap {
        let mut map = NexthopMap::new();
        for (nh, prefix, label) in entries {
            map.entry(nh.to_string())
                .or_default()
                .insert(prefix.to_string(), labels(&[*label]));
        }
        map
    }

    fn announce(peer: &str, local_pref: u32, entries: &[(&str, &str, u64)]) -> TranslatorEvent {
        TranslatorEvent::RoutesAnnounced(Announcement {
            peer: Some(peer.parse().unwrap()),
            attributes: Some(json!({"origin": "igp", "med": 0, "local-preference": local_pref})),
            nexthops: nexthops(entries),
        })
    }

    fn withdraw(entries: &[(&str, &str, u64)]) -> TranslatorEvent {
        TranslatorEvent::RoutesWithdrawn(Withdrawal {
            peer: None,
            nexthops: nexthops(entries),
            prefixes: PrefixLabels::new(),
        })
    }

    fn key(prefix: &str, nexthop: &str) -> RouteKey {
        RouteKey::new(&prefix.parse().unwrap(), &nexthop.parse().unwrap())
    }

    #[test]
    fn test_reannounce_replaces() {
        let mut table = RouteTable::new();
        table
            .apply(&announce("10.1.1.1", 100, &[("3.3.3.3", "10.0.0.1/32", 18)]))
            .unwrap();
        table
            .apply(&announce("10.1.1.1", 200, &[("3.3.3.3", "10.0.0.1/32", 19)]))
            .unwrap();
        assert_eq!(table.len(), 1);
        let route = table.get(&key("10.0.0.1/32", "3.3.3.3")).unwrap();
        assert_eq!(route.attributes.local_pref, 200);
        assert_eq!(route.label_stack.as_slice(), &[Label::new(19)]);
    }

    #[test]
    fn test_multiple_prefixes_per_nexthop() {
        let mut table = RouteTable::new();
        let change = table
            .apply(&announce(
                "10.1.1.1",
                100,
                &[("3.3.3.3", "10.0.0.1/32", 18), ("3.3.3.3", "10.0.0.2/32", 19)],
            ))
            .unwrap();
        assert_eq!(change.upserted, 2);
        assert_eq!(table.len(), 2);
        assert!(table.contains_key(&key("10.0.0.1/32", "3.3.3.3")));
        assert!(table.contains_key(&key("10.0.0.2/32", "3.3.3.3")));
    }

    #[test]
    fn test_withdraw_removes_exactly_one() {
        let mut table = RouteTable::new();
        table
            .apply(&announce(
                "10.1.1.1",
                100,
                &[
                    ("3.3.3.3", "10.0.0.1/32", 18),
                    ("3.3.3.3", "10.0.0.2/32", 19),
                    ("4.4.4.4", "10.0.0.1/32", 20),
                ],
            ))
            .unwrap();
        let change = table
            .apply(&withdraw(&[("3.3.3.3", "10.0.0.1/32", 18)]))
            .unwrap();
        assert_eq!(change.removed, 1);
        assert_eq!(table.len(), 2);
        assert!(!table.contains_key(&key("10.0.0.1/32", "3.3.3.3")));
        assert!(table.contains_key(&key("10.0.0.1/32", "4.4.4.4")));
    }

    #[test]
    fn test_withdraw_unknown_is_noop() {
        let mut table = RouteTable::new();
        table
            .apply(&announce("10.1.1.1", 100, &[("3.3.3.3", "10.0.0.1/32", 18)]))
            .unwrap();
        let before = table.snapshot();
        let change = table
            .apply(&withdraw(&[("5.5.5.5", "10.9.9.9/32", 18)]))
            .unwrap();
        assert_eq!(change, TableChange::default());
        assert_eq!(table.snapshot(), before);
    }

    #[test]
    fn test_rejected_announce_leaves_table() {
        let mut table = RouteTable::new();
        let event = TranslatorEvent::RoutesAnnounced(Announcement {
            peer: None,
            attributes: Some(json!({"med": 0, "local-preference": 100})),
            nexthops: nexthops(&[("3.3.3.3", "10.0.0.1/32", 18)]),
        });
        let err = table.apply(&event).unwrap_err();
        assert!(err.is_attribute_error());
        assert!(table.is_empty());
    }

    #[test]
    fn test_invalid_prefix_skipped() {
        let mut table = RouteTable::new();
        let change = table
            .apply(&announce(
                "10.1.1.1",
                100,
                &[
                    ("3.3.3.3", "not-a-prefix", 18),
                    ("3.3.3.3", "10.0.0.1/32", 18),
                    ("bogus", "10.0.0.2/32", 18),
                ],
            ))
            .unwrap();
        assert_eq!(change.upserted, 1);
        assert_eq!(change.skipped, 2);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_session_down_is_scoped_to_peer() {
        let mut table = RouteTable::new();
        table
            .apply(&announce("10.1.1.1", 100, &[("3.3.3.3", "10.0.0.1/32", 18)]))
            .unwrap();
        table
            .apply(&announce("10.2.2.2", 100, &[("4.4.4.4", "10.0.0.2/32", 18)]))
            .unwrap();

        let up = TranslatorEvent::SessionStateChanged(SessionState {
            peer: Some("10.1.1.1".parse().unwrap()),
            state: PeerState::Up,
        });
        assert!(!table.apply(&up).unwrap().is_changed());
        assert_eq!(table.len(), 2);

        let down = TranslatorEvent::SessionStateChanged(SessionState {
            peer: Some("10.1.1.1".parse().unwrap()),
            state: PeerState::Down,
        });
        assert_eq!(table.apply(&down).unwrap().removed, 1);
        assert_eq!(table.len(), 1);
        assert!(table.contains_key(&key("10.0.0.2/32", "4.4.4.4")));

        let anonymous_down = TranslatorEvent::SessionStateChanged(SessionState {
            peer: None,
            state: PeerState::Down,
        });
        assert!(!table.apply(&anonymous_down).unwrap().is_changed());
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_withdraw_bare_prefix() {
        let mut table = RouteTable::new();
        table
            .apply(&announce(
                "10.1.1.1",
                100,
                &[
                    ("3.3.3.3", "10.0.0.1/32", 18),
                    ("4.4.4.4", "10.0.0.1/32", 19),
                    ("4.4.4.4", "10.0.0.2/32", 20),
                ],
            ))
            .unwrap();
        let mut prefixes = PrefixLabels::new();
        prefixes.insert("10.0.0.1/32".to_string(), labels(&[18]));
        let change = table
            .apply(&TranslatorEvent::RoutesWithdrawn(Withdrawal {
                peer: None,
                nexthops: NexthopMap::new(),
                prefixes,
            }))
            .unwrap();
        assert_eq!(change.removed, 2);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_snapshot_sorted() {
        let mut table = RouteTable::new();
        table
            .apply(&announce(
                "10.1.1.1",
                100,
                &[("3.3.3.3", "10.0.0.2/32", 18), ("3.3.3.3", "10.0.0.1/32", 19)],
            ))
            .unwrap();
        let keys: Vec<String> = table
            .snapshot()
            .iter()
            .map(|r| r.route_key.to_string())
            .collect();
        assert_eq!(keys, vec!["10.0.0.1/32_3.3.3.3", "10.0.0.2/32_3.3.3.3"]);
    }
}
