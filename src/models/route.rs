use crate::models::*;
use ipnet::IpNet;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::net::IpAddr;

/// Composite identity of a route in the table: `PREFIX_NEXTHOP`.
///
/// ```
/// use lu_translator::models::RouteKey;
///
/// let key = RouteKey::new(&"192.168.35.5/32".parse().unwrap(), &"3.3.3.3".parse().unwrap());
/// assert_eq!(key.as_str(), "192.168.35.5/32_3.3.3.3");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteKey(String);

impl RouteKey {
    /// Keys are built from the parsed prefix and nexthop, so their textual form is canonical:
    /// `2001:DB8::/32` and `2001:db8::/32` name the same route.
    pub fn new(prefix: &IpNet, nexthop: &IpAddr) -> RouteKey {
        RouteKey(format!("{}_{}", prefix, nexthop))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for RouteKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A BGP Labeled-Unicast route as held by the route table and handed to exporters.
///
/// Fields:
/// - `route_key`: `prefix ++ "_" ++ nexthop`, the identity of the route in the table.
/// - `prefix`: the announced network prefix.
/// - `nexthop`: the nexthop the prefix was announced through.
/// - `peer`: the BGP session the route was learned from, when the speaker reported it.
/// - `attributes`: normalized path attributes, `next-hop` included.
/// - `label_stack`: MPLS labels, outermost first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Route {
    pub route_key: RouteKey,
    pub prefix: IpNet,
    pub nexthop: IpAddr,
    pub peer: Option<IpAddr>,
    pub attributes: Attributes,
    pub label_stack: LabelStack,
}

impl Route {
    /// Build a route for one announced `(nexthop, prefix)` pair. The nexthop is injected into the
    /// attributes so that every route carries a self-contained attribute bundle.
    pub fn new(
        prefix: IpNet,
        nexthop: IpAddr,
        peer: Option<IpAddr>,
        mut attributes: Attributes,
        label_stack: LabelStack,
    ) -> Route {
        attributes.next_hop = nexthop;
        Route {
            route_key: RouteKey::new(&prefix, &nexthop),
            prefix,
            nexthop,
            peer,
            attributes,
            label_stack,
        }
    }
}

#[inline(always)]
fn option_to_string_joined<T: Display>(o: &Option<Vec<T>>) -> String {
    if let Some(v) = o {
        v.iter().join(" ")
    } else {
        String::new()
    }
}

impl Display for Route {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let format = format!(
            "{}|{}|{}|{}|{}|{}|{}|{}|{}",
            &self.prefix,
            &self.nexthop,
            DisplayLabels(&self.label_stack),
            &self.attributes.origin,
            &self.attributes.local_pref,
            &self.attributes.multi_exit_disc,
            option_to_string_joined(&self.attributes.as_path),
            option_to_string_joined(&self.attributes.communities),
            self.attributes
                .origin_asn()
                .map(|asn| asn.to_string())
                .unwrap_or_default(),
        );
        write!(f, "{}", format)
    }
}
