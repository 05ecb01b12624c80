//! Canonical path attribute bundle of a Labeled-Unicast route.
mod aspath;
mod origin;

pub use aspath::*;
pub use origin::*;

use crate::models::Community;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};

/// Path attributes of a normalized route.
///
/// Mandatory attributes are plain fields. Optional attributes are `Option`s and serialize as
/// `null` when the update did not carry them, so consumers see the same shape either way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Attributes {
    pub origin: Origin,
    pub multi_exit_disc: u32,
    pub local_pref: u32,
    pub as_path: Option<Vec<AsPathSegment>>,
    pub communities: Option<Vec<Community>>,
    pub originator_id: Option<Ipv4Addr>,
    pub cluster_list: Option<Vec<Ipv4Addr>>,
    pub next_hop: IpAddr,
}

impl Attributes {
    /// Iterate over all ASNs of the AS path, first hop first.
    pub fn iter_asns(&self) -> impl Iterator<Item = Asn> + '_ {
        self.as_path
            .iter()
            .flatten()
            .flat_map(|segment| segment.as_ref().iter().copied())
    }

    /// The originating AS, i.e. the last ASN of the path, if any.
    pub fn origin_asn(&self) -> Option<Asn> {
        self.iter_asns().last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn attributes() -> Attributes {
        Attributes {
            origin: Origin::IGP,
            multi_exit_disc: 0,
            local_pref: 100,
            as_path: None,
            communities: None,
            originator_id: None,
            cluster_list: None,
            next_hop: "3.3.3.3".parse().unwrap(),
        }
    }

    #[test]
    fn test_absent_optionals_are_null() {
        let value = serde_json::to_value(attributes()).unwrap();
        assert_eq!(
            value,
            json!({
                "origin": "igp",
                "multi-exit-disc": 0,
                "local-pref": 100,
                "as-path": null,
                "communities": null,
                "originator-id": null,
                "cluster-list": null,
                "next-hop": "3.3.3.3",
            })
        );
    }

    #[test]
    fn test_origin_asn() {
        let mut attrs = attributes();
        assert_eq!(attrs.origin_asn(), None);
        attrs.as_path = Some(vec![AsPathSegment::sequence([100, 200])]);
        assert_eq!(attrs.origin_asn(), Some(200));
        assert_eq!(attrs.iter_asns().collect::<Vec<_>>(), vec![100, 200]);
    }
}
