/*!
Normalization of ExaBGP path attributes and label stacks into the canonical route schema.
*/
use crate::error::TranslatorError;
use crate::models::*;
use crate::parser::exabgp::{RawAsPath, RawAttributes, RawLabel, RawLabels};
use std::net::{IpAddr, Ipv4Addr};

/// Normalize a raw attribute block. `next_hop` is the nexthop of the announced group.
///
/// `origin`, `med` and `local-preference` are mandatory; every other attribute is optional and
/// normalized to `None` when absent.
pub fn parse_attributes(
    raw: &RawAttributes,
    next_hop: IpAddr,
) -> Result<Attributes, TranslatorError> {
    let origin = match &raw.origin {
        Some(o) => o
            .parse::<Origin>()
            .map_err(|value| TranslatorError::InvalidAttribute {
                name: "origin",
                value,
            })?,
        None => return Err(TranslatorError::MissingAttribute("origin")),
    };
    let multi_exit_disc = raw.med.ok_or(TranslatorError::MissingAttribute("med"))?;
    let local_pref = raw
        .local_preference
        .ok_or(TranslatorError::MissingAttribute("local-preference"))?;

    let as_path = raw.as_path.as_ref().map(parse_as_path).transpose()?;
    let communities = raw.community.as_deref().map(parse_communities);
    let originator_id = raw
        .originator_id
        .as_deref()
        .map(|id| parse_ipv4("originator-id", id))
        .transpose()?;
    let cluster_list = raw
        .cluster_list
        .as_ref()
        .map(|ids| {
            ids.iter()
                .map(|id| parse_ipv4("cluster-list", id))
                .collect::<Result<Vec<_>, _>>()
        })
        .transpose()?;

    Ok(Attributes {
        origin,
        multi_exit_disc,
        local_pref,
        as_path,
        communities,
        originator_id,
        cluster_list,
        next_hop,
    })
}

/// Parse an AS path into a single AS-SEQUENCE segment.
///
/// Accepts `"100 200 300"`, the bracketed `"[ 100 200 300 ]"` rendering and a JSON list of
/// numbers. AS-SET and confederation segments are not supported.
pub fn parse_as_path(raw: &RawAsPath) -> Result<Vec<AsPathSegment>, TranslatorError> {
    let asns = match raw {
        RawAsPath::List(asns) => asns.clone(),
        RawAsPath::Text(text) => text
            .split(|c: char| c.is_whitespace() || c == '[' || c == ']')
            .filter(|token| !token.is_empty())
            .map(|token| {
                token
                    .parse::<Asn>()
                    .map_err(|_| TranslatorError::InvalidAttribute {
                        name: "as-path",
                        value: text.clone(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?,
    };
    Ok(vec![AsPathSegment::AsSequence(asns)])
}

/// Map `[semantics, as-number]` pairs to communities, preserving order.
pub fn parse_communities(raw: &[(u32, u32)]) -> Vec<Community> {
    raw.iter().copied().map(Community::from).collect()
}

/// Map `{"label": [18, ...]}` to a label stack, outermost label first. Nested label lists are
/// flattened in order.
pub fn parse_label_stack(raw: &RawLabels) -> Result<LabelStack, TranslatorError> {
    let mut stack = LabelStack::new();
    for entry in &raw.label {
        match entry {
            RawLabel::Single(v) => stack.push(parse_label(*v)?),
            RawLabel::Nested(vs) => {
                for v in vs {
                    stack.push(parse_label(*v)?);
                }
            }
        }
    }
    Ok(stack)
}

fn parse_label(value: u64) -> Result<Label, TranslatorError> {
    match u32::try_from(value) {
        Ok(v) if v <= MAX_LABEL_VALUE => Ok(Label::new(v)),
        _ => Err(TranslatorError::InvalidAttribute {
            name: "label",
            value: value.to_string(),
        }),
    }
}

fn parse_ipv4(name: &'static str, value: &str) -> Result<Ipv4Addr, TranslatorError> {
    value
        .parse::<Ipv4Addr>()
        .map_err(|_| TranslatorError::InvalidAttribute {
            name,
            value: value.to_string(),
        })
}
