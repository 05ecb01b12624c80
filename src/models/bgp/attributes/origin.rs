use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// ORIGIN path attribute, as rendered by ExaBGP (`igp`, `egp` or `incomplete`).
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone)]
pub enum Origin {
    IGP,
    EGP,
    INCOMPLETE,
}

impl Display for Origin {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Origin::IGP => write!(f, "igp"),
            Origin::EGP => write!(f, "egp"),
            Origin::INCOMPLETE => write!(f, "incomplete"),
        }
    }
}

impl FromStr for Origin {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "igp" | "IGP" => Ok(Origin::IGP),
            "egp" | "EGP" => Ok(Origin::EGP),
            "incomplete" | "INCOMPLETE" => Ok(Origin::INCOMPLETE),
            _ => Err(s.to_string()),
        }
    }
}

impl Serialize for Origin {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Origin {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse()
            .map_err(|v| serde::de::Error::custom(format!("unknown origin type: {}", v)))
    }
}
