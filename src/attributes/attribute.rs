//! A single named character attribute

use serde::{Deserialize, Serialize};

/// Attribute short names, in canonical order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeName {
    Phy,
    Mag,
    End,
    Agl,
    Ldr,
    Lck,
}

impl AttributeName {
    pub const ALL: [AttributeName; 6] = [
        AttributeName::Phy,
        AttributeName::Mag,
        AttributeName::End,
        AttributeName::Agl,
        AttributeName::Ldr,
        AttributeName::Lck,
    ];

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            AttributeName::Phy => "Physical",
            AttributeName::Mag => "Magic",
            AttributeName::End => "Endurance",
            AttributeName::Agl => "Agility",
            AttributeName::Ldr => "Leadership",
            AttributeName::Lck => "Luck",
        }
    }

    pub fn short_name(&self) -> &'static str {
        match self {
            AttributeName::Phy => "phy",
            AttributeName::Mag => "mag",
            AttributeName::End => "end",
            AttributeName::Agl => "agl",
            AttributeName::Ldr => "ldr",
            AttributeName::Lck => "lck",
        }
    }
}

impl std::str::FromStr for AttributeName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AttributeName::ALL
            .into_iter()
            .find(|name| name.short_name() == s)
            .ok_or_else(|| format!("Unknown attribute: {}", s))
    }
}

impl std::fmt::Display for AttributeName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Basic character attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: AttributeName,
    pub value: i64,
}

impl Attribute {
    pub fn new(name: AttributeName, value: i64) -> Self {
        Self { name, value }
    }

    /// Scale the value by `factor` (floored) and return the change
    pub fn scale(&mut self, factor: f64) -> i64 {
        let first = self.value;
        self.value = (self.value as f64 * factor).floor() as i64;
        self.value - first
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_floors_and_returns_delta() {
        let mut attr = Attribute::new(AttributeName::Phy, 7);
        let delta = attr.scale(1.5);
        assert_eq!(attr.value, 10);
        assert_eq!(delta, 3);
    }

    #[test]
    fn test_scale_down_gives_negative_delta() {
        let mut attr = Attribute::new(AttributeName::Agl, 9);
        let delta = attr.scale(0.5);
        assert_eq!(attr.value, 4);
        assert_eq!(delta, -5);
    }

    #[test]
    fn test_scale_zero_stays_zero() {
        let mut attr = Attribute::new(AttributeName::Lck, 0);
        assert_eq!(attr.scale(3.75), 0);
        assert_eq!(attr.value, 0);
    }

    #[test]
    fn test_labels() {
        assert_eq!(AttributeName::End.label(), "Endurance");
        assert_eq!(AttributeName::Ldr.short_name(), "ldr");
        assert_eq!("agl".parse::<AttributeName>(), Ok(AttributeName::Agl));
        assert!("strength".parse::<AttributeName>().is_err());
    }
}
