//! The fixed six-attribute set every combatant carries, and partial value
//! maps used by templates and buffs

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::attributes::attribute::{Attribute, AttributeName};

/// Standard list of character attributes. Always fully populated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeSet {
    pub phy: Attribute,
    pub mag: Attribute,
    pub end: Attribute,
    pub agl: Attribute,
    pub ldr: Attribute,
    pub lck: Attribute,
}

impl Default for AttributeSet {
    fn default() -> Self {
        Self::from_raw([0; 6])
    }
}

impl AttributeSet {
    /// Build from raw values in canonical order (phy, mag, end, agl, ldr, lck)
    pub fn from_raw(values: [i64; 6]) -> Self {
        let [phy, mag, end, agl, ldr, lck] = values;
        Self {
            phy: Attribute::new(AttributeName::Phy, phy),
            mag: Attribute::new(AttributeName::Mag, mag),
            end: Attribute::new(AttributeName::End, end),
            agl: Attribute::new(AttributeName::Agl, agl),
            ldr: Attribute::new(AttributeName::Ldr, ldr),
            lck: Attribute::new(AttributeName::Lck, lck),
        }
    }

    /// Build from a partial value map; missing attributes are zero
    pub fn from_values(values: &AttributeValues) -> Self {
        let mut set = Self::default();
        for (name, value) in values.iter() {
            set.get_mut(name).value = value;
        }
        set
    }

    /// Build from pre-made attributes, keyed by each attribute's own name
    pub fn from_attributes(attributes: [Attribute; 6]) -> Self {
        let mut set = Self::default();
        for attr in attributes {
            *set.get_mut(attr.name) = attr;
        }
        set
    }

    pub fn get(&self, name: AttributeName) -> &Attribute {
        match name {
            AttributeName::Phy => &self.phy,
            AttributeName::Mag => &self.mag,
            AttributeName::End => &self.end,
            AttributeName::Agl => &self.agl,
            AttributeName::Ldr => &self.ldr,
            AttributeName::Lck => &self.lck,
        }
    }

    pub fn get_mut(&mut self, name: AttributeName) -> &mut Attribute {
        match name {
            AttributeName::Phy => &mut self.phy,
            AttributeName::Mag => &mut self.mag,
            AttributeName::End => &mut self.end,
            AttributeName::Agl => &mut self.agl,
            AttributeName::Ldr => &mut self.ldr,
            AttributeName::Lck => &mut self.lck,
        }
    }

    pub fn value(&self, name: AttributeName) -> i64 {
        self.get(name).value
    }

    /// Attributes in canonical order
    pub fn iter(&self) -> impl Iterator<Item = &Attribute> {
        AttributeName::ALL.into_iter().map(move |name| self.get(name))
    }

    /// Sum of all attribute values
    pub fn total(&self) -> i64 {
        self.iter().map(|a| a.value).sum()
    }

    /// Number of attributes in the set
    pub fn len(&self) -> usize {
        AttributeName::ALL.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Names of attributes with a positive value, highest value first.
    /// Ties keep canonical order.
    pub fn ranked(&self) -> Vec<AttributeName> {
        let mut names: Vec<AttributeName> = AttributeName::ALL
            .into_iter()
            .filter(|&name| self.value(name) > 0)
            .collect();
        names.sort_by(|&a, &b| self.value(b).cmp(&self.value(a)));
        names
    }
}

/// Partial attribute values, used for templates and buff deltas
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, i64>", into = "BTreeMap<String, i64>")]
pub struct AttributeValues(BTreeMap<AttributeName, i64>);

impl TryFrom<BTreeMap<String, i64>> for AttributeValues {
    type Error = String;

    fn try_from(raw: BTreeMap<String, i64>) -> Result<Self, Self::Error> {
        raw.into_iter()
            .map(|(key, value)| key.parse::<AttributeName>().map(|name| (name, value)))
            .collect()
    }
}

impl From<AttributeValues> for BTreeMap<String, i64> {
    fn from(values: AttributeValues) -> Self {
        values
            .iter()
            .map(|(name, value)| (name.short_name().to_string(), value))
            .collect()
    }
}

impl AttributeValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, name: AttributeName, value: i64) -> Self {
        self.0.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: AttributeName, value: i64) {
        self.0.insert(name, value);
    }

    pub fn get(&self, name: AttributeName) -> Option<i64> {
        self.0.get(&name).copied()
    }

    /// Entries in canonical attribute order
    pub fn iter(&self) -> impl Iterator<Item = (AttributeName, i64)> + '_ {
        self.0.iter().map(|(&name, &value)| (name, value))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl FromIterator<(AttributeName, i64)> for AttributeValues {
    fn from_iter<I: IntoIterator<Item = (AttributeName, i64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
