//! Listing filter engine.
//!
//! Every dimension is optional and the dimensions are ANDed: a property is
//! visible only when each active dimension accepts it. Filtering runs over
//! the page already fetched and never triggers a request.

use crate::models::{ContractType, Property, PropertyStatus, PropertyType};
use std::str::FromStr;
use tracing::debug;

/// Sentinel value that disables a categorical dimension
pub const ALL: &str = "all";

/// A categorical dimension: either disabled or pinned to one value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice<T> {
    All,
    Only(T),
}

impl<T> Default for Choice<T> {
    fn default() -> Self {
        Choice::All
    }
}

impl<T: PartialEq> Choice<T> {
    pub fn accepts(&self, value: &T) -> bool {
        match self {
            Choice::All => true,
            Choice::Only(expected) => expected == value,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Choice::Only(_))
    }
}

impl<T: FromStr> Choice<T> {
    /// `"all"`, an empty string or an unrecognised label disable the dimension
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        if input.is_empty() || input.eq_ignore_ascii_case(ALL) {
            return Choice::All;
        }
        match input.parse() {
            Ok(value) => Choice::Only(value),
            Err(_) => {
                debug!("Unrecognised filter value {:?}, ignoring", input);
                Choice::All
            }
        }
    }
}

/// Inclusive numeric range with open ends.
///
/// A missing lower bound means 0, a missing upper bound means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RangeFilter {
    pub from: Option<f64>,
    pub to: Option<f64>,
}

impl RangeFilter {
    pub fn new(from: Option<f64>, to: Option<f64>) -> Self {
        Self { from, to }
    }

    /// Build from raw text inputs; blank or unparsable input leaves that
    /// boundary open
    pub fn parse(from: &str, to: &str) -> Self {
        Self {
            from: parse_bound(from),
            to: parse_bound(to),
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        let from = self.from.unwrap_or(0.0);
        let to = self.to.unwrap_or(f64::INFINITY);
        from <= value && value <= to
    }

    pub fn is_active(&self) -> bool {
        self.from.is_some() || self.to.is_some()
    }
}

fn parse_bound(input: &str) -> Option<f64> {
    let cleaned: String = input
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_')
        .collect();
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Room-count selector.
///
/// Derived from the apartment's room count; houses and land have no rooms and
/// never satisfy an active selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoomFilter {
    #[default]
    All,
    /// 1 to 4 rooms, matched exactly
    Exactly(u32),
    /// The open-ended "5+" bucket
    FiveOrMore,
}

impl RoomFilter {
    pub const OPEN_BUCKET: u32 = 5;

    pub fn parse(input: &str) -> Self {
        let input = input.trim().trim_end_matches('+');
        if input.eq_ignore_ascii_case(ALL) {
            return RoomFilter::All;
        }
        match input.parse::<u32>() {
            Ok(n) if n >= Self::OPEN_BUCKET => RoomFilter::FiveOrMore,
            Ok(n) if n >= 1 => RoomFilter::Exactly(n),
            _ => RoomFilter::All,
        }
    }

    pub fn accepts(&self, rooms: Option<u32>) -> bool {
        match (self, rooms) {
            (RoomFilter::All, _) => true,
            (_, None) => false,
            (RoomFilter::Exactly(n), Some(rooms)) => rooms == *n,
            (RoomFilter::FiveOrMore, Some(rooms)) => rooms >= Self::OPEN_BUCKET,
        }
    }
}

/// The full set of listing filters
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListingFilter {
    /// Case-insensitive substring of name, description or city
    pub search: String,
    pub property_type: Choice<PropertyType>,
    pub status: Choice<PropertyStatus>,
    pub contract_type: Choice<ContractType>,
    pub price: RangeFilter,
    pub area: RangeFilter,
    pub rooms: RoomFilter,
}

impl ListingFilter {
    pub fn matches(&self, property: &Property) -> bool {
        self.matches_search(property)
            && self.property_type.accepts(&property.property_type())
            && self.status.accepts(&property.status)
            && self.contract_type.accepts(&property.contract_type)
            && self.price.contains(property.price)
            && self.area.contains(property.usable_area)
            && self.rooms.accepts(property.kind.rooms())
    }

    /// Matching properties, in their original order
    pub fn apply<'a>(&self, properties: &'a [Property]) -> Vec<&'a Property> {
        properties.iter().filter(|p| self.matches(p)).collect()
    }

    pub fn is_active(&self) -> bool {
        !self.search.trim().is_empty()
            || self.property_type.is_active()
            || self.status.is_active()
            || self.contract_type.is_active()
            || self.price.is_active()
            || self.area.is_active()
            || self.rooms != RoomFilter::All
    }

    fn matches_search(&self, property: &Property) -> bool {
        let term = self.search.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }
        [
            property.name.as_str(),
            property.description.as_str(),
            property.address.city.as_str(),
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&term))
    }
}
