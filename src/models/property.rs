use serde::{Deserialize, Serialize};

use super::{PropertyId, UserId};

/// Postal address of a listing
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub house_number: Option<String>,
    pub city: String,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

/// Availability of a listing
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PropertyStatus {
    Available,
    Reserved,
    Bought,
}

/// Whether the listing is offered for sale or for rent
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContractType {
    Sale,
    Rental,
}

/// Discriminant of [`PropertyKind`], used by filters and summaries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyType {
    Apartment,
    House,
    Land,
}

/// Type-specific part of a listing.
///
/// On the wire this is flattened into the property object and keyed by its
/// `type` field, so `{"type": "APARTMENT", "rooms": 3, ...}` decodes into
/// `PropertyKind::Apartment { rooms: 3 }`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PropertyKind {
    #[serde(rename_all = "camelCase")]
    Apartment { rooms: u32 },
    #[serde(rename_all = "camelCase")]
    House { plot_area: f64 },
    #[serde(rename_all = "camelCase")]
    Land { is_for_housing: bool },
}

/// Input that names none of an enum's variants
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value:?}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

macro_rules! parse_case_insensitive {
    ($ty:ident, $kind:literal, { $($label:literal => $variant:ident),+ $(,)? }) => {
        impl std::str::FromStr for $ty {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($label => Ok($ty::$variant),)+
                    _ => Err(UnknownVariant {
                        kind: $kind,
                        value: s.to_string(),
                    }),
                }
            }
        }
    };
}

parse_case_insensitive!(PropertyType, "property type", {
    "apartment" => Apartment,
    "house" => House,
    "land" => Land,
});

parse_case_insensitive!(PropertyStatus, "property status", {
    "available" => Available,
    "reserved" => Reserved,
    "bought" => Bought,
});

parse_case_insensitive!(ContractType, "contract type", {
    "sale" => Sale,
    "rental" => Rental,
});

impl PropertyKind {
    pub fn property_type(&self) -> PropertyType {
        match self {
            PropertyKind::Apartment { .. } => PropertyType::Apartment,
            PropertyKind::House { .. } => PropertyType::House,
            PropertyKind::Land { .. } => PropertyType::Land,
        }
    }

    /// Room count; only apartments carry one
    pub fn rooms(&self) -> Option<u32> {
        match self {
            PropertyKind::Apartment { rooms } => Some(*rooms),
            PropertyKind::House { .. } | PropertyKind::Land { .. } => None,
        }
    }
}

/// A listing as served by `/real-estates`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: PropertyId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(flatten)]
    pub kind: PropertyKind,
    pub status: PropertyStatus,
    pub contract_type: ContractType,
    pub price: f64,
    #[serde(default)]
    pub previous_price: Option<f64>,
    pub usable_area: f64,
    pub address: Address,
    pub agent_id: UserId,
    #[serde(default)]
    pub images: Vec<String>,
}

impl Property {
    pub fn property_type(&self) -> PropertyType {
        self.kind.property_type()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_apartment_variant_fields() {
        let raw = json!({
            "id": 4,
            "name": "Byt 3+kk",
            "description": "Sunny flat",
            "type": "APARTMENT",
            "rooms": 3,
            "status": "AVAILABLE",
            "contractType": "RENTAL",
            "price": 21000,
            "usableArea": 74.5,
            "address": { "street": "Milady Horákové", "city": "Praha" },
            "agentId": 7
        });

        let property: Property = serde_json::from_value(raw).unwrap();
        assert_eq!(property.kind, PropertyKind::Apartment { rooms: 3 });
        assert_eq!(property.contract_type, ContractType::Rental);
        assert_eq!(property.previous_price, None);
        assert!(property.images.is_empty());
    }

    #[test]
    fn encodes_kind_alongside_common_fields() {
        let property = Property {
            id: 1,
            name: "Parcela".to_string(),
            description: String::new(),
            kind: PropertyKind::Land { is_for_housing: true },
            status: PropertyStatus::Reserved,
            contract_type: ContractType::Sale,
            price: 1_200_000.0,
            previous_price: Some(1_500_000.0),
            usable_area: 900.0,
            address: Address {
                city: "Brno".to_string(),
                ..Default::default()
            },
            agent_id: 3,
            images: vec![],
        };

        let value = serde_json::to_value(&property).unwrap();
        assert_eq!(value["type"], "LAND");
        assert_eq!(value["isForHousing"], true);
        assert_eq!(value["previousPrice"], 1_500_000.0);
        assert_eq!(value["agentId"], 3);
    }

    #[test]
    fn parses_labels_ignoring_case() {
        assert_eq!("House".parse::<PropertyType>(), Ok(PropertyType::House));
        assert_eq!(" RENTAL ".parse::<ContractType>(), Ok(ContractType::Rental));
        assert_eq!("bought".parse::<PropertyStatus>(), Ok(PropertyStatus::Bought));
        assert!("castle".parse::<PropertyType>().is_err());
    }

    #[test]
    fn rooms_exist_only_on_apartments() {
        assert_eq!(PropertyKind::Apartment { rooms: 2 }.rooms(), Some(2));
        assert_eq!(PropertyKind::House { plot_area: 500.0 }.rooms(), None);
        assert_eq!(PropertyKind::Land { is_for_housing: false }.rooms(), None);
    }
}
