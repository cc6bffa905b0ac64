use crate::models::Property;

/// Direction and size of the last price change of a listing
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PriceChange {
    Increased { percent: f64 },
    Decreased { percent: f64 },
}

impl PriceChange {
    /// Compare `price` against `previous_price`. Missing, zero or equal
    /// previous prices yield no badge.
    pub fn of(property: &Property) -> Option<Self> {
        let previous = property.previous_price.filter(|p| *p > 0.0)?;
        let delta = property.price - previous;
        if delta == 0.0 {
            return None;
        }

        let percent = (delta.abs() / previous * 1000.0).round() / 10.0;
        if delta > 0.0 {
            Some(PriceChange::Increased { percent })
        } else {
            Some(PriceChange::Decreased { percent })
        }
    }
}

impl std::fmt::Display for PriceChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PriceChange::Increased { percent } => write!(f, "▲ {:.1} %", percent),
            PriceChange::Decreased { percent } => write!(f, "▼ {:.1} %", percent),
        }
    }
}
