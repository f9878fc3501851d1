use crate::models::place::PriceLevel;

/// Display token for a price level; levels without a meaningful price map to `None`.
pub fn price_label(level: PriceLevel) -> Option<&'static str> {
    match level {
        PriceLevel::Unspecified | PriceLevel::Free => None,
        PriceLevel::Inexpensive => Some("$"),
        PriceLevel::Moderate => Some("$$"),
        PriceLevel::Expensive => Some("$$$"),
        PriceLevel::VeryExpensive => Some("$$$$"),
        PriceLevel::Unrecognized => None,
    }
}
