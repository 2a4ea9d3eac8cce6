//! Crossing detection logic
//!
//! A bid and an ask cross when the bid is willing to pay at least what the
//! ask demands.

use types::numeric::Price;

/// Check if a bid and ask can match at the given prices
pub fn can_match(bid_price: Price, ask_price: Price) -> bool {
    bid_price >= ask_price
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crossing_when_bid_higher() {
        assert!(can_match(Price::from_u64(50), Price::from_u64(49)));
    }

    #[test]
    fn test_crossing_at_equal_prices() {
        let price = Price::from_u64(50);
        assert!(can_match(price, price));
    }

    #[test]
    fn test_no_crossing_when_bid_lower() {
        assert!(!can_match(Price::from_u64(49), Price::from_u64(50)));
    }
}
