use std::collections::HashSet;

use voar_core::CanonicalOffer;

/// Collapses exact id collisions in one linear pass.
///
/// First occurrence wins and relative order is preserved, so the
/// representative for a duplicated id is whichever record the merge
/// produced first (adapter call order, then the adapter's own order).
pub fn dedupe(offers: Vec<CanonicalOffer>) -> Vec<CanonicalOffer> {
    let mut seen = HashSet::with_capacity(offers.len());
    offers
        .into_iter()
        .filter(|offer| seen.insert(offer.id.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use voar_core::TripType;

    fn offer(id: &str, provider: &str, price: f64) -> CanonicalOffer {
        CanonicalOffer {
            id: id.to_string(),
            provider: provider.to_string(),
            airline: None,
            flight_numbers: Vec::new(),
            origin: None,
            destination: None,
            date: None,
            return_date: None,
            trip_type: TripType::OneWay,
            stops: 0,
            stop_locations: Vec::new(),
            is_direct: true,
            duration_minutes: None,
            total_price: Some(price),
            currency: "BRL".to_string(),
            price_breakdown: None,
            booking_url: None,
        }
    }

    #[test]
    fn test_first_seen_wins() {
        let deduped = dedupe(vec![
            offer("X1", "provider_a", 100.0),
            offer("X2", "provider_a", 90.0),
            offer("X1", "provider_b", 80.0),
        ]);

        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].id, "X1");
        assert_eq!(deduped[0].provider, "provider_a");
        assert_eq!(deduped[1].id, "X2");
    }

    #[test]
    fn test_idempotent() {
        let input = vec![
            offer("A", "p1", 10.0),
            offer("B", "p1", 20.0),
            offer("A", "p2", 30.0),
            offer("C", "p2", 5.0),
        ];

        let once = dedupe(input);
        let twice = dedupe(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_empty_input() {
        assert!(dedupe(Vec::new()).is_empty());
    }
}
