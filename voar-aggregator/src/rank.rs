use std::cmp::Ordering;

use voar_core::CanonicalOffer;

/// Sorts offers by total price ascending. Offers without a price sort
/// last, and the sort is stable so ties keep their merge order.
pub fn rank(mut offers: Vec<CanonicalOffer>) -> Vec<CanonicalOffer> {
    offers.sort_by(|a, b| compare_prices(a.total_price, b.total_price));
    offers
}

fn compare_prices(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Returns the 1-indexed page window `[(page-1)*per_page, +per_page)`,
/// clamped to the slice. An out-of-range page yields an empty slice,
/// never an error.
pub fn paginate<T>(items: &[T], page: u32, per_page: u32) -> &[T] {
    let page = page.max(1) as usize;
    let per_page = per_page as usize;
    let start = (page - 1).saturating_mul(per_page);
    if start >= items.len() {
        return &[];
    }
    let end = (start + per_page).min(items.len());
    &items[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use voar_core::TripType;

    fn offer(id: &str, price: Option<f64>) -> CanonicalOffer {
        CanonicalOffer {
            id: id.to_string(),
            provider: "test".to_string(),
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
            total_price: price,
            currency: "BRL".to_string(),
            price_breakdown: None,
            booking_url: None,
        }
    }

    #[test]
    fn test_sorted_ascending_with_missing_prices_last() {
        let ranked = rank(vec![
            offer("a", Some(300.0)),
            offer("b", None),
            offer("c", Some(120.5)),
            offer("d", Some(900.0)),
            offer("e", None),
        ]);

        let ids: Vec<&str> = ranked.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "d", "b", "e"]);
        for pair in ranked.windows(2) {
            if let (Some(x), Some(y)) = (pair[0].total_price, pair[1].total_price) {
                assert!(x <= y);
            }
        }
    }

    #[test]
    fn test_ties_keep_original_order() {
        let ranked = rank(vec![
            offer("first", Some(200.0)),
            offer("second", Some(200.0)),
            offer("third", Some(200.0)),
        ]);
        let ids: Vec<&str> = ranked.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_pagination_windows() {
        let items: Vec<u32> = (0..15).collect();

        assert_eq!(paginate(&items, 1, 20), items.as_slice());
        assert_eq!(paginate(&items, 1, 2), &[0, 1]);
        assert_eq!(paginate(&items, 2, 2), &[2, 3]);
        assert_eq!(paginate(&items, 8, 2), &[14]);
    }

    #[test]
    fn test_out_of_range_page_is_empty() {
        let items: Vec<u32> = (0..15).collect();
        assert!(paginate(&items, 100, 20).is_empty());
        assert!(paginate::<u32>(&[], 1, 20).is_empty());
    }

    #[test]
    fn test_pages_reconstruct_full_list() {
        let ranked = rank((0..17).map(|i| offer(&i.to_string(), Some(i as f64))).collect());
        let per_page = 4;
        let mut reassembled = Vec::new();
        let pages = (ranked.len() + per_page - 1) / per_page;
        for page in 1..=pages as u32 {
            reassembled.extend_from_slice(paginate(&ranked, page, per_page as u32));
        }
        assert_eq!(reassembled, ranked);
    }
}
