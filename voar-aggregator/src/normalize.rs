use serde_json::Value;
use url::Url;

use voar_core::{CanonicalOffer, PriceBreakdown, RawOffer, TripType};

const KIWI_DEEP_URL: &str = "https://www.kiwi.com/deep";
const KIWI_SEARCH_URL: &str = "https://www.kiwi.com/pt/search/results/";
const FALLBACK_CURRENCY: &str = "BRL";

/// Maps one raw provider record into a [`CanonicalOffer`].
///
/// Total by contract: unknown or missing fields map to `None` or a
/// derived default, never an error. The id fallback composite
/// (origin:destination:departure) is not guaranteed globally unique;
/// it only has to be stable for the record that produced it.
pub fn normalize(raw: &RawOffer) -> CanonicalOffer {
    let item = &raw.payload;

    let origin_code = str_field(item, "flyFrom");
    let destination_code = str_field(item, "flyTo");
    let departure = str_field(item, "local_departure");
    let date = departure.as_deref().map(date_part);

    let id = scalar_to_string(item.get("id"))
        .or_else(|| str_field(item, "booking_token"))
        .unwrap_or_else(|| {
            format!(
                "{}:{}:{}",
                origin_code.as_deref().unwrap_or(""),
                destination_code.as_deref().unwrap_or(""),
                departure.as_deref().unwrap_or(""),
            )
        });

    let price_breakdown = item
        .get("price_breakdown")
        .filter(|v| v.is_object())
        .and_then(|v| serde_json::from_value::<PriceBreakdown>(v.clone()).ok());

    let total_price = item
        .get("price")
        .and_then(Value::as_f64)
        .or_else(|| derived_total(price_breakdown.as_ref()));

    let route = item
        .get("route")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[]);

    let round_trip = is_truthy(item.get("return"));

    CanonicalOffer {
        id,
        provider: raw.provider.clone(),
        airline: item
            .get("airlines")
            .and_then(Value::as_array)
            .and_then(|a| a.first())
            .and_then(Value::as_str)
            .map(str::to_string),
        flight_numbers: route.iter().map(flight_number).collect(),
        origin: airport_label(str_field(item, "cityFrom"), origin_code.clone()),
        destination: airport_label(str_field(item, "cityTo"), destination_code.clone()),
        date: date.clone(),
        return_date: if round_trip {
            str_field(item, "local_arrival").map(|s| date_part(&s))
        } else {
            None
        },
        trip_type: if round_trip {
            TripType::RoundTrip
        } else {
            TripType::OneWay
        },
        stops: route.len().saturating_sub(1) as u32,
        stop_locations: route
            .iter()
            .filter_map(|leg| leg.get("cityTo").and_then(Value::as_str))
            .map(str::to_string)
            .collect(),
        is_direct: route.len() <= 1,
        duration_minutes: item
            .get("duration")
            .and_then(|d| d.get("total"))
            .and_then(Value::as_f64)
            .map(|secs| (secs / 60.0).round() as i64),
        currency: str_field(item, "currency")
            .or_else(|| raw.currency_hint.clone())
            .unwrap_or_else(|| FALLBACK_CURRENCY.to_string()),
        booking_url: booking_url(
            item,
            origin_code.as_deref(),
            destination_code.as_deref(),
            date.as_deref(),
        ),
        total_price,
        price_breakdown,
    }
}

/// Booking link priority: direct deep link built from a booking token,
/// then a provider-supplied deep link, then a best-effort search URL.
fn booking_url(
    item: &Value,
    origin: Option<&str>,
    destination: Option<&str>,
    date: Option<&str>,
) -> Option<String> {
    if let Some(token) = str_field(item, "booking_token") {
        let mut url = Url::parse(KIWI_DEEP_URL).ok()?;
        url.query_pairs_mut().append_pair("booking_token", &token);
        return Some(url.to_string());
    }
    if let Some(link) = str_field(item, "deep_link") {
        return Some(link);
    }
    let mut url = Url::parse(KIWI_SEARCH_URL).ok()?;
    url.query_pairs_mut()
        .append_pair("from", origin.unwrap_or(""))
        .append_pair("to", destination.unwrap_or(""))
        .append_pair("dateFrom", date.unwrap_or(""));
    Some(url.to_string())
}

fn derived_total(breakdown: Option<&PriceBreakdown>) -> Option<f64> {
    let breakdown = breakdown?;
    match (breakdown.base, breakdown.tax) {
        (Some(base), Some(tax)) => Some(base + tax),
        _ => None,
    }
}

fn flight_number(leg: &Value) -> String {
    let airline = leg.get("airline").and_then(Value::as_str).unwrap_or("");
    match scalar_to_string(leg.get("flight_no")) {
        Some(number) => format!("{} {}", airline, number),
        None => airline.to_string(),
    }
}

fn airport_label(city: Option<String>, code: Option<String>) -> Option<String> {
    match (city, code) {
        (Some(city), Some(code)) => Some(format!("{} ({})", city, code)),
        (None, Some(code)) => Some(code),
        (Some(city), None) => Some(city),
        (None, None) => None,
    }
}

fn str_field(item: &Value, key: &str) -> Option<String> {
    item.get(key).and_then(Value::as_str).map(str::to_string)
}

fn scalar_to_string(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0) != 0.0,
        Some(Value::String(s)) => !s.is_empty(),
        _ => false,
    }
}

fn date_part(timestamp: &str) -> String {
    timestamp.split('T').next().unwrap_or(timestamp).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(payload: Value) -> RawOffer {
        RawOffer::new("test_provider", payload)
    }

    #[test]
    fn test_full_record_normalizes() {
        let offer = normalize(&raw(json!({
            "id": "ABC123",
            "price": 512.4,
            "flyFrom": "CNF",
            "cityFrom": "Belo Horizonte",
            "flyTo": "GRU",
            "cityTo": "São Paulo",
            "local_departure": "2026-04-12T08:30:00.000Z",
            "airlines": ["G3"],
            "route": [{"airline": "G3", "flight_no": 1410, "cityTo": "São Paulo"}],
            "duration": {"total": 4500},
            "deep_link": "https://example.invalid/offer",
        })));

        assert_eq!(offer.id, "ABC123");
        assert_eq!(offer.provider, "test_provider");
        assert_eq!(offer.airline.as_deref(), Some("G3"));
        assert_eq!(offer.flight_numbers, vec!["G3 1410"]);
        assert_eq!(offer.origin.as_deref(), Some("Belo Horizonte (CNF)"));
        assert_eq!(offer.destination.as_deref(), Some("São Paulo (GRU)"));
        assert_eq!(offer.date.as_deref(), Some("2026-04-12"));
        assert_eq!(offer.total_price, Some(512.4));
        assert_eq!(offer.stops, 0);
        assert!(offer.is_direct);
        assert_eq!(offer.duration_minutes, Some(75));
    }

    #[test]
    fn test_id_falls_back_to_booking_token_then_composite() {
        let with_token = normalize(&raw(json!({
            "booking_token": "tok-42",
            "flyFrom": "CNF",
        })));
        assert_eq!(with_token.id, "tok-42");

        let composite = normalize(&raw(json!({
            "flyFrom": "CNF",
            "flyTo": "REC",
            "local_departure": "2026-04-02T10:00:00.000Z",
        })));
        assert_eq!(composite.id, "CNF:REC:2026-04-02T10:00:00.000Z");
    }

    #[test]
    fn test_booking_url_priority() {
        let token = normalize(&raw(json!({
            "booking_token": "a b/c",
            "deep_link": "https://example.invalid/direct",
        })));
        let url = token.booking_url.unwrap();
        assert!(url.starts_with("https://www.kiwi.com/deep?booking_token="));
        assert!(!url.contains(' '), "token must be percent-encoded: {url}");

        let deep = normalize(&raw(json!({
            "deep_link": "https://example.invalid/direct",
        })));
        assert_eq!(
            deep.booking_url.as_deref(),
            Some("https://example.invalid/direct")
        );

        let search = normalize(&raw(json!({
            "flyFrom": "CNF",
            "flyTo": "SSA",
            "local_departure": "2026-04-05T06:00:00.000Z",
        })));
        let url = search.booking_url.unwrap();
        assert!(url.starts_with(KIWI_SEARCH_URL));
        assert!(url.contains("from=CNF"));
        assert!(url.contains("dateFrom=2026-04-05"));
    }

    #[test]
    fn test_total_price_derived_from_breakdown() {
        let offer = normalize(&raw(json!({
            "id": "X",
            "price_breakdown": {"base": 300.0, "tax": 45.5, "currency": "BRL"},
        })));
        assert_eq!(offer.total_price, Some(345.5));

        let missing_tax = normalize(&raw(json!({
            "id": "Y",
            "price_breakdown": {"base": 300.0},
        })));
        assert_eq!(missing_tax.total_price, None);
    }

    #[test]
    fn test_currency_defaults_from_envelope_then_fallback() {
        let hinted = normalize(&raw(json!({"id": "X"})).with_currency_hint("EUR"));
        assert_eq!(hinted.currency, "EUR");

        let item_wins = normalize(
            &raw(json!({"id": "X", "currency": "USD"})).with_currency_hint("EUR"),
        );
        assert_eq!(item_wins.currency, "USD");

        let bare = normalize(&raw(json!({"id": "X"})));
        assert_eq!(bare.currency, "BRL");
    }

    #[test]
    fn test_stops_and_round_trip_derivation() {
        let two_leg = normalize(&raw(json!({
            "id": "X",
            "return": 1,
            "local_departure": "2026-04-10T07:00:00.000Z",
            "local_arrival": "2026-04-18T22:00:00.000Z",
            "route": [
                {"airline": "AD", "flight_no": 4001, "cityTo": "Brasília"},
                {"airline": "AD", "flight_no": 4002, "cityTo": "Recife"},
            ],
        })));
        assert_eq!(two_leg.stops, 1);
        assert!(!two_leg.is_direct);
        assert_eq!(two_leg.stop_locations, vec!["Brasília", "Recife"]);
        assert_eq!(two_leg.trip_type, TripType::RoundTrip);
        assert_eq!(two_leg.return_date.as_deref(), Some("2026-04-18"));

        let empty_route = normalize(&raw(json!({"id": "X", "route": []})));
        assert_eq!(empty_route.stops, 0);
        assert!(empty_route.is_direct);
        assert_eq!(empty_route.trip_type, TripType::OneWay);
    }

    #[test]
    fn test_never_fails_on_junk() {
        let offer = normalize(&raw(json!({
            "id": 9942,
            "price": "not-a-number",
            "route": "not-an-array",
            "duration": null,
            "airlines": null,
        })));
        assert_eq!(offer.id, "9942");
        assert_eq!(offer.total_price, None);
        assert_eq!(offer.stops, 0);
        assert_eq!(offer.airline, None);
    }
}
