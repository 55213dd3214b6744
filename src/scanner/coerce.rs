//! Loose listing records into [`Listing`]
//!
//! Scraper output is inconsistent: prices arrive as numbers or as
//! `"$250,000"`, ids as `zpid` numbers, addresses as strings or objects.

use super::Listing;
use regex::Regex;
use serde_json::{Map, Value};

const ID_KEYS: &[&str] = &["id", "zpid", "listingId"];
const PRICE_KEYS: &[&str] = &["price", "listPrice"];
const ESTIMATE_KEYS: &[&str] = &["estimate", "zestimate", "estimatedValue", "arv"];
const ADDRESS_PARTS: &[&str] = &["streetAddress", "city", "state", "zipcode"];

lazy_static::lazy_static! {
    // "$250,000", "250000.50", "$1.2M", "300k"
    static ref AMOUNT: Regex = Regex::new(
        r"^\$?\s*([0-9][0-9,]*(?:\.[0-9]+)?)\s*([kKmM])?$"
    ).unwrap();
}

/// Build a listing from one JSON record. `None` when the record is not an
/// object.
pub fn listing_from_value(value: &Value, fallback_id: &str) -> Option<Listing> {
    let record = value.as_object()?;

    Some(Listing {
        id: first_id(record).unwrap_or_else(|| fallback_id.to_string()),
        address: address(record),
        description: record
            .get("description")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string),
        price: first_amount(record, PRICE_KEYS),
        estimate: first_amount(record, ESTIMATE_KEYS),
    })
}

/// Numeric value of a price field
pub fn parse_amount(value: &Value) -> Option<f64> {
    let amount = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => parse_amount_str(s)?,
        _ => return None,
    };
    amount.is_finite().then_some(amount)
}

fn parse_amount_str(s: &str) -> Option<f64> {
    let caps = AMOUNT.captures(s.trim())?;
    let digits = caps.get(1)?.as_str().replace(',', "");
    let base: f64 = digits.parse().ok()?;

    let multiplier = match caps.get(2).map(|m| m.as_str()) {
        Some("k") | Some("K") => 1_000.0,
        Some("m") | Some("M") => 1_000_000.0,
        _ => 1.0,
    };
    Some(base * multiplier)
}

fn first_id(record: &Map<String, Value>) -> Option<String> {
    ID_KEYS.iter().find_map(|key| match record.get(*key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn first_amount(record: &Map<String, Value>, keys: &[&str]) -> Option<f64> {
    keys.iter()
        .filter_map(|key| record.get(*key))
        .find_map(parse_amount)
}

fn address(record: &Map<String, Value>) -> Option<String> {
    match record.get("address") {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Some(Value::Object(parts)) => {
            let joined: Vec<&str> = ADDRESS_PARTS
                .iter()
                .filter_map(|key| parts.get(*key).and_then(Value::as_str))
                .filter(|s| !s.is_empty())
                .collect();
            (!joined.is_empty()).then(|| joined.join(", "))
        }
        _ => record
            .get("fullAddress")
            .and_then(Value::as_str)
            .map(str::to_string),
    }
}
