//! Coercion of loosely-shaped model JSON into strict types
//!
//! Every accessor tolerates a missing key, a wrong JSON type, or a
//! placeholder string, and falls back to a default instead of failing.

use demandgen_common::models::{
    ClientField, ClientInfo, DamageCategory, DamageItem, DamagesBreakdown, LegacyDamages,
    MultiPersonDamages, PersonDamages,
};
use serde_json::{Map, Value};

/// Strings models emit in place of "no value"
const PLACEHOLDERS: [&str; 7] = ["null", "none", "n/a", "na", "unknown", "not found", "not available"];

/// True for blank strings and placeholder values like "N/A"
pub fn is_placeholder(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty() || PLACEHOLDERS.iter().any(|p| trimmed.eq_ignore_ascii_case(p))
}

/// First non-null value among `keys`
pub fn field<'a>(map: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|k| map.get(*k))
        .find(|v| !v.is_null())
}

/// Text value, trimmed; placeholders and non-scalars become `None`
pub fn coerce_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !is_placeholder(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Monetary amount if one can be read
///
/// Accepts JSON numbers and strings such as "$1,234.56". Negative and
/// non-finite values are rejected.
pub fn coerce_optional_amount(value: Option<&Value>) -> Option<f64> {
    let amount = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let cleaned: String = s
                .trim()
                .chars()
                .filter(|c| !matches!(c, '$' | ',' | ' '))
                .collect();
            cleaned.parse::<f64>().ok()?
        }
        _ => return None,
    };

    if amount.is_finite() && amount >= 0.0 {
        Some(amount)
    } else {
        None
    }
}

/// Monetary amount, 0 when absent or unreadable
pub fn coerce_amount(value: Option<&Value>) -> f64 {
    coerce_optional_amount(value).unwrap_or(0.0)
}

/// List of strings from an array, or from a newline/bullet separated string
pub fn coerce_string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items.iter().filter_map(|v| coerce_text(Some(v))).collect(),
        Some(Value::String(s)) => s
            .lines()
            .map(|line| line.trim().trim_start_matches(['-', '*', '•']).trim())
            .filter(|line| !is_placeholder(line))
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

/// Client identity object; `None` when absent or every field is empty
pub fn coerce_client_info(value: Option<&Value>) -> Option<ClientInfo> {
    let map = value?.as_object()?;

    let mut info = ClientInfo::default();
    for f in ClientField::ALL {
        info.set(f, coerce_text(map.get(f.key())));
    }

    if info.is_empty() {
        None
    } else {
        Some(info)
    }
}

fn coerce_item(value: &Value) -> Option<DamageItem> {
    let map = value.as_object()?;
    let description = coerce_text(field(map, &["description", "item", "name", "provider"]))
        .unwrap_or_default();
    let amount = coerce_amount(field(map, &["amount", "cost", "value"]));

    if description.is_empty() && amount == 0.0 {
        return None;
    }
    Some(DamageItem { description, amount })
}

/// Damages category; a missing total is filled with the item sum
pub fn coerce_category(value: Option<&Value>) -> DamageCategory {
    match value {
        Some(Value::Object(map)) => {
            let items: Vec<DamageItem> = match field(map, &["items", "lineItems", "breakdown"]) {
                Some(Value::Array(items)) => items.iter().filter_map(coerce_item).collect(),
                _ => Vec::new(),
            };
            let total = coerce_optional_amount(field(map, &["total", "amount"]))
                .unwrap_or_else(|| items.iter().map(|i| i.amount).sum());
            DamageCategory { total, items }
        }
        Some(other) => DamageCategory {
            total: coerce_amount(Some(other)),
            items: Vec::new(),
        },
        None => DamageCategory::default(),
    }
}

fn coerce_person(value: &Value) -> Option<PersonDamages> {
    let map = value.as_object()?;

    let special_damages = coerce_category(field(map, &["specialDamages"]));
    let future_medical_expenses = coerce_category(field(map, &["futureMedicalExpenses"]));
    let general_damages = coerce_category(field(map, &["generalDamages"]));
    let total = coerce_optional_amount(field(map, &["total", "totalDamages"])).unwrap_or(
        special_damages.total + future_medical_expenses.total + general_damages.total,
    );

    Some(PersonDamages {
        name: coerce_text(field(map, &["name", "person"])).unwrap_or_default(),
        relationship: coerce_text(field(map, &["relationship", "role"])),
        special_damages,
        future_medical_expenses,
        general_damages,
        total,
    })
}

/// Damages breakdown: `people` array means multi-person, anything else legacy
pub fn coerce_damages(value: Option<&Value>) -> DamagesBreakdown {
    let Some(map) = value.and_then(Value::as_object) else {
        return DamagesBreakdown::default();
    };

    if let Some(Value::Array(people)) = field(map, &["people"]) {
        let people: Vec<PersonDamages> = people.iter().filter_map(coerce_person).collect();
        let total_settlement_demand =
            coerce_optional_amount(field(map, &["totalSettlementDemand", "totalDemand"]))
                .unwrap_or_else(|| people.iter().map(|p| p.total).sum());

        return DamagesBreakdown::MultiPerson(MultiPersonDamages {
            people,
            total_settlement_demand,
        });
    }

    DamagesBreakdown::Legacy(LegacyDamages {
        special_damages: coerce_category(field(map, &["specialDamages"])),
        future_medical_expenses: coerce_category(field(map, &["futureMedicalExpenses"])),
        general_damages: coerce_category(field(map, &["generalDamages"])),
        total_demand: coerce_optional_amount(field(map, &["totalDemand", "totalSettlementDemand"])),
    })
}
