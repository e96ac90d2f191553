//! Wire data model shared by the processing service and the letter renderer
//!
//! All types serialize with camelCase field names. Exhibits round-trip through
//! the caller's session on every request, so deserialization is lenient:
//! anything the caller might have dropped has a default.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identity fields the model may find in an exhibit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClientField {
    ClientName,
    PolicyNumber,
    ClaimNumber,
    DateOfLoss,
}

impl ClientField {
    pub const ALL: [ClientField; 4] = [
        ClientField::ClientName,
        ClientField::PolicyNumber,
        ClientField::ClaimNumber,
        ClientField::DateOfLoss,
    ];

    /// JSON key used by the wire format and by model responses
    pub fn key(self) -> &'static str {
        match self {
            ClientField::ClientName => "clientName",
            ClientField::PolicyNumber => "policyNumber",
            ClientField::ClaimNumber => "claimNumber",
            ClientField::DateOfLoss => "dateOfLoss",
        }
    }
}

/// Client identity as found in one exhibit, or as resolved for the case
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientInfo {
    #[serde(default)]
    pub client_name: Option<String>,
    #[serde(default)]
    pub policy_number: Option<String>,
    #[serde(default)]
    pub claim_number: Option<String>,
    #[serde(default)]
    pub date_of_loss: Option<String>,
}

/// Case-level identity resolved from every current exhibit
pub type AggregatedClientInfo = ClientInfo;

impl ClientInfo {
    pub fn get(&self, field: ClientField) -> Option<&str> {
        match field {
            ClientField::ClientName => self.client_name.as_deref(),
            ClientField::PolicyNumber => self.policy_number.as_deref(),
            ClientField::ClaimNumber => self.claim_number.as_deref(),
            ClientField::DateOfLoss => self.date_of_loss.as_deref(),
        }
    }

    pub fn set(&mut self, field: ClientField, value: Option<String>) {
        match field {
            ClientField::ClientName => self.client_name = value,
            ClientField::PolicyNumber => self.policy_number = value,
            ClientField::ClaimNumber => self.claim_number = value,
            ClientField::DateOfLoss => self.date_of_loss = value,
        }
    }

    /// True when no field carries a value
    pub fn is_empty(&self) -> bool {
        ClientField::ALL.iter().all(|f| self.get(*f).is_none())
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// One uploaded file's analysis result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exhibit {
    /// Unique key within a session
    pub file_name: String,

    #[serde(default)]
    pub heading: String,

    #[serde(default)]
    pub summary: String,

    /// Non-negative monetary amount, zero when none was found
    #[serde(default)]
    pub expenses: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_info: Option<ClientInfo>,

    #[serde(default = "Utc::now")]
    pub processed_at: DateTime<Utc>,

    /// Soft identity signal (name + size + processing time). Not unique and
    /// never consulted for deduplication.
    #[serde(default)]
    pub file_hash: String,

    #[serde(default)]
    pub is_error: bool,

    /// Set when a reprocess run carried this exhibit forward
    #[serde(default, skip_serializing_if = "is_false")]
    pub reprocessed: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reprocessed_at: Option<DateTime<Utc>>,
}

impl Exhibit {
    /// Build the error row recorded when analysis of a file fails
    pub fn failed(file_name: String, file_hash: String, message: &str) -> Self {
        Self {
            heading: format!("Exhibit: {} (Error)", file_name),
            summary: format!("Error analyzing document: {}", message),
            file_name,
            expenses: 0.0,
            client_info: None,
            processed_at: Utc::now(),
            file_hash,
            is_error: true,
            reprocessed: false,
            reprocessed_at: None,
        }
    }

    /// Stamp the reprocess marker, leaving every analysis field untouched
    pub fn mark_reprocessed(&mut self, at: DateTime<Utc>) {
        self.reprocessed = true;
        self.reprocessed_at = Some(at);
    }
}

/// One itemized damages line
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DamageItem {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub amount: f64,
}

/// A damages category: a total and the lines it is made of
///
/// `total` is expected to equal the sum of `items`, but the figure comes from
/// the model and is not recomputed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DamageCategory {
    #[serde(default)]
    pub total: f64,
    #[serde(default)]
    pub items: Vec<DamageItem>,
}

impl DamageCategory {
    pub fn items_sum(&self) -> f64 {
        self.items.iter().map(|i| i.amount).sum()
    }
}

/// Damages claimed on behalf of one person
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonDamages {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationship: Option<String>,
    #[serde(default)]
    pub special_damages: DamageCategory,
    #[serde(default)]
    pub future_medical_expenses: DamageCategory,
    #[serde(default)]
    pub general_damages: DamageCategory,
    #[serde(default)]
    pub total: f64,
}

/// Single-claimant damages layout
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyDamages {
    #[serde(default)]
    pub special_damages: DamageCategory,
    #[serde(default)]
    pub future_medical_expenses: DamageCategory,
    #[serde(default)]
    pub general_damages: DamageCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_demand: Option<f64>,
}

/// Damages broken down per person with a case-wide demand
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiPersonDamages {
    #[serde(default)]
    pub people: Vec<PersonDamages>,
    #[serde(default)]
    pub total_settlement_demand: f64,
}

/// Damages structure, discriminated by the `type` field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DamagesBreakdown {
    Legacy(LegacyDamages),
    MultiPerson(MultiPersonDamages),
}

impl Default for DamagesBreakdown {
    fn default() -> Self {
        DamagesBreakdown::Legacy(LegacyDamages::default())
    }
}

impl DamagesBreakdown {
    /// Amount demanded for the whole case
    pub fn total_demand(&self) -> f64 {
        match self {
            DamagesBreakdown::Legacy(d) => d.total_demand.unwrap_or(
                d.special_damages.total + d.future_medical_expenses.total + d.general_damages.total,
            ),
            DamagesBreakdown::MultiPerson(d) => d.total_settlement_demand,
        }
    }
}

/// Case-level narrative and damages synthesis
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalAnalysis {
    #[serde(default)]
    pub claim_description: String,
    #[serde(default)]
    pub liability: String,
    #[serde(default)]
    pub injuries: Vec<String>,
    #[serde(default)]
    pub facts: String,
    #[serde(default)]
    pub damages: DamagesBreakdown,
}

/// Counts describing one processing pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingInfo {
    pub total_exhibits: usize,
    pub existing_exhibits: usize,
    pub new_exhibits: usize,
    pub error_exhibits: usize,
    /// Uploads dropped because an exhibit with the same file name exists
    #[serde(default)]
    pub skipped_files: usize,
    #[serde(default)]
    pub reprocessed: bool,
    pub processed_at: DateTime<Utc>,
}

fn default_success() -> bool {
    true
}

/// Result of one processing pass, returned to the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsolidatedResponse {
    #[serde(default = "default_success")]
    pub success: bool,
    pub exhibits: Vec<Exhibit>,
    pub total_expenses: f64,
    pub global_analysis: GlobalAnalysis,
    pub client_info: AggregatedClientInfo,
    pub processing_info: ProcessingInfo,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_exhibit_uses_camel_case_keys() {
        let exhibit = Exhibit::failed("a.pdf".to_string(), "h".to_string(), "boom");
        let value = serde_json::to_value(&exhibit).unwrap();

        assert_eq!(value["fileName"], "a.pdf");
        assert_eq!(value["isError"], true);
        assert_eq!(value["expenses"], 0.0);
        assert_eq!(value["summary"], "Error analyzing document: boom");
        assert!(value.get("clientInfo").is_none());
        assert!(value.get("reprocessed").is_none());
    }

    #[test]
    fn test_exhibit_deserializes_with_missing_optional_fields() {
        let exhibit: Exhibit = serde_json::from_value(json!({
            "fileName": "bill.pdf",
            "heading": "ER Bill",
            "summary": "Emergency visit",
            "expenses": 500
        }))
        .unwrap();

        assert_eq!(exhibit.file_name, "bill.pdf");
        assert_eq!(exhibit.expenses, 500.0);
        assert!(!exhibit.is_error);
        assert!(exhibit.client_info.is_none());
        assert!(exhibit.file_hash.is_empty());
    }

    #[test]
    fn test_mark_reprocessed_keeps_analysis_fields() {
        let mut exhibit: Exhibit = serde_json::from_value(json!({
            "fileName": "a.pdf",
            "heading": "H",
            "summary": "S",
            "expenses": 12.5
        }))
        .unwrap();
        let before = exhibit.clone();

        exhibit.mark_reprocessed(Utc::now());

        assert!(exhibit.reprocessed);
        assert!(exhibit.reprocessed_at.is_some());
        assert_eq!(exhibit.summary, before.summary);
        assert_eq!(exhibit.expenses, before.expenses);
        assert_eq!(exhibit.processed_at, before.processed_at);
    }

    #[test]
    fn test_damages_breakdown_is_tagged() {
        let damages = DamagesBreakdown::MultiPerson(MultiPersonDamages {
            people: vec![PersonDamages {
                name: "Jane Doe".to_string(),
                total: 1500.0,
                ..Default::default()
            }],
            total_settlement_demand: 1500.0,
        });

        let value = serde_json::to_value(&damages).unwrap();
        assert_eq!(value["type"], "multiPerson");
        assert_eq!(value["people"][0]["name"], "Jane Doe");
        assert_eq!(value["totalSettlementDemand"], 1500.0);

        let legacy = serde_json::to_value(DamagesBreakdown::default()).unwrap();
        assert_eq!(legacy["type"], "legacy");
        assert!(legacy.get("specialDamages").is_some());
    }

    #[test]
    fn test_total_demand_falls_back_to_category_totals() {
        let damages = DamagesBreakdown::Legacy(LegacyDamages {
            special_damages: DamageCategory { total: 100.0, items: vec![] },
            future_medical_expenses: DamageCategory { total: 50.0, items: vec![] },
            general_damages: DamageCategory { total: 25.0, items: vec![] },
            total_demand: None,
        });
        assert_eq!(damages.total_demand(), 175.0);
    }

    #[test]
    fn test_client_info_field_access() {
        let mut info = ClientInfo::default();
        assert!(info.is_empty());

        info.set(ClientField::ClaimNumber, Some("CLM-1".to_string()));
        assert_eq!(info.get(ClientField::ClaimNumber), Some("CLM-1"));
        assert!(!info.is_empty());
        assert_eq!(ClientField::DateOfLoss.key(), "dateOfLoss");
    }
}
