//! Prompt templates for the two model calls

use demandgen_common::models::{AggregatedClientInfo, ClientField, Exhibit};

/// Fixed instructions sent with every exhibit document
pub const EXTRACTION_PROMPT: &str = r#"You are assisting a personal injury attorney who is preparing a demand letter.
Analyze the attached case exhibit (a PDF document such as a medical bill, medical record, police report, estimate, or correspondence).

Respond with ONLY a JSON object, no commentary, in exactly this shape:
{
  "heading": "Exhibit: <short descriptive title, e.g. 'Emergency Room Bill - City Hospital'>",
  "summary": "<2-5 sentence factual summary of the document: who, what, when, treatment or event, and any amounts billed>",
  "expenses": <total monetary amount billed or claimed in this document as a plain number, 0 if none>,
  "clientInfo": {
    "clientName": "<injured client's full name, or null>",
    "policyNumber": "<insurance policy number, or null>",
    "claimNumber": "<insurance claim number, or null>",
    "dateOfLoss": "<date of the incident in MM/DD/YYYY format, or null>"
  }
}

Rules:
- "expenses" must be a number without currency symbols or thousands separators.
- Use only amounts that appear in the document. Do not estimate.
- Use null for any client field the document does not state explicitly."#;

/// Render known identity values as prompt hints
fn known_client_lines(known: &AggregatedClientInfo) -> String {
    ClientField::ALL
        .iter()
        .map(|field| {
            format!(
                "- {}: {}",
                field.key(),
                known.get(*field).unwrap_or("unknown")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Combined exhibit text: "Exhibit N: heading\nsummary" for non-error exhibits
pub fn combined_exhibit_text(exhibits: &[Exhibit]) -> String {
    exhibits
        .iter()
        .filter(|e| !e.is_error)
        .enumerate()
        .map(|(i, e)| format!("Exhibit {}: {}\n{}", i + 1, e.heading, e.summary))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Build the case-level analysis prompt
pub fn build_analysis_prompt(exhibits: &[Exhibit], known: &AggregatedClientInfo) -> String {
    format!(
        r#"You are assisting a personal injury attorney who is preparing a demand letter to an insurance carrier.
Below are summaries of every exhibit in the case file.

{exhibits}

Client information already identified from the exhibits:
{known}

Using ONLY the information in the exhibit summaries, respond with ONLY a JSON object in exactly this shape:
{{
  "clientInfo": {{
    "clientName": "<string or null>",
    "policyNumber": "<string or null>",
    "claimNumber": "<string or null>",
    "dateOfLoss": "<MM/DD/YYYY or null>"
  }},
  "claimDescription": "<one paragraph describing the claim>",
  "facts": "<narrative of the facts of the incident>",
  "liability": "<paragraph explaining why the insured is liable>",
  "injuries": ["<injury or diagnosis>", "..."],
  "damages": {{
    "people": [
      {{
        "name": "<injured person's name>",
        "relationship": "<e.g. client, passenger, spouse>",
        "specialDamages": {{ "total": <number>, "items": [{{ "description": "<provider or expense>", "amount": <number>}}] }},
        "futureMedicalExpenses": {{ "total": <number>, "items": [{{ "description": "<treatment>", "amount": <number>}}] }},
        "generalDamages": {{ "total": <number>, "items": [{{ "description": "<pain and suffering, etc.>", "amount": <number>}}] }},
        "total": <number>
      }}
    ],
    "totalSettlementDemand": <number>
  }}
}}

Rules:
- Every monetary line item in specialDamages must be taken verbatim from an amount stated in the exhibit summaries. Never invent or estimate amounts.
- Each "total" must equal the sum of its "items" amounts.
- List a separate entry in "people" for every injured person named in the exhibits.
- Amounts are plain numbers without currency symbols or thousands separators.
- Use null for client fields that cannot be determined."#,
        exhibits = combined_exhibit_text(exhibits),
        known = known_client_lines(known),
    )
}
