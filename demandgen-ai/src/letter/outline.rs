//! Letter outline built from a consolidated response

use chrono::Utc;
use demandgen_common::models::{
    ClientField, ConsolidatedResponse, DamageCategory, DamagesBreakdown, PersonDamages,
};
use serde::Deserialize;

const NOT_FOUND: &str = "[Not found]";

/// Caller-supplied letter details
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LetterOptions {
    /// Letter date; defaults to today
    #[serde(default)]
    pub date: Option<String>,
    /// Addressee block, one entry per line
    #[serde(default)]
    pub recipient: Vec<String>,
    /// Signature block, one entry per line
    #[serde(default)]
    pub sender: Vec<String>,
}

/// One block of letter content
#[derive(Debug, Clone, PartialEq)]
pub enum LetterBlock {
    /// Section title
    Heading(String),
    /// Flowing text, wrapped by the renderer
    Paragraph(String),
    /// Line kept as written (addresses, tables)
    Line(String),
    Blank,
}

/// Renderer-independent letter content
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LetterOutline {
    pub blocks: Vec<LetterBlock>,
}

/// Format an amount as US currency, e.g. `$1,234.56`
pub fn format_currency(amount: f64) -> String {
    let cents = (amount * 100.0).round() as i64;
    let (sign, cents) = if cents < 0 { ("-", -cents) } else { ("", cents) };
    let dollars = (cents / 100).to_string();

    let mut grouped = String::with_capacity(dollars.len() + dollars.len() / 3);
    for (i, ch) in dollars.chars().enumerate() {
        if i > 0 && (dollars.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{}${}.{:02}", sign, grouped, cents % 100)
}

impl LetterOutline {
    fn push(&mut self, block: LetterBlock) {
        self.blocks.push(block);
    }

    fn line(&mut self, text: impl Into<String>) {
        self.push(LetterBlock::Line(text.into()));
    }

    fn section(&mut self, title: &str) {
        self.push(LetterBlock::Blank);
        self.push(LetterBlock::Heading(title.to_string()));
    }

    fn paragraph_or(&mut self, text: &str, fallback: &str) {
        let text = if text.trim().is_empty() { fallback } else { text };
        self.push(LetterBlock::Paragraph(text.to_string()));
    }

    fn category(&mut self, label: &str, category: &DamageCategory, indent: &str) {
        self.line(format!("{}{}: {}", indent, label, format_currency(category.total)));
        for item in &category.items {
            self.line(format!(
                "{}    {} - {}",
                indent,
                item.description,
                format_currency(item.amount)
            ));
        }
    }

    fn person(&mut self, person: &PersonDamages) {
        let name = if person.name.is_empty() {
            "Unnamed claimant"
        } else {
            person.name.as_str()
        };
        match &person.relationship {
            Some(rel) => self.line(format!("{} ({})", name, rel)),
            None => self.line(name.to_string()),
        }
        self.category("Special Damages", &person.special_damages, "  ");
        self.category("Future Medical Expenses", &person.future_medical_expenses, "  ");
        self.category("General Damages", &person.general_damages, "  ");
        self.line(format!("  Total for {}: {}", name, format_currency(person.total)));
    }

    /// Build the outline for a processed case
    pub fn from_response(response: &ConsolidatedResponse, options: &LetterOptions) -> Self {
        let mut outline = LetterOutline::default();
        let analysis = &response.global_analysis;
        let identity = &response.client_info;
        let field = |f: ClientField| identity.get(f).unwrap_or(NOT_FOUND).to_string();

        let date = options
            .date
            .clone()
            .unwrap_or_else(|| Utc::now().format("%B %-d, %Y").to_string());
        outline.line(date);
        outline.push(LetterBlock::Blank);

        if !options.recipient.is_empty() {
            for line in &options.recipient {
                outline.line(line.clone());
            }
            outline.push(LetterBlock::Blank);
        }

        outline.line("RE: Demand for Settlement");
        outline.line(format!("    Our Client:    {}", field(ClientField::ClientName)));
        outline.line(format!("    Claim Number:  {}", field(ClientField::ClaimNumber)));
        outline.line(format!("    Policy Number: {}", field(ClientField::PolicyNumber)));
        outline.line(format!("    Date of Loss:  {}", field(ClientField::DateOfLoss)));
        outline.push(LetterBlock::Blank);

        outline.line("Dear Claims Representative:");
        outline.push(LetterBlock::Blank);
        outline.paragraph_or(
            &analysis.claim_description,
            "Please accept this letter as our demand for settlement of the above claim.",
        );

        outline.section("FACTS");
        outline.paragraph_or(&analysis.facts, "The facts of loss are set out in the enclosed exhibits.");

        outline.section("LIABILITY");
        outline.paragraph_or(&analysis.liability, "Liability is reasonably clear.");

        outline.section("INJURIES");
        if analysis.injuries.is_empty() {
            outline.push(LetterBlock::Paragraph(
                "Injuries are documented in the enclosed medical records.".to_string(),
            ));
        } else {
            for injury in &analysis.injuries {
                outline.line(format!("  - {}", injury));
            }
        }

        outline.section("DAMAGES");
        match &analysis.damages {
            DamagesBreakdown::MultiPerson(d) => {
                for person in &d.people {
                    outline.person(person);
                    outline.push(LetterBlock::Blank);
                }
                outline.line(format!(
                    "TOTAL SETTLEMENT DEMAND: {}",
                    format_currency(d.total_settlement_demand)
                ));
            }
            DamagesBreakdown::Legacy(d) => {
                outline.category("Special Damages", &d.special_damages, "");
                outline.category("Future Medical Expenses", &d.future_medical_expenses, "");
                outline.category("General Damages", &d.general_damages, "");
                outline.line(format!(
                    "TOTAL SETTLEMENT DEMAND: {}",
                    format_currency(analysis.damages.total_demand())
                ));
            }
        }

        outline.section("EXHIBITS");
        for (i, exhibit) in response.exhibits.iter().enumerate() {
            if exhibit.is_error {
                outline.line(format!("{}. {} (analysis failed)", i + 1, exhibit.file_name));
            } else {
                outline.line(format!(
                    "{}. {} - {}",
                    i + 1,
                    exhibit.heading,
                    format_currency(exhibit.expenses)
                ));
            }
        }
        outline.line(format!(
            "Total documented expenses: {}",
            format_currency(response.total_expenses)
        ));

        outline.push(LetterBlock::Blank);
        outline.push(LetterBlock::Paragraph(format!(
            "Based on the foregoing, we demand {} in full settlement of this claim. \
             Please respond within thirty (30) days of the date of this letter.",
            format_currency(analysis.damages.total_demand())
        )));
        outline.push(LetterBlock::Blank);
        outline.line("Sincerely,");
        for line in &options.sender {
            outline.line(line.clone());
        }

        outline
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use demandgen_common::models::{
        ClientInfo, DamageItem, Exhibit, GlobalAnalysis, MultiPersonDamages, ProcessingInfo,
    };

    fn response() -> ConsolidatedResponse {
        ConsolidatedResponse {
            success: true,
            exhibits: vec![
                Exhibit {
                    file_name: "er.pdf".to_string(),
                    heading: "ER Bill".to_string(),
                    summary: "Visit".to_string(),
                    expenses: 1500.0,
                    client_info: None,
                    processed_at: Utc::now(),
                    file_hash: String::new(),
                    is_error: false,
                    reprocessed: false,
                    reprocessed_at: None,
                },
                Exhibit::failed("scan.pdf".to_string(), String::new(), "timeout"),
            ],
            total_expenses: 1500.0,
            global_analysis: GlobalAnalysis {
                claim_description: "Rear-end collision.".to_string(),
                injuries: vec!["Whiplash".to_string()],
                damages: DamagesBreakdown::MultiPerson(MultiPersonDamages {
                    people: vec![PersonDamages {
                        name: "Jane Doe".to_string(),
                        special_damages: DamageCategory {
                            total: 1500.0,
                            items: vec![DamageItem {
                                description: "City Hospital ER".to_string(),
                                amount: 1500.0,
                            }],
                        },
                        total: 1500.0,
                        ..Default::default()
                    }],
                    total_settlement_demand: 25000.0,
                }),
                ..Default::default()
            },
            client_info: ClientInfo {
                client_name: Some("Jane Doe".to_string()),
                ..Default::default()
            },
            processing_info: ProcessingInfo {
                total_exhibits: 2,
                existing_exhibits: 0,
                new_exhibits: 2,
                error_exhibits: 1,
                skipped_files: 0,
                reprocessed: false,
                processed_at: Utc::now(),
            },
        }
    }

    fn lines(outline: &LetterOutline) -> Vec<String> {
        outline
            .blocks
            .iter()
            .filter_map(|b| match b {
                LetterBlock::Line(s) | LetterBlock::Paragraph(s) | LetterBlock::Heading(s) => {
                    Some(s.clone())
                }
                LetterBlock::Blank => None,
            })
            .collect()
    }

    #[test]
    fn test_currency_format() {
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(500.0), "$500.00");
        assert_eq!(format_currency(1234.5), "$1,234.50");
        assert_eq!(format_currency(1234567.891), "$1,234,567.89");
        assert_eq!(format_currency(-42.0), "-$42.00");
    }

    #[test]
    fn test_outline_marks_missing_identity() {
        let options = LetterOptions {
            date: Some("January 5, 2024".to_string()),
            ..Default::default()
        };
        let text = lines(&LetterOutline::from_response(&response(), &options));

        assert_eq!(text[0], "January 5, 2024");
        assert!(text.contains(&"    Our Client:    Jane Doe".to_string()));
        assert!(text.contains(&"    Claim Number:  [Not found]".to_string()));
    }

    #[test]
    fn test_outline_lists_damages_and_exhibits() {
        let text = lines(&LetterOutline::from_response(&response(), &LetterOptions::default()));

        assert!(text.contains(&"  Special Damages: $1,500.00".to_string()));
        assert!(text.contains(&"      City Hospital ER - $1,500.00".to_string()));
        assert!(text.contains(&"TOTAL SETTLEMENT DEMAND: $25,000.00".to_string()));
        assert!(text.contains(&"1. ER Bill - $1,500.00".to_string()));
        assert!(text.contains(&"2. scan.pdf (analysis failed)".to_string()));
        assert!(text.contains(&"Total documented expenses: $1,500.00".to_string()));
    }
}
