use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::lead::LeadRow;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictType {
    DuplicatePhone,
    DuplicateName,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictSeverity {
    Advisory,
    Warning,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConflictWarning {
    pub conflict_type: ConflictType,
    pub existing_lead_id: Uuid,
    pub description: String,
    pub severity: ConflictSeverity,
}

/// Checks a new intake against existing leads.
/// Returns advisory warnings (non-blocking) — sales decides whether it is the
/// same prospect calling back or a genuinely new one.
pub fn check_for_duplicates(
    existing: &[LeadRow],
    name: &str,
    company: Option<&str>,
    normalized_phone: &str,
) -> Vec<ConflictWarning> {
    let mut warnings = Vec::new();

    for lead in existing {
        if lead.phone == normalized_phone {
            warnings.push(ConflictWarning {
                conflict_type: ConflictType::DuplicatePhone,
                existing_lead_id: lead.id,
                description: format!(
                    "Phone {} already belongs to lead '{}' ({}).",
                    normalized_phone, lead.name, lead.status
                ),
                severity: ConflictSeverity::Warning,
            });
            continue;
        }

        let same_name = lead.name.eq_ignore_ascii_case(name.trim());
        let same_company = match (lead.company.as_deref(), company) {
            (Some(a), Some(b)) => a.eq_ignore_ascii_case(b.trim()),
            (None, None) => true,
            _ => false,
        };
        if same_name && same_company {
            warnings.push(ConflictWarning {
                conflict_type: ConflictType::DuplicateName,
                existing_lead_id: lead.id,
                description: format!(
                    "An existing lead has the same name '{}' and company. Verify this is a new prospect.",
                    lead.name
                ),
                severity: ConflictSeverity::Advisory,
            });
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::lead::{LeadSource, LeadStatus};
    use chrono::Utc;

    fn lead(name: &str, company: Option<&str>, phone: &str) -> LeadRow {
        LeadRow {
            id: Uuid::new_v4(),
            name: name.to_string(),
            company: company.map(String::from),
            phone: phone.to_string(),
            source: LeadSource::Website,
            status: LeadStatus::New,
            note: None,
            assigned_to: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_same_phone_is_warning() {
        let existing = vec![lead("Ada", Some("Acme"), "+15550100199")];
        let warnings = check_for_duplicates(&existing, "Different Name", None, "+15550100199");
        assert_eq!(warnings.len(), 1);
        assert!(matches!(warnings[0].conflict_type, ConflictType::DuplicatePhone));
        assert!(matches!(warnings[0].severity, ConflictSeverity::Warning));
    }

    #[test]
    fn test_same_name_and_company_is_advisory() {
        let existing = vec![lead("Ada Lovelace", Some("Acme"), "+15550100199")];
        let warnings = check_for_duplicates(&existing, "ada lovelace", Some("ACME"), "+15559999999");
        assert_eq!(warnings.len(), 1);
        assert!(matches!(warnings[0].conflict_type, ConflictType::DuplicateName));
        assert!(matches!(warnings[0].severity, ConflictSeverity::Advisory));
    }

    #[test]
    fn test_same_name_different_company_is_clean() {
        let existing = vec![lead("Ada", Some("Acme"), "+15550100199")];
        let warnings = check_for_duplicates(&existing, "Ada", Some("Initech"), "+15559999999");
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_phone_match_short_circuits_name_check() {
        let existing = vec![lead("Ada", Some("Acme"), "+15550100199")];
        let warnings = check_for_duplicates(&existing, "Ada", Some("Acme"), "+15550100199");
        // One warning, not two — the phone match already identifies the lead.
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_no_existing_leads() {
        assert!(check_for_duplicates(&[], "Ada", None, "+15550100199").is_empty());
    }
}
