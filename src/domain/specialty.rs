//! Specialty domain types
//!
//! Skill categories with an hourly rate per experience tier. The set of
//! specialties forms the rate table consumed by the pricing engine.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Experience tier of the professional assigned to a step
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceLevel {
    Iniciante,
    Junior,
    Pleno,
    Senior,
}

impl ExperienceLevel {
    pub const ALL: [ExperienceLevel; 4] = [
        ExperienceLevel::Iniciante,
        ExperienceLevel::Junior,
        ExperienceLevel::Pleno,
        ExperienceLevel::Senior,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Iniciante => "iniciante",
            Self::Junior => "junior",
            Self::Pleno => "pleno",
            Self::Senior => "senior",
        }
    }
}

impl std::fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Specialty status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SpecialtyStatus {
    #[default]
    Active,
    Inactive,
}

/// Hourly rate per experience tier
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct TierRates {
    #[serde(default)]
    pub iniciante: Decimal,
    #[serde(default)]
    pub junior: Decimal,
    #[serde(default)]
    pub pleno: Decimal,
    #[serde(default)]
    pub senior: Decimal,
}

impl TierRates {
    pub fn get(&self, level: ExperienceLevel) -> Decimal {
        match level {
            ExperienceLevel::Iniciante => self.iniciante,
            ExperienceLevel::Junior => self.junior,
            ExperienceLevel::Pleno => self.pleno,
            ExperienceLevel::Senior => self.senior,
        }
    }
}

/// Specialty entity (one rate table entry)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Specialty {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub status: SpecialtyStatus,
    pub rates: TierRates,
    /// Whether the specialty offers AI-assisted delivery
    #[serde(default)]
    pub ai_assist: bool,
    /// Fixed AI surcharge. Informational only; the cost cascade never reads it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_surcharge: Option<Decimal>,
}

impl Specialty {
    /// Checks the edit-boundary contract: a name and non-negative amounts.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Specialty name is required".to_string());
        }
        for level in ExperienceLevel::ALL {
            if self.rates.get(level).is_sign_negative() {
                return Err(format!("Rate for tier '{}' must not be negative", level));
            }
        }
        if matches!(self.ai_surcharge, Some(v) if v.is_sign_negative()) {
            return Err("AI surcharge must not be negative".to_string());
        }
        Ok(())
    }
}

/// Request DTO for creating or replacing a specialty
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecialtyRequest {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub name: String,
    #[serde(default)]
    pub status: SpecialtyStatus,
    pub rates: TierRates,
    #[serde(default)]
    pub ai_assist: bool,
    #[serde(default)]
    pub ai_surcharge: Option<Decimal>,
}

impl SpecialtyRequest {
    pub fn into_specialty(self, id: Uuid) -> Specialty {
        Specialty {
            id,
            name: self.name,
            status: self.status,
            rates: self.rates,
            ai_assist: self.ai_assist,
            ai_surcharge: self.ai_surcharge,
        }
    }
}

/// In-memory rate lookup keyed by specialty id.
///
/// Built wholesale from the specialty collection; an unknown specialty id
/// resolves to a zero rate.
#[derive(Debug, Clone, Default)]
pub struct RateTable {
    rates: HashMap<Uuid, TierRates>,
}

impl RateTable {
    pub fn from_specialties<'a, I>(specialties: I) -> Self
    where
        I: IntoIterator<Item = &'a Specialty>,
    {
        let rates = specialties
            .into_iter()
            .map(|s| (s.id, s.rates.clone()))
            .collect();
        Self { rates }
    }

    pub fn rate(&self, specialty_id: Uuid, level: ExperienceLevel) -> Decimal {
        self.rates
            .get(&specialty_id)
            .map(|rates| rates.get(level))
            .unwrap_or(Decimal::ZERO)
    }

    pub fn contains(&self, specialty_id: Uuid) -> bool {
        self.rates.contains_key(&specialty_id)
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn design() -> Specialty {
        Specialty {
            id: Uuid::new_v4(),
            name: "Design".to_string(),
            status: SpecialtyStatus::Active,
            rates: TierRates {
                iniciante: Decimal::from(30),
                junior: Decimal::from(50),
                pleno: Decimal::from(75),
                senior: Decimal::from(120),
            },
            ai_assist: false,
            ai_surcharge: None,
        }
    }

    #[test]
    fn test_rate_lookup_by_tier() {
        let specialty = design();
        let table = RateTable::from_specialties([&specialty]);

        assert_eq!(table.rate(specialty.id, ExperienceLevel::Pleno), Decimal::from(75));
        assert_eq!(table.rate(specialty.id, ExperienceLevel::Senior), Decimal::from(120));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_unknown_specialty_rates_zero() {
        let table = RateTable::from_specialties([&design()]);
        assert_eq!(table.rate(Uuid::new_v4(), ExperienceLevel::Junior), Decimal::ZERO);
    }

    #[test]
    fn test_validate_rejects_negative_rate() {
        let mut specialty = design();
        specialty.rates.junior = Decimal::from(-1);
        assert!(specialty.validate().is_err());

        let mut specialty = design();
        specialty.name = "  ".to_string();
        assert!(specialty.validate().is_err());

        assert!(design().validate().is_ok());
    }

    #[test]
    fn test_tier_serializes_lowercase() {
        let json = serde_json::to_string(&ExperienceLevel::Iniciante).unwrap();
        assert_eq!(json, "\"iniciante\"");

        let level: ExperienceLevel = serde_json::from_str("\"senior\"").unwrap();
        assert_eq!(level, ExperienceLevel::Senior);
    }
}
