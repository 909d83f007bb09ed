//! Product domain types
//!
//! The work breakdown (product -> tasks -> steps) in two shapes: the
//! authored [`ProductDraft`] and the engine-produced [`PricedProduct`].
//! Derived amounts only exist on the priced side.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::specialty::ExperienceLevel;

/// Atomic costed unit of work (hours x rate)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub name: String,
    /// Display/execution order within the task; never affects cost
    #[serde(default)]
    pub order: i32,
    #[serde(default)]
    pub estimated_hours: Decimal,
    #[serde(default)]
    pub specialty_id: Option<Uuid>,
    #[serde(default)]
    pub experience_level: Option<ExperienceLevel>,
}

/// Question input kind
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    Text,
    Multiline,
    Select,
    Multiselect,
    File,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    #[serde(default)]
    pub required: bool,
    /// Choices for select/multiselect questions
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

/// Briefing questions attached to a task. Outside the cost model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Questionnaire {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub questions: Vec<Question>,
}

/// Authored task: ordering metadata plus its steps
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub name: String,
    /// Ids of sibling tasks that must finish first
    #[serde(default)]
    pub dependencies: Vec<Uuid>,
    #[serde(default)]
    pub can_run_in_parallel: bool,
    #[serde(default)]
    pub steps: Vec<Step>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub questionnaire: Option<Questionnaire>,
}

/// Alternate scope/quantity package with an additive price delta
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Variation {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub label: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub price_modifier: Decimal,
}

fn default_quantity() -> u32 {
    1
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum AddOnCategory {
    CreativeType,
    #[default]
    Extra,
}

/// Optional additive line item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AddOn {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub name: String,
    pub price: Decimal,
    #[serde(default)]
    pub category: AddOnCategory,
}

/// Authored product, the input of the pricing engine
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub variations: Vec<Variation>,
    #[serde(default)]
    pub add_ons: Vec<AddOn>,
}

fn default_true() -> bool {
    true
}

impl ProductDraft {
    /// Edit-boundary checks on authored fields. Task graph shape is checked
    /// by the pricing engine.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Product name is required".to_string());
        }
        for task in &self.tasks {
            for step in &task.steps {
                if step.estimated_hours.is_sign_negative() && !step.estimated_hours.is_zero() {
                    return Err(format!(
                        "Step '{}' in task '{}' has negative estimated hours",
                        step.name, task.name
                    ));
                }
            }
        }
        if let Some(add_on) = self
            .add_ons
            .iter()
            .find(|a| a.price.is_sign_negative() && !a.price.is_zero())
        {
            return Err(format!("Add-on '{}' has a negative price", add_on.name));
        }
        Ok(())
    }

    pub fn step_count(&self) -> usize {
        self.tasks.iter().map(|t| t.steps.len()).sum()
    }
}

/// Step with its engine-computed cost
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PricedStep {
    #[serde(flatten)]
    pub step: Step,
    pub calculated_cost: Decimal,
}

/// Task with its priced steps and cost
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PricedTask {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub dependencies: Vec<Uuid>,
    #[serde(default)]
    pub can_run_in_parallel: bool,
    pub steps: Vec<PricedStep>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub questionnaire: Option<Questionnaire>,
    pub calculated_cost: Decimal,
}

impl PricedTask {
    pub fn to_task(&self) -> Task {
        Task {
            id: self.id,
            name: self.name.clone(),
            dependencies: self.dependencies.clone(),
            can_run_in_parallel: self.can_run_in_parallel,
            steps: self.steps.iter().map(|s| s.step.clone()).collect(),
            questionnaire: self.questionnaire.clone(),
        }
    }
}

/// Product-level derived totals
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdown {
    pub total_tasks_cost: Decimal,
    /// Aggregated percentage commissions
    pub qualification_fee: Decimal,
    pub subtotal: Decimal,
    pub taxes: Decimal,
    /// Aggregated fees, percentage and fixed
    pub operational_fee: Decimal,
    /// Reserved; always zero until a formula is defined
    pub partner_commission: Decimal,
    pub final_price: Decimal,
}

/// Engine output: the authored structure plus every derived amount
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PricedProduct {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub category: String,
    pub is_active: bool,
    pub tasks: Vec<PricedTask>,
    #[serde(default)]
    pub variations: Vec<Variation>,
    #[serde(default)]
    pub add_ons: Vec<AddOn>,
    #[serde(flatten)]
    pub breakdown: PriceBreakdown,
}

impl PricedProduct {
    /// Recovers the authored input so the product can be re-priced.
    pub fn to_draft(&self) -> ProductDraft {
        ProductDraft {
            id: self.id,
            name: self.name.clone(),
            category: self.category.clone(),
            is_active: self.is_active,
            tasks: self.tasks.iter().map(PricedTask::to_task).collect(),
            variations: self.variations.clone(),
            add_ons: self.add_ons.clone(),
        }
    }

    pub fn final_price(&self) -> Decimal {
        self.breakdown.final_price
    }
}

/// Variation/add-on choice for a package quote
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    #[serde(default)]
    pub variation_id: Option<Uuid>,
    #[serde(default)]
    pub add_on_ids: Vec<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_defaults_from_minimal_json() {
        let json = serde_json::json!({
            "name": "Logo design",
            "tasks": [
                { "name": "Briefing", "steps": [ { "name": "Call", "estimatedHours": 1.5 } ] }
            ]
        });

        let draft: ProductDraft = serde_json::from_value(json).unwrap();
        assert!(draft.is_active);
        assert_eq!(draft.tasks.len(), 1);
        let step = &draft.tasks[0].steps[0];
        assert_eq!(step.estimated_hours, Decimal::new(15, 1));
        assert!(step.specialty_id.is_none());
        assert!(step.experience_level.is_none());
        assert_eq!(draft.step_count(), 1);
    }

    #[test]
    fn test_validate_rejects_negative_hours() {
        let mut draft: ProductDraft = serde_json::from_value(serde_json::json!({
            "name": "Site",
            "tasks": [ { "name": "Build", "steps": [ { "name": "Code", "estimatedHours": 4 } ] } ]
        }))
        .unwrap();
        assert!(draft.validate().is_ok());

        draft.tasks[0].steps[0].estimated_hours = Decimal::from(-2);
        assert!(draft.validate().is_err());
    }

    #[test]
    fn test_priced_product_serializes_flat_totals() {
        let priced = PricedProduct {
            id: Uuid::new_v4(),
            name: "Empty".to_string(),
            category: "branding".to_string(),
            is_active: true,
            tasks: vec![],
            variations: vec![],
            add_ons: vec![],
            breakdown: PriceBreakdown::default(),
        };

        let value = serde_json::to_value(&priced).unwrap();
        assert!(value.get("finalPrice").is_some());
        assert!(value.get("partnerCommission").is_some());
        assert!(value.get("breakdown").is_none());

        let back: PricedProduct = serde_json::from_value(value).unwrap();
        assert_eq!(back, priced);
    }
}
