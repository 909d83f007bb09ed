//! Pricing engine
//!
//! Pure cost cascade from an authored [`ProductDraft`] to a
//! [`PricedProduct`]:
//!
//! 1. step cost = hours x rate(specialty, tier), zero when unassigned
//! 2. task cost = sum of its steps
//! 3. total tasks cost = sum of tasks
//! 4. commissions = sum of active percentage commissions over the base
//! 5. fees = active percentage fees over the base + active fixed fees
//! 6. taxes = sum of active percentage taxes over the base
//! 7. subtotal = base + commissions
//! 8. final price = subtotal + fees + taxes
//!
//! The rate table and rule set are explicit inputs; nothing here reads
//! shared state or performs I/O.

pub mod graph;

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::pricing_component::{ComponentType, PricingComponent, PricingRuleSet, ValueType};
use crate::domain::product::{
    PriceBreakdown, PricedProduct, PricedStep, PricedTask, ProductDraft, Selection, Step, Task,
};
use crate::domain::specialty::RateTable;

pub use graph::{execution_order, validate_task_graph};

/// Structural problems that make a product unpriceable
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PricingError {
    #[error("Task {task_id} depends on itself")]
    SelfDependency { task_id: Uuid },

    #[error("Task {task_id} depends on unknown task {dependency}")]
    UnknownDependency { task_id: Uuid, dependency: Uuid },

    #[error("Task id {task_id} is used more than once")]
    DuplicateTaskId { task_id: Uuid },

    #[error("Task dependencies form a cycle through {} task(s)", tasks.len())]
    DependencyCycle { tasks: Vec<Uuid> },

    #[error("Variation {0} does not belong to this product")]
    UnknownVariation(Uuid),

    #[error("Add-on {0} does not belong to this product")]
    UnknownAddOn(Uuid),
}

impl PricingError {
    /// True for errors in the task graph itself.
    pub fn is_structural(&self) -> bool {
        !matches!(self, Self::UnknownVariation(_) | Self::UnknownAddOn(_))
    }
}

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Prices a product against a rate table and rule set snapshot.
pub fn price_product(
    draft: &ProductDraft,
    rates: &RateTable,
    rules: &PricingRuleSet,
) -> Result<PricedProduct, PricingError> {
    validate_task_graph(&draft.tasks)?;

    let tasks: Vec<PricedTask> = draft.tasks.iter().map(|task| price_task(task, rates)).collect();
    let total_tasks_cost: Decimal = tasks.iter().map(|t| t.calculated_cost).sum();

    let breakdown = aggregate(total_tasks_cost, rules);

    tracing::debug!(
        product_id = %draft.id,
        tasks = tasks.len(),
        total_tasks_cost = %breakdown.total_tasks_cost,
        final_price = %breakdown.final_price,
        "Priced product"
    );

    Ok(PricedProduct {
        id: draft.id,
        name: draft.name.clone(),
        category: draft.category.clone(),
        is_active: draft.is_active,
        tasks,
        variations: draft.variations.clone(),
        add_ons: draft.add_ons.clone(),
        breakdown,
    })
}

/// Hours times the tier rate; zero when specialty or tier is unset.
pub fn step_cost(step: &Step, rates: &RateTable) -> Decimal {
    match (step.specialty_id, step.experience_level) {
        (Some(specialty_id), Some(level)) => {
            if !rates.contains(specialty_id) {
                tracing::debug!(
                    step_id = %step.id,
                    specialty_id = %specialty_id,
                    "Unknown specialty, step cost is zero"
                );
            }
            step.estimated_hours * rates.rate(specialty_id, level)
        }
        _ => Decimal::ZERO,
    }
}

fn price_task(task: &Task, rates: &RateTable) -> PricedTask {
    let steps: Vec<PricedStep> = task
        .steps
        .iter()
        .map(|step| PricedStep {
            step: step.clone(),
            calculated_cost: step_cost(step, rates),
        })
        .collect();
    let calculated_cost = steps.iter().map(|s| s.calculated_cost).sum();

    PricedTask {
        id: task.id,
        name: task.name.clone(),
        dependencies: task.dependencies.clone(),
        can_run_in_parallel: task.can_run_in_parallel,
        steps,
        questionnaire: task.questionnaire.clone(),
        calculated_cost,
    }
}

/// Product-level aggregation over the tasks cost.
///
/// Every active component of the matching type participates; `applies_to`
/// is not consulted here. Fixed commissions and fixed taxes are not summed,
/// only fixed fees are.
pub fn aggregate(total_tasks_cost: Decimal, rules: &PricingRuleSet) -> PriceBreakdown {
    let commissions = percentage_total(total_tasks_cost, rules, ComponentType::Commission);
    let fees_percentage = percentage_total(total_tasks_cost, rules, ComponentType::Fee);
    let fees_fixed: Decimal = usable(rules, ComponentType::Fee)
        .filter(|c| c.value_type == ValueType::Fixed)
        .map(|c| c.value)
        .sum();
    let taxes = percentage_total(total_tasks_cost, rules, ComponentType::Tax);

    let operational_fee = fees_percentage + fees_fixed;
    let subtotal = total_tasks_cost + commissions;
    let final_price = subtotal + operational_fee + taxes;

    PriceBreakdown {
        total_tasks_cost,
        qualification_fee: commissions,
        subtotal,
        taxes,
        operational_fee,
        partner_commission: Decimal::ZERO,
        final_price,
    }
}

fn percentage_total(base: Decimal, rules: &PricingRuleSet, component_type: ComponentType) -> Decimal {
    usable(rules, component_type)
        .filter(|c| c.value_type == ValueType::Percentage)
        .map(|c| base * c.value / HUNDRED)
        .sum()
}

/// Active components of one type, minus any that break the value contract.
fn usable<'a>(
    rules: &'a PricingRuleSet,
    component_type: ComponentType,
) -> impl Iterator<Item = &'a PricingComponent> {
    rules
        .active_components(Some(component_type))
        .into_iter()
        .filter(|c| {
            if c.value.is_sign_negative() && !c.value.is_zero() {
                tracing::warn!(
                    component_id = %c.id,
                    component_type = %c.component_type,
                    value = %c.value,
                    "Skipping pricing component with negative value"
                );
                return false;
            }
            true
        })
}

/// Package price for a variation/add-on selection.
///
/// `final_price` plus the selected variation's modifier plus every selected
/// add-on price. The stored final price is left as is.
pub fn quote_selection(product: &PricedProduct, selection: &Selection) -> Result<Decimal, PricingError> {
    let mut total = product.final_price();

    if let Some(variation_id) = selection.variation_id {
        let variation = product
            .variations
            .iter()
            .find(|v| v.id == variation_id)
            .ok_or(PricingError::UnknownVariation(variation_id))?;
        total += variation.price_modifier;
    }

    for add_on_id in &selection.add_on_ids {
        let add_on = product
            .add_ons
            .iter()
            .find(|a| a.id == *add_on_id)
            .ok_or(PricingError::UnknownAddOn(*add_on_id))?;
        total += add_on.price;
    }

    Ok(total)
}
