//! Pricing component domain types
//!
//! Commissions, fees and taxes applied on top of the work breakdown cost.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Kind of pricing rule
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ComponentType {
    Commission,
    Fee,
    Tax,
}

impl std::fmt::Display for ComponentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Commission => write!(f, "commission"),
            Self::Fee => write!(f, "fee"),
            Self::Tax => write!(f, "tax"),
        }
    }
}

/// How a component's value is interpreted
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    /// Parts per hundred of the base it is applied to
    Percentage,
    /// Absolute currency amount, independent of the base
    Fixed,
}

/// A configurable commission, fee or tax
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PricingComponent {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub component_type: ComponentType,
    pub value: Decimal,
    pub value_type: ValueType,
    /// Tier/category labels gating participation in level-scoped queries
    #[serde(default)]
    pub applies_to: Vec<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl PricingComponent {
    pub fn is_percentage(&self) -> bool {
        self.value_type == ValueType::Percentage
    }

    /// True when `level` is absent or listed in `applies_to`.
    pub fn applies_to_level(&self, level: Option<&str>) -> bool {
        match level {
            None => true,
            Some(level) => self.applies_to.iter().any(|label| label == level),
        }
    }

    pub fn validate(&self) -> Result<(), RuleSetError> {
        if self.value.is_sign_negative() && !self.value.is_zero() {
            return Err(RuleSetError::NegativeValue(self.id));
        }
        if self.name.trim().is_empty() {
            return Err(RuleSetError::MissingName(self.id));
        }
        Ok(())
    }
}

/// Request DTO for creating or replacing a pricing component
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingComponentRequest {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub name: String,
    #[serde(rename = "type")]
    pub component_type: ComponentType,
    pub value: Decimal,
    pub value_type: ValueType,
    #[serde(default)]
    pub applies_to: Vec<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl PricingComponentRequest {
    pub fn into_component(self, id: Uuid) -> PricingComponent {
        PricingComponent {
            id,
            name: self.name,
            component_type: self.component_type,
            value: self.value,
            value_type: self.value_type,
            applies_to: self.applies_to,
            is_active: self.is_active,
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RuleSetError {
    #[error("Pricing component {0} already exists")]
    DuplicateId(Uuid),

    #[error("Pricing component {0} not found")]
    NotFound(Uuid),

    #[error("Pricing component {0} has a negative value")]
    NegativeValue(Uuid),

    #[error("Pricing component {0} has no name")]
    MissingName(Uuid),
}

/// Ordered collection of pricing components.
///
/// Insertion order is preserved; there is no priority among components of
/// the same type.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct PricingRuleSet {
    components: Vec<PricingComponent>,
}

impl PricingRuleSet {
    pub fn new(components: Vec<PricingComponent>) -> Self {
        Self { components }
    }

    pub fn iter(&self) -> impl Iterator<Item = &PricingComponent> {
        self.components.iter()
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<&PricingComponent> {
        self.components.iter().find(|c| c.id == id)
    }

    pub fn into_vec(self) -> Vec<PricingComponent> {
        self.components
    }

    /// Active components, optionally restricted to one type.
    pub fn active_components(&self, component_type: Option<ComponentType>) -> Vec<&PricingComponent> {
        self.components
            .iter()
            .filter(|c| c.is_active)
            .filter(|c| component_type.map_or(true, |t| c.component_type == t))
            .collect()
    }

    /// Sum of active percentage values of `component_type` (20 means 20%).
    ///
    /// With a `level`, only components whose `applies_to` lists it are
    /// counted.
    pub fn total_rate(&self, component_type: ComponentType, level: Option<&str>) -> Decimal {
        self.active_components(Some(component_type))
            .into_iter()
            .filter(|c| c.is_percentage())
            .filter(|c| c.applies_to_level(level))
            .map(|c| c.value)
            .sum()
    }

    pub fn add(&mut self, component: PricingComponent) -> Result<(), RuleSetError> {
        component.validate()?;
        if self.get(component.id).is_some() {
            return Err(RuleSetError::DuplicateId(component.id));
        }
        self.components.push(component);
        Ok(())
    }

    /// Replaces the component with the same id, keeping its position.
    pub fn update(&mut self, component: PricingComponent) -> Result<(), RuleSetError> {
        component.validate()?;
        let slot = self
            .components
            .iter_mut()
            .find(|c| c.id == component.id)
            .ok_or(RuleSetError::NotFound(component.id))?;
        *slot = component;
        Ok(())
    }

    pub fn delete(&mut self, id: Uuid) -> Result<PricingComponent, RuleSetError> {
        let index = self
            .components
            .iter()
            .position(|c| c.id == id)
            .ok_or(RuleSetError::NotFound(id))?;
        Ok(self.components.remove(index))
    }
}
