//! Catalog service
//!
//! CRUD over specialties, pricing components and products. Product writes
//! are priced synchronously against the current rate table and rule set, so
//! a stored product always matches the configuration it was saved with.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::domain::{
    ComponentType, PricedProduct, PricingComponent, PricingRuleSet, ProductDraft, RateTable,
    RuleSetError, Selection, Specialty,
};
use crate::pricing::{self, PricingError};
use crate::store::{load_list, load_valid_items, save_list, Collection, CollectionStore, StoreError};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: Uuid },

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Invalid(String),

    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<RuleSetError> for CatalogError {
    fn from(err: RuleSetError) -> Self {
        match err {
            RuleSetError::NotFound(id) => Self::NotFound {
                kind: "Pricing component",
                id,
            },
            RuleSetError::DuplicateId(_) => Self::Conflict(err.to_string()),
            RuleSetError::NegativeValue(_) | RuleSetError::MissingName(_) => Self::Invalid(err.to_string()),
        }
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Stored product: priced output plus bookkeeping
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    #[serde(flatten)]
    pub product: PricedProduct,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Set when the last recomputation failed; the figures are from the last
    /// successful one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pricing_warning: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RecomputeFailure {
    pub product_id: Uuid,
    pub reason: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RecomputeReport {
    pub recomputed: usize,
    pub failed: Vec<RecomputeFailure>,
}

pub struct CatalogService {
    store: Arc<dyn CollectionStore>,
    /// Serializes this process's read-modify-write cycles.
    write_lock: Mutex<()>,
    recompute_on_config_change: bool,
}

impl CatalogService {
    pub fn new(store: Arc<dyn CollectionStore>, recompute_on_config_change: bool) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
            recompute_on_config_change,
        }
    }

    pub fn store(&self) -> &dyn CollectionStore {
        self.store.as_ref()
    }

    async fn specialties(&self) -> CatalogResult<Vec<Specialty>> {
        Ok(load_list(self.store(), Collection::Specialties).await?)
    }

    async fn rule_set(&self) -> CatalogResult<PricingRuleSet> {
        let components: Vec<PricingComponent> = load_valid_items(self.store(), Collection::PricingComponents).await?;
        Ok(PricingRuleSet::new(components))
    }

    async fn products(&self) -> CatalogResult<Vec<ProductRecord>> {
        Ok(load_list(self.store(), Collection::Products).await?)
    }

    /// Current rate table and rule set.
    pub async fn pricing_snapshot(&self) -> CatalogResult<(RateTable, PricingRuleSet)> {
        let specialties = self.specialties().await?;
        let rules = self.rule_set().await?;
        Ok((RateTable::from_specialties(&specialties), rules))
    }

    // =========================================================================
    //  Specialties
    // =========================================================================

    pub async fn list_specialties(&self) -> CatalogResult<Vec<Specialty>> {
        self.specialties().await
    }

    pub async fn get_specialty(&self, id: Uuid) -> CatalogResult<Specialty> {
        self.specialties()
            .await?
            .into_iter()
            .find(|s| s.id == id)
            .ok_or(CatalogError::NotFound { kind: "Specialty", id })
    }

    #[instrument(skip(self, specialty), fields(specialty_id = %specialty.id))]
    pub async fn add_specialty(&self, specialty: Specialty) -> CatalogResult<Specialty> {
        specialty.validate().map_err(CatalogError::Invalid)?;

        let _guard = self.write_lock.lock().await;
        let mut specialties = self.specialties().await?;
        if specialties.iter().any(|s| s.id == specialty.id) {
            return Err(CatalogError::Conflict(format!("Specialty {} already exists", specialty.id)));
        }
        specialties.push(specialty.clone());
        save_list(self.store(), Collection::Specialties, &specialties).await?;

        info!(name = %specialty.name, "Specialty created");
        self.after_config_change().await;
        Ok(specialty)
    }

    #[instrument(skip(self, specialty), fields(specialty_id = %specialty.id))]
    pub async fn update_specialty(&self, specialty: Specialty) -> CatalogResult<Specialty> {
        specialty.validate().map_err(CatalogError::Invalid)?;

        let _guard = self.write_lock.lock().await;
        let mut specialties = self.specialties().await?;
        let slot = specialties
            .iter_mut()
            .find(|s| s.id == specialty.id)
            .ok_or(CatalogError::NotFound {
                kind: "Specialty",
                id: specialty.id,
            })?;
        *slot = specialty.clone();
        save_list(self.store(), Collection::Specialties, &specialties).await?;

        info!("Specialty updated");
        self.after_config_change().await;
        Ok(specialty)
    }

    /// Removes a specialty. Steps still referencing it price at zero.
    #[instrument(skip(self))]
    pub async fn delete_specialty(&self, id: Uuid) -> CatalogResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut specialties = self.specialties().await?;
        let before = specialties.len();
        specialties.retain(|s| s.id != id);
        if specialties.len() == before {
            return Err(CatalogError::NotFound { kind: "Specialty", id });
        }
        save_list(self.store(), Collection::Specialties, &specialties).await?;

        info!("Specialty deleted");
        self.after_config_change().await;
        Ok(())
    }

    // =========================================================================
    //  Pricing components
    // =========================================================================

    pub async fn list_components(
        &self,
        component_type: Option<ComponentType>,
        active_only: bool,
    ) -> CatalogResult<Vec<PricingComponent>> {
        let rules = self.rule_set().await?;
        let components = if active_only {
            rules.active_components(component_type).into_iter().cloned().collect()
        } else {
            rules
                .into_vec()
                .into_iter()
                .filter(|c| component_type.map_or(true, |t| c.component_type == t))
                .collect()
        };
        Ok(components)
    }

    pub async fn get_component(&self, id: Uuid) -> CatalogResult<PricingComponent> {
        self.rule_set()
            .await?
            .get(id)
            .cloned()
            .ok_or(CatalogError::NotFound {
                kind: "Pricing component",
                id,
            })
    }

    pub async fn total_rate(&self, component_type: ComponentType, level: Option<&str>) -> CatalogResult<Decimal> {
        Ok(self.rule_set().await?.total_rate(component_type, level))
    }

    #[instrument(skip(self, component), fields(component_id = %component.id))]
    pub async fn add_component(&self, component: PricingComponent) -> CatalogResult<PricingComponent> {
        let _guard = self.write_lock.lock().await;
        let mut rules = self.rule_set().await?;
        rules.add(component.clone())?;
        self.save_rules(rules).await?;

        info!(
            component_type = %component.component_type,
            value = %component.value,
            "Pricing component created"
        );
        self.after_config_change().await;
        Ok(component)
    }

    #[instrument(skip(self, component), fields(component_id = %component.id))]
    pub async fn update_component(&self, component: PricingComponent) -> CatalogResult<PricingComponent> {
        let _guard = self.write_lock.lock().await;
        let mut rules = self.rule_set().await?;
        rules.update(component.clone())?;
        self.save_rules(rules).await?;

        info!(is_active = component.is_active, "Pricing component updated");
        self.after_config_change().await;
        Ok(component)
    }

    #[instrument(skip(self))]
    pub async fn delete_component(&self, id: Uuid) -> CatalogResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut rules = self.rule_set().await?;
        rules.delete(id)?;
        self.save_rules(rules).await?;

        info!("Pricing component deleted");
        self.after_config_change().await;
        Ok(())
    }

    async fn save_rules(&self, rules: PricingRuleSet) -> CatalogResult<()> {
        let components = rules.into_vec();
        save_list(self.store(), Collection::PricingComponents, &components).await?;
        Ok(())
    }

    /// Runs after a stored configuration change. A failed re-derivation is
    /// logged and leaves products for `recompute_all_products`; the change
    /// itself stays committed.
    async fn after_config_change(&self) {
        if !self.recompute_on_config_change {
            return;
        }
        match self.recompute_locked().await {
            Ok(report) => info!(
                recomputed = report.recomputed,
                failed = report.failed.len(),
                "Products re-derived after configuration change"
            ),
            Err(err) => error!(error = %err, "Re-deriving products after configuration change failed"),
        }
    }

    // =========================================================================
    //  Products
    // =========================================================================

    pub async fn list_products(&self) -> CatalogResult<Vec<ProductRecord>> {
        self.products().await
    }

    pub async fn get_product(&self, id: Uuid) -> CatalogResult<ProductRecord> {
        self.products()
            .await?
            .into_iter()
            .find(|p| p.product.id == id)
            .ok_or(CatalogError::NotFound { kind: "Product", id })
    }

    /// Prices a draft against the current configuration without storing it.
    pub async fn quote_product(&self, draft: &ProductDraft) -> CatalogResult<PricedProduct> {
        draft.validate().map_err(CatalogError::Invalid)?;
        let (rates, rules) = self.pricing_snapshot().await?;
        Ok(pricing::price_product(draft, &rates, &rules)?)
    }

    /// Package price of a stored product for a variation/add-on selection.
    pub async fn quote_selection(&self, id: Uuid, selection: &Selection) -> CatalogResult<Decimal> {
        let record = self.get_product(id).await?;
        pricing::quote_selection(&record.product, selection).map_err(|e| CatalogError::Invalid(e.to_string()))
    }

    #[instrument(skip(self, draft), fields(product_id = %draft.id))]
    pub async fn add_product(&self, draft: ProductDraft) -> CatalogResult<ProductRecord> {
        draft.validate().map_err(CatalogError::Invalid)?;

        let _guard = self.write_lock.lock().await;
        let mut products = self.products().await?;
        if products.iter().any(|p| p.product.id == draft.id) {
            return Err(CatalogError::Conflict(format!("Product {} already exists", draft.id)));
        }

        let priced = self.price(&draft).await?;
        let now = Utc::now();
        let record = ProductRecord {
            product: priced,
            created_at: now,
            updated_at: now,
            pricing_warning: None,
        };
        products.push(record.clone());
        save_list(self.store(), Collection::Products, &products).await?;

        info!(
            name = %record.product.name,
            final_price = %record.product.final_price(),
            "Product created"
        );
        Ok(record)
    }

    /// Replaces a product's authored structure and re-prices it. On a
    /// structural error nothing is stored.
    #[instrument(skip(self, draft), fields(product_id = %draft.id))]
    pub async fn update_product(&self, draft: ProductDraft) -> CatalogResult<ProductRecord> {
        draft.validate().map_err(CatalogError::Invalid)?;

        let _guard = self.write_lock.lock().await;
        let mut products = self.products().await?;
        let index = products
            .iter()
            .position(|p| p.product.id == draft.id)
            .ok_or(CatalogError::NotFound {
                kind: "Product",
                id: draft.id,
            })?;

        let priced = self.price(&draft).await?;
        let record = ProductRecord {
            product: priced,
            created_at: products[index].created_at,
            updated_at: Utc::now(),
            pricing_warning: None,
        };
        products[index] = record.clone();
        save_list(self.store(), Collection::Products, &products).await?;

        info!(final_price = %record.product.final_price(), "Product updated");
        Ok(record)
    }

    /// Deletes a product together with its tasks and steps.
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: Uuid) -> CatalogResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut products = self.products().await?;
        let before = products.len();
        products.retain(|p| p.product.id != id);
        if products.len() == before {
            return Err(CatalogError::NotFound { kind: "Product", id });
        }
        save_list(self.store(), Collection::Products, &products).await?;

        info!("Product deleted");
        Ok(())
    }

    /// Re-prices every stored product against the current configuration.
    ///
    /// A product that fails keeps its last computed figures and gets a
    /// warning; the others are unaffected.
    pub async fn recompute_all_products(&self) -> CatalogResult<RecomputeReport> {
        let _guard = self.write_lock.lock().await;
        self.recompute_locked().await
    }

    async fn recompute_locked(&self) -> CatalogResult<RecomputeReport> {
        let (rates, rules) = self.pricing_snapshot().await?;
        let mut products = self.products().await?;
        let mut report = RecomputeReport::default();

        for record in products.iter_mut() {
            match pricing::price_product(&record.product.to_draft(), &rates, &rules) {
                Ok(priced) => {
                    if priced != record.product {
                        record.product = priced;
                        record.updated_at = Utc::now();
                    }
                    record.pricing_warning = None;
                    report.recomputed += 1;
                }
                Err(err) => {
                    warn!(product_id = %record.product.id, error = %err, "Product recomputation failed");
                    record.pricing_warning = Some(err.to_string());
                    report.failed.push(RecomputeFailure {
                        product_id: record.product.id,
                        reason: err.to_string(),
                    });
                }
            }
        }

        save_list(self.store(), Collection::Products, &products).await?;
        Ok(report)
    }

    async fn price(&self, draft: &ProductDraft) -> CatalogResult<PricedProduct> {
        let (rates, rules) = self.pricing_snapshot().await?;
        pricing::price_product(draft, &rates, &rules).map_err(|err| {
            warn!(product_id = %draft.id, error = %err, "Product rejected");
            CatalogError::Pricing(err)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ExperienceLevel, SpecialtyStatus, Step, Task, TierRates, ValueType};
    use crate::store::MemoryStore;

    fn service(recompute_on_config_change: bool) -> CatalogService {
        CatalogService::new(Arc::new(MemoryStore::new()), recompute_on_config_change)
    }

    fn specialty(pleno: i64) -> Specialty {
        Specialty {
            id: Uuid::new_v4(),
            name: "Copywriting".to_string(),
            status: SpecialtyStatus::Active,
            rates: TierRates {
                pleno: Decimal::from(pleno),
                ..TierRates::default()
            },
            ai_assist: true,
            ai_surcharge: Some(Decimal::from(15)),
        }
    }

    fn component(component_type: ComponentType, value: i64, value_type: ValueType) -> PricingComponent {
        PricingComponent {
            id: Uuid::new_v4(),
            name: "rule".to_string(),
            component_type,
            value: Decimal::from(value),
            value_type,
            applies_to: vec![],
            is_active: true,
        }
    }

    fn task(hours: i64, specialty_id: Uuid) -> Task {
        Task {
            id: Uuid::new_v4(),
            name: "Write".to_string(),
            dependencies: vec![],
            can_run_in_parallel: true,
            steps: vec![Step {
                id: Uuid::new_v4(),
                name: "Draft copy".to_string(),
                order: 1,
                estimated_hours: Decimal::from(hours),
                specialty_id: Some(specialty_id),
                experience_level: Some(ExperienceLevel::Pleno),
            }],
            questionnaire: None,
        }
    }

    fn draft(tasks: Vec<Task>) -> ProductDraft {
        ProductDraft {
            id: Uuid::new_v4(),
            name: "Blog post".to_string(),
            category: "content".to_string(),
            is_active: true,
            tasks,
            variations: vec![],
            add_ons: vec![],
        }
    }

    /// Memory store that refuses to write the product collection.
    #[derive(Default)]
    struct ReadOnlyProducts {
        inner: MemoryStore,
    }

    #[async_trait::async_trait]
    impl CollectionStore for ReadOnlyProducts {
        async fn load(&self, collection: Collection) -> Result<Option<serde_json::Value>, StoreError> {
            self.inner.load(collection).await
        }

        async fn save(&self, collection: Collection, data: serde_json::Value) -> Result<(), StoreError> {
            if collection == Collection::Products {
                let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
                return Err(StoreError::Encode { collection, source });
            }
            self.inner.save(collection, data).await
        }

        async fn health_check(&self) -> bool {
            true
        }

        fn backend_name(&self) -> &'static str {
            "read-only-products"
        }
    }

    #[tokio::test]
    async fn test_add_product_prices_before_storing() {
        let catalog = service(false);
        let spec = catalog.add_specialty(specialty(75)).await.unwrap();
        catalog
            .add_component(component(ComponentType::Commission, 15, ValueType::Percentage))
            .await
            .unwrap();
        catalog
            .add_component(component(ComponentType::Fee, 50, ValueType::Fixed))
            .await
            .unwrap();
        catalog
            .add_component(component(ComponentType::Tax, 5, ValueType::Percentage))
            .await
            .unwrap();

        let record = catalog.add_product(draft(vec![task(10, spec.id)])).await.unwrap();
        assert_eq!(record.product.final_price(), Decimal::from(950));

        let stored = catalog.get_product(record.product.id).await.unwrap();
        assert_eq!(stored, record);
    }

    #[tokio::test]
    async fn test_rejected_update_keeps_stored_product() {
        let catalog = service(false);
        let spec = catalog.add_specialty(specialty(80)).await.unwrap();
        let record = catalog.add_product(draft(vec![task(1, spec.id)])).await.unwrap();

        let mut broken = record.product.to_draft();
        let own_id = broken.tasks[0].id;
        broken.tasks[0].dependencies.push(own_id);
        broken.tasks[0].steps[0].estimated_hours = Decimal::from(99);

        let err = catalog.update_product(broken).await.unwrap_err();
        assert!(matches!(err, CatalogError::Pricing(PricingError::SelfDependency { .. })));

        let stored = catalog.get_product(record.product.id).await.unwrap();
        assert_eq!(stored.product.final_price(), Decimal::from(80));
    }

    #[tokio::test]
    async fn test_stored_products_not_rederived_by_default() {
        let catalog = service(false);
        let mut spec = catalog.add_specialty(specialty(100)).await.unwrap();
        let record = catalog.add_product(draft(vec![task(2, spec.id)])).await.unwrap();

        spec.rates.pleno = Decimal::from(150);
        catalog.update_specialty(spec).await.unwrap();

        let stored = catalog.get_product(record.product.id).await.unwrap();
        assert_eq!(stored.product.final_price(), Decimal::from(200));

        let report = catalog.recompute_all_products().await.unwrap();
        assert_eq!(report.recomputed, 1);
        assert!(report.failed.is_empty());

        let stored = catalog.get_product(record.product.id).await.unwrap();
        assert_eq!(stored.product.final_price(), Decimal::from(300));
    }

    #[tokio::test]
    async fn test_config_change_rederives_when_enabled() {
        let catalog = service(true);
        let spec = catalog.add_specialty(specialty(100)).await.unwrap();
        let record = catalog.add_product(draft(vec![task(1, spec.id)])).await.unwrap();

        let fee = catalog
            .add_component(component(ComponentType::Fee, 10, ValueType::Percentage))
            .await
            .unwrap();
        let stored = catalog.get_product(record.product.id).await.unwrap();
        assert_eq!(stored.product.breakdown.operational_fee, Decimal::from(10));

        catalog.delete_component(fee.id).await.unwrap();
        let stored = catalog.get_product(record.product.id).await.unwrap();
        assert_eq!(stored.product.breakdown.operational_fee, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_recompute_failure_keeps_last_figures_and_warns() {
        let catalog = service(false);
        let spec = catalog.add_specialty(specialty(50)).await.unwrap();
        let healthy = catalog.add_product(draft(vec![task(2, spec.id)])).await.unwrap();
        let victim = catalog.add_product(draft(vec![task(4, spec.id)])).await.unwrap();

        // Corrupt the stored structure behind the service's back.
        let mut products: Vec<ProductRecord> = load_list(catalog.store(), Collection::Products).await.unwrap();
        let ghost = Uuid::new_v4();
        products[1].product.tasks[0].dependencies.push(ghost);
        save_list(catalog.store(), Collection::Products, &products).await.unwrap();

        let report = catalog.recompute_all_products().await.unwrap();
        assert_eq!(report.recomputed, 1);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].product_id, victim.product.id);

        let stored = catalog.get_product(victim.product.id).await.unwrap();
        assert_eq!(stored.product.final_price(), Decimal::from(200));
        assert!(stored.pricing_warning.is_some());

        let sibling = catalog.get_product(healthy.product.id).await.unwrap();
        assert!(sibling.pricing_warning.is_none());
        assert_eq!(sibling.product.final_price(), Decimal::from(100));
    }

    #[tokio::test]
    async fn test_delete_product_and_not_found() {
        let catalog = service(false);
        let record = catalog.add_product(draft(vec![])).await.unwrap();

        catalog.delete_product(record.product.id).await.unwrap();
        assert!(catalog.list_products().await.unwrap().is_empty());

        let err = catalog.delete_product(record.product.id).await.unwrap_err();
        assert!(matches!(err, CatalogError::NotFound { kind: "Product", .. }));
    }

    #[tokio::test]
    async fn test_duplicate_and_invalid_inputs() {
        let catalog = service(false);
        let spec = catalog.add_specialty(specialty(10)).await.unwrap();
        assert!(matches!(
            catalog.add_specialty(spec.clone()).await,
            Err(CatalogError::Conflict(_))
        ));

        let negative = component(ComponentType::Tax, -1, ValueType::Percentage);
        assert!(matches!(
            catalog.add_component(negative).await,
            Err(CatalogError::Invalid(_))
        ));

        let mut unnamed = draft(vec![]);
        unnamed.name = String::new();
        assert!(matches!(catalog.add_product(unnamed).await, Err(CatalogError::Invalid(_))));
    }

    #[tokio::test]
    async fn test_list_components_filters() {
        let catalog = service(false);
        let mut inactive = component(ComponentType::Fee, 3, ValueType::Percentage);
        inactive.is_active = false;
        catalog.add_component(inactive).await.unwrap();
        catalog
            .add_component(component(ComponentType::Fee, 4, ValueType::Percentage))
            .await
            .unwrap();
        catalog
            .add_component(component(ComponentType::Tax, 5, ValueType::Percentage))
            .await
            .unwrap();

        assert_eq!(catalog.list_components(None, false).await.unwrap().len(), 3);
        assert_eq!(catalog.list_components(Some(ComponentType::Fee), false).await.unwrap().len(), 2);
        assert_eq!(catalog.list_components(Some(ComponentType::Fee), true).await.unwrap().len(), 1);
        assert_eq!(
            catalog.total_rate(ComponentType::Fee, None).await.unwrap(),
            Decimal::from(4)
        );
    }

    #[tokio::test]
    async fn test_high_precision_amounts_survive_storage() {
        let catalog = service(false);
        let mut spec = specialty(0);
        spec.rates.pleno = "33.3333333333333333".parse().unwrap();
        let spec = catalog.add_specialty(spec).await.unwrap();

        let stored_spec = catalog.get_specialty(spec.id).await.unwrap();
        assert_eq!(stored_spec.rates.pleno.to_string(), "33.3333333333333333");
        assert_eq!(stored_spec, spec);

        let record = catalog.add_product(draft(vec![task(3, spec.id)])).await.unwrap();
        assert_eq!(record.product.final_price().to_string(), "99.9999999999999999");

        let stored = catalog.get_product(record.product.id).await.unwrap();
        assert_eq!(stored, record);

        let big: Decimal = "12345678.123456789".parse().unwrap();
        let mut fee = component(ComponentType::Fee, 0, ValueType::Fixed);
        fee.value = big;
        let fee = catalog.add_component(fee).await.unwrap();
        assert_eq!(catalog.get_component(fee.id).await.unwrap().value.to_string(), "12345678.123456789");
    }

    #[tokio::test]
    async fn test_config_change_survives_failed_rederivation() {
        let catalog = CatalogService::new(Arc::new(ReadOnlyProducts::default()), true);

        let spec = catalog.add_specialty(specialty(40)).await.unwrap();
        assert_eq!(catalog.get_specialty(spec.id).await.unwrap(), spec);

        let fee = catalog
            .add_component(component(ComponentType::Fee, 5, ValueType::Fixed))
            .await
            .unwrap();
        assert_eq!(catalog.get_component(fee.id).await.unwrap(), fee);

        catalog.delete_specialty(spec.id).await.unwrap();
        assert!(catalog.list_specialties().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_undecodable_component_is_skipped() {
        let store = Arc::new(MemoryStore::new());
        let valid = component(ComponentType::Fee, 50, ValueType::Fixed);
        store
            .save(
                Collection::PricingComponents,
                serde_json::json!([
                    serde_json::to_value(&valid).unwrap(),
                    {
                        "id": Uuid::new_v4(),
                        "name": "Legacy discount",
                        "type": "discount",
                        "value": 10,
                        "valueType": "percentage"
                    }
                ]),
            )
            .await
            .unwrap();
        let catalog = CatalogService::new(store, false);

        assert_eq!(catalog.list_components(None, false).await.unwrap(), vec![valid]);

        let record = catalog.add_product(draft(vec![])).await.unwrap();
        assert_eq!(record.product.final_price(), Decimal::from(50));
    }
}
