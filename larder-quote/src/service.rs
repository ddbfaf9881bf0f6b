use chrono::Utc;
use larder_catalog::batch::{self, GradedCustomer, PriceSheet};
use larder_catalog::{AdjustmentBook, AdjustmentSource, Grade, PricingEngine, Product};
use larder_core::repository::{
    AdjustmentRepository, CustomerRepository, MarginRepository, ProductRepository,
};
use larder_core::{CoreError, CoreResult};
use larder_shared::{PriceCalculatedEvent, RenegotiationFlaggedEvent};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::models::Quote;

/// Resolves pricing inputs from the data-access layer and runs them through the engine
pub struct QuoteService {
    products: Arc<dyn ProductRepository>,
    customers: Arc<dyn CustomerRepository>,
    margins: Arc<dyn MarginRepository>,
    adjustments: Arc<dyn AdjustmentRepository>,
    calculated_tx: broadcast::Sender<PriceCalculatedEvent>,
    flagged_tx: broadcast::Sender<RenegotiationFlaggedEvent>,
}

impl QuoteService {
    pub fn new(
        products: Arc<dyn ProductRepository>,
        customers: Arc<dyn CustomerRepository>,
        margins: Arc<dyn MarginRepository>,
        adjustments: Arc<dyn AdjustmentRepository>,
        publish_capacity: usize,
    ) -> Self {
        let (calculated_tx, _) = broadcast::channel(publish_capacity.max(1));
        let (flagged_tx, _) = broadcast::channel(publish_capacity.max(1));
        Self {
            products,
            customers,
            margins,
            adjustments,
            calculated_tx,
            flagged_tx,
        }
    }

    /// Build the service over a single store implementing every lookup
    pub fn with_store<S>(store: Arc<S>, publish_capacity: usize) -> Self
    where
        S: ProductRepository
            + CustomerRepository
            + MarginRepository
            + AdjustmentRepository
            + 'static,
    {
        Self::new(
            store.clone(),
            store.clone(),
            store.clone(),
            store,
            publish_capacity,
        )
    }

    /// Operator-facing stream of grade D prices that fell under their margin floor
    pub fn subscribe(&self) -> broadcast::Receiver<RenegotiationFlaggedEvent> {
        self.flagged_tx.subscribe()
    }

    /// Every successful quote, flagged or not
    pub fn subscribe_calculated(&self) -> broadcast::Receiver<PriceCalculatedEvent> {
        self.calculated_tx.subscribe()
    }

    /// Quote one product for one customer.
    /// `buy_price` is the rolling purchase cost and only matters for fresh items.
    pub async fn quote(
        &self,
        customer_code: &str,
        product_code: &str,
        buy_price: f64,
    ) -> CoreResult<Quote> {
        let grade = self.grade_for(customer_code).await?;
        let product = self
            .products
            .get_product(product_code)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("product {}", product_code)))?;
        let engine = PricingEngine::new(self.margins.load_tables().await?);
        let book = self.adjustments.adjustments_for(customer_code).await?;
        let adjustment = book.resolve(customer_code, product_code);

        let min_margin_check_percent = match (&product, grade) {
            (Product::Industrial(_), Grade::D) => engine
                .tables()
                .industrial
                .entry_for(Grade::D)
                .map(|m| m.min_margin_check_percent),
            _ => None,
        };

        let result = engine.calculate(&product, grade, buy_price, adjustment)?;

        let quote = Quote {
            id: Uuid::new_v4(),
            customer_code: customer_code.to_string(),
            product_code: product_code.to_string(),
            grade,
            price_type: product.price_type(),
            buy_price,
            adjustment,
            result,
            min_margin_check_percent,
            created_at: Utc::now(),
        };

        if self.calculated_tx.send(quote.calculated_event()).is_err() {
            tracing::trace!("No price subscribers");
        }
        if let Some(event) = quote.renegotiation_event() {
            self.publish(event);
        }

        Ok(quote)
    }

    /// Reprice the whole catalog for one customer.
    /// Fresh items are priced from `buy_prices`, keyed by product code.
    pub async fn price_sheet(
        &self,
        customer_code: &str,
        buy_prices: HashMap<String, f64>,
    ) -> CoreResult<PriceSheet> {
        let customer = GradedCustomer {
            customer_code: customer_code.to_string(),
            grade: self.grade_for(customer_code).await?,
        };
        let products = self.products.list_products().await?;
        let engine = PricingEngine::new(self.margins.load_tables().await?);
        let book: AdjustmentBook = self.adjustments.adjustments_for(customer_code).await?;

        let sheet = tokio::task::spawn_blocking(move || {
            batch::price_sheet(&engine, &customer, &products, &buy_prices, &book)
        })
        .await
        .map_err(|e| CoreError::InternalError(format!("price sheet worker failed: {}", e)))?;

        tracing::info!(
            "Priced {} products for {} ({} flagged, {} failed)",
            sheet.lines.len(),
            customer_code,
            sheet.flagged().count(),
            sheet.failures.len()
        );

        Ok(sheet)
    }

    async fn grade_for(&self, customer_code: &str) -> CoreResult<Grade> {
        self.customers
            .get_grade(customer_code)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("customer grade {}", customer_code)))
    }

    fn publish(&self, event: RenegotiationFlaggedEvent) {
        tracing::info!(
            "Renegotiation needed: {} / {} margin {}% is {:.1} points under {}%",
            event.customer_code,
            event.product_code,
            event.margin_percent,
            event.shortfall(),
            event.min_margin_check_percent
        );
        if self.flagged_tx.send(event).is_err() {
            tracing::debug!("No renegotiation subscribers");
        }
    }
}
