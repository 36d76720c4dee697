//! Quote → order conversion

use shared::models::{Aggregate, AuditAction, OrderStatus, Quote, QuoteStatus};

use super::service::AggregateService;
use crate::auth::RequestContext;
use crate::db::{ORDERS_TABLE, QUOTES_TABLE, get_json, put_json, scan_json};
use crate::finance::FinancialRecalculator;
use crate::lifecycle::LifecycleStatus;
use crate::sequence::SequenceGenerator;
use crate::utils::{AppError, AppResult};

impl AggregateService<OrderStatus> {
    /// Create a DRAFT order from an ACCEPTED quote
    ///
    /// Items and tax rate are copied; the quote id is kept as the order's
    /// `source_id`. A quote converts at most once.
    pub fn convert_quote(
        &self,
        ctx: &RequestContext,
        quote_id: &str,
    ) -> AppResult<Aggregate<OrderStatus>> {
        let now = self.deps.clock.now_millis();
        let txn = self.deps.store.begin_write()?;

        let quote: Quote = get_json(&txn, QUOTES_TABLE, quote_id)?
            .ok_or_else(|| AppError::not_found(format!("quote {}", quote_id)))?;
        if quote.status != QuoteStatus::Accepted {
            return Err(AppError::validation(format!(
                "quote {} is {}; only ACCEPTED quotes can be converted",
                quote.number, quote.status
            )));
        }

        let existing: Vec<Aggregate<OrderStatus>> = scan_json(&txn, ORDERS_TABLE)?;
        if let Some(order) = existing
            .iter()
            .find(|o| o.source_id.as_deref() == Some(quote_id))
        {
            return Err(AppError::Conflict(format!(
                "quote {} was already converted to order {}",
                quote.number, order.number
            )));
        }

        let number = SequenceGenerator::next_in(
            &txn,
            OrderStatus::DOCUMENT_TYPE,
            OrderStatus::DOCUMENT_TYPE.default_prefix(),
            shared::util::year_of_millis(now),
        )?;
        let mut order = Aggregate::new(
            uuid::Uuid::new_v4().to_string(),
            number,
            OrderStatus::INITIAL,
            quote.tax_rate,
            ctx.actor_id.clone(),
            now,
        );
        order.notes = quote.notes.clone();
        order.counterparty_id = quote.counterparty_id.clone();
        order.source_id = Some(quote.id.clone());
        order.items = quote
            .items
            .iter()
            .map(|item| shared::models::LineItem {
                id: uuid::Uuid::new_v4().to_string(),
                ..item.clone()
            })
            .collect();
        FinancialRecalculator::apply(&mut order);
        put_json(&txn, ORDERS_TABLE, &order.id, &order)?;
        txn.commit()?;

        tracing::info!(
            quote_id = %quote.id,
            quote = %quote.number,
            order_id = %order.id,
            order = %order.number,
            actor = %ctx.actor_id,
            "Quote converted to order"
        );
        self.deps.effects.dispatch(vec![self.audit_hook(
            AuditAction::Create,
            &ctx.actor_id,
            None,
            &order,
        )]);

        Ok(order)
    }
}
