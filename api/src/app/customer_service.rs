//! Customer service
//!
//! Customer creation, subscription renewal and expiry queries. Expiry dates
//! are always derived here from the subscription rules, never taken from
//! the client.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::entities::{Customer, CustomerId, NewActivity, NewCustomer, SubscriptionType};
use crate::domain::ports::CustomerRepository;
use crate::domain::rules::{subscription, ExpiryStatus};
use crate::error::{AppError, DomainError};

const CUSTOMER_NOT_FOUND: &str = "العميل غير موجود";

/// Input for creating a customer
#[derive(Debug, Clone)]
pub struct CreateCustomer {
    pub name: String,
    pub menu_url: Option<String>,
    pub join_date: NaiveDate,
    pub subscription_type: SubscriptionType,
    pub is_active: bool,
}

/// A customer together with its expiry status as of today
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerView {
    #[serde(flatten)]
    pub customer: Customer,
    pub expiry_status: ExpiryStatus,
}

impl CustomerView {
    fn at(customer: Customer, today: NaiveDate) -> Self {
        let expiry_status = customer.expiry_status(today);
        Self {
            customer,
            expiry_status,
        }
    }
}

/// Service for managing customers
pub struct CustomerService<CR>
where
    CR: CustomerRepository + ?Sized,
{
    customers: Arc<CR>,
}

impl<CR> CustomerService<CR>
where
    CR: CustomerRepository + ?Sized,
{
    pub fn new(customers: Arc<CR>) -> Self {
        Self { customers }
    }

    /// All customers, newest first
    pub async fn list(&self, today: NaiveDate) -> Result<Vec<CustomerView>, AppError> {
        let customers = self.customers.list().await?;
        Ok(customers
            .into_iter()
            .map(|c| CustomerView::at(c, today))
            .collect())
    }

    /// Create a customer with its expiry derived from the join date
    pub async fn create(
        &self,
        input: CreateCustomer,
        today: NaiveDate,
    ) -> Result<CustomerView, AppError> {
        let name = input.name.trim().to_string();
        if name.is_empty() {
            return Err(DomainError::Validation("اسم العميل مطلوب".to_string()).into());
        }

        let expiry_date = subscription::compute_expiry(input.join_date, input.subscription_type)?;
        let new_customer = NewCustomer {
            menu_url: input
                .menu_url
                .map(|url| url.trim().to_string())
                .filter(|url| !url.is_empty()),
            join_date: input.join_date,
            subscription_type: input.subscription_type,
            expiry_date,
            is_active: input.is_active,
            name,
        };

        let customer = self
            .customers
            .create(&new_customer, &NewActivity::customer_added(&new_customer.name))
            .await?;

        tracing::info!(
            customer_id = %customer.id,
            subscription = %customer.subscription_type,
            expiry = %customer.expiry_date,
            "Created customer"
        );
        Ok(CustomerView::at(customer, today))
    }

    /// Extend a subscription by one year from its current expiry and reactivate it
    pub async fn renew(&self, id: &CustomerId, today: NaiveDate) -> Result<CustomerView, AppError> {
        let customer = self
            .customers
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(CUSTOMER_NOT_FOUND.to_string()))?;

        let expiry_date = subscription::renewed_expiry(customer.expiry_date)?;
        let renewed = self
            .customers
            .renew(
                id,
                expiry_date,
                &NewActivity::subscription_renewed(&customer.name),
            )
            .await?;

        tracing::info!(customer_id = %id, expiry = %renewed.expiry_date, "Renewed subscription");
        Ok(CustomerView::at(renewed, today))
    }

    /// Active customers whose subscription ends within `days` days, soonest first
    pub async fn expiring(&self, days: u32, today: NaiveDate) -> Result<Vec<CustomerView>, AppError> {
        let cutoff = subscription::expiring_cutoff(today, days)?;
        let customers = self.customers.find_expiring(cutoff).await?;
        Ok(customers
            .into_iter()
            .map(|c| CustomerView::at(c, today))
            .collect())
    }
}
