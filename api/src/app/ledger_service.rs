//! Ledger service
//!
//! Income and expense entries. Income may carry a receipt file, which is
//! validated, stored, and removed again if the database write fails.

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::domain::entities::{
    CustomerId, ExpenseEntry, IncomeEntry, IncomeType, NewActivity, NewExpenseEntry,
    NewIncomeEntry,
};
use crate::domain::ports::{CustomerRepository, ExpenseRepository, IncomeRepository, ReceiptStore};
use crate::domain::rules::{validate_receipt, DateWindow, ReceiptUpload};
use crate::error::{AppError, DomainError};

/// Largest amount a NUMERIC(10,2) column holds
const MAX_AMOUNT: Decimal = Decimal::from_parts(99_999_999, 0, 0, false, 0);

/// Input for recording income
#[derive(Debug, Clone)]
pub struct CreateIncome {
    pub income_type: IncomeType,
    pub print_type: Option<String>,
    pub amount: Decimal,
    pub customer_id: Option<CustomerId>,
    pub description: Option<String>,
    pub receipt: Option<ReceiptUpload>,
}

/// Input for recording an expense
#[derive(Debug, Clone)]
pub struct CreateExpense {
    pub amount: Decimal,
    pub reason: String,
    pub description: Option<String>,
}

/// Service for income and expense entries
pub struct LedgerService<IR, ER, CR, RS>
where
    IR: IncomeRepository + ?Sized,
    ER: ExpenseRepository + ?Sized,
    CR: CustomerRepository + ?Sized,
    RS: ReceiptStore + ?Sized,
{
    income: Arc<IR>,
    expenses: Arc<ER>,
    customers: Arc<CR>,
    receipts: Arc<RS>,
    max_receipt_bytes: usize,
}

impl<IR, ER, CR, RS> LedgerService<IR, ER, CR, RS>
where
    IR: IncomeRepository + ?Sized,
    ER: ExpenseRepository + ?Sized,
    CR: CustomerRepository + ?Sized,
    RS: ReceiptStore + ?Sized,
{
    pub fn new(
        income: Arc<IR>,
        expenses: Arc<ER>,
        customers: Arc<CR>,
        receipts: Arc<RS>,
        max_receipt_bytes: usize,
    ) -> Self {
        Self {
            income,
            expenses,
            customers,
            receipts,
            max_receipt_bytes,
        }
    }

    /// Income entries created within `window`, newest first
    pub async fn list_income(&self, window: &DateWindow) -> Result<Vec<IncomeEntry>, AppError> {
        Ok(self.income.list(window).await?)
    }

    /// Print income entries, newest first
    pub async fn list_prints(&self) -> Result<Vec<IncomeEntry>, AppError> {
        Ok(self.income.list_by_type(IncomeType::Prints).await?)
    }

    /// Record an income entry, storing its receipt first when one is attached
    pub async fn create_income(&self, input: CreateIncome) -> Result<IncomeEntry, AppError> {
        let amount = validate_amount(input.amount)?;

        let print_type = match input.income_type {
            IncomeType::Prints => Some(
                non_blank(input.print_type)
                    .ok_or_else(|| DomainError::Validation("نوع المطبوع مطلوب".to_string()))?,
            ),
            IncomeType::Subscription => None,
        };

        if let Some(customer_id) = &input.customer_id {
            if self.customers.find_by_id(customer_id).await?.is_none() {
                return Err(
                    DomainError::Validation("العميل المحدد غير موجود".to_string()).into(),
                );
            }
        }

        let receipt_url = match &input.receipt {
            Some(upload) => {
                let kind = validate_receipt(upload, self.max_receipt_bytes)?;
                Some(self.receipts.store(kind, &upload.bytes).await?)
            }
            None => None,
        };

        let entry = NewIncomeEntry {
            income_type: input.income_type,
            print_type,
            amount,
            customer_id: input.customer_id,
            receipt_url: receipt_url.clone(),
            description: non_blank(input.description),
        };

        match self
            .income
            .create(&entry, &NewActivity::income_added(amount))
            .await
        {
            Ok(created) => {
                tracing::info!(
                    income_id = %created.id,
                    income_type = %created.income_type,
                    amount = %created.amount,
                    "Recorded income"
                );
                Ok(created)
            }
            Err(e) => {
                if let Some(url) = receipt_url {
                    if let Err(cleanup) = self.receipts.remove(&url).await {
                        tracing::warn!(error = %cleanup, url = %url, "Failed to remove orphaned receipt");
                    }
                }
                Err(e.into())
            }
        }
    }

    /// Expense entries created within `window`, newest first
    pub async fn list_expenses(&self, window: &DateWindow) -> Result<Vec<ExpenseEntry>, AppError> {
        Ok(self.expenses.list(window).await?)
    }

    /// Record an expense entry
    pub async fn create_expense(&self, input: CreateExpense) -> Result<ExpenseEntry, AppError> {
        let amount = validate_amount(input.amount)?;
        let reason = input.reason.trim().to_string();
        if reason.is_empty() {
            return Err(DomainError::Validation("سبب المصروف مطلوب".to_string()).into());
        }

        let entry = NewExpenseEntry {
            amount,
            description: non_blank(input.description),
            reason,
        };
        let created = self
            .expenses
            .create(&entry, &NewActivity::expense_added(amount, &entry.reason))
            .await?;

        tracing::info!(expense_id = %created.id, amount = %created.amount, "Recorded expense");
        Ok(created)
    }
}

/// Non-negative, at most two decimal places once rounded, within column range
fn validate_amount(amount: Decimal) -> Result<Decimal, DomainError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(DomainError::Validation(
            "المبلغ يجب أن يكون صفراً أو أكثر".to_string(),
        ));
    }
    let amount = amount.round_dp(2);
    if amount > MAX_AMOUNT {
        return Err(DomainError::Validation("المبلغ كبير جداً".to_string()));
    }
    Ok(amount)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
