//! Mock implementations of port traits
//!
//! These are in-memory implementations that can be configured for testing.
//! All repositories built from one `InMemoryDb` share the same tables, so a
//! test can create a customer through one repository, read the activity log
//! through another, and see consistent aggregates from the stats repository.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use uuid::Uuid;

use crate::domain::entities::{
    Activity, ActivityId, Customer, CustomerId, Employee, EmployeeId, ExpenseEntry,
    ExpenseEntryId, IncomeEntry, IncomeEntryId, IncomeType, NewActivity, NewCustomer,
    NewEmployee, NewExpenseEntry, NewIncomeEntry, NewManualUser, NewSession, ProfileUpdate,
    Session, User, UserId,
};
use crate::domain::ports::{
    ActivityRepository, CustomerRepository, EmployeeRepository, ExpenseRepository,
    IncomeRepository, ReceiptStore, SessionRepository, StatsRepository, UserRepository,
};
use crate::domain::rules::{DateWindow, ReceiptKind};
use crate::error::DomainError;

const EMAIL_TAKEN: &str = "البريد الإلكتروني مستخدم بالفعل";

// ============================================================================
// Shared tables
// ============================================================================

#[derive(Default)]
struct Tables {
    users: HashMap<UserId, User>,
    sessions: HashMap<String, Session>,
    customers: HashMap<CustomerId, Customer>,
    income: Vec<IncomeEntry>,
    expenses: Vec<ExpenseEntry>,
    employees: HashMap<EmployeeId, Employee>,
    activities: Vec<Activity>,
}

impl Tables {
    fn log(&mut self, activity: &NewActivity, related_id: Uuid) {
        self.activities.push(Activity {
            id: ActivityId::new(),
            activity_type: activity.activity_type,
            description: activity.description.clone(),
            related_id: Some(related_id),
            created_at: Utc::now(),
        });
    }
}

/// In-memory database shared by the mock repositories
#[derive(Clone, Default)]
pub struct InMemoryDb {
    tables: Arc<RwLock<Tables>>,
    fail_writes: Arc<AtomicBool>,
}

impl InMemoryDb {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail with a database error
    pub fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }

    fn check_write(&self) -> Result<(), DomainError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(DomainError::Database("simulated write failure".to_string()));
        }
        Ok(())
    }

    /// Pre-populate with a customer for testing
    pub fn with_customer(self, customer: Customer) -> Self {
        self.tables
            .write()
            .unwrap()
            .customers
            .insert(customer.id, customer);
        self
    }

    /// Pre-populate with an employee for testing
    pub fn with_employee(self, employee: Employee) -> Self {
        self.tables
            .write()
            .unwrap()
            .employees
            .insert(employee.id, employee);
        self
    }

    /// Pre-populate with a user for testing
    pub fn with_user(self, user: User) -> Self {
        self.tables.write().unwrap().users.insert(user.id, user);
        self
    }

    /// Pre-populate with an income entry for testing
    pub fn with_income(self, entry: IncomeEntry) -> Self {
        self.tables.write().unwrap().income.push(entry);
        self
    }

    /// Pre-populate with an expense entry for testing
    pub fn with_expense(self, entry: ExpenseEntry) -> Self {
        self.tables.write().unwrap().expenses.push(entry);
        self
    }

    /// Pre-populate with a session for testing
    pub fn with_session(self, session: Session) -> Self {
        self.tables
            .write()
            .unwrap()
            .sessions
            .insert(session.token_hash.clone(), session);
        self
    }

    /// Snapshot of the activity log, oldest first
    pub fn activities(&self) -> Vec<Activity> {
        self.tables.read().unwrap().activities.clone()
    }

    /// Snapshot of stored sessions
    pub fn sessions(&self) -> Vec<Session> {
        self.tables.read().unwrap().sessions.values().cloned().collect()
    }

    pub fn users(&self) -> InMemoryUserRepository {
        InMemoryUserRepository(self.clone())
    }

    pub fn session_store(&self) -> InMemorySessionRepository {
        InMemorySessionRepository(self.clone())
    }

    pub fn customers(&self) -> InMemoryCustomerRepository {
        InMemoryCustomerRepository(self.clone())
    }

    pub fn income(&self) -> InMemoryIncomeRepository {
        InMemoryIncomeRepository(self.clone())
    }

    pub fn expenses(&self) -> InMemoryExpenseRepository {
        InMemoryExpenseRepository(self.clone())
    }

    pub fn employees(&self) -> InMemoryEmployeeRepository {
        InMemoryEmployeeRepository(self.clone())
    }

    pub fn activity_log(&self) -> InMemoryActivityRepository {
        InMemoryActivityRepository(self.clone())
    }

    pub fn stats(&self) -> InMemoryStatsRepository {
        InMemoryStatsRepository(self.clone())
    }
}

fn newest_first<T: Clone>(rows: impl Iterator<Item = T>, key: impl Fn(&T) -> DateTime<Utc>) -> Vec<T> {
    let mut rows: Vec<T> = rows.collect();
    rows.sort_by_key(|row| std::cmp::Reverse(key(row)));
    rows
}

// ============================================================================
// In-Memory User Repository
// ============================================================================

pub struct InMemoryUserRepository(InMemoryDb);

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        Ok(self.0.tables.read().unwrap().users.get(id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let tables = self.0.tables.read().unwrap();
        Ok(tables
            .users
            .values()
            .find(|u| u.username.as_deref() == Some(username))
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let tables = self.0.tables.read().unwrap();
        Ok(tables
            .users
            .values()
            .find(|u| u.email.as_deref() == Some(email))
            .cloned())
    }

    async fn list(&self) -> Result<Vec<User>, DomainError> {
        let tables = self.0.tables.read().unwrap();
        Ok(newest_first(tables.users.values().cloned(), |u| u.created_at))
    }

    async fn create_manual(
        &self,
        user: &NewManualUser,
        activity: &NewActivity,
    ) -> Result<User, DomainError> {
        self.0.check_write()?;
        let mut tables = self.0.tables.write().unwrap();
        if tables
            .users
            .values()
            .any(|u| u.username.as_deref() == Some(user.username.as_str()))
        {
            return Err(DomainError::Conflict("اسم المستخدم موجود بالفعل".to_string()));
        }
        if email_taken(&tables.users, user.email.as_deref(), None) {
            return Err(DomainError::Conflict(EMAIL_TAKEN.to_string()));
        }

        let now = Utc::now();
        let created = User {
            id: UserId::new(),
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            profile_image_url: None,
            username: Some(user.username.clone()),
            password_hash: Some(user.password_hash.clone()),
            role: user.role,
            is_manual_user: true,
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(created.id, created.clone());
        tables.log(activity, created.id.0);
        Ok(created)
    }

    async fn update_profile(
        &self,
        id: &UserId,
        update: &ProfileUpdate,
    ) -> Result<User, DomainError> {
        self.0.check_write()?;
        let mut tables = self.0.tables.write().unwrap();
        if let Some(username) = &update.username {
            if tables
                .users
                .values()
                .any(|u| u.id != *id && u.username.as_deref() == Some(username.as_str()))
            {
                return Err(DomainError::Conflict("اسم المستخدم موجود بالفعل".to_string()));
            }
        }
        if email_taken(&tables.users, update.email.as_deref(), Some(id)) {
            return Err(DomainError::Conflict(EMAIL_TAKEN.to_string()));
        }

        let user = tables
            .users
            .get_mut(id)
            .ok_or_else(|| DomainError::NotFound("المستخدم غير موجود".to_string()))?;
        if let Some(first_name) = &update.first_name {
            user.first_name = Some(first_name.clone());
        }
        if let Some(last_name) = &update.last_name {
            user.last_name = Some(last_name.clone());
        }
        if let Some(email) = &update.email {
            user.email = Some(email.clone());
        }
        if let Some(username) = &update.username {
            user.username = Some(username.clone());
        }
        if let Some(password_hash) = &update.password_hash {
            user.password_hash = Some(password_hash.clone());
        }
        user.updated_at = Utc::now();
        Ok(user.clone())
    }
}

/// Mirrors the unique index on `users.email`
fn email_taken(users: &HashMap<UserId, User>, email: Option<&str>, except: Option<&UserId>) -> bool {
    email.is_some_and(|email| {
        users
            .values()
            .any(|u| Some(&u.id) != except && u.email.as_deref() == Some(email))
    })
}

// ============================================================================
// In-Memory Session Repository
// ============================================================================

pub struct InMemorySessionRepository(InMemoryDb);

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn create(&self, session: &NewSession) -> Result<Session, DomainError> {
        self.0.check_write()?;
        let created = Session {
            token_hash: session.token_hash.clone(),
            user_id: session.user_id,
            created_at: Utc::now(),
            expires_at: session.expires_at,
        };
        self.0
            .tables
            .write()
            .unwrap()
            .sessions
            .insert(created.token_hash.clone(), created.clone());
        Ok(created)
    }

    async fn find_by_token_hash(&self, token_hash: &str) -> Result<Option<Session>, DomainError> {
        Ok(self.0.tables.read().unwrap().sessions.get(token_hash).cloned())
    }

    async fn delete(&self, token_hash: &str) -> Result<(), DomainError> {
        self.0.tables.write().unwrap().sessions.remove(token_hash);
        Ok(())
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, DomainError> {
        let mut tables = self.0.tables.write().unwrap();
        let before = tables.sessions.len();
        tables.sessions.retain(|_, s| !s.is_expired(now));
        Ok((before - tables.sessions.len()) as u64)
    }
}

// ============================================================================
// In-Memory Customer Repository
// ============================================================================

pub struct InMemoryCustomerRepository(InMemoryDb);

#[async_trait]
impl CustomerRepository for InMemoryCustomerRepository {
    async fn find_by_id(&self, id: &CustomerId) -> Result<Option<Customer>, DomainError> {
        Ok(self.0.tables.read().unwrap().customers.get(id).cloned())
    }

    async fn list(&self) -> Result<Vec<Customer>, DomainError> {
        let tables = self.0.tables.read().unwrap();
        Ok(newest_first(tables.customers.values().cloned(), |c| {
            c.created_at
        }))
    }

    async fn create(
        &self,
        customer: &NewCustomer,
        activity: &NewActivity,
    ) -> Result<Customer, DomainError> {
        self.0.check_write()?;
        let now = Utc::now();
        let created = Customer {
            id: CustomerId::new(),
            name: customer.name.clone(),
            menu_url: customer.menu_url.clone(),
            join_date: customer.join_date,
            subscription_type: customer.subscription_type,
            expiry_date: customer.expiry_date,
            is_active: customer.is_active,
            created_at: now,
            updated_at: now,
        };
        let mut tables = self.0.tables.write().unwrap();
        tables.customers.insert(created.id, created.clone());
        tables.log(activity, created.id.0);
        Ok(created)
    }

    async fn renew(
        &self,
        id: &CustomerId,
        expiry_date: NaiveDate,
        activity: &NewActivity,
    ) -> Result<Customer, DomainError> {
        self.0.check_write()?;
        let mut tables = self.0.tables.write().unwrap();
        let customer = tables
            .customers
            .get_mut(id)
            .ok_or_else(|| DomainError::NotFound("العميل غير موجود".to_string()))?;
        customer.expiry_date = expiry_date;
        customer.is_active = true;
        customer.updated_at = Utc::now();
        let renewed = customer.clone();
        tables.log(activity, id.0);
        Ok(renewed)
    }

    async fn find_expiring(&self, cutoff: NaiveDate) -> Result<Vec<Customer>, DomainError> {
        let tables = self.0.tables.read().unwrap();
        let mut rows: Vec<Customer> = tables
            .customers
            .values()
            .filter(|c| c.is_active && c.expiry_date <= cutoff)
            .cloned()
            .collect();
        rows.sort_by_key(|c| c.expiry_date);
        Ok(rows)
    }
}

// ============================================================================
// In-Memory Income Repository
// ============================================================================

pub struct InMemoryIncomeRepository(InMemoryDb);

#[async_trait]
impl IncomeRepository for InMemoryIncomeRepository {
    async fn list(&self, window: &DateWindow) -> Result<Vec<IncomeEntry>, DomainError> {
        let tables = self.0.tables.read().unwrap();
        Ok(newest_first(
            tables
                .income
                .iter()
                .filter(|e| window.contains(e.created_at))
                .cloned(),
            |e| e.created_at,
        ))
    }

    async fn list_by_type(&self, income_type: IncomeType) -> Result<Vec<IncomeEntry>, DomainError> {
        let tables = self.0.tables.read().unwrap();
        Ok(newest_first(
            tables
                .income
                .iter()
                .filter(|e| e.income_type == income_type)
                .cloned(),
            |e| e.created_at,
        ))
    }

    async fn create(
        &self,
        entry: &NewIncomeEntry,
        activity: &NewActivity,
    ) -> Result<IncomeEntry, DomainError> {
        self.0.check_write()?;
        let created = IncomeEntry {
            id: IncomeEntryId::new(),
            income_type: entry.income_type,
            print_type: entry.print_type.clone(),
            amount: entry.amount,
            customer_id: entry.customer_id,
            receipt_url: entry.receipt_url.clone(),
            description: entry.description.clone(),
            created_at: Utc::now(),
        };
        let mut tables = self.0.tables.write().unwrap();
        tables.income.push(created.clone());
        tables.log(activity, created.id.0);
        Ok(created)
    }
}

// ============================================================================
// In-Memory Expense Repository
// ============================================================================

pub struct InMemoryExpenseRepository(InMemoryDb);

#[async_trait]
impl ExpenseRepository for InMemoryExpenseRepository {
    async fn list(&self, window: &DateWindow) -> Result<Vec<ExpenseEntry>, DomainError> {
        let tables = self.0.tables.read().unwrap();
        Ok(newest_first(
            tables
                .expenses
                .iter()
                .filter(|e| window.contains(e.created_at))
                .cloned(),
            |e| e.created_at,
        ))
    }

    async fn create(
        &self,
        entry: &NewExpenseEntry,
        activity: &NewActivity,
    ) -> Result<ExpenseEntry, DomainError> {
        self.0.check_write()?;
        let now = Utc::now();
        let created = ExpenseEntry {
            id: ExpenseEntryId::new(),
            amount: entry.amount,
            reason: entry.reason.clone(),
            description: entry.description.clone(),
            created_at: now,
            updated_at: now,
        };
        let mut tables = self.0.tables.write().unwrap();
        tables.expenses.push(created.clone());
        tables.log(activity, created.id.0);
        Ok(created)
    }
}

// ============================================================================
// In-Memory Employee Repository
// ============================================================================

pub struct InMemoryEmployeeRepository(InMemoryDb);

#[async_trait]
impl EmployeeRepository for InMemoryEmployeeRepository {
    async fn find_by_id(&self, id: &EmployeeId) -> Result<Option<Employee>, DomainError> {
        Ok(self.0.tables.read().unwrap().employees.get(id).cloned())
    }

    async fn list_active(&self) -> Result<Vec<Employee>, DomainError> {
        let tables = self.0.tables.read().unwrap();
        Ok(newest_first(
            tables.employees.values().filter(|e| e.is_active).cloned(),
            |e| e.created_at,
        ))
    }

    async fn create(
        &self,
        employee: &NewEmployee,
        activity: &NewActivity,
    ) -> Result<Employee, DomainError> {
        self.0.check_write()?;
        let now = Utc::now();
        let created = Employee {
            id: EmployeeId::new(),
            name: employee.name.clone(),
            position: employee.position.clone(),
            salary: employee.salary,
            is_active: employee.is_active,
            created_at: now,
            updated_at: now,
        };
        let mut tables = self.0.tables.write().unwrap();
        tables.employees.insert(created.id, created.clone());
        tables.log(activity, created.id.0);
        Ok(created)
    }

    async fn deactivate(&self, id: &EmployeeId) -> Result<(), DomainError> {
        self.0.check_write()?;
        let mut tables = self.0.tables.write().unwrap();
        let employee = tables
            .employees
            .get_mut(id)
            .ok_or_else(|| DomainError::NotFound("الموظف غير موجود".to_string()))?;
        employee.is_active = false;
        employee.updated_at = Utc::now();
        Ok(())
    }
}

// ============================================================================
// In-Memory Activity Repository
// ============================================================================

pub struct InMemoryActivityRepository(InMemoryDb);

#[async_trait]
impl ActivityRepository for InMemoryActivityRepository {
    async fn recent(&self, limit: u64) -> Result<Vec<Activity>, DomainError> {
        let tables = self.0.tables.read().unwrap();
        Ok(tables
            .activities
            .iter()
            .rev()
            .take(limit as usize)
            .cloned()
            .collect())
    }
}

// ============================================================================
// In-Memory Stats Repository
// ============================================================================

pub struct InMemoryStatsRepository(InMemoryDb);

#[async_trait]
impl StatsRepository for InMemoryStatsRepository {
    async fn active_customer_count(&self) -> Result<u64, DomainError> {
        let tables = self.0.tables.read().unwrap();
        Ok(tables.customers.values().filter(|c| c.is_active).count() as u64)
    }

    async fn expired_customer_count(&self, today: NaiveDate) -> Result<u64, DomainError> {
        let tables = self.0.tables.read().unwrap();
        Ok(tables
            .customers
            .values()
            .filter(|c| c.is_active && c.expiry_date < today)
            .count() as u64)
    }

    async fn expiring_customer_count(
        &self,
        today: NaiveDate,
        cutoff: NaiveDate,
    ) -> Result<u64, DomainError> {
        let tables = self.0.tables.read().unwrap();
        Ok(tables
            .customers
            .values()
            .filter(|c| c.is_active && c.expiry_date > today && c.expiry_date <= cutoff)
            .count() as u64)
    }

    async fn income_total(
        &self,
        window: &DateWindow,
        income_type: Option<IncomeType>,
    ) -> Result<Decimal, DomainError> {
        let tables = self.0.tables.read().unwrap();
        Ok(tables
            .income
            .iter()
            .filter(|e| window.contains(e.created_at))
            .filter(|e| income_type.map_or(true, |t| e.income_type == t))
            .map(|e| e.amount)
            .sum())
    }

    async fn expense_total(&self, window: &DateWindow) -> Result<Decimal, DomainError> {
        let tables = self.0.tables.read().unwrap();
        Ok(tables
            .expenses
            .iter()
            .filter(|e| window.contains(e.created_at))
            .map(|e| e.amount)
            .sum())
    }

    async fn active_employee_count(&self) -> Result<u64, DomainError> {
        let tables = self.0.tables.read().unwrap();
        Ok(tables.employees.values().filter(|e| e.is_active).count() as u64)
    }

    async fn active_salary_total(&self) -> Result<Decimal, DomainError> {
        let tables = self.0.tables.read().unwrap();
        Ok(tables
            .employees
            .values()
            .filter(|e| e.is_active)
            .map(|e| e.salary)
            .sum())
    }
}

// ============================================================================
// Mock Receipt Store
// ============================================================================

/// Receipt store that keeps files in memory
#[derive(Clone, Default)]
pub struct MockReceiptStore {
    files: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl MockReceiptStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// URLs of the files currently stored
    pub fn stored_urls(&self) -> Vec<String> {
        self.files.read().unwrap().keys().cloned().collect()
    }
}

#[async_trait]
impl ReceiptStore for MockReceiptStore {
    async fn store(&self, kind: ReceiptKind, bytes: &[u8]) -> Result<String, DomainError> {
        let url = format!("/uploads/{}.{}", Uuid::new_v4(), kind.extension());
        self.files
            .write()
            .unwrap()
            .insert(url.clone(), bytes.to_vec());
        Ok(url)
    }

    async fn remove(&self, url: &str) -> Result<(), DomainError> {
        self.files.write().unwrap().remove(url);
        Ok(())
    }
}
