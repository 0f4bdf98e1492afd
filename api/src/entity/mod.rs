//! SeaORM entities
//!
//! Table mappings used by the PostgreSQL adapters. Domain code never sees
//! these types; adapters convert them into `domain::entities`.

pub mod activities;
pub mod customers;
pub mod employees;
pub mod expense_entries;
pub mod income_entries;
pub mod sessions;
pub mod users;
