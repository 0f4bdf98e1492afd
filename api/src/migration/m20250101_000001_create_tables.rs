//! Migration: Create users, customers, ledger, employee and activity tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Users::Email).string().null().unique_key())
                    .col(ColumnDef::new(Users::FirstName).string().null())
                    .col(ColumnDef::new(Users::LastName).string().null())
                    .col(ColumnDef::new(Users::ProfileImageUrl).string().null())
                    .col(ColumnDef::new(Users::Username).string().null().unique_key())
                    .col(ColumnDef::new(Users::Password).string().null())
                    .col(
                        ColumnDef::new(Users::Role)
                            .string()
                            .not_null()
                            .default("viewer"),
                    )
                    .col(
                        ColumnDef::new(Users::IsManualUser)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(timestamp_now(Users::CreatedAt))
                    .col(timestamp_now(Users::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Customers::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Customers::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Customers::Name).text().not_null())
                    .col(ColumnDef::new(Customers::MenuUrl).text().null())
                    .col(ColumnDef::new(Customers::JoinDate).date().not_null())
                    .col(
                        ColumnDef::new(Customers::SubscriptionType)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Customers::ExpiryDate).date().not_null())
                    .col(
                        ColumnDef::new(Customers::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(timestamp_now(Customers::CreatedAt))
                    .col(timestamp_now(Customers::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_customers_expiry_date")
                    .table(Customers::Table)
                    .col(Customers::ExpiryDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(IncomeEntries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(IncomeEntries::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(IncomeEntries::CustomerId).uuid().null())
                    .col(ColumnDef::new(IncomeEntries::Type).string().not_null())
                    .col(ColumnDef::new(IncomeEntries::PrintType).text().null())
                    .col(
                        ColumnDef::new(IncomeEntries::Amount)
                            .decimal_len(10, 2)
                            .not_null(),
                    )
                    .col(ColumnDef::new(IncomeEntries::ReceiptUrl).text().null())
                    .col(ColumnDef::new(IncomeEntries::Description).text().null())
                    .col(timestamp_now(IncomeEntries::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_income_entries_customer")
                            .from(IncomeEntries::Table, IncomeEntries::CustomerId)
                            .to(Customers::Table, Customers::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_income_entries_created_at")
                    .table(IncomeEntries::Table)
                    .col(IncomeEntries::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ExpenseEntries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ExpenseEntries::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ExpenseEntries::Amount)
                            .decimal_len(10, 2)
                            .not_null(),
                    )
                    .col(ColumnDef::new(ExpenseEntries::Reason).text().not_null())
                    .col(ColumnDef::new(ExpenseEntries::Description).text().null())
                    .col(timestamp_now(ExpenseEntries::CreatedAt))
                    .col(timestamp_now(ExpenseEntries::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_expense_entries_created_at")
                    .table(ExpenseEntries::Table)
                    .col(ExpenseEntries::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Employees::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Employees::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Employees::Name).text().not_null())
                    .col(ColumnDef::new(Employees::Position).text().null())
                    .col(
                        ColumnDef::new(Employees::Salary)
                            .decimal_len(10, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Employees::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(timestamp_now(Employees::CreatedAt))
                    .col(timestamp_now(Employees::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Activities::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Activities::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Activities::Type).string().not_null())
                    .col(ColumnDef::new(Activities::Description).text().not_null())
                    .col(ColumnDef::new(Activities::RelatedId).uuid().null())
                    .col(timestamp_now(Activities::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_activities_created_at")
                    .table(Activities::Table)
                    .col(Activities::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Activities::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Employees::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ExpenseEntries::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(IncomeEntries::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Customers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}

fn timestamp_now<T: IntoIden>(column: T) -> ColumnDef {
    ColumnDef::new(column)
        .timestamp_with_time_zone()
        .not_null()
        .default(Expr::current_timestamp())
        .to_owned()
}

#[derive(Iden)]
pub enum Users {
    Table,
    Id,
    Email,
    FirstName,
    LastName,
    ProfileImageUrl,
    Username,
    Password,
    Role,
    IsManualUser,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Customers {
    Table,
    Id,
    Name,
    MenuUrl,
    JoinDate,
    SubscriptionType,
    ExpiryDate,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum IncomeEntries {
    Table,
    Id,
    CustomerId,
    Type,
    PrintType,
    Amount,
    ReceiptUrl,
    Description,
    CreatedAt,
}

#[derive(Iden)]
enum ExpenseEntries {
    Table,
    Id,
    Amount,
    Reason,
    Description,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Employees {
    Table,
    Id,
    Name,
    Position,
    Salary,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Activities {
    Table,
    Id,
    Type,
    Description,
    RelatedId,
    CreatedAt,
}
