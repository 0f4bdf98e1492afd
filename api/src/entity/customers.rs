use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "customers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(column_type = "Text")]
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub menu_url: Option<String>,
    pub join_date: Date,
    pub subscription_type: String,
    pub expiry_date: Date,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::income_entries::Entity")]
    IncomeEntries,
}

impl Related<super::income_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::IncomeEntries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
