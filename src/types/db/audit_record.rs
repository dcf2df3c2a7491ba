use sea_orm::entity::prelude::*;

/// SeaORM entity for the append-only audit_log table
///
/// Rows are only ever inserted. The JSON-bearing columns (changes,
/// old_values, new_values, context) are stored as serialized TEXT and
/// parsed back at the DTO boundary.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "audit_log")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub timestamp: String,
    pub action: String,
    pub table_name: String,
    pub record_key: String,
    pub changes: Option<String>,
    pub old_values: Option<String>,
    pub new_values: Option<String>,
    pub context: Option<String>,
    pub notes: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
