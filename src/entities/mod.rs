//! SeaORM entity definitions, one module per persisted table.
//! Each module carries a Model struct for row data, an Entity struct for
//! queries, and the relations between tables (requests belong to users,
//! transactions point back at the request they settled).

pub mod audit_log;
pub mod budget;
pub mod request;
pub mod transaction;
pub mod user;

// Aliased re-exports keep call sites free of name clashes between tables
pub use audit_log::{Column as AuditLogColumn, Entity as AuditLog, Model as AuditLogModel};
pub use budget::{Column as BudgetColumn, Entity as Budget, Model as BudgetModel};
pub use request::{
    Column as RequestColumn, Entity as Request, Model as RequestModel, RequestStatus,
};
pub use transaction::{
    Column as TransactionColumn, Entity as Transaction, Model as TransactionModel,
};
pub use user::{Column as UserColumn, Entity as User, Model as UserModel, Role};
