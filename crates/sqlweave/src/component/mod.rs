//! Clause components.
//!
//! Each component is an append-only list of plain entry records that knows
//! how to render itself. Statements own one instance per clause and replace
//! it wholesale on reset, so clones taken earlier never observe the change.

mod assignments;
mod columns;
mod conditions;
mod group;
mod join;
mod limit;
mod order;
mod table;

pub use assignments::{Assignment, Assignments, InsertAssignments, UpdateAssignments};
pub use columns::{Column, Columns};
pub use conditions::{Condition, ConditionScope, Conditions, Criterion, IntoCondition, Link, Operator};
pub use group::Group;
pub use join::{Join, JoinEntry, JoinKind, JoinOn};
pub use limit::Limit;
pub use order::{Order, OrderDirection, OrderEntry};
pub use table::{Table, TableEntry};
