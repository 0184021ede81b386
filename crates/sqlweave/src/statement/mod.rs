//! Top-level statements.
//!
//! Each statement owns one instance of every clause component its grammar
//! allows plus a pre-seeded bind list. Rendering merges that list into the
//! caller's first, then renders the clauses in grammar order; a statement
//! that is missing a mandatory piece renders `None` and leaves the caller's
//! list as it was.

mod delete;
mod insert;
mod select;
mod union;
mod update;

#[cfg(test)]
mod tests;

pub use delete::Delete;
pub use insert::Insert;
pub use select::Select;
pub use union::{Union, UnionMode};
pub use update::Update;

/// Implements a clause trait by pointing it at a field.
macro_rules! impl_clause {
    ($ty:ty { $($clause:ident :: $accessor:ident => $component:ty, $field:ident;)* }) => {
        $(
            impl $crate::clause::$clause for $ty {
                fn $accessor(&mut self) -> &mut $component {
                    &mut self.$field
                }
            }
        )*
    };
}

pub(crate) use impl_clause;

use crate::bind::BindParameterList;

/// Runs `body` against a copy of `binds` seeded with the statement's own
/// binds, committing the copy only when `body` renders something.
pub(crate) fn render_seeded(
    binds: &mut BindParameterList,
    seed: &BindParameterList,
    body: impl FnOnce(&mut BindParameterList) -> Option<String>,
) -> Option<String> {
    let mut scratch = binds.clone();
    scratch.merge(seed);
    let sql = body(&mut scratch)?;
    *binds = scratch;
    Some(sql)
}

/// Appends ` <keyword> <rendered>` when the clause contributes anything.
pub(crate) fn push_clause(sql: &mut String, keyword: &str, rendered: Option<String>) {
    if let Some(rendered) = rendered {
        sql.push(' ');
        if !keyword.is_empty() {
            sql.push_str(keyword);
            sql.push(' ');
        }
        sql.push_str(&rendered);
    }
}
