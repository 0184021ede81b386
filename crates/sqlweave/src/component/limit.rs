//! LIMIT / OFFSET clause.

use crate::bind::BindParameterList;
use crate::render::{encapsulate, Render};

/// Renders `LIMIT n [OFFSET m]`.
///
/// An offset without a limit renders nothing: `OFFSET` alone is treated as
/// meaningless here and is dropped rather than paired with an implicit limit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Limit {
    limit: Option<u64>,
    offset: Option<u64>,
}

impl Limit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_limit(&mut self, limit: u64) {
        self.limit = Some(limit);
    }

    pub fn set_offset(&mut self, offset: u64) {
        self.offset = Some(offset);
    }

    pub fn limit(&self) -> Option<u64> {
        self.limit
    }

    pub fn offset(&self) -> Option<u64> {
        self.offset
    }

    pub fn is_empty(&self) -> bool {
        self.limit.is_none()
    }
}

impl Render for Limit {
    fn render(&self, _binds: &mut BindParameterList, encapsulate: bool) -> Option<String> {
        let limit = self.limit?;
        let sql = match self.offset {
            Some(offset) => format!("LIMIT {} OFFSET {}", limit, offset),
            None => format!("LIMIT {}", limit),
        };
        self::encapsulate(Some(sql), encapsulate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_only() {
        let mut limit = Limit::new();
        limit.set_limit(10);
        assert_eq!(limit.to_sql().unwrap().0, "LIMIT 10");
    }

    #[test]
    fn test_limit_and_offset() {
        let mut limit = Limit::new();
        limit.set_limit(10);
        limit.set_offset(20);
        assert_eq!(limit.to_sql().unwrap().0, "LIMIT 10 OFFSET 20");
    }

    #[test]
    fn test_offset_without_limit_renders_nothing() {
        let mut limit = Limit::new();
        limit.set_offset(20);
        assert!(limit.to_sql().is_none());
        assert!(limit.is_empty());
    }
}
