//! Result paging for search operations

use serde::{Deserialize, Serialize};

/// Window of search results: skip `offset` records, return at most `limit`.
///
/// Unset values mean "from the first record" and "no limit".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl Page {
    /// Every matching record
    pub fn all() -> Self {
        Self::default()
    }

    pub fn new(offset: u32, limit: u32) -> Self {
        Self {
            offset: Some(offset),
            limit: Some(limit),
        }
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Keyword arguments for `search`/`search_read`; unset values are omitted
    pub fn to_kwargs(&self) -> crate::Record {
        let mut kwargs = crate::Record::new();
        if let Some(offset) = self.offset {
            kwargs.insert("offset".into(), offset.into());
        }
        if let Some(limit) = self.limit {
            kwargs.insert("limit".into(), limit.into());
        }
        kwargs
    }
}
