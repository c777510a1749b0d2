//! List pagination shared by the proxied and locally computed views.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Query parameters common to every list surface.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ListQuery {
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 100, message = "limit must be between 1 and 100"))]
    pub limit: i64,
    #[serde(default)]
    #[validate(range(min = 0, message = "offset must not be negative"))]
    pub offset: i64,
    /// Free-text filter; empty matches everything.
    #[serde(default)]
    pub text: String,
}

fn default_limit() -> i64 {
    10
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            offset: 0,
            text: String::new(),
        }
    }
}

/// A page of rows plus the total row count before slicing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub total: i64,
}

/// Slice `rows` to the requested window, reporting the pre-slice total.
pub fn paginate<T>(rows: Vec<T>, limit: i64, offset: i64) -> Page<T> {
    let total = rows.len() as i64;
    let data = rows
        .into_iter()
        .skip(offset.max(0) as usize)
        .take(limit.max(0) as usize)
        .collect();
    Page { data, total }
}
