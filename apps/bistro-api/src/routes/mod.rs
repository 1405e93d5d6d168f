//! Route handlers organized by resource

pub mod categories;
pub mod daily_records;
pub mod employees;
pub mod health;
pub mod positions;
pub mod products;
pub mod sales_items;
pub mod schedule;
pub mod wages;

use serde::Deserialize;

/// `?include_inactive=true` on catalog and staff listings.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub include_inactive: bool,
}

/// Longest free-text name accepted anywhere.
pub(crate) const MAX_NAME_LEN: usize = 100;

/// Longest description or note.
pub(crate) const MAX_TEXT_LEN: usize = 500;
