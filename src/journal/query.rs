use chrono::NaiveDate;
use serde::Serialize;

use super::error::{JournalError, Result};

pub const DEFAULT_PAGE: usize = 1;
pub const DEFAULT_LIMIT: usize = 100;

/// Filters for listing sessions. Date bounds are inclusive.
#[derive(Debug, Clone, Default)]
pub struct SessionQuery {
    pub page: Option<usize>,
    pub limit: Option<usize>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

impl SessionQuery {
    pub fn matches(&self, date: NaiveDate) -> bool {
        self.date_from.is_none_or(|from| date >= from) && self.date_to.is_none_or(|to| date <= to)
    }
}

/// First date still inside a window of `since` ending on `today`.
///
/// Windows that reach past the earliest representable date are rejected.
pub fn since_date(today: NaiveDate, since: std::time::Duration) -> Result<NaiveDate> {
    let out_of_range = || JournalError::InvalidDuration(format!("{:?} reaches too far back", since));
    let delta = chrono::Duration::from_std(since).map_err(|_| out_of_range())?;
    today.checked_sub_signed(delta).ok_or_else(out_of_range)
}

/// Filters for listing blocs. `style` is a substring match on the label.
#[derive(Debug, Clone, Default)]
pub struct BlocQuery {
    pub page: Option<usize>,
    pub limit: Option<usize>,
    pub session_id: Option<u64>,
    pub difficulty: Option<u32>,
    pub style: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page: usize,
    pub limit: usize,
    pub total: usize,
    pub total_pages: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub pagination: Pagination,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            data: self.data.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }
}

/// Cut one page out of an already filtered and ordered list.
///
/// Pages are 1-based. A page past the end is empty, not an error.
pub fn paginate<T>(items: Vec<T>, page: Option<usize>, limit: Option<usize>) -> Result<Page<T>> {
    let page = page.unwrap_or(DEFAULT_PAGE);
    let limit = limit.unwrap_or(DEFAULT_LIMIT);
    if page == 0 {
        return Err(JournalError::InvalidPage("page starts at 1".to_string()));
    }
    if limit == 0 {
        return Err(JournalError::InvalidPage("limit must be at least 1".to_string()));
    }

    let total = items.len();
    let skip = (page - 1).saturating_mul(limit);
    let data = items.into_iter().skip(skip).take(limit).collect();

    Ok(Page {
        data,
        pagination: Pagination {
            page,
            limit,
            total,
            total_pages: total.div_ceil(limit),
        },
    })
}
