use serde::{Deserialize, Serialize};

use super::domain::Installation;

pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Sentinel the client sends for a filter dropdown with no selection.
pub const FILTER_ALL: &str = "all";

/// Raw search/filter/pagination parameters as received from a client, before
/// normalization.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FilterRequest {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub capacity: Option<String>,
    #[serde(default)]
    pub district: Option<String>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
}

/// Storage-agnostic constraints derived from a filter request. Active
/// constraints combine with AND; an omitted or `all` filter imposes none.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstallationPredicate {
    /// Lowercased search term matched as a substring of the customer name,
    /// district name, or address.
    pub search: Option<String>,
    /// Exact-match equality on `systemCapacity.value`.
    pub capacity: Option<f64>,
    /// Exact-match equality on the district's wire name. An unknown name
    /// simply matches nothing.
    pub district: Option<String>,
}

impl InstallationPredicate {
    pub fn is_unconstrained(&self) -> bool {
        self.search.is_none() && self.capacity.is_none() && self.district.is_none()
    }

    pub fn matches(&self, record: &Installation) -> bool {
        if let Some(term) = &self.search {
            let in_name = record.customer_name.to_lowercase().contains(term);
            let in_district = record
                .location
                .district
                .name()
                .to_lowercase()
                .contains(term);
            let in_address = record
                .location
                .address
                .as_deref()
                .is_some_and(|address| address.to_lowercase().contains(term));
            if !(in_name || in_district || in_address) {
                return false;
            }
        }

        if let Some(capacity) = self.capacity {
            if record.system_capacity.value != capacity {
                return false;
            }
        }

        if let Some(district) = &self.district {
            if record.location.district.name() != district {
                return false;
            }
        }

        true
    }
}

/// One page of a listing. Page numbers are 1-based; both fields are clamped
/// to at least 1 during normalization so the skip can never go negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub per_page: u32,
}

impl PageRequest {
    pub fn skip(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.per_page)
    }
}

/// Normalized query: predicate plus pagination. The repository applies the
/// predicate, sorts newest-first by creation time, then skips and limits.
#[derive(Debug, Clone, PartialEq)]
pub struct InstallationQuery {
    pub predicate: InstallationPredicate,
    pub page: PageRequest,
}

pub fn build_query(filter: &FilterRequest) -> InstallationQuery {
    let search = filter
        .search
        .as_deref()
        .map(str::trim)
        .filter(|term| !term.is_empty())
        .map(str::to_lowercase);

    let capacity = filter
        .capacity
        .as_deref()
        .map(str::trim)
        .filter(|raw| !raw.is_empty() && !raw.eq_ignore_ascii_case(FILTER_ALL))
        .and_then(|raw| raw.parse::<f64>().ok());

    let district = filter
        .district
        .as_deref()
        .map(str::trim)
        .filter(|raw| !raw.is_empty() && !raw.eq_ignore_ascii_case(FILTER_ALL))
        .map(str::to_string);

    let page = filter.page.unwrap_or(1).max(1);
    let per_page = filter.limit.unwrap_or(DEFAULT_PAGE_SIZE).max(1);

    InstallationQuery {
        predicate: InstallationPredicate {
            search,
            capacity,
            district,
        },
        page: PageRequest { page, per_page },
    }
}

/// Pagination envelope returned alongside every listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub current: u32,
    pub pages: u64,
    pub total: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

pub fn page_info(total: u64, page: &PageRequest) -> PageInfo {
    let pages = total.div_ceil(u64::from(page.per_page));
    PageInfo {
        current: page.page,
        pages,
        total,
        has_next: u64::from(page.page) < pages,
        has_prev: page.page > 1,
    }
}
