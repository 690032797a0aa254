//! Lead list query planning.
//!
//! [`LeadQuery::from_params`] turns raw list-endpoint parameters into a filter, a
//! single-field sort, and a page window. Planning is pure: nothing here touches the
//! store, and the same parameters always produce the same plan.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{LeadSource, LeadStage, LeadStatus, UnknownVariant};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;
pub const MAX_LIMIT: u32 = 100;

/// Raw list parameters as they appear in the query string.
///
/// Every value is kept as text so malformed input can be reported with a readable
/// message instead of a generic deserialization failure. Empty strings count as
/// absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListLeadsParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
    #[serde(default, alias = "pageSize", skip_serializing_if = "Option::is_none")]
    pub limit: Option<String>,
    #[serde(default, alias = "keyword", skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
}

impl ListLeadsParams {
    /// Name/value pairs for every parameter that is set, in a fixed order.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, &str)> {
        [
            ("page", &self.page),
            ("limit", &self.limit),
            ("search", &self.search),
            ("status", &self.status),
            ("stage", &self.stage),
            ("source", &self.source),
            ("sort", &self.sort),
            ("order", &self.order),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.as_deref().map(|v| (name, v)))
        .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("{param} must be a whole number, got '{value}'")]
    InvalidNumber { param: &'static str, value: String },

    #[error(transparent)]
    InvalidValue(#[from] UnknownVariant),
}

/// Conjunctive filter. `None` fields impose no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeadFilter {
    /// Case-insensitive substring matched against name or email.
    pub search: Option<String>,
    pub status: Option<LeadStatus>,
    pub stage: Option<LeadStage>,
    pub source: Option<LeadSource>,
}

impl LeadFilter {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortField {
    #[default]
    CreatedAt,
    UpdatedAt,
    Name,
    Email,
    Status,
    Stage,
    Source,
}

impl SortField {
    const ALL: [SortField; 7] = [
        SortField::CreatedAt,
        SortField::UpdatedAt,
        SortField::Name,
        SortField::Email,
        SortField::Status,
        SortField::Stage,
        SortField::Source,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            SortField::CreatedAt => "createdAt",
            SortField::UpdatedAt => "updatedAt",
            SortField::Name => "name",
            SortField::Email => "email",
            SortField::Status => "status",
            SortField::Stage => "stage",
            SortField::Source => "source",
        }
    }

    /// Accepts the camelCase API name or its snake_case spelling.
    pub fn parse(s: &str) -> Option<SortField> {
        let normalized: String = s.chars().filter(|c| *c != '_').collect();
        Self::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(&normalized))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sort {
    pub field: SortField,
    pub order: SortOrder,
}

/// One-based page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub number: u32,
    pub limit: u32,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            number: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl Page {
    /// Records to skip before the window starts.
    #[must_use]
    pub fn skip(&self) -> u64 {
        u64::from(self.number.saturating_sub(1)) * u64::from(self.limit)
    }

    #[must_use]
    pub fn page_count(&self, total: u64) -> u64 {
        total.div_ceil(u64::from(self.limit.max(1)))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeadQuery {
    pub filter: LeadFilter,
    pub sort: Sort,
    pub page: Page,
}

impl LeadQuery {
    pub fn from_params(params: &ListLeadsParams) -> Result<Self, QueryError> {
        let number = match present(&params.page) {
            Some(raw) => parse_whole("page", raw)?.clamp(1, i64::from(u32::MAX)) as u32,
            None => DEFAULT_PAGE,
        };
        let limit = match present(&params.limit) {
            Some(raw) => match parse_whole("limit", raw)? {
                n if n < 1 => DEFAULT_LIMIT,
                n => n.min(i64::from(MAX_LIMIT)) as u32,
            },
            None => DEFAULT_LIMIT,
        };

        let filter = LeadFilter {
            // Matched literally; trimming only decides whether it is blank.
            search: params
                .search
                .as_deref()
                .filter(|v| !v.trim().is_empty())
                .map(str::to_string),
            status: present(&params.status).map(str::parse).transpose()?,
            stage: present(&params.stage).map(str::parse).transpose()?,
            source: present(&params.source).map(str::parse).transpose()?,
        };

        Ok(Self {
            filter,
            sort: parse_sort(present(&params.sort), present(&params.order)),
            page: Page { number, limit },
        })
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_whole(param: &'static str, raw: &str) -> Result<i64, QueryError> {
    raw.parse().map_err(|_| QueryError::InvalidNumber {
        param,
        value: raw.to_string(),
    })
}

/// Unknown sort fields fall back to the default field rather than failing, and a
/// leading `-` on the field forces descending order.
fn parse_sort(sort: Option<&str>, order: Option<&str>) -> Sort {
    let (field, forced_desc) = match sort {
        Some(raw) => match raw.strip_prefix('-') {
            Some(rest) => (rest, true),
            None => (raw, false),
        },
        None => ("", false),
    };

    let field = SortField::parse(field).unwrap_or_default();
    let order = if forced_desc {
        SortOrder::Desc
    } else {
        match order {
            Some(o) if o.eq_ignore_ascii_case("asc") => SortOrder::Asc,
            _ => SortOrder::Desc,
        }
    };

    Sort { field, order }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> ListLeadsParams {
        ListLeadsParams::default()
    }

    #[test]
    fn test_defaults() {
        let q = LeadQuery::from_params(&params()).unwrap();
        assert!(q.filter.is_empty());
        assert_eq!(q.sort.field, SortField::CreatedAt);
        assert_eq!(q.sort.order, SortOrder::Desc);
        assert_eq!(q.page, Page { number: 1, limit: 10 });
        assert_eq!(q.page.skip(), 0);
    }

    #[test]
    fn test_skip_follows_page_and_limit() {
        let p = ListLeadsParams {
            page: Some("3".into()),
            limit: Some("25".into()),
            ..params()
        };
        let q = LeadQuery::from_params(&p).unwrap();
        assert_eq!(q.page.skip(), 50);
        assert_eq!(q.page.page_count(51), 3);
        assert_eq!(q.page.page_count(0), 0);
    }

    #[test]
    fn test_page_below_one_is_clamped() {
        for raw in ["0", "-4"] {
            let p = ListLeadsParams {
                page: Some(raw.into()),
                ..params()
            };
            assert_eq!(LeadQuery::from_params(&p).unwrap().page.number, 1);
        }
    }

    #[test]
    fn test_limit_bounds() {
        let zero = ListLeadsParams {
            limit: Some("0".into()),
            ..params()
        };
        assert_eq!(LeadQuery::from_params(&zero).unwrap().page.limit, DEFAULT_LIMIT);

        let huge = ListLeadsParams {
            limit: Some("5000".into()),
            ..params()
        };
        assert_eq!(LeadQuery::from_params(&huge).unwrap().page.limit, MAX_LIMIT);
    }

    #[test]
    fn test_non_numeric_page_is_rejected() {
        let p = ListLeadsParams {
            page: Some("two".into()),
            ..params()
        };
        let err = LeadQuery::from_params(&p).unwrap_err();
        assert_eq!(
            err,
            QueryError::InvalidNumber {
                param: "page",
                value: "two".into()
            }
        );
    }

    #[test]
    fn test_blank_params_are_absent() {
        let p = ListLeadsParams {
            search: Some("   ".into()),
            status: Some(String::new()),
            source: Some(String::new()),
            page: Some(String::new()),
            ..params()
        };
        let q = LeadQuery::from_params(&p).unwrap();
        assert!(q.filter.is_empty());
        assert_eq!(q.page.number, 1);
    }

    #[test]
    fn test_filters_parse_enum_labels() {
        let p = ListLeadsParams {
            search: Some(" jane ".into()),
            status: Some("converted".into()),
            stage: Some("Customer".into()),
            source: Some("Referral".into()),
            ..params()
        };
        let q = LeadQuery::from_params(&p).unwrap();
        assert_eq!(q.filter.search.as_deref(), Some(" jane "));
        assert_eq!(q.filter.status, Some(LeadStatus::Converted));
        assert_eq!(q.filter.stage, Some(LeadStage::Customer));
        assert_eq!(q.filter.source, Some(LeadSource::Referral));
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let p = ListLeadsParams {
            status: Some("Archived".into()),
            ..params()
        };
        assert!(matches!(
            LeadQuery::from_params(&p),
            Err(QueryError::InvalidValue(_))
        ));
    }

    #[test]
    fn test_unknown_sort_field_falls_back() {
        let p = ListLeadsParams {
            sort: Some("password".into()),
            order: Some("asc".into()),
            ..params()
        };
        let q = LeadQuery::from_params(&p).unwrap();
        assert_eq!(q.sort.field, SortField::CreatedAt);
        assert_eq!(q.sort.order, SortOrder::Asc);
    }

    #[test]
    fn test_sort_prefix_and_spellings() {
        let p = ListLeadsParams {
            sort: Some("-updated_at".into()),
            order: Some("asc".into()),
            ..params()
        };
        let q = LeadQuery::from_params(&p).unwrap();
        assert_eq!(q.sort.field, SortField::UpdatedAt);
        assert_eq!(q.sort.order, SortOrder::Desc);

        let p = ListLeadsParams {
            sort: Some("name".into()),
            order: Some("sideways".into()),
            ..params()
        };
        let q = LeadQuery::from_params(&p).unwrap();
        assert_eq!(q.sort.field, SortField::Name);
        assert_eq!(q.sort.order, SortOrder::Desc);
    }

    #[test]
    fn test_query_pairs_skip_unset() {
        let p = ListLeadsParams {
            page: Some("2".into()),
            status: Some("New".into()),
            ..params()
        };
        assert_eq!(p.query_pairs(), vec![("page", "2"), ("status", "New")]);
    }
}
