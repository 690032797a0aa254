use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SubsecRound, Utc};
use rusqlite::ToSql;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Returned when a string does not name any variant of a lead enum.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {field} '{value}' (expected one of: {expected})")]
pub struct UnknownVariant {
    pub field: &'static str,
    pub value: String,
    pub expected: String,
}

/// Declares a closed set of lead labels.
///
/// Variants serialize as their display label, parse case-insensitively back to the
/// canonical label, and map to SQLite TEXT columns.
macro_rules! lead_enum {
    (
        $(#[$meta:meta])*
        $name:ident ($field:literal), default = $default:ident {
            $($variant:ident => $label:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::$default
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                $name::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(trimmed))
                    .ok_or_else(|| UnknownVariant {
                        field: $field,
                        value: s.to_string(),
                        expected: $name::ALL
                            .iter()
                            .map(|v| v.as_str())
                            .collect::<Vec<_>>()
                            .join(", "),
                    })
            }
        }

        impl ToSql for $name {
            fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                Ok(ToSqlOutput::from(self.as_str()))
            }
        }

        impl FromSql for $name {
            fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                value
                    .as_str()?
                    .parse()
                    .map_err(|e: UnknownVariant| FromSqlError::Other(Box::new(e)))
            }
        }
    };
}

lead_enum! {
    /// Contact/outcome state of a lead.
    LeadStatus("status"), default = New {
        New => "New",
        Contacted => "Contacted",
        Qualified => "Qualified",
        Lost => "Lost",
        Converted => "Converted",
    }
}

lead_enum! {
    /// Position of a lead in the sales funnel.
    LeadStage("stage"), default = Lead {
        Lead => "Lead",
        Prospect => "Prospect",
        Customer => "Customer",
    }
}

lead_enum! {
    /// Channel a lead was acquired through.
    LeadSource("source"), default = Website {
        Website => "Website",
        Ads => "Ads",
        Referral => "Referral",
        ColdCall => "Cold Call",
        Other => "Other",
    }
}

/// Current time at the precision leads are stored with.
#[must_use]
pub fn timestamp_now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub status: LeadStatus,
    pub stage: LeadStage,
    pub source: LeadSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A window of leads plus the size of the full filtered set.
#[derive(Debug, Clone, Default)]
pub struct LeadPage {
    pub total: u64,
    pub leads: Vec<Lead>,
}

/// Dashboard aggregates. Group maps only carry values present in the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadStats {
    pub total_leads: u64,
    pub converted_leads: u64,
    pub lead_by_stage: BTreeMap<String, u64>,
    #[serde(default)]
    pub lead_by_status: BTreeMap<String, u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("converted".parse::<LeadStatus>(), Ok(LeadStatus::Converted));
        assert_eq!(" PROSPECT ".parse::<LeadStage>(), Ok(LeadStage::Prospect));
        assert_eq!("cold call".parse::<LeadSource>(), Ok(LeadSource::ColdCall));
    }

    #[test]
    fn test_parse_rejects_unknown() {
        let err = "Archived".parse::<LeadStatus>().unwrap_err();
        assert_eq!(err.field, "status");
        assert!(err.to_string().contains("New, Contacted, Qualified, Lost, Converted"));
    }

    #[test]
    fn test_defaults() {
        assert_eq!(LeadStatus::default(), LeadStatus::New);
        assert_eq!(LeadStage::default(), LeadStage::Lead);
        assert_eq!(LeadSource::default(), LeadSource::Website);
    }

    #[test]
    fn test_serde_uses_labels() {
        let json = serde_json::to_string(&LeadSource::ColdCall).unwrap();
        assert_eq!(json, "\"Cold Call\"");
        assert!(serde_json::from_str::<LeadStage>("\"Churned\"").is_err());
    }
}
