//! Lookup row data model.

use serde::{Deserialize, Serialize};

/// Geolocation of one address as returned by the lookup service.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct IpLookupResult {
    /// Country display name.
    pub country: String,
    /// ISO 3166-1 alpha-2 country code (e.g. "US").
    pub country_code: Option<String>,
    /// IANA timezone name (e.g. "America/Los_Angeles").
    pub timezone: String,
}

/// Lookup progress of a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LookupStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

impl std::fmt::Display for LookupStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let s = match self {
            LookupStatus::Idle => "idle",
            LookupStatus::Loading => "loading",
            LookupStatus::Success => "success",
            LookupStatus::Error => "error",
        };
        write!(f, "{s}")
    }
}

/// Change applied to a row by the list.
#[derive(Debug, Clone, PartialEq)]
pub enum RowUpdate {
    /// The user edited the address text.
    Input(String),
    /// Validation or lookup failed with this message.
    Failed(String),
    /// A lookup was started.
    Loading,
    /// The lookup succeeded.
    Located(IpLookupResult),
}

/// One address entry with its lookup state.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IpLookupRow {
    pub id: u64,
    /// Address text as typed.
    pub ip: String,
    pub status: LookupStatus,
    pub country: Option<String>,
    pub country_code: Option<String>,
    pub timezone: Option<String>,
    pub error: Option<String>,
    /// Number of lookups started for this row. Only the latest may update it.
    pub generation: u64,
}

impl IpLookupRow {
    pub fn new(id: u64) -> Self {
        IpLookupRow {
            id,
            ..Default::default()
        }
    }

    /// Merge an update into the row.
    ///
    /// Country fields are kept across `Failed`/`Loading` so a row keeps showing
    /// its previous location until a new one arrives.
    pub fn apply(&mut self, update: RowUpdate) {
        match update {
            RowUpdate::Input(ip) => self.ip = ip,
            RowUpdate::Failed(reason) => {
                self.status = LookupStatus::Error;
                self.error = Some(reason);
            }
            RowUpdate::Loading => {
                self.status = LookupStatus::Loading;
                self.error = None;
            }
            RowUpdate::Located(result) => {
                self.status = LookupStatus::Success;
                self.country = Some(result.country);
                self.country_code = result.country_code;
                self.timezone = Some(result.timezone);
                self.error = None;
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        self.status == LookupStatus::Loading
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn google() -> IpLookupResult {
        IpLookupResult {
            country: "United States".to_string(),
            country_code: Some("US".to_string()),
            timezone: "America/Los_Angeles".to_string(),
        }
    }

    #[test]
    fn test_new_row_is_idle() {
        let row = IpLookupRow::new(7);
        assert_eq!(row.id, 7);
        assert_eq!(row.ip, "");
        assert_eq!(row.status, LookupStatus::Idle);
        assert_eq!(row.generation, 0);
    }

    #[test]
    fn test_apply_sequence() {
        let mut row = IpLookupRow::new(1);
        row.apply(RowUpdate::Input("8.8.8.8".to_string()));
        row.apply(RowUpdate::Failed("Network error".to_string()));
        assert_eq!(row.status, LookupStatus::Error);
        assert_eq!(row.error.as_deref(), Some("Network error"));

        row.apply(RowUpdate::Loading);
        assert!(row.is_loading());
        assert_eq!(row.error, None);

        row.apply(RowUpdate::Located(google()));
        assert_eq!(row.status, LookupStatus::Success);
        assert_eq!(row.country.as_deref(), Some("United States"));
        assert_eq!(row.country_code.as_deref(), Some("US"));
        assert_eq!(row.timezone.as_deref(), Some("America/Los_Angeles"));
        assert_eq!(row.ip, "8.8.8.8");
    }

    #[test]
    fn test_status_display() {
        assert_eq!(LookupStatus::Loading.to_string(), "loading");
        assert_eq!(LookupStatus::default().to_string(), "idle");
    }
}
