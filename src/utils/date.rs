use chrono::NaiveDate;

/// Parse an ISO date (`YYYY-MM-DD`).
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

/// Parse the day-first form used by the responsible sheet (`DD-MM-YYYY`).
pub fn parse_roster_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%d-%m-%Y").ok()
}

pub fn to_db_str(d: &NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}

pub fn from_db_str(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}
