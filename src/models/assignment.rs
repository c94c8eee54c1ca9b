use chrono::NaiveDate;
use serde::Serialize;

/// A persisted row of `schedule_assignments`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleAssignment {
    pub id: i64,
    pub date: NaiveDate,    // ⇔ schedule_assignments.date (TEXT "YYYY-MM-DD")
    pub duty_type_id: i64,  // ⇔ schedule_assignments.duty_type_id
    pub person_id: String,  // ⇔ schedule_assignments.person_id
}

impl ScheduleAssignment {
    /// Identity without the surrogate id, used to compare assignment sets.
    pub fn key(&self) -> (NaiveDate, i64, String) {
        (self.date, self.duty_type_id, self.person_id.clone())
    }
}

/// An assignment staged for insertion; it gets its id from the database.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NewAssignment {
    pub date: NaiveDate,
    pub duty_type_id: i64,
    pub person_id: String,
}

/// A persisted row of `group_control`. No person or duty dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupControlEntry {
    pub id: i64,
    pub date: NaiveDate,
}
