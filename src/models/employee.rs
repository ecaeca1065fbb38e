use serde::Serialize;

/// Minimal employee directory record: the ledger only needs the schedule
/// code and the admin flag; everything else lives in the HR system.
#[derive(Debug, Clone, Serialize)]
pub struct Employee {
    pub id: String,
    pub name: String,
    pub schedule_code: String,
    pub is_admin: bool,
}
