#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
pub enum GetCompositeScheduleStatus {
    Accepted,
    Rejected,
}
