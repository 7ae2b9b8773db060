#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
pub enum ChargingProfileStatus {
    Accepted,
    Rejected,
    NotSupported,
}
