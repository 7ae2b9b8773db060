#[derive(serde::Serialize, serde::Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChargingProfileKindType {
    Absolute,
    Recurring,
    Relative,
}
