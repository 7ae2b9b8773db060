#[derive(serde::Serialize, serde::Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecurrencyKindType {
    Daily,
    Weekly,
}
