/// Reasons a charging profile is refused at the store boundary. Validation
/// failures never reach the resolver.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProfileError {
    EmptySchedule,
    MissingInitialPeriod,
    UnsortedPeriods,
    NonPositiveDuration,
    TooManyPeriods,
    StackLevelExceeded,
    UnsupportedRateUnit,
    CapacityExceeded,
    InvalidConnector,
    NoActiveTransaction,
    TransactionMismatch,
    MissingRecurrenceSchedule,
    PurposeMismatch,
    TransactionAlreadyBound,
}

impl core::fmt::Display for ProfileError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            ProfileError::EmptySchedule => "charging schedule has no periods",
            ProfileError::MissingInitialPeriod => "first schedule period must start at 0",
            ProfileError::UnsortedPeriods => "schedule periods must be strictly increasing",
            ProfileError::NonPositiveDuration => "schedule duration must be positive",
            ProfileError::TooManyPeriods => {
                "number of schedule periods exceeds ChargingScheduleMaxPeriods"
            }
            ProfileError::StackLevelExceeded => {
                "stack level exceeds ChargeProfileMaxStackLevel"
            }
            ProfileError::UnsupportedRateUnit => "unsupported charging rate unit",
            ProfileError::CapacityExceeded => {
                "number of charging profiles exceeds MaxChargingProfilesInstalled"
            }
            ProfileError::InvalidConnector => "invalid connector id",
            ProfileError::NoActiveTransaction => "no transaction in progress on the connector",
            ProfileError::TransactionMismatch => {
                "transaction id does not match the ongoing transaction"
            }
            ProfileError::MissingRecurrenceSchedule => {
                "recurring profiles must have a start schedule and a duration"
            }
            ProfileError::PurposeMismatch => "profile purpose not allowed for this operation",
            ProfileError::TransactionAlreadyBound => {
                "a pending TxProfile must not carry a transaction id"
            }
        };
        write!(f, "{s}")
    }
}
