use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The four timestamps every group and entry carries.
///
/// `None` means "not set"; for `expiry` it means the node never expires.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Times {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modification: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_access: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<DateTime<Utc>>,
}

impl Times {
    /// Creation, modification and access all set to `now`; no expiry.
    pub fn stamped(now: DateTime<Utc>) -> Self {
        Self {
            creation: Some(now),
            last_modification: Some(now),
            last_access: Some(now),
            expiry: None,
        }
    }

    /// Record a modification (which is also an access) at `now`.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.last_modification = Some(now);
        self.last_access = Some(now);
    }

    pub fn is_unset(&self) -> bool {
        *self == Self::default()
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expiry.is_some_and(|expiry| expiry <= now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_default_has_nothing_set() {
        let times = Times::default();
        assert!(times.creation.is_none());
        assert!(times.last_modification.is_none());
        assert!(times.last_access.is_none());
        assert!(times.expiry.is_none());
        assert!(times.is_unset());
        assert!(!Times::stamped(at(9)).is_unset());
    }

    #[test]
    fn test_stamped_leaves_expiry_unset() {
        let times = Times::stamped(at(9));
        assert_eq!(times.creation, Some(at(9)));
        assert_eq!(times.last_modification, Some(at(9)));
        assert_eq!(times.last_access, Some(at(9)));
        assert_eq!(times.expiry, None);
    }

    #[test]
    fn test_touch_keeps_creation() {
        let mut times = Times::stamped(at(9));
        times.touch(at(11));
        assert_eq!(times.creation, Some(at(9)));
        assert_eq!(times.last_modification, Some(at(11)));
        assert_eq!(times.last_access, Some(at(11)));
    }

    #[test]
    fn test_is_expired() {
        let mut times = Times::default();
        assert!(!times.is_expired(at(12)), "no expiry means never");

        times.expiry = Some(at(12));
        assert!(times.is_expired(at(12)));
        assert!(times.is_expired(at(12) + Duration::seconds(1)));
        assert!(!times.is_expired(at(11)));
    }
}
