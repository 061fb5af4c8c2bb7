//! Billing-ID to service-endpoint resolution.
//!
//! MaaS360 customers live on one of five instances. The instance is encoded
//! in the first digit of the billing ID, so the service URL can be derived
//! without any lookup call.

use std::fmt;

use crate::error::{MaasError, Result};

const M1: &str = "https://services.fiberlink.com";
const M2: &str = "https://services.m2.maas360.com";
const M3: &str = "https://services.m3.maas360.com";
const M4: &str = "https://services.m4.maas360.com";
const M6: &str = "https://services.m6.maas360.com";

/// A MaaS360 hosting instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Instance {
    /// Billing IDs starting with `1` (the original fiberlink host).
    M1,
    /// Billing IDs starting with `2`.
    M2,
    /// Billing IDs starting with `3`.
    M3,
    /// Billing IDs starting with `4`.
    M4,
    /// Billing IDs starting with `6`.
    M6,
}

impl Instance {
    /// Selects the instance from the billing ID's first character.
    ///
    /// # Errors
    ///
    /// `MaasError::InvalidIdentifier` when the ID is empty or starts with a
    /// character other than `1`, `2`, `3`, `4` or `6`.
    pub fn from_billing_id(billing_id: &str) -> Result<Self> {
        match billing_id.as_bytes().first() {
            Some(b'1') => Ok(Instance::M1),
            Some(b'2') => Ok(Instance::M2),
            Some(b'3') => Ok(Instance::M3),
            Some(b'4') => Ok(Instance::M4),
            Some(b'6') => Ok(Instance::M6),
            _ => Err(MaasError::InvalidIdentifier {
                billing_id: billing_id.to_string(),
            }),
        }
    }

    /// Base URL of the instance, without a trailing slash.
    pub fn base_url(self) -> &'static str {
        match self {
            Instance::M1 => M1,
            Instance::M2 => M2,
            Instance::M3 => M3,
            Instance::M4 => M4,
            Instance::M6 => M6,
        }
    }
}

impl fmt::Display for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.base_url())
    }
}

/// Resolves a billing ID straight to its service base URL.
pub fn service_url(billing_id: &str) -> Result<&'static str> {
    Instance::from_billing_id(billing_id).map(Instance::base_url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_known_prefix_maps_to_its_instance() {
        let cases = [
            ("1001234", "https://services.fiberlink.com"),
            ("2001234", "https://services.m2.maas360.com"),
            ("3001234", "https://services.m3.maas360.com"),
            ("4001234", "https://services.m4.maas360.com"),
            ("6001234", "https://services.m6.maas360.com"),
        ];
        for (billing_id, expected) in cases {
            assert_eq!(
                service_url(billing_id).unwrap(),
                expected,
                "wrong endpoint for {billing_id}"
            );
        }
    }

    #[test]
    fn only_the_first_character_matters() {
        assert_eq!(service_url("1").unwrap(), M1);
        assert_eq!(service_url("1xyz").unwrap(), M1);
        assert_eq!(Instance::from_billing_id("6").unwrap(), Instance::M6);
    }

    #[test]
    fn unknown_prefixes_are_rejected() {
        for billing_id in ["5001234", "0001234", "7", "9", "abc", " 1001234"] {
            let err = service_url(billing_id).unwrap_err();
            assert!(
                matches!(err, MaasError::InvalidIdentifier { billing_id: ref id } if id == billing_id),
                "expected InvalidIdentifier for {billing_id:?}, got {err:?}"
            );
        }
    }

    #[test]
    fn empty_billing_id_is_rejected() {
        assert!(matches!(
            service_url(""),
            Err(MaasError::InvalidIdentifier { .. })
        ));
    }

    #[test]
    fn display_is_the_base_url() {
        assert_eq!(Instance::M3.to_string(), "https://services.m3.maas360.com");
    }
}
