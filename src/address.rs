use crate::errors::AppError;

use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;

static LEGACY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[13][a-km-zA-HJ-NP-Z1-9]{25,34}$").expect("legacy pattern"));

static BECH32_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^bc1[a-zA-HJ-NP-Z0-9]{39,59}$").expect("bech32 pattern"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum AddressType {
    Invalid,
    Legacy,
    Bech32,
}

#[derive(Deserialize, Debug)]
pub struct AddressInfo {
    pub address_type: AddressType,
}

impl AddressInfo {
    /// Classifies and validates an address before any network activity.
    pub fn from_address(address: &str) -> Result<Self, AppError> {
        let address_type = Self::get_address_type(address);

        if address_type == AddressType::Invalid {
            return Err(AppError::InvalidAddress(address.to_string()));
        }

        Ok(Self { address_type })
    }

    pub fn get_address_type(address: &str) -> AddressType {
        if LEGACY_PATTERN.is_match(address) {
            return AddressType::Legacy;
        }

        if BECH32_PATTERN.is_match(address) {
            return AddressType::Bech32;
        }

        AddressType::Invalid
    }
}
