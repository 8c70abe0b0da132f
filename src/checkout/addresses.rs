//! Addresses

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    fs, io,
    path::Path,
};

use mockall::automock;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Address book entry identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AddressId(String);

impl AddressId {
    /// Wrap an address id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for AddressId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

impl From<&str> for AddressId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Delivery address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    /// Address id
    pub id: AddressId,

    /// Recipient name
    pub name: String,

    /// Contact phone number
    pub phone: String,

    /// First address line
    pub address_line1: String,

    /// Optional second address line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_line2: Option<String>,

    /// City
    pub city: String,

    /// State or region
    pub state: String,

    /// Country
    pub country: String,

    /// Postal code
    pub postal_code: String,

    /// Whether this is the customer's preferred address
    #[serde(default)]
    pub is_default: bool,
}

impl Address {
    /// Lines as printed on a label.
    pub fn lines(&self) -> Vec<String> {
        let street = match &self.address_line2 {
            Some(line2) => format!("{}, {line2}", self.address_line1),
            None => self.address_line1.clone(),
        };

        vec![
            self.name.clone(),
            street,
            format!("{}, {} {}", self.city, self.state, self.postal_code),
            self.country.clone(),
            format!("Phone: {}", self.phone),
        ]
    }
}

/// Errors raised while looking up or loading addresses.
#[derive(Debug, Error)]
pub enum AddressError {
    /// The address source could not be reached.
    #[error("address lookup failed: {0}")]
    Unavailable(String),

    /// An address book file could not be read.
    #[error("failed to read address book")]
    Io(#[from] io::Error),

    /// An address book file is not valid YAML.
    #[error("failed to parse address book")]
    Parse(#[from] serde_norway::Error),
}

/// Resolves address ids chosen during checkout.
#[automock]
pub trait AddressProvider: Send + Sync {
    /// The address with the given id, if it exists.
    ///
    /// # Errors
    ///
    /// Returns an [`AddressError`] if the lookup itself failed.
    fn address(&self, id: &AddressId) -> Result<Option<Address>, AddressError>;
}

/// A customer's saved addresses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AddressBook {
    addresses: Vec<Address>,
}

impl AddressBook {
    /// Build a book from addresses.
    pub fn new(addresses: Vec<Address>) -> Self {
        Self { addresses }
    }

    /// Parse a YAML list of addresses.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::Parse`] for malformed YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self, AddressError> {
        Ok(serde_norway::from_str(yaml)?)
    }

    /// Load a YAML address book. A missing file is an empty book.
    ///
    /// # Errors
    ///
    /// Returns an [`AddressError`] if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, AddressError> {
        match fs::read_to_string(path) {
            Ok(yaml) => Self::from_yaml(&yaml),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(error) => Err(error.into()),
        }
    }

    /// Saved addresses, in the order they were added.
    pub fn addresses(&self) -> &[Address] {
        &self.addresses
    }

    /// The preferred address, falling back to the first saved one.
    pub fn default_address(&self) -> Option<&Address> {
        self.addresses
            .iter()
            .find(|address| address.is_default)
            .or_else(|| self.addresses.first())
    }
}

impl AddressProvider for AddressBook {
    fn address(&self, id: &AddressId) -> Result<Option<Address>, AddressError> {
        Ok(self
            .addresses
            .iter()
            .find(|address| address.id == *id)
            .cloned())
    }
}
