//! Stored record types and input validation shared by all stores.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::StorageError;

/// Decoded lengths accepted for a static secret (AES-128/192/256 keys).
const SECRET_LENGTHS: [usize; 3] = [16, 24, 32];

/// A known contact and its static shared secret.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRecord {
    /// Display name
    pub username: String,
    /// Invitation link the contact was added through
    pub link: String,
    /// Ledger address identifying the contact
    pub address: String,
    /// Hex-encoded static shared secret
    pub secret: String,
}

impl ContactRecord {
    /// Contact known only by address and secret.
    pub fn new(address: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            username: String::new(),
            link: String::new(),
            address: address.into(),
            secret: secret.into(),
        }
    }

    /// Set the display name.
    #[must_use]
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    /// Set the invitation link.
    #[must_use]
    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = link.into();
        self
    }

    /// Reject records that could never serve a lookup.
    pub(crate) fn validate(&self) -> Result<(), StorageError> {
        if self.address.is_empty() {
            return Err(StorageError::InvalidRecord("empty contact address".to_string()));
        }
        validate_hex("contact secret", &self.secret)?;

        let len = self.secret.len() / 2;
        if !SECRET_LENGTHS.contains(&len) {
            return Err(StorageError::InvalidRecord(format!(
                "contact secret is {len} bytes, expected 16, 24 or 32"
            )));
        }
        Ok(())
    }
}

impl fmt::Debug for ContactRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContactRecord")
            .field("username", &self.username)
            .field("link", &self.link)
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

/// Delivery state of a stored message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageStatus {
    /// Outgoing, not yet acknowledged by the contact
    Sent,
    /// Outgoing, acknowledged as read by the contact
    Acknowledged,
    /// Incoming, not yet read locally
    Unread,
    /// Incoming, read locally
    Read,
}

impl fmt::Display for MessageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Sent => "sent",
            Self::Acknowledged => "acknowledged",
            Self::Unread => "unread",
            Self::Read => "read",
        };
        f.write_str(name)
    }
}

/// One envelope in a contact's message history.
///
/// The envelope is stored as sealed. Reading history never needs keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRecord {
    /// Address of the author
    pub sender: String,
    /// Unix time in seconds when the message was stored
    pub timestamp: u64,
    /// Delivery state
    pub status: MessageStatus,
    /// Sealed envelope bytes
    pub envelope: Vec<u8>,
}

impl MessageRecord {
    /// Message we sent, awaiting acknowledgement.
    pub fn outgoing(sender: impl Into<String>, timestamp: u64, envelope: Vec<u8>) -> Self {
        Self { sender: sender.into(), timestamp, status: MessageStatus::Sent, envelope }
    }

    /// Message received from `sender`, not yet read.
    pub fn incoming(sender: impl Into<String>, timestamp: u64, envelope: Vec<u8>) -> Self {
        Self { sender: sender.into(), timestamp, status: MessageStatus::Unread, envelope }
    }
}

/// Require non-empty, even-length hex.
///
/// Key length is checked by the protocol when the value is used.
pub(crate) fn validate_hex(what: &str, value: &str) -> Result<(), StorageError> {
    let valid =
        !value.is_empty() && value.len() % 2 == 0 && value.bytes().all(|b| b.is_ascii_hexdigit());
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidRecord(format!("{what} is not hex")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "000102030405060708090a0b0c0d0e0f";

    #[test]
    fn builder_sets_fields() {
        let record = ContactRecord::new("0xabc", SECRET).with_username("alice").with_link("l1");

        assert_eq!(record.username, "alice");
        assert_eq!(record.link, "l1");
        assert_eq!(record.address, "0xabc");
        assert!(record.validate().is_ok());
    }

    #[test]
    fn rejects_empty_address() {
        assert!(ContactRecord::new("", SECRET).validate().is_err());
    }

    #[test]
    fn rejects_non_hex_secret() {
        assert!(ContactRecord::new("0xabc", "xyz1").validate().is_err());
        assert!(ContactRecord::new("0xabc", "abc").validate().is_err());
        assert!(ContactRecord::new("0xabc", "").validate().is_err());
    }

    #[test]
    fn secret_must_be_an_aes_key() {
        for len in [16, 24, 32] {
            let secret = "ab".repeat(len);
            assert!(ContactRecord::new("0xabc", secret).validate().is_ok(), "{len} bytes");
        }
        for len in [1, 2, 15, 17, 31, 33, 64] {
            let result = ContactRecord::new("0xabc", "ab".repeat(len)).validate();
            assert!(matches!(result, Err(StorageError::InvalidRecord(_))), "{len} bytes");
        }
    }

    #[test]
    fn message_constructors_set_status() {
        assert_eq!(MessageRecord::outgoing("me", 1, vec![1]).status, MessageStatus::Sent);
        assert_eq!(MessageRecord::incoming("0xabc", 1, vec![1]).status, MessageStatus::Unread);
        assert_eq!(MessageStatus::Acknowledged.to_string(), "acknowledged");
    }

    #[test]
    fn debug_hides_secret() {
        let record = ContactRecord::new("0xabc", "deadbeef");
        assert!(!format!("{record:?}").contains("deadbeef"));
    }
}
