//! Legacy flat contact file.
//!
//! One contact per line, fields separated by `*:*`:
//!
//! ```text
//! id*:*address*:*secret
//! ```
//!
//! Fields after the third are ignored. Blank lines are ignored. Lines with
//! fewer than three fields or an invalid secret are skipped with a warning;
//! the rest of the file still loads.

use std::{collections::HashMap, path::Path};

use ledgerseal_core::{ContactSecretStore, SourceError};

use crate::{
    error::StorageError,
    record::ContactRecord,
};

/// Field separator of the history file.
pub const FIELD_SEPARATOR: &str = "*:*";

/// Contacts parsed from a history file, keyed by address.
///
/// The first line for an address wins; later lines for it are ignored.
#[derive(Debug, Clone, Default)]
pub struct HistoryFile {
    contacts: HashMap<String, ContactRecord>,
    skipped: usize,
}

impl HistoryFile {
    /// Parse history file contents.
    pub fn parse(contents: &str) -> Self {
        let mut history = Self::default();

        for (number, line) in contents.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            match parse_line(line) {
                Ok(record) => {
                    history.contacts.entry(record.address.clone()).or_insert(record);
                },
                Err(reason) => {
                    tracing::warn!(line = number + 1, %reason, "skipping history line");
                    history.skipped += 1;
                },
            }
        }

        history
    }

    /// Read and parse a history file.
    ///
    /// # Errors
    ///
    /// - `Io` if the file cannot be read
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(Self::parse(&contents))
    }

    /// Contact stored under `address`.
    pub fn contact(&self, address: &str) -> Option<&ContactRecord> {
        self.contacts.get(address)
    }

    /// Number of contacts loaded.
    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    /// Whether no contact was loaded.
    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    /// Number of malformed lines skipped while parsing.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Iterate over the loaded contacts in no particular order.
    pub fn contacts(&self) -> impl Iterator<Item = &ContactRecord> {
        self.contacts.values()
    }
}

impl ContactSecretStore for HistoryFile {
    fn secret_of(&self, address: &str) -> Result<Option<String>, SourceError> {
        Ok(self.contact(address).map(|record| record.secret.clone()))
    }
}

fn parse_line(line: &str) -> Result<ContactRecord, StorageError> {
    let fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();

    let [id, address, secret, ..] = fields.as_slice() else {
        return Err(StorageError::InvalidRecord(format!(
            "expected at least 3 fields, found {}",
            fields.len()
        )));
    };

    let record = ContactRecord::new(*address, *secret).with_username(*id);
    record.validate()?;

    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALICE: &str = "000102030405060708090a0b0c0d0e0f";
    const BOB: &str = "ffeeddccbbaa99887766554433221100";

    #[test]
    fn parses_well_formed_lines() {
        let history = HistoryFile::parse(&format!("1*:*0xalice*:*{ALICE}\n2*:*0xbob*:*{BOB}\n"));

        assert_eq!(history.len(), 2);
        assert_eq!(history.skipped(), 0);
        assert_eq!(history.contact("0xalice").map(|r| r.username.as_str()), Some("1"));
        assert_eq!(history.secret_of("0xbob").unwrap().as_deref(), Some(BOB));
    }

    #[test]
    fn skips_malformed_lines() {
        let history = HistoryFile::parse(&format!(
            "garbage\n\
             \n\
             1*:*0xalice*:*nothex\n\
             2*:**:*{ALICE}\n\
             3*:*0xcarol*:*00ff\n\
             4*:*0xdave\n\
             5*:*0xerin*:*{ALICE}\n"
        ));

        assert_eq!(history.len(), 1);
        assert_eq!(history.skipped(), 5);
        assert!(history.contact("0xerin").is_some());
    }

    #[test]
    fn first_line_for_an_address_wins() {
        let history =
            HistoryFile::parse(&format!("1*:*0xalice*:*{ALICE}\n2*:*0xalice*:*{BOB}\n"));

        assert_eq!(history.len(), 1);
        assert_eq!(history.secret_of("0xalice").unwrap().as_deref(), Some(ALICE));
        assert_eq!(history.contact("0xalice").map(|r| r.username.as_str()), Some("1"));
    }

    #[test]
    fn malformed_first_line_does_not_shadow_later_one() {
        let history =
            HistoryFile::parse(&format!("1*:*0xalice*:*nothex\n2*:*0xalice*:*{BOB}\n"));

        assert_eq!(history.secret_of("0xalice").unwrap().as_deref(), Some(BOB));
    }

    #[test]
    fn extra_fields_are_ignored() {
        let history = HistoryFile::parse(&format!("1*:*0xalice*:*{ALICE}*:*extra*:*more\n"));

        assert_eq!(history.skipped(), 0);
        assert_eq!(history.secret_of("0xalice").unwrap().as_deref(), Some(ALICE));
    }

    #[test]
    fn unknown_address_is_none() {
        let history = HistoryFile::parse("");
        assert!(history.is_empty());
        assert_eq!(history.secret_of("0xnobody").unwrap(), None);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let result = HistoryFile::load("/nonexistent/ledgerseal/history");
        assert!(matches!(result, Err(StorageError::Io(_))));
    }
}
