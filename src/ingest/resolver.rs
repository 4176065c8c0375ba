//-
// Copyright (c) 2020, Jason Lingle
//
// This file is part of Frommail.
//
// Frommail is free software: you can  redistribute it and/or modify it under the
// terms of  the GNU General Public  License as published by  the Free Software
// Foundation, either version  3 of the License, or (at  your option) any later
// version.
//
// Frommail is distributed  in the hope that  it will be useful,  but WITHOUT ANY
// WARRANTY; without  even the implied  warranty of MERCHANTABILITY  or FITNESS
// FOR  A PARTICULAR  PURPOSE.  See the  GNU General  Public  License for  more
// details.
//
// You should have received a copy of the GNU General Public License along with
// Frommail. If not, see <http://www.gnu.org/licenses/>.

//! Matching of message recipients against the drop address registry, and the
//! password policy applied to each match.

use std::collections::HashSet;

use log::debug;

use super::model::{AddressEntry, DecodedMessage};
use crate::support::error::Error;
use crate::support::log_prefix::LogPrefix;

/// Returns the registry entries for every distinct To or Cc address of
/// `message`, in the order the addresses first appear in To then Cc.
///
/// Addresses are compared exactly, without case folding. Recipients with no
/// registry entry are of no interest and are skipped.
pub fn resolve_recipients(
    log_prefix: &LogPrefix,
    message: &DecodedMessage,
    registry: &[AddressEntry],
) -> Vec<AddressEntry> {
    let mut seen = HashSet::new();
    let mut matched = Vec::new();

    for address in message
        .to_addresses
        .iter()
        .chain(message.cc_addresses.iter())
    {
        if !seen.insert(address.as_str()) {
            continue;
        }

        match registry.iter().find(|entry| entry.address == *address) {
            Some(entry) => matched.push(entry.clone()),
            None => debug!(
                "{} Ignoring unregistered recipient {}",
                log_prefix, address
            ),
        }
    }

    matched
}

/// Checks the password policy of `entry` against the text of the message.
///
/// An entry without a password accepts anything. Otherwise, `:` followed by
/// the password must occur somewhere in `header_and_body_text`. The match is
/// case-sensitive and may occur anywhere, including the headers.
pub fn authorise(
    header_and_body_text: &str,
    entry: &AddressEntry,
) -> Result<(), Error> {
    if !entry.requires_password() {
        return Ok(());
    }

    let token = format!(":{}", entry.password);
    if header_and_body_text.contains(&token) {
        Ok(())
    } else {
        Err(Error::PasswordNotSatisfied)
    }
}

#[cfg(test)]
mod test {
    use proptest::prelude::*;

    use super::*;

    fn entry(address: &str, password: &str) -> AddressEntry {
        AddressEntry {
            address: address.to_owned(),
            password: password.to_owned(),
        }
    }

    fn message(to: &[&str], cc: &[&str]) -> DecodedMessage {
        DecodedMessage {
            from: "alice@y".to_owned(),
            to_addresses: to.iter().map(|&s| s.to_owned()).collect(),
            cc_addresses: cc.iter().map(|&s| s.to_owned()).collect(),
            ..DecodedMessage::default()
        }
    }

    fn addresses(entries: &[AddressEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.address.as_str()).collect()
    }

    #[test]
    fn resolve_dedups_in_first_seen_order() {
        let prefix = LogPrefix::new("test".to_owned());
        let registry = vec![
            entry("third@x", ""),
            entry("drop@x", "pw"),
            entry("second@x", ""),
        ];

        let matched = resolve_recipients(
            &prefix,
            &message(
                &["drop@x", "stranger@z"],
                &["drop@x", "second@x", "third@x"],
            ),
            &registry,
        );
        assert_eq!(vec!["drop@x", "second@x", "third@x"], addresses(&matched));
        assert_eq!("pw", matched[0].password);
    }

    #[test]
    fn resolve_ignores_unregistered_and_case_variants() {
        let prefix = LogPrefix::new("test".to_owned());
        let registry = vec![entry("drop@x", "")];

        assert!(resolve_recipients(
            &prefix,
            &message(&["Drop@x", "other@x"], &[]),
            &registry
        )
        .is_empty());
        assert!(resolve_recipients(&prefix, &message(&[], &[]), &registry)
            .is_empty());
        assert!(resolve_recipients(
            &prefix,
            &message(&["drop@x"], &[]),
            &[]
        )
        .is_empty());
    }

    #[test]
    fn resolve_cc_only() {
        let prefix = LogPrefix::new("test".to_owned());
        let registry = vec![entry("drop@x", "")];
        let matched = resolve_recipients(
            &prefix,
            &message(&["other@z"], &["drop@x"]),
            &registry,
        );
        assert_eq!(vec!["drop@x"], addresses(&matched));
    }

    #[test]
    fn authorise_without_password() {
        authorise("", &entry("drop@x", "")).unwrap();
        authorise("anything at all", &entry("drop@x", "")).unwrap();
    }

    #[test]
    fn authorise_with_password() {
        let e = entry("drop@x", "secret");
        authorise("hello :secret", &e).unwrap();
        authorise("From: Alice :secret <alice@y>\r\n\r\nhello", &e).unwrap();
        authorise("x:secretive", &e).unwrap();
        assert_matches!(
            Err(Error::PasswordNotSatisfied),
            authorise("hello", &e)
        );
        assert_matches!(
            Err(Error::PasswordNotSatisfied),
            authorise("hello secret", &e)
        );
        assert_matches!(
            Err(Error::PasswordNotSatisfied),
            authorise("hello :Secret", &e)
        );
        assert_matches!(
            Err(Error::PasswordNotSatisfied),
            authorise("hello : secret", &e)
        );
    }

    proptest! {
        #[test]
        fn authorise_iff_colon_token_present(
            password in "[a-zA-Z0-9]{1,8}",
            before in "[a-z :]{0,16}",
            after in "[a-z :]{0,16}",
            include in any::<bool>(),
        ) {
            let e = entry("drop@x", &password);
            let text = if include {
                format!("{}:{}{}", before, password, after)
            } else {
                format!("{}{}", before, after)
            };

            let expected = text.contains(&format!(":{}", password));
            prop_assert_eq!(expected, authorise(&text, &e).is_ok());
            if include {
                prop_assert!(authorise(&text, &e).is_ok());
            }
        }
    }
}
