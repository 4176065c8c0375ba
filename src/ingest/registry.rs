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

//! The registry of drop addresses.
//!
//! The whole registry is one JSON array stored under a single key of an
//! `AddressStore`. Every mutation loads the array, changes it, and writes it
//! back in full; there is no finer-grained locking, so concurrent mutations
//! are last-writer-wins.

use lazy_static::lazy_static;
use log::info;
use regex::Regex;

use super::model::AddressEntry;
use crate::store::AddressStore;
use crate::support::error::Error;

/// The key under which the registry is stored.
pub const ADDRESSES_KEY: &str = "frommail_addresses";

const MAX_ADDRESS_LEN: usize = 254;
const MAX_LOCAL_PART_LEN: usize = 64;

lazy_static! {
    // RFC 5322 dot-atom local part (minus `/`, which could never become a
    // folder name) at a domain made of DNS labels. Single-label domains are
    // accepted.
    static ref VALID_ADDRESS: Regex = Regex::new(
        r"^[A-Za-z0-9!#$%&'*+=?^_`{|}~-]+(\.[A-Za-z0-9!#$%&'*+=?^_`{|}~-]+)*@[A-Za-z0-9]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?(\.[A-Za-z0-9]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?)*$"
    )
    .unwrap();
}

/// Returns whether `address` is acceptable as a drop address.
pub fn is_valid_address(address: &str) -> bool {
    address.len() <= MAX_ADDRESS_LEN
        && address
            .find('@')
            .map_or(false, |at| at <= MAX_LOCAL_PART_LEN)
        && VALID_ADDRESS.is_match(address)
}

pub struct AddressRegistry<S> {
    store: S,
}

impl<S: AddressStore> AddressRegistry<S> {
    pub fn new(store: S) -> Self {
        AddressRegistry { store }
    }

    /// Returns every entry, in registration order.
    pub fn list(&self) -> Result<Vec<AddressEntry>, Error> {
        self.load()
    }

    #[cfg(test)]
    pub fn lookup(&self, address: &str) -> Result<Option<AddressEntry>, Error> {
        Ok(self
            .load()?
            .into_iter()
            .find(|entry| entry.address == address))
    }

    /// Registers `address`, optionally protected by `password`.
    pub fn add(
        &self,
        address: &str,
        password: Option<&str>,
    ) -> Result<(), Error> {
        if !is_valid_address(address) {
            return Err(Error::InvalidAddress);
        }

        let mut entries = self.load()?;
        if entries.iter().any(|entry| entry.address == address) {
            return Err(Error::AddressAlreadyExists);
        }

        entries.push(AddressEntry {
            address: address.to_owned(),
            password: password.unwrap_or_default().to_owned(),
        });
        self.save(&entries)?;
        info!("Registered drop address {}", address);
        Ok(())
    }

    pub fn remove(&self, address: &str) -> Result<(), Error> {
        let mut entries = self.load()?;
        let len_before = entries.len();
        entries.retain(|entry| entry.address != address);
        if entries.len() == len_before {
            return Err(Error::UnknownAddress);
        }

        self.save(&entries)?;
        info!("Removed drop address {}", address);
        Ok(())
    }

    /// Sets the password of `address`. `None` or an empty password removes
    /// the requirement.
    pub fn set_password(
        &self,
        address: &str,
        password: Option<&str>,
    ) -> Result<(), Error> {
        let mut entries = self.load()?;
        let entry = entries
            .iter_mut()
            .find(|entry| entry.address == address)
            .ok_or(Error::UnknownAddress)?;
        entry.password = password.unwrap_or_default().to_owned();

        self.save(&entries)?;
        info!(
            "Password for {} {}",
            address,
            if password.map_or(true, str::is_empty) {
                "cleared"
            } else {
                "set"
            }
        );
        Ok(())
    }

    fn load(&self) -> Result<Vec<AddressEntry>, Error> {
        match self.store.get(ADDRESSES_KEY)? {
            None => Ok(Vec::new()),
            Some(ref s) if s.trim().is_empty() => Ok(Vec::new()),
            Some(s) => Ok(serde_json::from_str::<Option<Vec<AddressEntry>>>(
                &s,
            )?
            .unwrap_or_default()),
        }
    }

    fn save(&self, entries: &[AddressEntry]) -> Result<(), Error> {
        self.store
            .set(ADDRESSES_KEY, &serde_json::to_string(entries)?)
    }
}
