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

//! The key-value store holding application values such as the address
//! registry.
//!
//! `ConfigStore` keeps all values in one TOML table, `values.toml` under the
//! system root. Every mutation rewrites the whole file atomically, so
//! concurrent writers race with last-writer-wins semantics but a reader never
//! observes a torn file.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use crate::support::{
    error::Error,
    file_ops::{self, ErrorTransforms},
};

pub trait AddressStore {
    fn get(&self, key: &str) -> Result<Option<String>, Error>;
    fn set(&self, key: &str, value: &str) -> Result<(), Error>;
    /// Removes `key`, returning the value it had.
    #[allow(dead_code)]
    fn delete(&self, key: &str) -> Result<Option<String>, Error>;
}

#[derive(Clone, Debug)]
pub struct ConfigStore {
    path: PathBuf,
    tmp: PathBuf,
}

impl ConfigStore {
    /// Creates a store backed by the file at `path`, which need not exist
    /// yet. Replacement files are staged in `tmp`, which must be on the same
    /// file system.
    pub fn new(path: PathBuf, tmp: PathBuf) -> Self {
        ConfigStore { path, tmp }
    }

    fn load(&self) -> Result<BTreeMap<String, String>, Error> {
        match fs::read_to_string(&self.path) {
            Ok(s) => Ok(toml::from_str(&s)?),
            Err(e) if std::io::ErrorKind::NotFound == e.kind() => {
                Ok(BTreeMap::new())
            },
            Err(e) => {
                Err::<BTreeMap<String, String>, _>(e).classify_access()
            },
        }
    }

    fn save(&self, values: &BTreeMap<String, String>) -> Result<(), Error> {
        let data = toml::to_string(values)?;
        file_ops::spit(&self.tmp, &self.path, true, 0o600, data.as_bytes())
            .classify_access()
    }
}

impl AddressStore for ConfigStore {
    fn get(&self, key: &str) -> Result<Option<String>, Error> {
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Error> {
        let mut values = self.load()?;
        values.insert(key.to_owned(), value.to_owned());
        self.save(&values)
    }

    fn delete(&self, key: &str) -> Result<Option<String>, Error> {
        let mut values = self.load()?;
        let old = values.remove(key);
        if old.is_some() {
            self.save(&values)?;
        }
        Ok(old)
    }
}
