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

use std::fmt::Write as _;

use chrono::format::{Item, StrftimeItems};
use chrono::prelude::*;
use serde::{Deserialize, Serialize};

use super::error::Error;
use super::safe_name::is_safe_name;

/// The system-wide configuration for Frommail.
///
/// This is stored in a file named `frommail.toml` under the Frommail system
/// root, which is typically `/usr/local/etc/frommail` or `/etc/frommail`.
#[derive(Clone, Debug, Deserialize, Serialize, Default)]
pub struct SystemConfig {
    /// Options controlling how inbound messages are turned into files.
    #[serde(default)]
    pub ingest: IngestConfig,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct IngestConfig {
    /// The pattern used to derive the id prefixed to every file written for
    /// one message.
    ///
    /// This is a `strftime`-style pattern evaluated in local time when the
    /// message is ingested. The result must be usable inside a file name.
    pub id_pattern: String,
}

impl Default for IngestConfig {
    fn default() -> Self {
        IngestConfig {
            id_pattern: "%Y-%m-%d %H:%M:%S".to_owned(),
        }
    }
}

impl SystemConfig {
    pub fn validate(&self) -> Result<(), Error> {
        if self.ingest.id_pattern.is_empty()
            || StrftimeItems::new(&self.ingest.id_pattern)
                .any(|item| Item::Error == item)
        {
            return Err(Error::BadIdPattern);
        }

        // The id starts every file name, so it must be usable as one
        let mut sample = String::new();
        if write!(sample, "{}", Local::now().format(&self.ingest.id_pattern))
            .is_err()
            || !is_safe_name(&sample)
        {
            return Err(Error::BadIdPattern);
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn defaults_apply_to_empty_file() {
        let config: SystemConfig = toml::from_str("").unwrap();
        assert_eq!("%Y-%m-%d %H:%M:%S", config.ingest.id_pattern);
        config.validate().unwrap();
    }

    #[test]
    fn custom_pattern_is_read() {
        let config: SystemConfig =
            toml::from_str("[ingest]\nid_pattern = \"%Y%m%d%H%M%S\"\n")
                .unwrap();
        assert_eq!("%Y%m%d%H%M%S", config.ingest.id_pattern);
        config.validate().unwrap();
    }

    #[test]
    fn broken_pattern_is_rejected() {
        let mut config = SystemConfig::default();
        config.ingest.id_pattern = "%Y-%".to_owned();
        assert_matches!(Err(Error::BadIdPattern), config.validate());

        config.ingest.id_pattern = String::new();
        assert_matches!(Err(Error::BadIdPattern), config.validate());
    }

    #[test]
    fn pattern_producing_unsafe_names_is_rejected() {
        let mut config = SystemConfig::default();
        for pattern in &["%D", "%m/%d", "%Y\\%m", ".%Y", "%Y\n%m"] {
            config.ingest.id_pattern = (*pattern).to_owned();
            assert_matches!(Err(Error::BadIdPattern), config.validate());
        }

        config.ingest.id_pattern = "%Y%m%d-%H%M%S".to_owned();
        config.validate().unwrap();
    }
}
