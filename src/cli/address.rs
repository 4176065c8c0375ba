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

use std::io::{self, Write};
use std::path::PathBuf;

use rand::{rngs::OsRng, Rng};

use super::main::{AddressSubcommand, VALUES_FILE};
use crate::ingest::AddressRegistry;
use crate::store::{AddressStore, ConfigStore};
use crate::support::{error::Error, sysexits::*};

/// A management operation with every interactive input already gathered.
#[derive(Debug, PartialEq, Eq)]
enum AddressAction {
    List,
    Add {
        address: String,
        password: Option<String>,
    },
    Remove {
        address: String,
    },
    Password {
        address: String,
        password: Option<String>,
    },
}

pub(super) fn address(cmd: AddressSubcommand, root: PathBuf) {
    let action = match cmd {
        AddressSubcommand::List(_) => AddressAction::List,
        AddressSubcommand::Add(cmd) => AddressAction::Add {
            address: cmd.address,
            password: cmd.password,
        },
        AddressSubcommand::Remove(cmd) => AddressAction::Remove {
            address: cmd.address,
        },
        AddressSubcommand::Password(cmd) => {
            let password = if cmd.prompt {
                Some(prompt_password())
            } else if cmd.generate {
                Some(generate_password())
            } else {
                cmd.password
            };

            AddressAction::Password {
                address: cmd.address,
                password,
            }
        },
    };

    let registry = AddressRegistry::new(ConfigStore::new(
        root.join(VALUES_FILE),
        root,
    ));

    let stdout = io::stdout();
    if let Err(e) = run_address(action, &registry, &mut stdout.lock()) {
        die!(Sysexit::for_error(&e), "{}", e);
    }
}

fn prompt_password() -> String {
    match rpassword::read_password_from_tty(Some("Password: ")).and_then(
        |a| {
            rpassword::read_password_from_tty(Some("Confirm: "))
                .map(|b| (a, b))
        },
    ) {
        Err(e) => die!(EX_NOINPUT, "Failed to read password: {}", e),
        Ok((a, b)) if a != b => die!(EX_DATAERR, "Passwords don't match"),
        Ok((a, _)) if a.is_empty() => die!(EX_NOINPUT, "No password given"),
        Ok((a, _)) => a,
    }
}

fn generate_password() -> String {
    let data: [u8; 9] = OsRng.gen();
    base64::encode_config(data, base64::URL_SAFE_NO_PAD)
}

fn run_address<S: AddressStore>(
    action: AddressAction,
    registry: &AddressRegistry<S>,
    out: &mut impl Write,
) -> Result<(), Error> {
    match action {
        AddressAction::List => {
            let entries = registry.list()?;
            if entries.is_empty() {
                writeln!(out, "no mail address")?;
            }

            for entry in entries {
                if entry.requires_password() {
                    writeln!(out, "- {} [:{}]", entry.address, entry.password)?;
                } else {
                    writeln!(out, "- {}", entry.address)?;
                }
            }
        },

        AddressAction::Add { address, password } => {
            registry.add(&address, password.as_deref())?;
            writeln!(out, "Added {}", address)?;
        },

        AddressAction::Remove { address } => {
            registry.remove(&address)?;
            writeln!(out, "Removed {}", address)?;
        },

        AddressAction::Password { address, password } => {
            registry.set_password(&address, password.as_deref())?;
            match password.as_deref() {
                None | Some("") => {
                    writeln!(out, "Password for {} is now UNSET", address)?
                },
                Some(password) => writeln!(
                    out,
                    "Password for {} is now SET to {}",
                    address, password
                )?,
            }
        },
    }

    Ok(())
}
