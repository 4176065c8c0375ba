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

use std::fs;
use std::io::Read;
use std::mem;
use std::path::{Path, PathBuf};

use structopt::StructOpt;

use crate::support::sysexits::*;
use crate::support::system_config::SystemConfig;

/// The name of the key-value store file under the system root.
pub(super) const VALUES_FILE: &str = "values.toml";

#[derive(StructOpt)]
#[structopt(max_term_width = 80)]
enum Command {
    Deliver(DeliverSubcommand),
    Address(AddressSubcommand),
}

impl Command {
    fn common_options(&mut self) -> CommonOptions {
        match *self {
            Command::Deliver(ref mut c) => mem::take(&mut c.common),
            Command::Address(AddressSubcommand::List(ref mut c)) => {
                mem::take(c)
            },
            Command::Address(AddressSubcommand::Add(ref mut c)) => {
                mem::take(&mut c.common)
            },
            Command::Address(AddressSubcommand::Remove(ref mut c)) => {
                mem::take(&mut c.common)
            },
            Command::Address(AddressSubcommand::Password(ref mut c)) => {
                mem::take(&mut c.common)
            },
        }
    }
}

#[derive(StructOpt, Default)]
pub(super) struct CommonOptions {
    /// The directory containing `frommail.toml` etc
    /// [default: /etc/frommail or /usr/local/etc/frommail]
    #[structopt(long, parse(from_os_str))]
    root: Option<PathBuf>,
}

/// Extract mail sent to registered drop addresses into a user's storage.
///
/// By default, this will read a single message from standard input and
/// process it on behalf of the user whose name matches the current UNIX user.
/// Every To or Cc address of the message which is registered as a drop
/// address receives a copy of the message text and of each attachment in the
/// user's folder `Mails sent to <address>/From <sender>/`.
///
/// Problems with individual recipients, including a missing password token,
/// are logged but never cause this command to fail. It only fails if the
/// input could not be read at all.
#[derive(StructOpt)]
pub(super) struct DeliverSubcommand {
    #[structopt(flatten)]
    pub(super) common: CommonOptions,

    /// Deliver to this user instead of yourself.
    #[structopt(short, long)]
    pub(super) user: Option<String>,

    /// The inputs are percent-encoded base64, as forwarded by the HTTP
    /// transport, rather than raw messages.
    #[structopt(long)]
    pub(super) encoded: bool,

    /// The files to deliver. "-" will read from stdin.
    #[structopt(parse(from_os_str), default_value = "-")]
    pub(super) inputs: Vec<PathBuf>,
}

/// Manage the registered drop addresses.
#[derive(StructOpt)]
pub(super) enum AddressSubcommand {
    /// List all drop addresses and their passwords.
    List(CommonOptions),
    /// Register a new drop address.
    Add(AddressAddSubcommand),
    /// Unregister a drop address.
    Remove(AddressRemoveSubcommand),
    /// Set or clear the password protecting a drop address.
    ///
    /// When a password is set, mail to the address is only accepted if the
    /// password, prefixed with a colon, occurs somewhere in its headers or
    /// text, for example in the sender's display name. Without a password and
    /// without --prompt or --generate, the requirement is removed.
    Password(AddressPasswordSubcommand),
}

#[derive(StructOpt)]
pub(super) struct AddressAddSubcommand {
    #[structopt(flatten)]
    pub(super) common: CommonOptions,

    /// The address to register.
    pub(super) address: String,

    /// Require this password on mail sent to the address.
    pub(super) password: Option<String>,
}

#[derive(StructOpt)]
pub(super) struct AddressRemoveSubcommand {
    #[structopt(flatten)]
    pub(super) common: CommonOptions,

    /// The address to unregister.
    pub(super) address: String,
}

#[derive(StructOpt)]
pub(super) struct AddressPasswordSubcommand {
    #[structopt(flatten)]
    pub(super) common: CommonOptions,

    /// Prompt for the password instead of taking it from the command line.
    #[structopt(long, conflicts_with_all = &["generate", "password"])]
    pub(super) prompt: bool,

    /// Generate a random password.
    #[structopt(long, conflicts_with = "password")]
    pub(super) generate: bool,

    /// The address whose password to change.
    pub(super) address: String,

    /// The new password.
    pub(super) password: Option<String>,
}

pub fn main() {
    // Clap exits with status 1 instead of EX_USAGE if we use the more concise
    // API
    let mut cmd = Command::from_clap(&match Command::clap().get_matches_safe()
    {
        Ok(matches) => matches,
        Err(
            e @ clap::Error {
                kind: clap::ErrorKind::HelpDisplayed,
                ..
            },
        )
        | Err(
            e @ clap::Error {
                kind: clap::ErrorKind::VersionDisplayed,
                ..
            },
        ) => {
            println!("{}", e.message);
            return;
        },
        Err(e) => {
            eprintln!("{}", e.message);
            EX_USAGE.exit()
        },
    });

    let common = cmd.common_options();
    let root = common.root.unwrap_or_else(|| {
        if Path::new("/etc/frommail/frommail.toml").is_file() {
            "/etc/frommail".to_owned().into()
        } else if Path::new("/usr/local/etc/frommail/frommail.toml").is_file()
        {
            "/usr/local/etc/frommail".to_owned().into()
        } else {
            eprintln!(
                "Neither /etc/frommail nor /usr/local/etc/frommail looks like\n\
                 the Frommail root; use --root=/path/to/frommail if your\n\
                 installation is elsewhere."
            );
            EX_CONFIG.exit()
        }
    });

    let system_config = load_system_config(&root);

    match cmd {
        Command::Deliver(cmd) => {
            init_delivery_log(&root);

            let users_root = root.join("users");
            if !users_root.is_dir() {
                die!(EX_CONFIG, "'{}' seems to be missing", users_root.display());
            }

            super::deliver::deliver(system_config, cmd, root, users_root);
        },
        Command::Address(cmd) => {
            crate::init_simple_log();
            super::address::address(cmd, root);
        },
    }
}

fn load_system_config(root: &Path) -> SystemConfig {
    let system_config_path = root.join("frommail.toml");
    let mut system_config_toml = String::new();
    if let Err(e) = fs::File::open(&system_config_path)
        .and_then(|mut f| f.read_to_string(&mut system_config_toml))
    {
        die!(
            EX_CONFIG,
            "Error reading '{}': {}",
            system_config_path.display(),
            e
        );
    }

    let system_config: SystemConfig = match toml::from_str(&system_config_toml)
    {
        Ok(config) => config,
        Err(e) => die!(
            EX_CONFIG,
            "Error in config file at '{}': {}",
            system_config_path.display(),
            e
        ),
    };

    if let Err(e) = system_config.validate() {
        die!(
            EX_CONFIG,
            "Error in config file at '{}': {}: {:?}",
            system_config_path.display(),
            e,
            system_config.ingest.id_pattern
        );
    }

    system_config
}

fn init_delivery_log(root: &Path) {
    if Ok(true) == nix::unistd::isatty(2) {
        // Running interactively; ignore logging configuration and just write
        // to stderr.
        crate::init_simple_log();
        return;
    }

    let log_config_file = root.join("logging.toml");
    if log_config_file.is_file() {
        if let Err(e) = log4rs::init_file(
            &log_config_file,
            log4rs::config::Deserializers::default(),
        ) {
            eprintln!(
                "Failed to load logging config '{}': {}",
                log_config_file.display(),
                e
            );
            crate::init_simple_log();
        }
        return;
    }

    let formatter = syslog::Formatter3164 {
        facility: syslog::Facility::LOG_MAIL,
        hostname: None,
        process: env!("CARGO_PKG_NAME").to_owned(),
        pid: nix::unistd::getpid().as_raw(),
    };

    match syslog::unix(formatter) {
        Ok(logger) => {
            if log::set_boxed_logger(Box::new(syslog::BasicLogger::new(logger)))
                .is_ok()
            {
                log::set_max_level(log::LevelFilter::Info);
            }
        },
        Err(e) => {
            eprintln!("Failed to connect to syslog: {}", e);
            crate::init_simple_log();
        },
    }
}
