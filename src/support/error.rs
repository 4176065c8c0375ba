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

use std::io;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Malformed message: {0}")]
    MalformedMessage(String),
    #[error("Message has no sender address")]
    MissingSender,
    #[error("Password is set but not used in mail")]
    PasswordNotSatisfied,
    #[error("This mail address is not valid")]
    InvalidAddress,
    #[error("Address already exists")]
    AddressAlreadyExists,
    #[error("Unknown address")]
    UnknownAddress,
    #[error("{0} is not a folder")]
    NotAFolder(String),
    #[error("No such file or folder: {0}")]
    NxNode(String),
    #[error("File already exists")]
    FileExists,
    #[error("Unsafe file or folder name")]
    UnsafeName,
    #[error("Operation not permitted")]
    NotPermitted,
    #[error("Resource is locked")]
    Locked,
    #[error("Invalid message id pattern")]
    BadIdPattern,
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    TomlDe(#[from] toml::de::Error),
    #[error(transparent)]
    TomlSer(#[from] toml::ser::Error),
}

impl From<mailparse::MailParseError> for Error {
    fn from(e: mailparse::MailParseError) -> Self {
        Error::MalformedMessage(e.to_string())
    }
}
