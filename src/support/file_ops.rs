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

//! Miscellaneous functions for working with files.

use std::fs;
use std::io::{self, Write};
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use crate::support::error::Error;

/// Write `data` into the file at `path`, atomically.
///
/// The file will first be staged within `tmp`.
///
/// If `overwrite` is true, this will replace anything already at `path`. If
/// false, the call will fail if `path` already exists.
pub fn spit(
    tmp: impl AsRef<Path>,
    path: impl AsRef<Path>,
    overwrite: bool,
    mode: u32,
    data: &[u8],
) -> io::Result<()> {
    let mut tf = tempfile::NamedTempFile::new_in(tmp)?;
    tf.as_file_mut().write_all(data)?;
    chmod(tf.path(), mode)?;
    tf.as_file_mut().sync_all()?;
    if overwrite {
        tf.persist(path)?;
    } else {
        tf.persist_noclobber(path)?;
    }
    Ok(())
}

pub fn chmod(path: impl AsRef<Path>, mode: u32) -> io::Result<()> {
    fs::set_permissions(path, fs::Permissions::from_mode(mode))
}

pub trait IgnoreKinds {
    fn ignore_already_exists(self) -> Self;
}

impl<R: Default> IgnoreKinds for Result<R, io::Error> {
    fn ignore_already_exists(self) -> Self {
        match self {
            Ok(r) => Ok(r),
            Err(e) if io::ErrorKind::AlreadyExists == e.kind() => {
                Ok(R::default())
            },
            Err(e) => Err(e),
        }
    }
}

/// Translates the OS-level failures that callers care to distinguish into
/// their `Error` counterparts.
pub trait ErrorTransforms {
    type Coerced;
    fn on_exists(self, error: Error) -> Self::Coerced;
    fn on_not_found(self, error: Error) -> Self::Coerced;
    fn classify_access(self) -> Self::Coerced;
}

impl<R> ErrorTransforms for Result<R, io::Error> {
    type Coerced = Result<R, Error>;

    fn on_exists(self, error: Error) -> Result<R, Error> {
        match self {
            Err(e) if io::ErrorKind::AlreadyExists == e.kind() => Err(error),
            s => s.classify_access(),
        }
    }

    fn on_not_found(self, error: Error) -> Result<R, Error> {
        match self {
            Err(e) if io::ErrorKind::NotFound == e.kind() => Err(error),
            s => s.classify_access(),
        }
    }

    fn classify_access(self) -> Result<R, Error> {
        match self {
            Ok(r) => Ok(r),
            Err(e) if io::ErrorKind::PermissionDenied == e.kind() => {
                Err(Error::NotPermitted)
            },
            Err(e) if io::ErrorKind::WouldBlock == e.kind() => {
                Err(Error::Locked)
            },
            Err(e) => Err(Error::Io(e)),
        }
    }
}
