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

use crate::support::error::Error;

/// What occupies a path in a `FileStore`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Folder,
    File,
    Other,
}

/// The storage area of a single user.
///
/// Paths are `/`-separated and relative to the root of the user's storage.
/// Trailing and repeated separators are insignificant.
pub trait FileStore {
    /// Returns whether anything exists at `path`.
    fn exists(&self, path: &str) -> Result<bool, Error>;

    /// Creates the folder at `path`, including any missing parents.
    ///
    /// This must be create-or-get: it succeeds if the folder already exists,
    /// including when another process created it concurrently.
    fn create_folder(&self, path: &str) -> Result<(), Error>;

    /// Returns the kind of node at `path`, or `Error::NxNode` if there is
    /// none.
    fn node_kind(&self, path: &str) -> Result<NodeKind, Error>;

    /// Creates a new file called `name` inside the existing folder `folder`
    /// and writes `content` into it.
    ///
    /// Fails with `Error::FileExists` rather than replacing an existing file.
    fn create_file(
        &self,
        folder: &str,
        name: &str,
        content: &[u8],
    ) -> Result<(), Error>;
}

/// Splits a store path into its non-empty segments.
pub fn path_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}
