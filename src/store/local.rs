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

//! A `FileStore` backed by a directory on the local file system.
//!
//! Each user's storage is the directory `users/<name>` under the system root.
//! Files are staged in a hidden `.tmp` directory beside the user's folders and
//! moved into place atomically, so a reader never sees a partially written
//! artifact. Every path segment and file name must be a safe name; since safe
//! names cannot start with `.`, the staging directory can never be reached
//! through the store itself.

use std::fs;
use std::os::unix::fs::DirBuilderExt;
use std::path::PathBuf;

use log::info;

use super::file_store::{path_segments, FileStore, NodeKind};
use crate::support::{
    error::Error,
    file_ops::{self, ErrorTransforms, IgnoreKinds},
    safe_name::is_safe_name,
};

const TMP_DIR: &str = ".tmp";
const FOLDER_MODE: u32 = 0o750;
const FILE_MODE: u32 = 0o640;

#[derive(Clone, Debug)]
pub struct LocalFileStore {
    root: PathBuf,
    tmp: PathBuf,
}

impl LocalFileStore {
    pub fn new(root: PathBuf) -> Self {
        let tmp = root.join(TMP_DIR);
        LocalFileStore { root, tmp }
    }

    fn resolve(&self, path: &str) -> Result<PathBuf, Error> {
        let mut resolved = self.root.clone();
        for segment in path_segments(path) {
            if !is_safe_name(segment) {
                return Err(Error::UnsafeName);
            }
            resolved.push(segment);
        }

        Ok(resolved)
    }
}

impl FileStore for LocalFileStore {
    fn exists(&self, path: &str) -> Result<bool, Error> {
        let resolved = self.resolve(path)?;
        match resolved.symlink_metadata() {
            Ok(_) => Ok(true),
            Err(e) if std::io::ErrorKind::NotFound == e.kind() => Ok(false),
            Err(e) => Err::<bool, _>(e).classify_access(),
        }
    }

    fn create_folder(&self, path: &str) -> Result<(), Error> {
        let resolved = self.resolve(path)?;
        // DirBuilder with recursive(true) tolerates the directory appearing
        // between its own existence check and mkdir.
        fs::DirBuilder::new()
            .recursive(true)
            .mode(FOLDER_MODE)
            .create(&resolved)
            .classify_access()?;
        info!("Created folder {}", resolved.display());
        Ok(())
    }

    fn node_kind(&self, path: &str) -> Result<NodeKind, Error> {
        let resolved = self.resolve(path)?;
        let md = resolved
            .symlink_metadata()
            .on_not_found(Error::NxNode(path.to_owned()))?;
        let ft = md.file_type();
        Ok(if ft.is_dir() {
            NodeKind::Folder
        } else if ft.is_file() {
            NodeKind::File
        } else {
            NodeKind::Other
        })
    }

    fn create_file(
        &self,
        folder: &str,
        name: &str,
        content: &[u8],
    ) -> Result<(), Error> {
        if !is_safe_name(name) {
            return Err(Error::UnsafeName);
        }

        let target = self.resolve(folder)?.join(name);
        fs::DirBuilder::new()
            .mode(0o700)
            .create(&self.tmp)
            .ignore_already_exists()
            .classify_access()?;
        file_ops::spit(&self.tmp, &target, false, FILE_MODE, content)
            .on_exists(Error::FileExists)
    }
}
