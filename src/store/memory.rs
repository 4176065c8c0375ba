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

//! In-memory stores for tests.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};

use super::config_store::AddressStore;
use super::file_store::{path_segments, FileStore, NodeKind};
use crate::support::error::Error;

#[derive(Debug, Default)]
pub struct MemoryAddressStore {
    values: RefCell<HashMap<String, String>>,
}

impl AddressStore for MemoryAddressStore {
    fn get(&self, key: &str) -> Result<Option<String>, Error> {
        Ok(self.values.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Error> {
        self.values
            .borrow_mut()
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<Option<String>, Error> {
        Ok(self.values.borrow_mut().remove(key))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemoryNode {
    Folder,
    File(Vec<u8>),
    Other,
}

/// A `FileStore` keeping everything in a map keyed by normalised path.
///
/// Failures can be injected per path: any operation touching a path in
/// `fail_paths` fails with the associated error kind.
#[derive(Debug, Default)]
pub struct MemoryFileStore {
    pub nodes: RefCell<BTreeMap<String, MemoryNode>>,
    pub fail_paths: RefCell<HashMap<String, fn() -> Error>>,
    /// Every file creation, in order, as (folder, name).
    pub writes: RefCell<Vec<(String, String)>>,
}

fn normalise(path: &str) -> String {
    path_segments(path).collect::<Vec<_>>().join("/")
}

impl MemoryFileStore {
    pub fn fail_on(&self, path: &str, error: fn() -> Error) {
        self.fail_paths.borrow_mut().insert(normalise(path), error);
    }

    pub fn file(&self, path: &str) -> Option<Vec<u8>> {
        match self.nodes.borrow().get(&normalise(path)) {
            Some(MemoryNode::File(data)) => Some(data.clone()),
            _ => None,
        }
    }

    pub fn file_names(&self) -> Vec<String> {
        self.nodes
            .borrow()
            .iter()
            .filter(|&(_, node)| matches!(*node, MemoryNode::File(_)))
            .map(|(path, _)| path.clone())
            .collect()
    }

    fn check(&self, path: &str) -> Result<(), Error> {
        match self.fail_paths.borrow().get(path) {
            Some(error) => Err(error()),
            None => Ok(()),
        }
    }
}

impl FileStore for MemoryFileStore {
    fn exists(&self, path: &str) -> Result<bool, Error> {
        let path = normalise(path);
        self.check(&path)?;
        Ok(self.nodes.borrow().contains_key(&path))
    }

    fn create_folder(&self, path: &str) -> Result<(), Error> {
        let path = normalise(path);
        self.check(&path)?;

        let mut nodes = self.nodes.borrow_mut();
        let mut prefix = String::new();
        for segment in path_segments(&path) {
            if !prefix.is_empty() {
                prefix.push('/');
            }
            prefix.push_str(segment);

            match nodes.get(&prefix) {
                None => {
                    nodes.insert(prefix.clone(), MemoryNode::Folder);
                },
                Some(MemoryNode::Folder) => (),
                Some(_) => return Err(Error::NotAFolder(prefix)),
            }
        }

        Ok(())
    }

    fn node_kind(&self, path: &str) -> Result<NodeKind, Error> {
        let path = normalise(path);
        self.check(&path)?;
        match self.nodes.borrow().get(&path) {
            None => Err(Error::NxNode(path)),
            Some(MemoryNode::Folder) => Ok(NodeKind::Folder),
            Some(MemoryNode::File(_)) => Ok(NodeKind::File),
            Some(MemoryNode::Other) => Ok(NodeKind::Other),
        }
    }

    fn create_file(
        &self,
        folder: &str,
        name: &str,
        content: &[u8],
    ) -> Result<(), Error> {
        let folder = normalise(folder);
        let path = format!("{}/{}", folder, name);
        self.check(&folder)?;
        self.check(&path)?;

        let mut nodes = self.nodes.borrow_mut();
        if Some(&MemoryNode::Folder) != nodes.get(&folder) {
            return Err(Error::NxNode(folder));
        }
        if nodes.contains_key(&path) {
            return Err(Error::FileExists);
        }

        nodes.insert(path, MemoryNode::File(content.to_vec()));
        self.writes.borrow_mut().push((folder, name.to_owned()));
        Ok(())
    }
}
