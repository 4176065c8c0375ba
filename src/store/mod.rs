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

//! The storage collaborators of the ingestion pipeline.
//!
//! The pipeline only ever talks to storage through the `FileStore` and
//! `AddressStore` traits; the implementations here are the ones the command
//! line tools use.

pub mod config_store;
pub mod file_store;
pub mod local;
#[cfg(test)]
pub mod memory;

pub use self::config_store::{AddressStore, ConfigStore};
pub use self::file_store::{FileStore, NodeKind};
pub use self::local::LocalFileStore;
