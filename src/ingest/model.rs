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

//! Types passed between the stages of ingestion.

use serde::{Deserialize, Serialize};

/// The routing data and content extracted from one inbound message.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DecodedMessage {
    /// The address of the first From entry.
    pub from: String,
    pub subject: String,
    /// The raw header block followed by the decoded plain-text body.
    ///
    /// This is both the content of the mail artifact and the text searched
    /// for password tokens.
    pub header_and_body_text: String,
    pub to_addresses: Vec<String>,
    pub cc_addresses: Vec<String>,
    pub attachments: Vec<Attachment>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attachment {
    /// The file name as given by the sender. Untrusted.
    pub filename: String,
    pub content: Vec<u8>,
}

/// One registered drop address.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressEntry {
    pub address: String,
    /// The token senders must include as `:password`. Empty if none is
    /// required.
    #[serde(default)]
    pub password: String,
}

impl AddressEntry {
    pub fn requires_password(&self) -> bool {
        !self.password.is_empty()
    }
}

/// State carried while writing the artifacts of one message for one matched
/// recipient.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IngestionContext {
    pub id: String,
    pub user_id: String,
    /// The ordinal of the next artifact to be written.
    pub counter: u32,
}

impl IngestionContext {
    pub fn new(id: String, user_id: String) -> Self {
        IngestionContext {
            id,
            user_id,
            counter: 0,
        }
    }
}
