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

//! Placement and naming of the files written for a matched recipient.
//!
//! Every recipient of a message gets its own folder
//! `Mails sent to <recipient>/From <sender>/`. Within it, each artifact is
//! named `<id>-<n>_<artifact name>`, where `n` counts up from 0 for each
//! recipient. This keeps names distinct even when a message carries several
//! attachments with the same file name.

use log::info;

use super::model::{Attachment, IngestionContext};
use crate::store::{FileStore, NodeKind};
use crate::support::error::Error;
use crate::support::log_prefix::LogPrefix;

/// Returns the folder, relative to the user's storage root, receiving mail
/// sent to `recipient` by `sender`.
///
/// Neither address is escaped. `recipient` was validated when it was
/// registered; `sender` comes from the message and is only checked by the
/// file store when the folder is created.
pub fn mail_folder_path(recipient: &str, sender: &str) -> String {
    format!("Mails sent to {}/From {}/", recipient, sender)
}

pub fn mail_artifact_name(subject: &str) -> String {
    format!("mail-{}.txt", subject)
}

pub fn attachment_artifact_name(filename: &str) -> String {
    format!("attachment-{}", filename)
}

/// Writes the artifacts of one message for one recipient.
pub struct ArtifactWriter<'a, F: ?Sized> {
    log_prefix: &'a LogPrefix,
    store: &'a F,
    folder: String,
    context: IngestionContext,
}

impl<'a, F: FileStore + ?Sized> ArtifactWriter<'a, F> {
    /// Prepares to write into `folder`, creating it if it does not exist.
    ///
    /// Fails with `Error::NotAFolder` if something other than a folder
    /// already occupies that path.
    pub fn open(
        log_prefix: &'a LogPrefix,
        store: &'a F,
        folder: String,
        context: IngestionContext,
    ) -> Result<Self, Error> {
        if !store.exists(&folder)? {
            store.create_folder(&folder)?;
        }

        if NodeKind::Folder != store.node_kind(&folder)? {
            return Err(Error::NotAFolder(folder));
        }

        Ok(ArtifactWriter {
            log_prefix,
            store,
            folder,
            context,
        })
    }

    /// Writes `content` as the next artifact, returning the file name used.
    pub fn write(
        &mut self,
        artifact_name: &str,
        content: &[u8],
    ) -> Result<String, Error> {
        let file_name = format!(
            "{}-{}_{}",
            self.context.id, self.context.counter, artifact_name
        );
        self.store.create_file(&self.folder, &file_name, content)?;
        self.context.counter += 1;

        info!(
            "{} Wrote {}{} ({} bytes)",
            self.log_prefix,
            self.folder,
            file_name,
            content.len()
        );
        Ok(file_name)
    }

    pub fn write_mail(
        &mut self,
        subject: &str,
        header_and_body_text: &str,
    ) -> Result<String, Error> {
        self.write(
            &mail_artifact_name(subject),
            header_and_body_text.as_bytes(),
        )
    }

    pub fn write_attachment(
        &mut self,
        attachment: &Attachment,
    ) -> Result<String, Error> {
        self.write(
            &attachment_artifact_name(&attachment.filename),
            &attachment.content,
        )
    }

    #[cfg(test)]
    pub fn folder(&self) -> &str {
        &self.folder
    }

    /// The number of artifacts written so far.
    #[cfg(test)]
    pub fn written(&self) -> u32 {
        self.context.counter
    }
}
