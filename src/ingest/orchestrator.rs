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

//! Drives a raw message through decoding, recipient resolution,
//! authorisation and artifact writing.
//!
//! Each matched recipient is processed as an isolated unit. Whatever goes
//! wrong for one recipient is logged and recorded in the report, and the
//! remaining recipients are still processed. Nothing already written for a
//! failed recipient is removed.

use std::fmt::Write as _;

use chrono::prelude::*;
use log::{error, info, warn};

use super::artifact::{mail_folder_path, ArtifactWriter};
use super::decoder;
use super::model::{AddressEntry, DecodedMessage, IngestionContext};
use super::registry::AddressRegistry;
use super::resolver::{authorise, resolve_recipients};
use crate::store::{AddressStore, FileStore};
use crate::support::error::Error;
use crate::support::log_prefix::LogPrefix;
use crate::support::system_config::IngestConfig;

/// What happened to one matched recipient.
#[derive(Debug)]
pub struct RecipientOutcome {
    pub address: String,
    /// The names of the files written, or the error that stopped processing
    /// for this recipient.
    pub result: Result<Vec<String>, Error>,
}

#[derive(Debug, Default)]
pub struct IngestReport {
    pub id: String,
    /// Set if the message could not be routed at all.
    pub rejected: Option<Error>,
    pub recipients: Vec<RecipientOutcome>,
}

impl IngestReport {
    /// The number of recipients for which every artifact was written.
    pub fn delivered(&self) -> usize {
        self.recipients.iter().filter(|r| r.result.is_ok()).count()
    }
}

pub struct Ingestor<S> {
    registry: AddressRegistry<S>,
    id_pattern: String,
}

impl<S: AddressStore> Ingestor<S> {
    pub fn new(registry: AddressRegistry<S>, config: &IngestConfig) -> Self {
        Ingestor {
            registry,
            id_pattern: config.id_pattern.clone(),
        }
    }

    #[cfg(test)]
    pub fn registry(&self) -> &AddressRegistry<S> {
        &self.registry
    }

    /// Ingests `raw` on behalf of `user_id`, whose storage is `store`.
    ///
    /// This never fails; the outcome is only reported for logging and
    /// diagnostics.
    pub fn ingest<F: FileStore + ?Sized>(
        &self,
        raw: &[u8],
        user_id: &str,
        store: &F,
    ) -> IngestReport {
        let mut id = String::new();
        if write!(id, "{}", Local::now().format(&self.id_pattern)).is_err() {
            error!(
                "ingest:~{} Bad id pattern {:?}; message dropped",
                user_id, self.id_pattern
            );
            return IngestReport {
                id: String::new(),
                rejected: Some(Error::BadIdPattern),
                recipients: vec![],
            };
        }

        self.ingest_with_id(raw, user_id, id, store)
    }

    /// Like `ingest`, but with the message id given explicitly.
    pub fn ingest_with_id<F: FileStore + ?Sized>(
        &self,
        raw: &[u8],
        user_id: &str,
        id: String,
        store: &F,
    ) -> IngestReport {
        let log_prefix = LogPrefix::new("ingest".to_owned());
        log_prefix.set_user(user_id.to_owned());
        log_prefix.set_message_id(id.clone());

        let mut report = IngestReport {
            id,
            ..IngestReport::default()
        };

        let message = match decoder::decode(raw) {
            Ok(message) => message,
            Err(e) => {
                error!("{} Rejecting message: {}", log_prefix, e);
                report.rejected = Some(e);
                return report;
            },
        };

        let registry = match self.registry.list() {
            Ok(registry) => registry,
            Err(e) => {
                error!("{} Unable to load address registry: {}", log_prefix, e);
                report.rejected = Some(e);
                return report;
            },
        };

        for entry in resolve_recipients(&log_prefix, &message, &registry) {
            let context =
                IngestionContext::new(report.id.clone(), user_id.to_owned());
            let result =
                deliver_to(&log_prefix, &message, &entry, context, store);
            match result {
                Ok(ref files) => info!(
                    "{} Delivered mail from {} to {} ({} files)",
                    log_prefix,
                    message.from,
                    entry.address,
                    files.len()
                ),
                Err(ref e) => warn!(
                    "{} Skipping recipient {}: {}",
                    log_prefix, entry.address, e
                ),
            }

            report.recipients.push(RecipientOutcome {
                address: entry.address,
                result,
            });
        }

        report
    }
}

fn deliver_to<F: FileStore + ?Sized>(
    log_prefix: &LogPrefix,
    message: &DecodedMessage,
    entry: &AddressEntry,
    context: IngestionContext,
    store: &F,
) -> Result<Vec<String>, Error> {
    authorise(&message.header_and_body_text, entry)?;

    let folder = mail_folder_path(&entry.address, &message.from);
    let mut writer = ArtifactWriter::open(log_prefix, store, folder, context)?;

    let mut files = Vec::with_capacity(1 + message.attachments.len());
    files.push(
        writer.write_mail(&message.subject, &message.header_and_body_text)?,
    );
    for attachment in &message.attachments {
        files.push(writer.write_attachment(attachment)?);
    }

    Ok(files)
}
