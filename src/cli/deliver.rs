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
use std::io::{self, Read};
use std::mem;
use std::path::{Path, PathBuf};

use log::{error, info, warn};

use super::main::{DeliverSubcommand, VALUES_FILE};
use crate::ingest::{AddressRegistry, IngestReport, Ingestor};
use crate::store::{AddressStore, ConfigStore, FileStore, LocalFileStore};
use crate::support::{
    error::Error, safe_name::is_safe_name, sysexits::*,
    system_config::SystemConfig,
};

pub(super) fn deliver(
    system_config: SystemConfig,
    mut cmd: DeliverSubcommand,
    root: PathBuf,
    users_root: PathBuf,
) {
    let user_name = match cmd.user {
        Some(ref un) => un.clone(),
        None => match nix::unistd::User::from_uid(nix::unistd::getuid()) {
            Ok(Some(user)) => user.name,
            Ok(None) => die!(
                EX_NOUSER,
                "No entry found for UID {}",
                nix::unistd::getuid()
            ),
            Err(e) => die!(
                EX_OSERR,
                "Failed to look up passwd entry for UID {}: {}",
                nix::unistd::getuid(),
                e
            ),
        },
    };

    if !is_safe_name(&user_name) {
        die!(EX_NOUSER, "Bad user name: {}", user_name);
    }

    let user_root = users_root.join(&user_name);
    if !user_root.is_dir() {
        die!(EX_NOUSER, "{} is not a Frommail user.", user_name);
    }

    let ingestor = Ingestor::new(
        AddressRegistry::new(ConfigStore::new(
            root.join(VALUES_FILE),
            root,
        )),
        &system_config.ingest,
    );
    let store = LocalFileStore::new(user_root);

    let items = mem::take(&mut cmd.inputs);
    if let Err(e) = run_delivery(
        cmd.encoded,
        items.into_iter(),
        io::stdin().lock(),
        &ingestor,
        &user_name,
        &store,
    ) {
        e.exit();
    }
}

/// Ingests every item, reading `-` from `stdin`.
///
/// Only a failure to obtain an item's payload is an error. Whatever happens
/// during ingestion is logged and otherwise ignored, since the message has
/// been accepted at that point.
fn run_delivery<S: AddressStore, F: FileStore + ?Sized>(
    encoded: bool,
    items: impl Iterator<Item = PathBuf>,
    mut stdin: impl Read,
    ingestor: &Ingestor<S>,
    user_name: &str,
    store: &F,
) -> Result<(), Sysexit> {
    for item in items {
        let raw = match read_item(&item, &mut stdin, encoded) {
            Ok(raw) => raw,
            Err(e) => {
                error!("Unable to process {}: {}", item.display(), e);
                return Err(match e {
                    Error::Io(ref e) if io::ErrorKind::NotFound == e.kind() => {
                        EX_NOINPUT
                    },
                    Error::Io(_) => EX_IOERR,
                    _ => EX_DATAERR,
                });
            },
        };

        let report = ingestor.ingest(&raw, user_name, store);
        log_summary(&item, user_name, &report);
    }

    Ok(())
}

fn read_item(
    item: &Path,
    stdin: &mut impl Read,
    encoded: bool,
) -> Result<Vec<u8>, Error> {
    let mut data = Vec::new();
    if Path::new("-") == item {
        stdin.read_to_end(&mut data)?;
    } else {
        fs::File::open(item)?.read_to_end(&mut data)?;
    }

    if encoded {
        decode_transport(&data)
    } else {
        Ok(data)
    }
}

/// Undoes the encoding applied by the HTTP transport: the message is base64
/// encoded and the result percent-encoded.
fn decode_transport(data: &[u8]) -> Result<Vec<u8>, Error> {
    let text = std::str::from_utf8(data).map_err(|_| {
        Error::MalformedMessage("Encoded payload is not UTF-8".to_owned())
    })?;
    let unescaped = urlencoding::decode(text).map_err(|_| {
        Error::MalformedMessage(
            "Percent-encoded payload is not UTF-8".to_owned(),
        )
    })?;
    let compact = unescaped
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect::<String>();
    base64::decode(&compact)
        .map_err(|e| Error::MalformedMessage(format!("Bad base64: {}", e)))
}

fn log_summary(item: &Path, user_name: &str, report: &IngestReport) {
    if let Some(ref e) = report.rejected {
        warn!(
            "delivery:~{} {} not ingested: {}",
            user_name,
            item.display(),
            e
        );
    } else {
        info!(
            "delivery:~{} {} ingested as [{}]: {} of {} recipient(s) served",
            user_name,
            item.display(),
            report.id,
            report.delivered(),
            report.recipients.len()
        );
        for outcome in report.recipients.iter().filter(|r| r.result.is_err()) {
            warn!(
                "delivery:~{} {} not delivered to {}",
                user_name,
                item.display(),
                outcome.address
            );
        }
    }
}

#[cfg(test)]
mod test {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;
    use crate::store::memory::{MemoryAddressStore, MemoryFileStore};
    use crate::support::system_config::IngestConfig;
    use crate::test_data::*;

    fn ingestor() -> Ingestor<MemoryAddressStore> {
        crate::init_test_log();

        let ingestor = Ingestor::new(
            AddressRegistry::new(MemoryAddressStore::default()),
            &IngestConfig {
                id_pattern: "id".to_owned(),
            },
        );
        ingestor.registry().add("drop@x", None).unwrap();
        ingestor
    }

    #[test]
    fn delivers_from_stdin() {
        let ingestor = ingestor();
        let store = MemoryFileStore::default();

        run_delivery(
            false,
            vec![PathBuf::from("-")].into_iter(),
            NO_TOKEN,
            &ingestor,
            "zim",
            &store,
        )
        .unwrap();

        assert_eq!(
            vec!["Mails sent to drop@x/From alice@y/id-0_mail-Hi.txt"],
            store.file_names()
        );
    }

    #[test]
    fn delivers_files_in_order() {
        let ingestor = ingestor();
        let store = MemoryFileStore::default();

        let mut first = NamedTempFile::new().unwrap();
        first.write_all(TWO_ATTACHMENTS).unwrap();
        let mut second = NamedTempFile::new().unwrap();
        second.write_all(NO_TOKEN).unwrap();

        run_delivery(
            false,
            vec![first.path().to_owned(), second.path().to_owned()]
                .into_iter(),
            io::empty(),
            &ingestor,
            "zim",
            &store,
        )
        .unwrap();

        assert_eq!(
            vec![
                "Mails sent to drop@x/From alice@y/id-0_mail-Hi.txt",
                "Mails sent to drop@x/From alice@y/id-0_mail-Scans.txt",
                "Mails sent to drop@x/From alice@y/id-1_attachment-a.pdf",
                "Mails sent to drop@x/From alice@y/id-2_attachment-b.png",
            ],
            store.file_names()
        );
    }

    #[test]
    fn undoes_transport_encoding() {
        let ingestor = ingestor();
        let store = MemoryFileStore::default();

        let encoded = base64::encode(NO_TOKEN);
        let escaped = urlencoding::encode(&encoded).into_owned();

        run_delivery(
            true,
            vec![PathBuf::from("-")].into_iter(),
            escaped.as_bytes(),
            &ingestor,
            "zim",
            &store,
        )
        .unwrap();

        let text = store
            .file("Mails sent to drop@x/From alice@y/id-0_mail-Hi.txt")
            .unwrap();
        assert!(text.starts_with(b"To: drop@x\r\n"));
        assert!(String::from_utf8(text).unwrap().contains("hello"));
    }

    #[test]
    fn transport_decoding_ignores_line_breaks() {
        assert_eq!(
            b"hello world".to_vec(),
            decode_transport(b"aGVsbG8g%0D%0Ad29y\nbGQ%3D").unwrap()
        );
    }

    #[test]
    fn bad_transport_encoding_is_data_error() {
        let ingestor = ingestor();
        let store = MemoryFileStore::default();

        assert_eq!(
            Err(EX_DATAERR),
            run_delivery(
                true,
                vec![PathBuf::from("-")].into_iter(),
                &b"not base64!"[..],
                &ingestor,
                "zim",
                &store,
            )
        );
        assert!(store.file_names().is_empty());
    }

    #[test]
    fn missing_input_is_noinput() {
        let ingestor = ingestor();
        let store = MemoryFileStore::default();
        let dir = tempfile::TempDir::new().unwrap();

        assert_eq!(
            Err(EX_NOINPUT),
            run_delivery(
                false,
                vec![dir.path().join("nx")].into_iter(),
                io::empty(),
                &ingestor,
                "zim",
                &store,
            )
        );
    }

    #[test]
    fn refused_recipients_are_still_acknowledged() {
        let ingestor = ingestor();
        ingestor
            .registry()
            .set_password("drop@x", Some("secret"))
            .unwrap();
        let store = MemoryFileStore::default();

        run_delivery(
            false,
            vec![PathBuf::from("-")].into_iter(),
            NO_TOKEN,
            &ingestor,
            "zim",
            &store,
        )
        .unwrap();
        assert!(store.file_names().is_empty());
    }

    #[test]
    fn ingestion_failures_are_still_acknowledged() {
        let ingestor = ingestor();
        let store = MemoryFileStore::default();

        run_delivery(
            false,
            vec![PathBuf::from("-")].into_iter(),
            NO_SENDER,
            &ingestor,
            "zim",
            &store,
        )
        .unwrap();
        assert!(store.file_names().is_empty());
    }
}
