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

//! Extraction of routing data, text and attachments from raw messages.
//!
//! MIME parsing proper is delegated to `mailparse`, which is lenient about
//! malformed structure. The only failures reported here are input it cannot
//! split into headers and body at all, address headers it cannot parse, and
//! the absence of a sender.

use std::borrow::Cow;

use mailparse::{DispositionType, MailAddr, MailHeader, ParsedMail};

use super::model::{Attachment, DecodedMessage};
use crate::support::error::Error;

/// Used when a part flagged as an attachment gives no name at all.
const UNNAMED_ATTACHMENT: &str = "noname";

pub fn decode(raw: &[u8]) -> Result<DecodedMessage, Error> {
    let (_, body_offset) = mailparse::parse_headers(raw)?;
    let parsed = mailparse::parse_mail(raw)?;

    let from = match headers_named(&parsed, "From").next() {
        Some(header) => header_addresses(header)?.into_iter().next(),
        None => None,
    }
    .ok_or(Error::MissingSender)?;

    let subject = headers_named(&parsed, "Subject")
        .next()
        .map(MailHeader::get_value)
        .unwrap_or_default();

    let mut to_addresses = Vec::new();
    for header in headers_named(&parsed, "To") {
        to_addresses.extend(header_addresses(header)?);
    }

    let mut cc_addresses = Vec::new();
    for header in headers_named(&parsed, "Cc") {
        cc_addresses.extend(header_addresses(header)?);
    }

    let mut text_body = None;
    let mut attachments = Vec::new();
    scan_parts(&parsed, &mut text_body, &mut attachments)?;

    let mut header_and_body_text =
        String::from_utf8_lossy(&raw[..body_offset]).into_owned();
    if let Some(text_body) = text_body {
        header_and_body_text.push_str(&text_body);
    }

    Ok(DecodedMessage {
        from,
        subject,
        header_and_body_text,
        to_addresses,
        cc_addresses,
        attachments,
    })
}

fn headers_named<'a, 'm>(
    parsed: &'a ParsedMail<'m>,
    name: &'a str,
) -> impl Iterator<Item = &'a MailHeader<'m>> + 'a {
    parsed
        .headers
        .iter()
        .filter(move |h| h.get_key().eq_ignore_ascii_case(name))
}

/// Returns the bare address of every entry in an address-list header, with
/// group members flattened in place.
fn header_addresses(header: &MailHeader<'_>) -> Result<Vec<String>, Error> {
    let list = mailparse::addrparse_header(header)?;
    let mut addresses = Vec::new();
    for addr in list.iter() {
        match *addr {
            MailAddr::Single(ref info) => addresses.push(info.addr.clone()),
            MailAddr::Group(ref group) => addresses
                .extend(group.addrs.iter().map(|info| info.addr.clone())),
        }
    }

    Ok(addresses)
}

/// Walks the leaf parts in document order, picking up the first inline
/// text/plain part as the body and every attachment.
fn scan_parts(
    part: &ParsedMail<'_>,
    text_body: &mut Option<String>,
    attachments: &mut Vec<Attachment>,
) -> Result<(), Error> {
    if !part.subparts.is_empty() {
        for subpart in &part.subparts {
            scan_parts(subpart, text_body, attachments)?;
        }
        return Ok(());
    }

    if let Some(filename) = attachment_name(part) {
        attachments.push(Attachment {
            filename: filename.into_owned(),
            content: part.get_body_raw()?,
        });
    } else if text_body.is_none()
        && part.ctype.mimetype.eq_ignore_ascii_case("text/plain")
    {
        *text_body = Some(part.get_body()?);
    }

    Ok(())
}

/// If `part` is flagged as an attachment, returns the name it should be
/// stored under.
///
/// A part is an attachment if its disposition says so, or if it is inline
/// but still carries a file name.
fn attachment_name<'a>(part: &'a ParsedMail<'_>) -> Option<Cow<'a, str>> {
    let disposition = part.get_content_disposition();
    let disposition_name = disposition.params.get("filename").cloned();

    if DispositionType::Attachment != disposition.disposition
        && disposition_name.is_none()
    {
        return None;
    }

    Some(match disposition_name {
        Some(name) => Cow::Owned(name),
        None => match part.ctype.params.get("name") {
            Some(name) => Cow::Borrowed(name.as_str()),
            None => Cow::Borrowed(UNNAMED_ATTACHMENT),
        },
    })
}
