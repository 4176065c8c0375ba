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

/// A single-part message to `drop@x` from `alice@y` whose body carries the
/// `:secret` token.
pub static TOKEN_IN_BODY: &[u8] = include_bytes!("token-in-body.eml");

/// Identical to `TOKEN_IN_BODY` except that the body has no token.
pub static NO_TOKEN: &[u8] = include_bytes!("no-token.eml");

/// A multipart message with a text/HTML alternative and two base64
/// attachments, `a.pdf` and `b.png`.
///
/// The PDF part also carries a `name` content type parameter which must lose
/// to the disposition's `filename`.
pub static TWO_ATTACHMENTS: &[u8] = include_bytes!("two-attachments.eml");

/// A message with a multi-address From, and `drop@x` in both To and Cc
/// alongside an unregistered address and two more drop addresses, one in a
/// second Cc header.
pub static TO_AND_CC: &[u8] = include_bytes!("to-and-cc.eml");

/// A message without any From header.
pub static NO_SENDER: &[u8] = include_bytes!("no-sender.eml");

/// Group syntax in From and To, an encoded-word subject, no text/plain body
/// part, and attachments named in each of the supported ways.
pub static GROUP_SENDER: &[u8] = include_bytes!("group-sender.eml");
