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

/// Determine whether the given name is "safe".
///
/// This is used to validate every name which ends up as a file system
/// element, be it a user name, a path segment of a destination folder, or the
/// name of a file being created. It excludes empty names and patterns that
/// cause directory traversal or other unwanted behaviours.
///
/// Names which fail this test are rejected, never rewritten. Attachment file
/// names and subjects come straight from the message, so a hostile sender can
/// at worst cause their own artifacts to be refused.
///
/// This does not care about whether the name is ultimately a valid file name;
/// for that, we simply rely on the OS rejecting it.
pub fn is_safe_name(name: &str) -> bool {
    !name.is_empty() &&
        // Block directory traversal through .. and creation of hidden files on
        // UNIX
        name.chars().next() != Some('.') &&
        name.find('/').is_none() &&
        // Only a path separator on Windows, but always block since it has high
        // potential of causing problems
        name.find('\\').is_none() &&
        // Don't allow any ASCII control characters
        name.find(|c| c < ' ' || c == '\x7F').is_none()
}

#[cfg(test)]
mod test {
    use proptest::prelude::*;

    use super::is_safe_name;

    #[test]
    fn test_is_safe_name() {
        assert!(is_safe_name("foo"));
        assert!(is_safe_name("Mails sent to drop@example.com"));
        assert!(is_safe_name("From alice@example.org"));
        assert!(is_safe_name("2020-05-01 10:11:12-0_mail-Hi.txt"));
        assert!(is_safe_name("Entwürfe"));
        assert!(is_safe_name("folder #1"));
        assert!(is_safe_name("100%*"));
        assert!(!is_safe_name(""));
        assert!(!is_safe_name("."));
        assert!(!is_safe_name(".."));
        assert!(!is_safe_name(".hidden"));
        assert!(!is_safe_name("foo/bar"));
        assert!(!is_safe_name("/foo"));
        assert!(!is_safe_name("foo/"));
        assert!(!is_safe_name("foo\\bar"));
        assert!(!is_safe_name("foo\0"));
        assert!(!is_safe_name("foo\r\nbar"));
        assert!(!is_safe_name("fo\x7Fo"));
    }

    proptest! {
        #[test]
        fn names_with_separators_are_never_safe(
            head in "[a-z]{0,8}",
            tail in "[a-z]{0,8}",
        ) {
            let slashed = format!("{}/{}", head, tail);
            let backslashed = format!("{}\\{}", head, tail);
            prop_assert!(!is_safe_name(&slashed));
            prop_assert!(!is_safe_name(&backslashed));
        }
    }
}
