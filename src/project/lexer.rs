// SPDX-License-Identifier: Apache-2.0
// Copyright 2026 the survnet-core contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Tokenises a project file into an ordered stream of raw, `;`-terminated
//! records (`spec.md` §4.1). Per-record content parsing happens in
//! [`super::record`]; this module only knows about record boundaries,
//! comments and line numbers.

use crate::error::Error;

const RECOGNISED_PREFIXES: &[u8] = b"#[]@&%*$!";

/// A single `;`-terminated record, still in its raw textual form.
#[derive(Clone, Debug)]
pub struct RawRecord {
    pub prefix: u8,
    pub content: String,
    pub line: usize,
}

/// Splits `bytes` into raw records, stripping `/ ... /`-or-EOL comments and
/// treating any line that doesn't start with a recognised prefix character
/// as a comment line in its entirety.
pub fn lex(bytes: &[u8]) -> Result<Vec<RawRecord>, Error> {
    let mut line = 1usize;
    let mut i = 0usize;
    let len = bytes.len();
    let mut records = Vec::new();

    while i < len {
        let b = bytes[i];

        if b == b'\n' {
            line += 1;
            i += 1;
            continue;
        }

        if b.is_ascii_whitespace() {
            i += 1;
            continue;
        }

        if b == b'/' {
            i += 1;
            while i < len && bytes[i] != b'/' && bytes[i] != b'\n' {
                i += 1;
            }
            if i < len && bytes[i] == b'/' {
                i += 1;
            }
            continue;
        }

        if !RECOGNISED_PREFIXES.contains(&b) {
            // "all other lines" are comments: skip to end of this physical line.
            while i < len && bytes[i] != b'\n' {
                i += 1;
            }
            continue;
        }

        let start_line = line;
        let prefix = b;
        i += 1;
        let mut content = String::new();
        let mut terminated = false;

        while i < len {
            let c = bytes[i];
            if c == b';' {
                i += 1;
                terminated = true;
                break;
            }
            if c == b'\n' {
                line += 1;
                content.push(' ');
                i += 1;
                continue;
            }
            if c == b'/' {
                i += 1;
                while i < len && bytes[i] != b'/' && bytes[i] != b'\n' {
                    i += 1;
                }
                if i < len && bytes[i] == b'/' {
                    i += 1;
                }
                continue;
            }
            content.push(c as char);
            i += 1;
        }

        if !terminated {
            return Err(Error::ProjectParse {
                line: start_line,
                message: format!(
                    "unterminated record starting with '{}' (no ';' before end of input)",
                    prefix as char
                ),
            });
        }

        records.push(RawRecord {
            prefix,
            content,
            line: start_line,
        });
    }

    Ok(records)
}

/// Splits `s` on `sep`, but never inside a `[...]` bracket pair — used for
/// the `#file,link,name[unit,e,n,v]` file-entry grammar where fixed-station
/// brackets contain their own commas.
pub fn split_top_level(s: &str, sep: char) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut depth = 0i32;

    for c in s.chars() {
        match c {
            '[' => {
                depth += 1;
                current.push(c);
            }
            ']' => {
                depth -= 1;
                current.push(c);
            }
            c if c == sep && depth == 0 => {
                parts.push(std::mem::take(&mut current));
            }
            c => current.push(c),
        }
    }
    parts.push(current);
    parts
}

/// Splits a numeric-field string on any run of characters that can't be
/// part of a number, per `spec.md` §4.1 ("separators are commas, spaces, or
/// any non-numeric/non-unit character").
pub fn split_numeric_fields(s: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();

    let is_number_char = |c: char, first: bool| -> bool {
        c.is_ascii_digit() || c == '.' || (first && (c == '-' || c == '+'))
    };

    for c in s.chars() {
        if is_number_char(c, current.is_empty()) {
            current.push(c);
        } else if !current.is_empty() {
            fields.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        fields.push(current);
    }
    fields
}
