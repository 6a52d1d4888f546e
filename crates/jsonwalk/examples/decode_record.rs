//! Decodes a stream of newline-delimited audit records straight into typed
//! structs, without building an intermediate tree.
//!
//! Each record looks roughly like this (abridged):
//!
//! ```text
//! {
//!   "id":      integer,
//!   "actor":   { "name": string, "admin": boolean },
//!   "action":  string,
//!   "targets": [string, ...],
//!   "extra":   any
//! }
//! ```
//!
//! The input arrives through a reader that hands out a few bytes at a time,
//! the way a socket would. Members the example does not care about (`extra`)
//! are never read by the visitor and get skipped by the decoder. A record
//! whose `action` is `"delete"` on an admin-less actor stops the stream with a
//! custom error, which surfaces from the outermost call untouched.
//!
//! Run with
//!
//! ```bash
//! cargo run -p jsonwalk --example decode_record
//! ```

use std::io::{self, Read};

use jsonwalk::{DecodeError, Decoder, ElementKind};

const RECORDS: &str = r#"
{"id": 1, "actor": {"name": "ana", "admin": true}, "action": "create", "targets": ["a.txt"], "extra": {"ip": "10.0.0.1"}}
{"id": 2, "actor": {"name": "bo", "admin": false}, "action": "rename", "targets": ["a.txt", "b.txt"], "extra": null}
{"id": 3, "actor": {"name": "cy", "admin": true}, "action": "delete", "targets": ["b.txt", 7], "extra": [1, 2, 3]}
{"id": 4, "actor": {"name": "dee", "admin": false}, "action": "delete", "targets": ["c.txt"]}
{"id": 5, "actor": {"name": "eve", "admin": true}, "action": "create", "targets": []}
"#;

#[derive(Debug, Default)]
struct Record {
    id: u64,
    actor: String,
    admin: bool,
    action: String,
    targets: Vec<String>,
}

/// Hands out at most `step` bytes per read.
struct Chunked<'a> {
    data: &'a [u8],
    step: usize,
}

impl Read for Chunked<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.step.min(buf.len()).min(self.data.len());
        buf[..n].copy_from_slice(&self.data[..n]);
        self.data = &self.data[n..];
        Ok(n)
    }
}

fn decode_record<R: Read>(dec: &mut Decoder<R>) -> Result<Record, DecodeError> {
    let mut record = Record::default();
    dec.each_member(|dec, member| match member {
        "id" => dec.read_u64(&mut record.id),
        "action" => dec.read_string(&mut record.action),
        "actor" => dec.each_member(|dec, field| match field {
            "name" => dec.read_string(&mut record.actor),
            "admin" => dec.read_bool(&mut record.admin),
            _ => Ok(()),
        }),
        "targets" => dec.each_value(|dec, kind| {
            // Non-string targets are left unread.
            if kind == ElementKind::String {
                record.targets.push(dec.value()?);
            }
            Ok(())
        }),
        _ => Ok(()),
    })?;
    if record.action == "delete" && !record.admin {
        return Err(DecodeError::custom(format!(
            "record {}: {} may not delete {:?}",
            record.id, record.actor, record.targets
        )));
    }
    Ok(record)
}

fn main() {
    let reader = Chunked {
        data: RECORDS.as_bytes(),
        step: 7,
    };
    let mut dec = Decoder::new(reader);

    loop {
        match dec.at_end() {
            Ok(true) => break,
            Ok(false) => {}
            Err(err) => {
                eprintln!("error: {err}");
                return;
            }
        }
        match decode_record(&mut dec) {
            Ok(record) => println!(
                "#{} {:<4} {:<7} {}",
                record.id,
                record.actor,
                record.action,
                record.targets.join(", ")
            ),
            Err(err) => {
                eprintln!("stopped at {}: {err}", dec.position());
                return;
            }
        }
    }
}
