use std::io;

use super::*;

fn scan_all(src: &[u8], capacity: usize) -> Vec<(TokenKind, String)> {
    let mut s = Scanner::with_capacity(src, capacity);
    let mut out = Vec::new();
    loop {
        let token = s.next_token().unwrap();
        if token.kind == TokenKind::Eof {
            return out;
        }
        let text = if token.kind.has_payload() {
            s.text().to_owned()
        } else {
            String::new()
        };
        out.push((token.kind, text));
    }
}

fn syntax_error(src: &[u8]) -> (SyntaxError, Position) {
    let mut s = Scanner::new(src);
    loop {
        match s.next_token() {
            Ok(t) if t.kind == TokenKind::Eof => panic!("expected a syntax error"),
            Ok(_) => {}
            Err(DecodeError::Syntax { error, position }) => return (error, position),
            Err(other) => panic!("unexpected error {other}"),
        }
    }
}

/// Reads one byte per call and is interrupted before every other read.
struct Trickle<'a> {
    data: &'a [u8],
    interrupt: bool,
}

impl io::Read for Trickle<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.interrupt = !self.interrupt;
        if self.interrupt {
            return Err(io::ErrorKind::Interrupted.into());
        }
        let Some((&b, rest)) = self.data.split_first() else {
            return Ok(0);
        };
        buf[0] = b;
        self.data = rest;
        Ok(1)
    }
}

struct Broken;

impl io::Read for Broken {
    fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::other("disk on fire"))
    }
}

#[test]
fn tokens_of_mixed_document() {
    let tokens = scan_all(br#" {"a": [1, -2.5e3, true, false, null]} "#, DEFAULT_BUFFER_CAPACITY);
    let kinds: Vec<_> = tokens.iter().map(|(k, _)| *k).collect();
    assert_eq!(
        kinds,
        [
            TokenKind::BeginObject,
            TokenKind::String,
            TokenKind::Colon,
            TokenKind::BeginArray,
            TokenKind::Number,
            TokenKind::Comma,
            TokenKind::Number,
            TokenKind::Comma,
            TokenKind::True,
            TokenKind::Comma,
            TokenKind::False,
            TokenKind::Comma,
            TokenKind::Null,
            TokenKind::EndArray,
            TokenKind::EndObject,
        ]
    );
    assert_eq!(tokens[1].1, "a");
    assert_eq!(tokens[4].1, "1");
    assert_eq!(tokens[6].1, "-2.5e3");
}

#[test]
fn tiny_buffer_gives_same_tokens() {
    let src = "{\"héllo 😀\": [0.5, \"a\\u00e9\", {}]}".as_bytes();
    assert_eq!(scan_all(src, 1), scan_all(src, DEFAULT_BUFFER_CAPACITY));
    assert_eq!(scan_all(src, 1)[1].1, "héllo 😀");
}

#[test]
fn interrupted_reads_are_retried() {
    let reader = Trickle {
        data: br#"["x", 12]"#,
        interrupt: false,
    };
    let mut s = Scanner::new(reader);
    assert_eq!(s.next_token().unwrap().kind, TokenKind::BeginArray);
    assert_eq!(s.read_str().unwrap(), "x");
    assert_eq!(s.next_token().unwrap().kind, TokenKind::Comma);
    assert_eq!(s.read_integer::<u8>("u8").unwrap(), 12);
    assert_eq!(s.next_token().unwrap().kind, TokenKind::EndArray);
    assert_eq!(s.next_token().unwrap().kind, TokenKind::Eof);
}

#[test]
fn io_errors_propagate() {
    let mut s = Scanner::new(Broken);
    let err = s.next_token().unwrap_err();
    assert!(matches!(err, DecodeError::Io(ref e) if e.to_string() == "disk on fire"));
}

#[test]
fn string_escapes_are_decoded() {
    let mut s = Scanner::new(r#""q\"b\\s\/\b\f\n\r\tAé😀""#.as_bytes());
    assert_eq!(s.read_str().unwrap(), "q\"b\\s/\u{8}\u{c}\n\r\tAé😀");
}

#[test]
fn positions_track_lines_and_columns() {
    let mut s = Scanner::new(&b"{\n  \"a\": 1}"[..]);
    let open = s.next_token().unwrap();
    assert_eq!(open.position, Position { offset: 0, line: 1, column: 1 });
    let key = s.next_token().unwrap();
    assert_eq!(key.position, Position { offset: 4, line: 2, column: 3 });
    let _colon = s.next_token().unwrap();
    let one = s.next_token().unwrap();
    assert_eq!(one.position, Position { offset: 9, line: 2, column: 8 });
}

#[test]
fn push_back_replays_token_and_text() {
    let mut s = Scanner::new(&br#""key" 7"#[..]);
    let token = s.next_token().unwrap();
    assert_eq!(s.tokens_consumed(), 1);
    s.push_back(token);
    assert!(s.has_pending());
    assert_eq!(s.tokens_consumed(), 0);
    assert_eq!(s.position(), token.position);

    assert_eq!(s.next_token().unwrap(), token);
    assert_eq!(s.text(), "key");
    assert_eq!(s.tokens_consumed(), 1);
    assert_eq!(s.read_integer::<i64>("i64").unwrap(), 7);
}

#[test]
#[should_panic(expected = "still pending")]
fn double_push_back_panics() {
    let mut s = Scanner::new(&b"[1]"[..]);
    let a = s.next_token().unwrap();
    let b = s.next_token().unwrap();
    s.push_back(b);
    s.push_back(a);
}

#[test]
fn read_bool_rejects_number() {
    let mut s = Scanner::new(&b" 42"[..]);
    let err = s.read_bool().unwrap_err();
    let DecodeError::TypeMismatch {
        expected,
        found,
        position,
    } = err
    else {
        panic!("expected a type mismatch, got {err}");
    };
    assert_eq!(expected, "boolean");
    assert_eq!(found, TokenKind::Number);
    assert_eq!(position.offset, 1);
}

#[test]
fn read_str_rejects_number() {
    let mut s = Scanner::new(&b"42"[..]);
    assert!(s.read_str().unwrap_err().is_type_mismatch());
}

#[test]
fn integers_must_be_integral_and_in_range() {
    let mut s = Scanner::new(&b"1.5 -1 300 1e2"[..]);
    assert!(matches!(
        s.read_integer::<i64>("i64"),
        Err(DecodeError::InvalidNumber { ref text, target: "i64", .. }) if text == "1.5"
    ));
    assert!(matches!(
        s.read_integer::<u32>("u32"),
        Err(DecodeError::InvalidNumber { target: "u32", .. })
    ));
    assert!(matches!(
        s.read_integer::<u8>("u8"),
        Err(DecodeError::InvalidNumber { target: "u8", .. })
    ));
    assert!(matches!(
        s.read_integer::<i32>("i32"),
        Err(DecodeError::InvalidNumber { .. })
    ));
}

#[test]
fn floats_reject_overflow() {
    let mut s = Scanner::new(&b"1e400 3.5e38 -0.25"[..]);
    assert!(matches!(s.read_f64(), Err(DecodeError::InvalidNumber { target: "f64", .. })));
    assert!(matches!(s.read_f32(), Err(DecodeError::InvalidNumber { target: "f32", .. })));
    assert_eq!(s.read_f64().unwrap(), -0.25);
}

#[test]
fn read_null_accepts_only_null() {
    let mut s = Scanner::new(&b"null false"[..]);
    s.read_null().unwrap();
    assert!(s.read_null().unwrap_err().is_type_mismatch());
}

#[test]
fn malformed_numbers() {
    assert_eq!(
        syntax_error(b"[-x]"),
        (
            SyntaxError::MalformedNumber("-".into()),
            Position { offset: 2, line: 1, column: 3 }
        )
    );
    assert!(matches!(syntax_error(b"01").0, SyntaxError::MalformedNumber(_)));
    assert!(matches!(syntax_error(b"1.").0, SyntaxError::UnexpectedEndOfInput));
    assert!(matches!(syntax_error(b"1.e5").0, SyntaxError::MalformedNumber(_)));
}

#[test]
fn invalid_literals() {
    assert_eq!(syntax_error(b"nul").0, SyntaxError::InvalidLiteral("null"));
    assert_eq!(
        syntax_error(b"tru e"),
        (
            SyntaxError::InvalidLiteral("true"),
            Position { offset: 3, line: 1, column: 4 }
        )
    );
}

#[test]
fn invalid_bytes() {
    assert_eq!(
        syntax_error(b"[@]"),
        (
            SyntaxError::InvalidByte(InvalidByte(b'@')),
            Position { offset: 1, line: 1, column: 2 }
        )
    );
}

#[test]
fn string_errors() {
    assert_eq!(syntax_error(b"\"abc").0, SyntaxError::UnexpectedEndOfInput);
    assert_eq!(syntax_error(b"\"a\x01\"").0, SyntaxError::ControlCharacter(1));
    assert_eq!(syntax_error(b"\"\xff\"").0, SyntaxError::InvalidUtf8);
    assert_eq!(syntax_error(b"\"\xe2\x28\xa1\"").0, SyntaxError::InvalidUtf8);
    assert_eq!(syntax_error(br#""\x""#).0, SyntaxError::InvalidEscape('x'));
    assert_eq!(syntax_error(br#""\ud800x""#).0, SyntaxError::UnpairedSurrogate(0xD800));
    assert_eq!(syntax_error(br#""\udc00""#).0, SyntaxError::UnpairedSurrogate(0xDC00));
    assert!(matches!(
        syntax_error(br#""\u12G4""#).0,
        SyntaxError::InvalidUnicodeEscape(_)
    ));
}

#[test]
fn invalid_byte_display_is_escaped() {
    assert_eq!(SyntaxError::InvalidByte(InvalidByte(0xFF)).to_string(), r#"invalid byte "\xff""#);
}
