#![no_main]
use std::cell::RefCell;
use std::io::{self, Read};

use arbitrary::Arbitrary;
use jsonwalk::{DecodeError, Decoder, DecoderOptions, ElementKind};
use libfuzzer_sys::{fuzz_mutator, fuzz_target, fuzzer_mutate};
use rand::rngs::SmallRng; // faster than StdRng
use rand::{Rng, RngCore, SeedableRng};
use serde_json::{Map, Value};

const HEADER: usize = 5; // 1 flag + 4-byte seed

thread_local! {
    // One SmallRng per thread, seeded once from the host OS
    static RNG: RefCell<SmallRng> =
        RefCell::new(SmallRng::from_os_rng());
}

static WS_TABLE: &[&[u8]] = &[b" ", b"\t", b"\n", b"\r"];

/// Helper: borrow the thread-local RNG and run a closure with it.
fn with_rng<F, R>(f: F) -> R
where
    F: FnOnce(&mut SmallRng) -> R,
{
    RNG.with(|cell| f(&mut cell.borrow_mut()))
}

fn mutator(data: &mut [u8], size: usize, max_size: usize, seed: u32) -> usize {
    if size < HEADER || seed.is_multiple_of(10) {
        data[0] = with_rng(|rng| rng.next_u32() as u8 & 0x0F); // 4 bits

        // read-size seed
        data[1..5].copy_from_slice(&with_rng(|rng| rng.next_u32().to_le_bytes()));

        let mut prefix = HEADER;

        while prefix < size {
            let limit = max_size - prefix;

            prefix += append_whitespace(&mut data[prefix..], limit);
            prefix += append_value(&mut data[prefix..], size, limit);
            prefix += append_whitespace(&mut data[prefix..], limit);
        }

        prefix
    } else {
        fuzzer_mutate(data, size, max_size)
    }
}

/// Append 1‒N whitespace bytes (N chosen randomly) to `buf`, but never exceed
/// `limit`. Returns the number of bytes written.
fn append_whitespace(buf: &mut [u8], limit: usize) -> usize {
    with_rng(|rng| {
        if limit == 0 {
            return 0;
        }

        let n = rng.random_range(1..=limit.min(8));
        for slot in &mut buf[..n] {
            *slot = WS_TABLE[rng.random_range(0..WS_TABLE.len())][0];
        }
        n
    })
}

fn append_value(data: &mut [u8], size: usize, limit: usize) -> usize {
    let value = loop {
        let s = with_rng(|rng| rng.random_range(size / 2..size * 2).min(limit));
        let bytes: Vec<u8> = with_rng(|rng| (0..s).map(|_| rng.random::<u8>()).collect());
        match ArbitraryValue::arbitrary(&mut arbitrary::Unstructured::new(&bytes)) {
            Ok(value) => break value,
            Err(_) => continue,
        };
    };

    let serialized = serde_json::to_vec(&value.0).expect("Failed to serialize arbitrary value");

    let len = serialized.len().min(limit);
    data[..len].copy_from_slice(&serialized[..len]);

    len
}

fuzz_mutator!(|data: &mut [u8], size: usize, max_size: usize, seed: u32| {
    mutator(data, size, max_size, seed)
});

#[derive(Debug)]
struct ArbitraryValue(Value);

impl<'a> Arbitrary<'a> for ArbitraryValue {
    fn arbitrary(u: &mut arbitrary::Unstructured<'_>) -> arbitrary::Result<Self> {
        let node_type = u.choose_index(21)?;
        let value = match node_type {
            0 => Value::Null,
            1 => Value::Bool(u.arbitrary()?),
            2 => {
                let n: f64 = u.arbitrary()?;
                Value::Number(
                    serde_json::Number::from_f64(n).ok_or(arbitrary::Error::IncorrectFormat)?,
                )
            }
            3..=10 => Value::String(u.arbitrary()?),
            11..=15 => {
                let elems: Vec<ArbitraryValue> = u.arbitrary()?;
                Value::Array(elems.into_iter().map(|v| v.0).collect())
            }
            16..=20 => {
                let m: Vec<(String, ArbitraryValue)> = u.arbitrary()?;
                Value::Object(Map::from_iter(m.into_iter().map(|(k, v)| (k, v.0))))
            }
            _ => Err(arbitrary::Error::IncorrectFormat)?,
        };
        Ok(ArbitraryValue(value))
    }
}

/// Hands out reads of a size derived from a fixed seed.
struct Seeded<'a> {
    data: &'a [u8],
    seed: u32,
}

impl Read for Seeded<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.seed = self.seed.rotate_left(5) ^ 0x9E37_79B9;
        let step = (self.seed as usize % 17) + 1;
        let n = step.min(buf.len()).min(self.data.len());
        buf[..n].copy_from_slice(&self.data[..n]);
        self.data = &self.data[n..];
        Ok(n)
    }
}

/// Visits every value, reading scalars through the typed readers and leaving
/// every third element unread.
fn walk<R: Read>(dec: &mut Decoder<R>, kind: ElementKind, count: &mut usize) -> Result<(), DecodeError> {
    *count += 1;
    match kind {
        ElementKind::Object => dec.each_member(|dec, _| {
            let kind = dec.peek_kind()?;
            walk(dec, kind, count)
        }),
        ElementKind::Array => dec.each_value(|dec, kind| {
            if *count % 3 == 0 {
                *count += 1;
                return Ok(());
            }
            walk(dec, kind, count)
        }),
        ElementKind::String => dec.value::<String>().map(drop),
        ElementKind::Number => dec.value::<f64>().map(drop),
        ElementKind::Boolean => dec.value::<bool>().map(drop),
        ElementKind::Null => dec.value::<Option<bool>>().map(drop),
    }
}

fn decoder(data: &[u8]) {
    if data.len() < HEADER {
        return;
    }

    let flags = data[0];
    let seed = u32::from_le_bytes(data[1..5].try_into().unwrap());
    let data = &data[HEADER..];

    let options = DecoderOptions {
        skip_unconsumed_values: flags & 1 != 0,
        // serde_json nests at most 128 levels deep.
        max_depth: 256,
        buffer_capacity: 1 << (((flags >> 2) & 3) * 4),
    };
    let reader = Seeded { data, seed };
    let mut dec = Decoder::with_options(reader, options);

    if flags & 2 != 0 {
        // Arbitrary visitors must never panic, whatever they leave unread.
        let mut count = 0;
        let _ = dec.peek_kind().and_then(|kind| walk(&mut dec, kind, &mut count));
        return;
    }

    let ours = dec.read_value().and_then(|value| dec.finish().map(|()| value));
    if serde_json::from_slice::<Value>(data).is_ok() {
        let value = match ours {
            Ok(value) => value,
            Err(err) => panic!("serde_json accepted input that failed with: {err}"),
        };
        let rendered = value.to_string();
        let again = Decoder::new(rendered.as_bytes())
            .read_value()
            .expect("rendered value decodes");
        assert_eq!(value, again, "rendering changed the value");
    }
}

fuzz_target!(|data: &[u8]| decoder(data));
