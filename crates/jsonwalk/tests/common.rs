#![allow(missing_docs, dead_code)]

use std::io::Read;

use jsonwalk::{DecodeError, Decoder, ElementKind};
use serde::Serialize;

pub const SMALL_JSON: &str = r#" {"class": "array", "references": ["hello", "bye", "lollll"], "line": 1662, "fd": -1, "shared": true, "flags": {"wbprotected": false, "old": -765, "marked": "probably"} } "#;

#[derive(Debug, Default, PartialEq, Serialize)]
pub struct Object {
    pub class: String,
    pub references: Vec<String>,
    pub line: u64,
    pub fd: i32,
    pub shared: bool,
    pub flags: Flags,
}

#[derive(Debug, Default, PartialEq, Serialize)]
pub struct Flags {
    pub wbprotected: bool,
    pub old: i32,
    pub marked: String,
}

pub fn small_object() -> Object {
    Object {
        class: "array".into(),
        references: vec!["hello".into(), "bye".into(), "lollll".into()],
        line: 1662,
        fd: -1,
        shared: true,
        flags: Flags {
            wbprotected: false,
            old: -765,
            marked: "probably".into(),
        },
    }
}

pub fn decode_object(src: &str) -> Result<Object, DecodeError> {
    let mut dec = Decoder::new(src.as_bytes());
    let mut got = Object::default();
    dec.each_member(|dec, member| match member {
        "class" => dec.read_string(&mut got.class),
        "line" => dec.read_u64(&mut got.line),
        "fd" => dec.read_i32(&mut got.fd),
        "shared" => dec.read_bool(&mut got.shared),
        "references" => dec.each_value(|dec, kind| {
            if kind != ElementKind::String {
                return Err(DecodeError::custom(format!("unexpected type {kind}")));
            }
            got.references.push(dec.value()?);
            Ok(())
        }),
        "flags" => dec.each_member(|dec, flag| match flag {
            "wbprotected" => dec.read_bool(&mut got.flags.wbprotected),
            "old" => dec.read_i32(&mut got.flags.old),
            "marked" => dec.read_string(&mut got.flags.marked),
            _ => Ok(()),
        }),
        _ => Ok(()),
    })?;
    dec.finish()?;
    Ok(got)
}

#[derive(Debug, Default, PartialEq, Serialize)]
pub struct CodeResponse {
    pub tree: Option<Box<CodeNode>>,
    pub username: String,
}

#[derive(Debug, Default, PartialEq, Serialize)]
pub struct CodeNode {
    pub name: String,
    pub kids: Vec<CodeNode>,
    pub cl_weight: f64,
    pub touches: i32,
    pub min_t: i64,
    pub max_t: i64,
    pub mean_t: i64,
}

/// Builds a deterministic tree with `fanout` children per node down to
/// `depth` levels.
pub fn code_tree(depth: u32, fanout: u32) -> CodeResponse {
    fn node(path: &str, depth: u32, fanout: u32, seed: &mut i64) -> CodeNode {
        *seed = seed.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
        let kids = if depth == 0 {
            Vec::new()
        } else {
            (0..fanout)
                .map(|i| node(&format!("{path}/{i}"), depth - 1, fanout, seed))
                .collect()
        };
        let t = *seed >> 33;
        CodeNode {
            name: format!("{path} \"node\" é"),
            kids,
            cl_weight: f64::from(i32::try_from(t % 1000).unwrap_or_default()) / 8.0,
            touches: i32::try_from(t % 100).unwrap_or_default(),
            min_t: t - 1000,
            max_t: t + 1000,
            mean_t: t,
        }
    }

    let mut seed = 42;
    CodeResponse {
        tree: Some(Box::new(node("root", depth, fanout, &mut seed))),
        username: "walker".into(),
    }
}

pub fn decode_code_response(src: &[u8]) -> Result<CodeResponse, DecodeError> {
    let mut dec = Decoder::new(src);
    let mut resp = CodeResponse::default();
    dec.each_member(|dec, member| match member {
        "username" => dec.read_string(&mut resp.username),
        "tree" => {
            let mut tree = CodeNode::default();
            decode_code_node(dec, &mut tree)?;
            resp.tree = Some(Box::new(tree));
            Ok(())
        }
        other => Err(DecodeError::custom(format!("unsupported member {other}"))),
    })?;
    dec.finish()?;
    Ok(resp)
}

pub fn decode_code_node<R: Read>(dec: &mut Decoder<R>, node: &mut CodeNode) -> Result<(), DecodeError> {
    dec.each_member(|dec, member| match member {
        "name" => dec.read_string(&mut node.name),
        "cl_weight" => dec.read_f64(&mut node.cl_weight),
        "touches" => dec.read_i32(&mut node.touches),
        "min_t" => dec.read_i64(&mut node.min_t),
        "max_t" => dec.read_i64(&mut node.max_t),
        "mean_t" => dec.read_i64(&mut node.mean_t),
        "kids" => dec.each_value(|dec, _| {
            let mut kid = CodeNode::default();
            decode_code_node(dec, &mut kid)?;
            node.kids.push(kid);
            Ok(())
        }),
        other => Err(DecodeError::custom(format!("unsupported member {other}"))),
    })
}
