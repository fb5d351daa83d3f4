//! DAG-JSON (`dag-json`, 0x0129).
//!
//! JSON with two reserved single-key forms under the `/` key:
//!
//! - `{"/": "<cid>"}` is a link
//! - `{"/": {"bytes": "<base64, no padding>"}}` is a byte string
//!
//! Map keys are written in sorted order. A `{"/": "..."}` object whose value
//! does not parse as a CID is kept as an ordinary map.

use base64::prelude::*;
use ipr_types::{link::LINK_KEY, Cid, CodecId, Ipld};
use serde_json::{Map, Number, Value};

use crate::error::{FormatError, FormatResult};
use crate::format::Format;

#[derive(Clone, Copy, Debug, Default)]
pub struct DagJsonFormat;

impl Format for DagJsonFormat {
    fn codec(&self) -> CodecId {
        CodecId::DAG_JSON
    }

    fn serialize(&self, node: &Ipld) -> FormatResult<Vec<u8>> {
        let value = to_json(node)?;
        serde_json::to_vec(&value).map_err(|e| FormatError::encode(CodecId::DAG_JSON, e))
    }

    fn deserialize(&self, bytes: &[u8]) -> FormatResult<Ipld> {
        let value: Value =
            serde_json::from_slice(bytes).map_err(|e| FormatError::decode(CodecId::DAG_JSON, e))?;
        from_json(value)
    }
}

/// Convert a node to its DAG-JSON value.
pub fn to_json(node: &Ipld) -> FormatResult<Value> {
    Ok(match node {
        Ipld::Null => Value::Null,
        Ipld::Bool(b) => Value::Bool(*b),
        Ipld::Integer(i) => {
            let number = i64::try_from(*i)
                .map(Number::from)
                .or_else(|_| u64::try_from(*i).map(Number::from))
                .map_err(|_| {
                    FormatError::encode(CodecId::DAG_JSON, format!("integer {i} out of range"))
                })?;
            Value::Number(number)
        }
        Ipld::Float(f) => Number::from_f64(*f).map(Value::Number).ok_or_else(|| {
            FormatError::encode(CodecId::DAG_JSON, format!("non-finite float {f}"))
        })?,
        Ipld::String(s) => Value::String(s.clone()),
        Ipld::Bytes(bytes) => {
            let mut inner = Map::new();
            inner.insert("bytes".into(), Value::String(BASE64_STANDARD_NO_PAD.encode(bytes)));
            reserved(Value::Object(inner))
        }
        Ipld::List(list) => Value::Array(list.iter().map(to_json).collect::<FormatResult<_>>()?),
        Ipld::Map(map) => {
            let mut object = Map::new();
            for (key, child) in map {
                object.insert(key.clone(), to_json(child)?);
            }
            Value::Object(object)
        }
        Ipld::Link(cid) => reserved(Value::String(cid.to_string())),
    })
}

/// Convert a DAG-JSON value to a node.
pub fn from_json(value: Value) -> FormatResult<Ipld> {
    Ok(match value {
        Value::Null => Ipld::Null,
        Value::Bool(b) => Ipld::Bool(b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ipld::Integer(i.into())
            } else if let Some(u) = n.as_u64() {
                Ipld::Integer(u.into())
            } else {
                Ipld::Float(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        Value::String(s) => Ipld::String(s),
        Value::Array(items) => {
            Ipld::List(items.into_iter().map(from_json).collect::<FormatResult<_>>()?)
        }
        Value::Object(object) => {
            if let Some(special) = decode_reserved(&object)? {
                return Ok(special);
            }
            let mut map = std::collections::BTreeMap::new();
            for (key, child) in object {
                map.insert(key, from_json(child)?);
            }
            Ipld::Map(map)
        }
    })
}

fn reserved(inner: Value) -> Value {
    let mut object = Map::new();
    object.insert(LINK_KEY.into(), inner);
    Value::Object(object)
}

fn decode_reserved(object: &Map<String, Value>) -> FormatResult<Option<Ipld>> {
    if object.len() != 1 {
        return Ok(None);
    }
    match object.get(LINK_KEY) {
        Some(Value::String(s)) => Ok(s.parse::<Cid>().ok().map(Ipld::Link)),
        Some(Value::Object(inner)) if inner.len() == 1 => match inner.get("bytes") {
            Some(Value::String(encoded)) => BASE64_STANDARD_NO_PAD
                .decode(encoded.trim_end_matches('='))
                .map(|bytes| Some(Ipld::Bytes(bytes)))
                .map_err(|e| FormatError::decode(CodecId::DAG_JSON, e)),
            _ => Ok(None),
        },
        _ => Ok(None),
    }
}
