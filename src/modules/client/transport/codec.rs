//! XML-RPC codec
//!
//! Maps between `serde_json::Value` and XML-RPC documents:
//!
//! | XML-RPC | JSON |
//! |---|---|
//! | `nil` | `null` |
//! | `boolean` | bool |
//! | `int`, `i4`, `i8` | integer |
//! | `double` | float |
//! | `string`, untyped | string |
//! | `dateTime.iso8601` | string `YYYY-MM-DD HH:MM:SS` (decode only) |
//! | `base64` | string (decode only) |
//! | `array` | array |
//! | `struct` | object |

use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::NaiveDateTime;
use odoolink_core::OdooError;
use quick_xml::escape::escape;
use quick_xml::events::Event;
use quick_xml::Reader;
use serde_json::{Map, Number, Value};

/// Datetime layout used by the server for datetime fields
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Encode a `<methodCall>` document
pub fn encode_call(method: &str, params: &[Value]) -> Result<String, OdooError> {
    let mut out = String::from("<?xml version=\"1.0\"?>\n<methodCall><methodName>");
    out.push_str(&escape(method));
    out.push_str("</methodName><params>");
    for param in params {
        out.push_str("<param>");
        write_value(&mut out, param)?;
        out.push_str("</param>");
    }
    out.push_str("</params></methodCall>");
    Ok(out)
}

/// Encode a successful `<methodResponse>` document
pub fn encode_response(value: &Value) -> Result<String, OdooError> {
    let mut out = String::from("<?xml version=\"1.0\"?>\n<methodResponse><params><param>");
    write_value(&mut out, value)?;
    out.push_str("</param></params></methodResponse>");
    Ok(out)
}

/// Encode a fault `<methodResponse>` document
pub fn encode_fault(code: i64, message: &str) -> String {
    let mut out = String::from("<?xml version=\"1.0\"?>\n<methodResponse><fault>");
    let mut fault = Map::new();
    fault.insert("faultCode".into(), Value::from(code));
    fault.insert("faultString".into(), Value::from(message));
    // A struct of an integer and a string always encodes
    let _ = write_value(&mut out, &Value::Object(fault));
    out.push_str("</fault></methodResponse>");
    out
}

fn write_value(out: &mut String, value: &Value) -> Result<(), OdooError> {
    out.push_str("<value>");
    match value {
        Value::Null => out.push_str("<nil/>"),
        Value::Bool(b) => {
            out.push_str(if *b {
                "<boolean>1</boolean>"
            } else {
                "<boolean>0</boolean>"
            });
        }
        Value::Number(n) => write_number(out, n)?,
        Value::String(s) => {
            out.push_str("<string>");
            out.push_str(&escape(s.as_str()));
            out.push_str("</string>");
        }
        Value::Array(items) => {
            out.push_str("<array><data>");
            for item in items {
                write_value(out, item)?;
            }
            out.push_str("</data></array>");
        }
        Value::Object(members) => {
            out.push_str("<struct>");
            for (name, member) in members {
                out.push_str("<member><name>");
                out.push_str(&escape(name.as_str()));
                out.push_str("</name>");
                write_value(out, member)?;
                out.push_str("</member>");
            }
            out.push_str("</struct>");
        }
    }
    out.push_str("</value>");
    Ok(())
}

fn write_number(out: &mut String, n: &Number) -> Result<(), OdooError> {
    if let Some(i) = n.as_i64() {
        if i32::try_from(i).is_ok() {
            out.push_str(&format!("<int>{}</int>", i));
        } else {
            out.push_str(&format!("<i8>{}</i8>", i));
        }
    } else if n.is_u64() {
        return Err(OdooError::Protocol(format!(
            "integer {} does not fit in a signed 64-bit value",
            n
        )));
    } else if let Some(f) = n.as_f64() {
        out.push_str(&format!("<double>{}</double>", f));
    }
    Ok(())
}

/// Decode a `<methodResponse>` document.
///
/// A `<fault>` response becomes [`OdooError::Fault`].
pub fn decode_response(xml: &str) -> Result<Value, OdooError> {
    let root = parse_document(xml)?;
    if root.name != "methodResponse" {
        return Err(OdooError::Protocol(format!(
            "expected <methodResponse>, found <{}>",
            root.name
        )));
    }

    if let Some(fault) = root.child("fault") {
        let fault = decode_value(fault.require("value")?)?;
        return Err(fault_from_value(fault));
    }

    let value = root.require("params")?.require("param")?.require("value")?;
    decode_value(value)
}

fn fault_from_value(fault: Value) -> OdooError {
    let code = fault.get("faultCode").and_then(Value::as_i64).unwrap_or(0);
    let message = match fault.get("faultString") {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => "fault without description".to_string(),
    };
    OdooError::Fault { code, message }
}

/// Minimal element tree built from the event stream
#[derive(Debug, Default)]
struct Element {
    name: String,
    text: String,
    children: Vec<Element>,
}

impl Element {
    fn named(name: &[u8]) -> Self {
        Self {
            name: String::from_utf8_lossy(name).into_owned(),
            ..Self::default()
        }
    }

    fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    fn require(&self, name: &str) -> Result<&Element, OdooError> {
        self.child(name).ok_or_else(|| {
            OdooError::Protocol(format!("<{}> is missing <{}>", self.name, name))
        })
    }
}

fn parse_document(xml: &str) -> Result<Element, OdooError> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => stack.push(Element::named(e.local_name().into_inner())),
            Ok(Event::Empty(e)) => {
                attach(&mut stack, &mut root, Element::named(e.local_name().into_inner()))?
            }
            Ok(Event::End(_)) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| OdooError::Protocol("unbalanced closing tag".to_string()))?;
                attach(&mut stack, &mut root, element)?;
            }
            Ok(Event::Text(e)) => {
                if let Some(current) = stack.last_mut() {
                    let text = e
                        .unescape()
                        .map_err(|e| OdooError::Protocol(format!("invalid text: {}", e)))?;
                    current.text.push_str(&text);
                }
            }
            Ok(Event::CData(e)) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(OdooError::Protocol(format!(
                    "XML parse error at position {}: {}",
                    reader.buffer_position(),
                    e
                )))
            }
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(OdooError::Protocol(format!("unclosed <{}>", open.name)));
    }
    root.ok_or_else(|| OdooError::Protocol("empty document".to_string()))
}

fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
) -> Result<(), OdooError> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_none() => *root = Some(element),
        None => return Err(OdooError::Protocol("multiple root elements".to_string())),
    }
    Ok(())
}

fn decode_value(value: &Element) -> Result<Value, OdooError> {
    let typed = match value.children.first() {
        Some(typed) => typed,
        // <value>text</value> without a type is a string
        None => return Ok(Value::String(value.text.clone())),
    };

    match typed.name.as_str() {
        "int" | "i4" | "i8" | "i1" | "i2" | "bigint" => typed
            .text
            .trim()
            .parse::<i64>()
            .map(Value::from)
            .map_err(|_| invalid(typed)),
        "boolean" => match typed.text.trim() {
            "1" | "true" => Ok(Value::Bool(true)),
            "0" | "false" => Ok(Value::Bool(false)),
            _ => Err(invalid(typed)),
        },
        "double" | "float" => typed
            .text
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or_else(|| invalid(typed)),
        "string" => Ok(Value::String(typed.text.clone())),
        "nil" | "none" => Ok(Value::Null),
        "dateTime.iso8601" => parse_datetime(typed.text.trim())
            .map(|dt| Value::String(dt.format(DATETIME_FORMAT).to_string()))
            .ok_or_else(|| invalid(typed)),
        "base64" => {
            let compact: String = typed.text.split_whitespace().collect();
            STANDARD
                .decode(&compact)
                .map(|_| Value::String(compact))
                .map_err(|_| invalid(typed))
        }
        "array" => {
            let data = typed.require("data")?;
            data.children
                .iter()
                .filter(|c| c.name == "value")
                .map(decode_value)
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array)
        }
        "struct" => {
            let mut members = Map::new();
            for member in typed.children.iter().filter(|c| c.name == "member") {
                let name = member.require("name")?.text.clone();
                let value = decode_value(member.require("value")?)?;
                members.insert(name, value);
            }
            Ok(Value::Object(members))
        }
        other => Err(OdooError::Protocol(format!(
            "unsupported value type <{}>",
            other
        ))),
    }
}

fn parse_datetime(text: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, "%Y%m%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S"))
        .ok()
}

fn invalid(element: &Element) -> OdooError {
    OdooError::Protocol(format!(
        "invalid <{}> value '{}'",
        element.name, element.text
    ))
}
