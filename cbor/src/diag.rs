/*!
CBOR Diagnostic Notation output (RFC 8949 §8).

Containers are printed on one line when they hold fewer than
[`INLINE_LIMIT`] scalar elements, otherwise one element per line with two
spaces of indent per nesting level.  Compact mode never breaks lines.
*/

use super::*;
use tracing::debug;

/// Containers with this many elements or more are never printed inline
pub const INLINE_LIMIT: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DiagnosticOptions {
    /// Multi-line, indented output
    pub pretty: bool,

    /// Show byte strings as their length instead of a hex dump
    pub bytes_length_only: bool,
}

impl Default for DiagnosticOptions {
    fn default() -> Self {
        Self {
            pretty: true,
            bytes_length_only: false,
        }
    }
}

impl DiagnosticOptions {
    pub fn compact() -> Self {
        Self {
            pretty: false,
            ..Default::default()
        }
    }
}

/// Decode `data` as a single item and render it
pub fn diagnostic(data: &[u8], options: &DiagnosticOptions) -> Result<String> {
    Ok(decode::decode(data)?.to_diagnostic(options))
}

impl Item {
    pub fn to_diagnostic(&self, options: &DiagnosticOptions) -> String {
        let mut p = Printer {
            options,
            out: String::new(),
            remaining: decode::MAX_DEPTH,
        };
        p.item(self, 0);
        p.out
    }
}

struct Printer<'a> {
    options: &'a DiagnosticOptions,
    out: String,
    // Containers and tags left before nesting is cut off
    remaining: usize,
}

impl Printer<'_> {
    fn item(&mut self, item: &Item, depth: usize) {
        match item {
            Item::Unsigned(v) => self.out.push_str(&format!("{v}")),
            Item::Negative(m) => self.out.push_str(&format!("{}", -1 - *m as i128)),
            Item::Bytes(b) => self.bytes(b),
            Item::ByteChunks(chunks) => {
                self.out.push_str("(_ ");
                for (i, chunk) in chunks.iter().enumerate() {
                    if i > 0 {
                        self.out.push_str(", ");
                    }
                    self.bytes(chunk);
                }
                self.out.push(')');
            }
            Item::Text(s) => self.text(s),
            Item::TextChunks(chunks) => {
                self.out.push_str("(_ ");
                for (i, chunk) in chunks.iter().enumerate() {
                    if i > 0 {
                        self.out.push_str(", ");
                    }
                    self.text(chunk);
                }
                self.out.push(')');
            }
            Item::Array(a) => self.nested(|p| {
                let inline = p.inline(a.len(), a.iter().all(|i| !i.is_compound()));
                p.sequence(
                    ('[', ']'),
                    a.is_indefinite(),
                    inline,
                    depth,
                    a.iter(),
                    |p, item, depth| p.item(item, depth),
                )
            }),
            Item::Map(m) => self.nested(|p| {
                let inline = p.inline(
                    m.len(),
                    m.iter().all(|(k, v)| !k.is_compound() && !v.is_compound()),
                );
                p.sequence(
                    ('{', '}'),
                    m.is_indefinite(),
                    inline,
                    depth,
                    m.iter(),
                    |p, (k, v), depth| {
                        p.item(k, depth);
                        p.out.push_str(": ");
                        p.item(v, depth);
                    },
                )
            }),
            Item::Tagged(t) => {
                self.out.push_str(&format!("{}(", t.tag()));
                self.nested(|p| p.item(t.item(), depth));
                self.out.push(')');
            }
            Item::DateTime(s) => {
                self.out.push_str(&format!("{}(", tags::DATE_TIME));
                self.text(s);
                self.out.push(')');
            }
            Item::FullDate(s) => {
                self.out.push_str(&format!("{}(", tags::FULL_DATE));
                self.text(s);
                self.out.push(')');
            }
            Item::EpochTime(i) => {
                self.out.push_str(&format!("{}(", tags::EPOCH_TIME));
                self.nested(|p| p.item(i, depth));
                self.out.push(')');
            }
            Item::EncodedCbor(b) => {
                self.out.push_str(&format!("{}(<<", tags::ENCODED_CBOR));
                self.nested(|p| match decode::decode_sequence(b) {
                    Ok(items) => {
                        for (i, item) in items.iter().enumerate() {
                            if i > 0 {
                                p.out.push_str(", ");
                            }
                            p.item(item, depth);
                        }
                    }
                    Err(e) => {
                        debug!("Embedded CBOR failed to decode: {e}");
                        p.out.push_str(&format!("error: {e}"));
                    }
                });
                self.out.push_str(">>)");
            }
            Item::False => self.out.push_str("false"),
            Item::True => self.out.push_str("true"),
            Item::Null => self.out.push_str("null"),
            Item::Undefined => self.out.push_str("undefined"),
            Item::Simple(v) => self.out.push_str(&format!("{v}")),
            Item::Half(f) => {
                self.float(f.to_f64(), |out| out.push_str(&format!("{:?}", f.to_f32())))
            }
            Item::Single(f) => self.float(*f as f64, |out| out.push_str(&format!("{f:?}"))),
            Item::Double(f) => self.float(*f, |out| out.push_str(&format!("{f:?}"))),
            Item::Raw(b) => match decode::decode(b) {
                Ok(item) => self.item(&item, depth),
                Err(_) => self.bytes(b),
            },
        }
    }

    /// Run `f` one container or tag deeper, or print an error once too deep
    fn nested<F>(&mut self, f: F)
    where
        F: FnOnce(&mut Self),
    {
        match self.remaining.checked_sub(1) {
            Some(remaining) => {
                self.remaining = remaining;
                f(self);
                self.remaining += 1;
            }
            None => {
                debug!("Diagnostic output truncated at maximum depth");
                self.out.push_str(&format!("error: {}", Error::MaxRecursion));
            }
        }
    }

    fn inline(&self, len: usize, all_scalar: bool) -> bool {
        !self.options.pretty || (all_scalar && len < INLINE_LIMIT)
    }

    fn sequence<I, T, F>(
        &mut self,
        (open, close): (char, char),
        indefinite: bool,
        inline: bool,
        depth: usize,
        elements: I,
        mut f: F,
    ) where
        I: Iterator<Item = T>,
        F: FnMut(&mut Self, T, usize),
    {
        self.out.push(open);
        if indefinite {
            self.out.push('_');
        }

        let mut empty = true;
        for (i, element) in elements.enumerate() {
            empty = false;
            if inline {
                self.out.push_str(match (i, indefinite) {
                    (0, false) => "",
                    (0, true) => " ",
                    _ => ", ",
                });
            } else {
                if i > 0 {
                    self.out.push(',');
                }
                self.newline(depth + 1);
            }
            f(self, element, depth + 1);
        }

        if !inline && !empty {
            self.newline(depth);
        }
        self.out.push(close);
    }

    fn newline(&mut self, depth: usize) {
        self.out.push('\n');
        for _ in 0..depth {
            self.out.push_str("  ");
        }
    }

    fn bytes(&mut self, b: &[u8]) {
        if self.options.bytes_length_only {
            match b.len() {
                1 => self.out.push_str("<1 byte>"),
                n => self.out.push_str(&format!("<{n} bytes>")),
            }
        } else {
            self.out.push_str(&format!("h'{}'", hex::encode(b)));
        }
    }

    fn text(&mut self, s: &str) {
        self.out.push('"');
        for c in s.chars() {
            match c {
                '"' => self.out.push_str("\\\""),
                '\\' => self.out.push_str("\\\\"),
                '\n' => self.out.push_str("\\n"),
                '\r' => self.out.push_str("\\r"),
                '\t' => self.out.push_str("\\t"),
                c if c.is_control() => self.out.push_str(&format!("\\u{:04x}", c as u32)),
                c => self.out.push(c),
            }
        }
        self.out.push('"');
    }

    fn float<F>(&mut self, value: f64, finite: F)
    where
        F: FnOnce(&mut String),
    {
        if value.is_nan() {
            self.out.push_str("NaN")
        } else if value.is_infinite() {
            self.out.push_str(if value > 0.0 { "Infinity" } else { "-Infinity" })
        } else {
            finite(&mut self.out)
        }
    }
}
