//! Human-readable rendering of a tree.
//!
//! The format is informational: indented containers, ISO-8601 dates, and a
//! classic hex dump for data payloads. It is not a round-trip interchange.

use alloc::vec::Vec;
use core::fmt::{self, Write};

use crate::spec::PlistDate;
use crate::tree::node::Payload;
use crate::tree::PlistNode;

/// Spaces of indentation per nesting level.
const INDENT_STEP: &str = "        ";
/// Bytes rendered per hex dump row.
const BYTES_PER_ROW: usize = 16;

/// One pending piece of output. Rendering walks an explicit worklist so
/// that tree depth never turns into call stack depth.
enum Work<'a> {
    Val(usize, PlistNode<'a>),
    Text(&'static str),
    Quoted(&'a str),
    Indent(usize),
}

/// Writes an indented rendering of the subtree under `node` into `out`.
pub fn dump<W: Write>(node: PlistNode<'_>, out: &mut W) -> fmt::Result {
    let mut work: Vec<Work<'_>> = alloc::vec![Work::Val(0, node)];
    while let Some(item) = work.pop() {
        match item {
            Work::Text(s) => out.write_str(s)?,
            Work::Indent(depth) => write_indent(out, depth)?,
            Work::Quoted(s) => write_quoted(out, s)?,
            Work::Val(depth, node) => render(node, depth, out, &mut work)?,
        }
    }
    Ok(())
}

impl fmt::Display for PlistNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        dump(*self, f)
    }
}

fn render<'a, W: Write>(
    node: PlistNode<'a>,
    depth: usize,
    out: &mut W,
    work: &mut Vec<Work<'a>>,
) -> fmt::Result {
    match &node.node.payload {
        Payload::Dict(..) => {
            out.write_str("{\n")?;
            work.push(Work::Text("}"));
            work.push(Work::Indent(depth));
            let entries: Vec<_> = node.children().collect();
            for key in entries.into_iter().rev() {
                work.push(Work::Text(";\n"));
                if let Some(value) = key.key_value() {
                    work.push(Work::Val(depth + 1, value));
                }
                work.push(Work::Text(" = "));
                work.push(Work::Quoted(key.key_name().unwrap_or("")));
                work.push(Work::Indent(depth + 1));
            }
        }
        Payload::Array(..) => {
            out.write_str("(\n")?;
            work.push(Work::Text(")"));
            work.push(Work::Indent(depth));
            let items: Vec<_> = node.children().collect();
            for item in items.into_iter().rev() {
                work.push(Work::Text(",\n"));
                work.push(Work::Val(depth + 1, item));
                work.push(Work::Indent(depth + 1));
            }
        }
        Payload::Key { name, .. } => {
            write_quoted(out, name)?;
            out.write_str(" = ")?;
            if let Some(value) = node.key_value() {
                work.push(Work::Val(depth, value));
            }
        }
        Payload::String(s) => write_quoted(out, s)?,
        Payload::Integer(v) => write!(out, "{}", v)?,
        Payload::Real(v) => write!(out, "{}", v)?,
        Payload::Boolean(v) => out.write_str(if *v { "true" } else { "false" })?,
        Payload::Date(d) => write_date(out, d)?,
        Payload::Data(bytes) => write_data(out, bytes, depth)?,
    }
    Ok(())
}

fn write_indent<W: Write>(out: &mut W, depth: usize) -> fmt::Result {
    for _ in 0..depth {
        out.write_str(INDENT_STEP)?;
    }
    Ok(())
}

/// Writes a string literal, re-escaping the bytes the parser unescapes.
fn write_quoted<W: Write>(out: &mut W, s: &str) -> fmt::Result {
    out.write_char('"')?;
    for c in s.chars() {
        match c {
            '"' => out.write_str("\\\"")?,
            '\\' => out.write_str("\\\\")?,
            '\n' => out.write_str("\\n")?,
            '\t' => out.write_str("\\t")?,
            '\r' => out.write_str("\\r")?,
            '\u{8}' => out.write_str("\\b")?,
            '\u{c}' => out.write_str("\\f")?,
            other => out.write_char(other)?,
        }
    }
    out.write_char('"')
}

/// ISO-8601 with the numeric timezone suffix: `2001-11-12T18:31:01+0000`.
fn write_date<W: Write>(out: &mut W, d: &PlistDate) -> fmt::Result {
    let sign = if d.utc_offset < 0 { '-' } else { '+' };
    let off = if d.utc_offset < 0 {
        -d.utc_offset
    } else {
        d.utc_offset
    };
    write!(
        out,
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}{}{:02}{:02}",
        d.year,
        d.month,
        d.day,
        d.hour,
        d.minute,
        d.second,
        sign,
        off / 3600,
        (off % 3600) / 60,
    )
}

/// The classic 16-bytes-per-row hex dump: offset, two 8-byte hex groups,
/// ASCII column.
fn write_data<W: Write>(out: &mut W, bytes: &[u8], depth: usize) -> fmt::Result {
    out.write_str("<\n")?;
    for (row_idx, row) in bytes.chunks(BYTES_PER_ROW).enumerate() {
        write_indent(out, depth + 1)?;
        write!(out, "{:08x}  ", row_idx * BYTES_PER_ROW)?;
        for col in 0..BYTES_PER_ROW {
            if col == BYTES_PER_ROW / 2 {
                out.write_char(' ')?;
            }
            match row.get(col) {
                Some(b) => write!(out, "{:02x} ", b)?,
                None => out.write_str("   ")?,
            }
        }
        out.write_str(" |")?;
        for &b in row {
            let c = if (0x20..0x7f).contains(&b) {
                b as char
            } else {
                '.'
            };
            out.write_char(c)?;
        }
        out.write_str("|\n")?;
    }
    write_indent(out, depth)?;
    out.write_char('>')
}
