use std::fmt::Write as _;
use std::io;

use flowconv_common::is_valid_identifier;
use flowconv_common::reference::{ARGS_KEY, CALL_KEY, EXPR_KEY};
use serde_json::{Map, Value};

use super::Block;

/// An ordered sequence of component declarations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct File {
    blocks: Vec<Block>,
}

impl File {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, block: Block) {
        self.blocks.push(block);
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Find a block by `<name path>.<label>`.
    pub fn find(&self, id: &str) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id() == id)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Render all blocks as text.
    ///
    /// ```text
    /// discovery.consul "job1" {
    ///     server = "consul.example.com:8500"
    /// }
    /// ```
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (i, block) in self.blocks.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            render_block(&mut out, block);
        }
        out
    }

    pub fn write_to<W: io::Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(self.render().as_bytes())
    }
}

fn render_block(out: &mut String, block: &Block) {
    let _ = write!(
        out,
        "{} {} {{",
        block.name().join("."),
        quote(block.label())
    );

    let attributes = match block.body() {
        Value::Object(map) => map.iter().filter(|(_, v)| !v.is_null()).collect::<Vec<_>>(),
        _ => Vec::new(),
    };

    if attributes.is_empty() {
        out.push_str(" }\n");
        return;
    }

    out.push('\n');
    for (key, value) in attributes {
        indent(out, 1);
        let _ = write!(out, "{} = ", key);
        render_value(out, value, 1);
        out.push('\n');
    }
    out.push_str("}\n");
}

fn render_value(out: &mut String, value: &Value, level: usize) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => out.push_str(&n.to_string()),
        Value::String(s) => out.push_str(&quote(s)),
        Value::Array(items) => render_array(out, items, level),
        Value::Object(map) => render_object(out, map, level),
    }
}

fn render_array(out: &mut String, items: &[Value], level: usize) {
    if items.is_empty() {
        out.push_str("[]");
        return;
    }

    if items.iter().all(is_inline) {
        out.push('[');
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            render_value(out, item, level);
        }
        out.push(']');
        return;
    }

    out.push_str("[\n");
    for item in items {
        indent(out, level + 1);
        render_value(out, item, level + 1);
        out.push_str(",\n");
    }
    indent(out, level);
    out.push(']');
}

fn render_object(out: &mut String, map: &Map<String, Value>, level: usize) {
    if map.len() == 1 {
        if let Some(Value::String(expr)) = map.get(EXPR_KEY) {
            out.push_str(expr);
            return;
        }
    }

    if let (Some(Value::String(function)), Some(Value::Array(args))) =
        (map.get(CALL_KEY), map.get(ARGS_KEY))
    {
        out.push_str(function);
        out.push('(');
        for (i, arg) in args.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            render_value(out, arg, level);
        }
        out.push(')');
        return;
    }

    let fields: Vec<_> = map.iter().filter(|(_, v)| !v.is_null()).collect();
    if fields.is_empty() {
        out.push_str("{}");
        return;
    }

    out.push_str("{\n");
    for (key, value) in fields {
        indent(out, level + 1);
        if is_valid_identifier(key) {
            out.push_str(key);
        } else {
            out.push_str(&quote(key));
        }
        out.push_str(" = ");
        render_value(out, value, level + 1);
        out.push_str(",\n");
    }
    indent(out, level);
    out.push('}');
}

/// Scalars and references fit on one line.
fn is_inline(value: &Value) -> bool {
    match value {
        Value::Object(map) => map.len() == 1 && map.contains_key(EXPR_KEY),
        Value::Array(_) => false,
        _ => true,
    }
}

fn quote(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| format!("\"{}\"", s))
}

fn indent(out: &mut String, level: usize) {
    for _ in 0..level {
        out.push('\t');
    }
}
