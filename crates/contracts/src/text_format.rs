//! Protobuf text format rendering
//!
//! Produces the canonical human-readable form of a message:
//! - fields in field-number order, one `name: value` line each
//! - proto3 default scalars omitted, repeated fields one line per element
//! - nested messages as `name {` ... `}` blocks, two spaces per level
//! - strings double-quoted, C-style escapes, octal for anything outside printable ASCII

use std::fmt::{self, Write};

use crate::{
    Action, Artifact, AspectDescriptor, Configuration, DepSetOfFiles, KeyValuePair, ParamFile,
    PathFragment, RuleClass, Target,
};

/// Message that can render its fields in text format
pub trait TextFormat {
    /// Write every non-default field at the printer's current depth
    fn write_fields(&self, out: &mut TextPrinter);

    /// Render the message body (no surrounding braces)
    fn to_text(&self) -> String {
        let mut printer = TextPrinter::new();
        self.write_fields(&mut printer);
        printer.finish()
    }
}

/// Field value that knows how to print itself under a field name
pub trait TextField {
    fn print_field(&self, name: &str, out: &mut TextPrinter);
}

/// Indentation-aware text sink
#[derive(Debug, Default)]
pub struct TextPrinter {
    buf: String,
    depth: usize,
}

impl TextPrinter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finish(self) -> String {
        self.buf
    }

    fn indent(&mut self) {
        for _ in 0..self.depth {
            self.buf.push_str("  ");
        }
    }

    /// `name: value` with the value written as-is
    pub fn scalar(&mut self, name: &str, value: impl fmt::Display) {
        self.indent();
        // Writing into a String cannot fail
        let _ = writeln!(self.buf, "{name}: {value}");
    }

    /// `name: "value"` with escaping
    pub fn string(&mut self, name: &str, value: &str) {
        self.indent();
        self.buf.push_str(name);
        self.buf.push_str(": \"");
        escape_bytes_into(value.as_bytes(), &mut self.buf);
        self.buf.push_str("\"\n");
    }

    /// Nested message block
    pub fn message<M: TextFormat + ?Sized>(&mut self, name: &str, message: &M) {
        self.indent();
        self.buf.push_str(name);
        self.buf.push_str(" {\n");
        self.depth += 1;
        message.write_fields(self);
        self.depth -= 1;
        self.indent();
        self.buf.push_str("}\n");
    }
}

/// Text-format string escaping over raw UTF-8 bytes
pub fn escape_bytes(input: &[u8]) -> String {
    let mut out = String::with_capacity(input.len());
    escape_bytes_into(input, &mut out);
    out
}

fn escape_bytes_into(input: &[u8], out: &mut String) {
    for &b in input {
        match b {
            0x07 => out.push_str("\\a"),
            0x08 => out.push_str("\\b"),
            0x0c => out.push_str("\\f"),
            b'\n' => out.push_str("\\n"),
            b'\r' => out.push_str("\\r"),
            b'\t' => out.push_str("\\t"),
            0x0b => out.push_str("\\v"),
            b'\\' => out.push_str("\\\\"),
            b'\'' => out.push_str("\\'"),
            b'"' => out.push_str("\\\""),
            0x20..=0x7e => out.push(b as char),
            _ => {
                let _ = write!(out, "\\{b:03o}");
            }
        }
    }
}

impl TextField for u32 {
    fn print_field(&self, name: &str, out: &mut TextPrinter) {
        if *self != 0 {
            out.scalar(name, self);
        }
    }
}

impl TextField for bool {
    fn print_field(&self, name: &str, out: &mut TextPrinter) {
        if *self {
            out.scalar(name, "true");
        }
    }
}

impl TextField for String {
    fn print_field(&self, name: &str, out: &mut TextPrinter) {
        if !self.is_empty() {
            out.string(name, self);
        }
    }
}

// Repeated elements are printed even when they hold a default value.
impl TextField for Vec<u32> {
    fn print_field(&self, name: &str, out: &mut TextPrinter) {
        for value in self {
            out.scalar(name, value);
        }
    }
}

impl TextField for Vec<String> {
    fn print_field(&self, name: &str, out: &mut TextPrinter) {
        for value in self {
            out.string(name, value);
        }
    }
}

/// Implement [`TextFormat`] for a message, plus [`TextField`] for repeated
/// occurrences of it. Fields must be listed in field-number order.
macro_rules! text_format {
    ($($message:ident { $($field:ident),* $(,)? })*) => {
        $(
            impl TextFormat for $message {
                fn write_fields(&self, out: &mut TextPrinter) {
                    $( TextField::print_field(&self.$field, stringify!($field), out); )*
                }
            }

            impl TextField for Vec<$message> {
                fn print_field(&self, name: &str, out: &mut TextPrinter) {
                    for message in self {
                        out.message(name, message);
                    }
                }
            }
        )*
    };
}

text_format! {
    Artifact { id, path_fragment_id, is_tree_artifact }
    Action {
        target_id,
        aspect_descriptor_ids,
        action_key,
        mnemonic,
        configuration_id,
        arguments,
        environment_variables,
        input_dep_set_ids,
        output_ids,
        discovers_inputs,
        execution_info,
        param_files,
        primary_output_id,
        execution_platform,
        template_content,
        substitutions,
        file_contents,
        unresolved_symlink_target,
        is_executable,
    }
    Target { id, label, rule_class_id }
    RuleClass { id, name }
    AspectDescriptor { id, name, parameters }
    DepSetOfFiles { id, transitive_dep_set_ids, direct_artifact_ids }
    Configuration { id, mnemonic, platform_name, checksum, is_tool }
    PathFragment { id, label, parent_id }
    KeyValuePair { key, value }
    ParamFile { exec_path, arguments }
}
