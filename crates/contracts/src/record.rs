//! Record - unit of emission
//!
//! Every record is one occurrence of a repeated field of
//! [`ActionGraphContainer`](crate::ActionGraphContainer). The field number and
//! label of each category come from a fixed table and never depend on content.

use bytes::BufMut;
use serde::Serialize;

use crate::text_format::{TextFormat, TextPrinter};
use crate::{
    Action, Artifact, AspectDescriptor, Configuration, DepSetOfFiles, PathFragment, RuleClass,
    Target,
};

/// Record category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Artifact,
    Action,
    Target,
    DepSetOfFiles,
    Configuration,
    AspectDescriptor,
    RuleClass,
    PathFragment,
}

impl RecordKind {
    /// All categories, in container field order
    pub const ALL: [RecordKind; 8] = [
        Self::Artifact,
        Self::Action,
        Self::Target,
        Self::DepSetOfFiles,
        Self::Configuration,
        Self::AspectDescriptor,
        Self::RuleClass,
        Self::PathFragment,
    ];

    /// (field number, label), indexed by discriminant
    const FIELDS: [(u32, &'static str); 8] = [
        (1, "artifacts"),
        (2, "actions"),
        (3, "targets"),
        (4, "dep_set_of_files"),
        (5, "configuration"),
        (6, "aspect_descriptors"),
        (7, "rule_classes"),
        (8, "path_fragments"),
    ];

    /// Field number of the container field this category populates
    pub const fn field_number(self) -> u32 {
        Self::FIELDS[self as usize].0
    }

    /// Container field name, used as the block label in text output
    pub const fn label(self) -> &'static str {
        Self::FIELDS[self as usize].1
    }

    /// Dense index in `0..8`
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// One fully-populated record
///
/// Serializes as the bare payload, so its JSON form is the payload's JSON form.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Record {
    Artifact(Artifact),
    Action(Action),
    Target(Target),
    DepSetOfFiles(DepSetOfFiles),
    Configuration(Configuration),
    AspectDescriptor(AspectDescriptor),
    RuleClass(RuleClass),
    PathFragment(PathFragment),
}

/// Run `$body` with `$msg` bound to the payload of whichever variant `$record` holds
macro_rules! with_payload {
    ($record:expr, $msg:ident => $body:expr) => {
        match $record {
            Record::Artifact($msg) => $body,
            Record::Action($msg) => $body,
            Record::Target($msg) => $body,
            Record::DepSetOfFiles($msg) => $body,
            Record::Configuration($msg) => $body,
            Record::AspectDescriptor($msg) => $body,
            Record::RuleClass($msg) => $body,
            Record::PathFragment($msg) => $body,
        }
    };
}

impl Record {
    pub fn kind(&self) -> RecordKind {
        match self {
            Record::Artifact(_) => RecordKind::Artifact,
            Record::Action(_) => RecordKind::Action,
            Record::Target(_) => RecordKind::Target,
            Record::DepSetOfFiles(_) => RecordKind::DepSetOfFiles,
            Record::Configuration(_) => RecordKind::Configuration,
            Record::AspectDescriptor(_) => RecordKind::AspectDescriptor,
            Record::RuleClass(_) => RecordKind::RuleClass,
            Record::PathFragment(_) => RecordKind::PathFragment,
        }
    }

    pub fn label(&self) -> &'static str {
        self.kind().label()
    }

    /// Encode as one length-delimited occurrence of the container field
    ///
    /// Key, length prefix and body are byte-identical to what the container
    /// itself would write for this element.
    pub fn encode_field(&self, buf: &mut impl BufMut) {
        let tag = self.kind().field_number();
        with_payload!(self, msg => prost::encoding::message::encode(tag, msg, buf))
    }

    /// Length of [`Record::encode_field`]'s output
    pub fn encoded_field_len(&self) -> usize {
        let tag = self.kind().field_number();
        with_payload!(self, msg => prost::encoding::message::encoded_len(tag, msg))
    }
}

impl TextFormat for Record {
    fn write_fields(&self, out: &mut TextPrinter) {
        with_payload!(self, msg => msg.write_fields(out))
    }
}

macro_rules! impl_from_payload {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for Record {
                fn from(message: $variant) -> Self {
                    Record::$variant(message)
                }
            }
        )*
    };
}

impl_from_payload!(
    Artifact,
    Action,
    Target,
    DepSetOfFiles,
    Configuration,
    AspectDescriptor,
    RuleClass,
    PathFragment,
);
