//! Field type table
//!
//! Maps the twelve TIFF field type ids to their element size and to the
//! field kind used when reading their bytes.

use std::fmt;

use crate::io::field_reader::FieldKind;
use crate::tiff::constants::field_types;

/// The twelve field types of classic TIFF
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    Byte,
    Ascii,
    Short,
    Long,
    Rational,
    SByte,
    Undefined,
    SShort,
    SLong,
    SRational,
    Float,
    Double,
}

impl FieldType {
    /// Looks up a type id, `None` if the id is not in the table
    pub fn from_id(id: u16) -> Option<Self> {
        let field_type = match id {
            field_types::BYTE => FieldType::Byte,
            field_types::ASCII => FieldType::Ascii,
            field_types::SHORT => FieldType::Short,
            field_types::LONG => FieldType::Long,
            field_types::RATIONAL => FieldType::Rational,
            field_types::SBYTE => FieldType::SByte,
            field_types::UNDEFINED => FieldType::Undefined,
            field_types::SSHORT => FieldType::SShort,
            field_types::SLONG => FieldType::SLong,
            field_types::SRATIONAL => FieldType::SRational,
            field_types::FLOAT => FieldType::Float,
            field_types::DOUBLE => FieldType::Double,
            _ => return None,
        };
        Some(field_type)
    }

    /// The numeric id stored on disk
    pub fn id(&self) -> u16 {
        match self {
            FieldType::Byte => field_types::BYTE,
            FieldType::Ascii => field_types::ASCII,
            FieldType::Short => field_types::SHORT,
            FieldType::Long => field_types::LONG,
            FieldType::Rational => field_types::RATIONAL,
            FieldType::SByte => field_types::SBYTE,
            FieldType::Undefined => field_types::UNDEFINED,
            FieldType::SShort => field_types::SSHORT,
            FieldType::SLong => field_types::SLONG,
            FieldType::SRational => field_types::SRATIONAL,
            FieldType::Float => field_types::FLOAT,
            FieldType::Double => field_types::DOUBLE,
        }
    }

    /// Size in bytes of one element of this type
    pub fn size(&self) -> usize {
        match self {
            FieldType::Byte | FieldType::Ascii | FieldType::SByte | FieldType::Undefined => 1,
            FieldType::Short | FieldType::SShort => 2,
            FieldType::Long | FieldType::SLong | FieldType::Float => 4,
            FieldType::Rational | FieldType::SRational | FieldType::Double => 8,
        }
    }

    /// How the bytes of one element are read
    ///
    /// Rationals read as one 8-byte integer of the matching signedness and
    /// are split into numerator and denominator afterwards.
    pub fn field_kind(&self) -> FieldKind {
        match self {
            FieldType::Byte | FieldType::SByte | FieldType::Undefined => FieldKind::Bytes,
            FieldType::Ascii => FieldKind::Str,
            FieldType::Short | FieldType::Long | FieldType::Rational => FieldKind::UInt,
            FieldType::SShort | FieldType::SLong | FieldType::SRational => FieldKind::Int,
            FieldType::Float => FieldKind::Float,
            FieldType::Double => FieldKind::Double,
        }
    }

    /// Whether values of this type are read as one contiguous block
    pub fn is_block(&self) -> bool {
        matches!(
            self,
            FieldType::Byte | FieldType::Ascii | FieldType::SByte | FieldType::Undefined
        )
    }

    pub fn is_rational(&self) -> bool {
        matches!(self, FieldType::Rational | FieldType::SRational)
    }

    /// Type name as written in the TIFF specification
    pub fn name(&self) -> &'static str {
        match self {
            FieldType::Byte => "BYTE",
            FieldType::Ascii => "ASCII",
            FieldType::Short => "SHORT",
            FieldType::Long => "LONG",
            FieldType::Rational => "RATIONAL",
            FieldType::SByte => "SBYTE",
            FieldType::Undefined => "UNDEFINED",
            FieldType::SShort => "SSHORT",
            FieldType::SLong => "SLONG",
            FieldType::SRational => "SRATIONAL",
            FieldType::Float => "FLOAT",
            FieldType::Double => "DOUBLE",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.id(), self.name())
    }
}
