//! Enumerations mirrored from the wire format
//!
//! Every domain enum is a plain Rust sum type declared through [`wire_enum!`].
//! The macro also emits a static [`EnumSpec`] describing, per variant, the
//! declared name (accepted by validators when a caller passes text) and the
//! wire string (used by `to_wire`/`from_wire`). Legacy wire spellings are
//! listed in an explicit alias table and resolved only at the wire boundary.

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::value::Value;

/// One variant of a wire enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumMember {
    /// Declared variant name
    pub name: &'static str,
    /// Canonical wire string
    pub wire: &'static str,
}

/// Static description of a wire enum
#[derive(Debug)]
pub struct EnumSpec {
    /// Name of the Rust type
    pub type_name: &'static str,
    /// Identity of the Rust type
    ///
    /// Constant specs may be duplicated in memory, so identity is never
    /// decided by address alone.
    pub type_id: fn() -> TypeId,
    /// Variants in declaration order
    pub members: &'static [EnumMember],
    /// Legacy wire strings mapped to a member index
    pub aliases: &'static [(&'static str, usize)],
}

impl EnumSpec {
    /// Look up a member by declared name
    pub fn index_of_name(&self, name: &str) -> Option<usize> {
        self.members.iter().position(|m| m.name == name)
    }

    /// Look up a member by wire string, consulting the alias table
    pub fn index_of_wire(&self, wire: &str) -> Option<usize> {
        self.members
            .iter()
            .position(|m| m.wire == wire)
            .or_else(|| {
                self.aliases
                    .iter()
                    .find(|(alias, _)| *alias == wire)
                    .map(|(_, index)| *index)
            })
    }

    /// Comma separated list of declared names, for messages
    pub fn names(&self) -> String {
        self.members
            .iter()
            .map(|m| m.name)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// A type-erased enum member carried inside [`Value`]
#[derive(Clone, Copy)]
pub struct EnumValue {
    spec: &'static EnumSpec,
    index: usize,
}

impl EnumValue {
    /// Wrap a typed enum member
    pub fn of<E: WireEnum>(member: E) -> Self {
        EnumValue {
            spec: E::SPEC,
            index: member.index(),
        }
    }

    pub(crate) fn from_index(spec: &'static EnumSpec, index: usize) -> Self {
        EnumValue { spec, index }
    }

    /// The enum's static description
    pub fn spec(&self) -> &'static EnumSpec {
        self.spec
    }

    /// Variant position in declaration order
    pub fn index(&self) -> usize {
        self.index
    }

    /// Declared variant name
    pub fn name(&self) -> &'static str {
        self.spec.members[self.index].name
    }

    /// Canonical wire string
    pub fn wire(&self) -> &'static str {
        self.spec.members[self.index].wire
    }

    /// Whether this value belongs to `spec`
    pub fn is_of(&self, spec: &EnumSpec) -> bool {
        std::ptr::eq(self.spec, spec) || (self.spec.type_id)() == (spec.type_id)()
    }
}

impl PartialEq for EnumValue {
    fn eq(&self, other: &Self) -> bool {
        self.is_of(other.spec) && self.index == other.index
    }
}

impl Eq for EnumValue {}

impl Hash for EnumValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (self.spec.type_id)().hash(state);
        self.index.hash(state);
    }
}

impl fmt::Debug for EnumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.spec.type_name, self.name())
    }
}

impl fmt::Display for EnumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.spec.type_name, self.name())
    }
}

/// Typed side of a wire enum. Implemented by [`wire_enum!`].
pub trait WireEnum: Copy + Eq + 'static {
    /// Static description shared by all members
    const SPEC: &'static EnumSpec;
    /// Members in declaration order
    const VARIANTS: &'static [Self];

    /// Position of this member in [`Self::VARIANTS`]
    fn index(self) -> usize;

    /// Declared variant name
    fn name(self) -> &'static str {
        Self::SPEC.members[self.index()].name
    }

    /// Canonical wire string
    fn wire(self) -> &'static str {
        Self::SPEC.members[self.index()].wire
    }

    /// Parse a declared variant name
    fn from_name(name: &str) -> Option<Self> {
        Self::SPEC.index_of_name(name).map(|i| Self::VARIANTS[i])
    }

    /// Parse a wire string, including legacy aliases
    fn from_wire(wire: &str) -> Option<Self> {
        Self::SPEC.index_of_wire(wire).map(|i| Self::VARIANTS[i])
    }

    /// Recover the typed member from a dynamic value
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Enum(e) if e.is_of(Self::SPEC) => Self::VARIANTS.get(e.index()).copied(),
            _ => None,
        }
    }
}

/// Declare a wire enum
///
/// ```
/// scrive_core::wire_enum! {
///     /// Interface language
///     pub enum Language {
///         En => "en",
///         Sv => "sv",
///     }
///     aliases {
///         "gb" => En,
///     }
/// }
///
/// use scrive_core::WireEnum;
/// assert_eq!(Language::from_wire("gb"), Some(Language::En));
/// assert_eq!(Language::Sv.wire(), "sv");
/// ```
#[macro_export]
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $wire:literal ),+ $(,)?
        }
        $( aliases { $( $alias:literal => $target:ident ),* $(,)? } )?
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $crate::WireEnum for $name {
            const SPEC: &'static $crate::EnumSpec = &$crate::EnumSpec {
                type_name: stringify!($name),
                type_id: ::std::any::TypeId::of::<$name>,
                members: &[ $( $crate::EnumMember { name: stringify!($variant), wire: $wire } ),+ ],
                aliases: &[ $( $( ($alias, $name::$target as usize) ),* )? ],
            };
            const VARIANTS: &'static [Self] = &[ $( $name::$variant ),+ ];

            fn index(self) -> usize {
                self as usize
            }
        }

        impl From<$name> for $crate::Value {
            fn from(member: $name) -> Self {
                $crate::Value::Enum($crate::EnumValue::of(member))
            }
        }

        impl $crate::FromValue for $name {
            const EXPECTED: &'static str = stringify!($name);
            fn try_from_value(value: $crate::Value) -> Option<Self> {
                <Self as $crate::WireEnum>::from_value(&value)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str($crate::WireEnum::wire(*self))
            }
        }
    };
}
