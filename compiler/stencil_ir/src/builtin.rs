//! Identifiers for the fixed table of single-argument builtin functions.

use std::fmt;

/// A builtin function callable from a template expression.
///
/// Every builtin takes exactly one argument. The parser maps the surface
/// name to a variant with [`Builtin::from_name`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Builtin {
    // Math
    Abs,
    Ceil,
    Floor,
    Sqrt,
    Log,
    Sin,
    Cos,
    Tan,

    // Introspection and formatting
    TypeOf,
    Hex,
    Repr,

    // Output
    Print,
    PrintErr,

    Assert,

    // Casts
    CastByte,
    CastChar,
    CastI32,
    CastU32,
    CastI64,
    CastU64,
    CastFloat,
    CastDouble,
    CastBool,
}

impl Builtin {
    /// Every builtin, in declaration order.
    pub const ALL: [Builtin; 23] = [
        Self::Abs,
        Self::Ceil,
        Self::Floor,
        Self::Sqrt,
        Self::Log,
        Self::Sin,
        Self::Cos,
        Self::Tan,
        Self::TypeOf,
        Self::Hex,
        Self::Repr,
        Self::Print,
        Self::PrintErr,
        Self::Assert,
        Self::CastByte,
        Self::CastChar,
        Self::CastI32,
        Self::CastU32,
        Self::CastI64,
        Self::CastU64,
        Self::CastFloat,
        Self::CastDouble,
        Self::CastBool,
    ];

    /// Surface name as written in templates.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Abs => "abs",
            Self::Ceil => "ceil",
            Self::Floor => "floor",
            Self::Sqrt => "sqrt",
            Self::Log => "log",
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::Tan => "tan",
            Self::TypeOf => "typeof",
            Self::Hex => "hex",
            Self::Repr => "repr",
            Self::Print => "print",
            Self::PrintErr => "printerr",
            Self::Assert => "assert",
            Self::CastByte => "byte",
            Self::CastChar => "char",
            Self::CastI32 => "i32",
            Self::CastU32 => "u32",
            Self::CastI64 => "i64",
            Self::CastU64 => "u64",
            Self::CastFloat => "float",
            Self::CastDouble => "double",
            Self::CastBool => "bool",
        }
    }

    /// Look up a builtin by its surface name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.name() == name)
    }

    /// Whether this builtin is one of the numeric/boolean casts.
    pub const fn is_cast(self) -> bool {
        matches!(
            self,
            Self::CastByte
                | Self::CastChar
                | Self::CastI32
                | Self::CastU32
                | Self::CastI64
                | Self::CastU64
                | Self::CastFloat
                | Self::CastDouble
                | Self::CastBool
        )
    }
}

impl fmt::Display for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn names_round_trip() {
        for builtin in Builtin::ALL {
            assert_eq!(Builtin::from_name(builtin.name()), Some(builtin));
        }
    }

    #[test]
    fn unknown_name() {
        assert_eq!(Builtin::from_name("cbrt"), None);
    }

    #[test]
    fn casts_are_flagged() {
        let casts: Vec<_> = Builtin::ALL.into_iter().filter(|b| b.is_cast()).collect();
        assert_eq!(casts.len(), 9);
        assert!(!Builtin::Abs.is_cast());
    }
}
