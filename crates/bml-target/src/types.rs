//! Java type references and declaration modifiers.

use std::fmt;

use bitflags::bitflags;

/// A type as written in Java source.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    /// Local-variable type inference (`var`).
    Var,
    Void,
    Boolean,
    Long,
    Double,
    /// A class or interface, by simple name.
    Class(String),
    /// A parameterized type (`List<String>`).
    Generic { name: String, args: Vec<TypeRef> },
}

impl TypeRef {
    pub fn class(name: impl Into<String>) -> Self {
        TypeRef::Class(name.into())
    }

    pub fn generic(name: impl Into<String>, args: Vec<TypeRef>) -> Self {
        TypeRef::Generic {
            name: name.into(),
            args,
        }
    }

    /// The reference type usable as a type argument.
    ///
    /// Primitives map to their wrapper classes; reference types are returned
    /// unchanged.
    pub fn boxed(&self) -> TypeRef {
        match self {
            TypeRef::Void => TypeRef::class("Void"),
            TypeRef::Boolean => TypeRef::class("Boolean"),
            TypeRef::Long => TypeRef::class("Long"),
            TypeRef::Double => TypeRef::class("Double"),
            other => other.clone(),
        }
    }

    /// Simple name without type arguments.
    pub fn simple_name(&self) -> &str {
        match self {
            TypeRef::Var => "var",
            TypeRef::Void => "void",
            TypeRef::Boolean => "boolean",
            TypeRef::Long => "long",
            TypeRef::Double => "double",
            TypeRef::Class(name) | TypeRef::Generic { name, .. } => name,
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Generic { name, args } => {
                write!(f, "{}<", name)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                f.write_str(">")
            }
            other => f.write_str(other.simple_name()),
        }
    }
}

bitflags! {
    /// Declaration modifiers, printed in canonical Java order.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const PUBLIC = 1 << 0;
        const PROTECTED = 1 << 1;
        const PRIVATE = 1 << 2;
        const ABSTRACT = 1 << 3;
        const STATIC = 1 << 4;
        const FINAL = 1 << 5;
    }
}

impl Modifiers {
    /// `public static final`
    pub const CONSTANT: Modifiers = Modifiers::PUBLIC
        .union(Modifiers::STATIC)
        .union(Modifiers::FINAL);

    /// `public static`
    pub const PUBLIC_STATIC: Modifiers = Modifiers::PUBLIC.union(Modifiers::STATIC);

    const ORDER: [(Modifiers, &'static str); 6] = [
        (Modifiers::PUBLIC, "public"),
        (Modifiers::PROTECTED, "protected"),
        (Modifiers::PRIVATE, "private"),
        (Modifiers::ABSTRACT, "abstract"),
        (Modifiers::STATIC, "static"),
        (Modifiers::FINAL, "final"),
    ];

    /// Keywords in source order.
    pub fn keywords(self) -> impl Iterator<Item = &'static str> {
        Self::ORDER
            .into_iter()
            .filter(move |(flag, _)| self.contains(*flag))
            .map(|(_, keyword)| keyword)
    }
}

impl fmt::Display for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, keyword) in self.keywords().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            f.write_str(keyword)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generic_display() {
        let ty = TypeRef::generic(
            "Map",
            vec![TypeRef::class("String"), TypeRef::generic("List", vec![TypeRef::Long.boxed()])],
        );
        assert_eq!(ty.to_string(), "Map<String, List<Long>>");
    }

    #[test]
    fn modifiers_print_in_canonical_order() {
        let mods = Modifiers::FINAL | Modifiers::STATIC | Modifiers::PRIVATE;
        assert_eq!(mods.to_string(), "private static final");
        assert_eq!(Modifiers::CONSTANT.to_string(), "public static final");
    }

    #[test]
    fn boxing_leaves_reference_types_alone() {
        assert_eq!(TypeRef::Boolean.boxed(), TypeRef::class("Boolean"));
        assert_eq!(TypeRef::class("State").boxed(), TypeRef::class("State"));
    }
}
