//! Deterministic, structural identity for BML types.
//!
//! [`TypeHash`] is a 64-bit hash computed from the *shape* of a type rather
//! than from the order in which types were resolved. Two independently built
//! `list<number>` types therefore hash identically, which is what lets the
//! [`TypeRegistry`](../../bml_registry/struct.TypeRegistry.html) intern them
//! into a single canonical entry.
//!
//! # Hash Computation
//!
//! Names are hashed with XXHash64. Composite types fold their argument hashes
//! in with per-position markers so that `map<string, number>` and
//! `map<number, string>` differ.
//!
//! # Examples
//!
//! ```
//! use bml_core::{TypeHash, primitives};
//!
//! let a = TypeHash::from_composite("list", &[primitives::NUMBER]);
//! let b = TypeHash::from_composite("list", &[primitives::NUMBER]);
//! assert_eq!(a, b);
//! assert_ne!(a, TypeHash::from_composite("list", &[primitives::STRING]));
//! ```

use std::fmt;

use xxhash_rust::const_xxh64::xxh64 as const_xxh64;
use xxhash_rust::xxh64::xxh64;

/// Domain-specific mixing constants for hash computation.
pub mod hash_constants {
    /// Separator constant folded between components.
    pub const SEP: u64 = 0x4bc94d6bd06053ad;

    /// Domain marker for named (nominal) types.
    pub const TYPE: u64 = 0x2fac10b63a6cc57c;

    /// Domain marker for composite type constructors (list, map, function).
    pub const COMPOSITE: u64 = 0x5ea77ffbcdf5f302;

    /// Domain marker for dialogue state types.
    pub const STATE: u64 = 0x7d3c8b4a92e15f6d;

    /// Position mixing constants so argument order matters.
    pub const PARAM_MARKERS: [u64; 8] = [
        0x9e3779b97f4a7c15,
        0xbf58476d1ce4e5b9,
        0x94d049bb133111eb,
        0xd6e8feb86659fd93,
        0xe7037ed1a0b428db,
        0xc6a4a7935bd1e995,
        0x8648dbbc94d49b8d,
        0xa2b48b2c69e0d657,
    ];
}

/// A deterministic 64-bit hash identifying a BML type.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct TypeHash(pub u64);

impl TypeHash {
    /// Empty/invalid hash constant.
    pub const EMPTY: TypeHash = TypeHash(0);

    /// Hash of a nominal type (primitives, components, `intent`).
    #[inline]
    pub const fn from_name(name: &str) -> Self {
        TypeHash(hash_constants::TYPE ^ const_xxh64(name.as_bytes(), 0))
    }

    /// Hash of a composite type built by `constructor` over `args`.
    ///
    /// Argument order matters: `map<string, number>` and `map<number, string>`
    /// produce different hashes.
    #[inline]
    pub fn from_composite(constructor: &str, args: &[TypeHash]) -> Self {
        let mut hash = hash_constants::COMPOSITE ^ xxh64(constructor.as_bytes(), 0);
        for (i, arg) in args.iter().enumerate() {
            hash = hash
                .wrapping_mul(hash_constants::SEP)
                .wrapping_add(position_marker(i) ^ arg.0);
        }
        TypeHash(hash)
    }

    /// Hash of a dialogue state type.
    ///
    /// A state's identity is its intent plus its action payload (`tag` and the
    /// payload strings), so two `state` types resolved from identical
    /// declarations share a hash.
    pub fn from_state(intent: &str, tag: &str, payload: &[&str]) -> Self {
        let mut hash = hash_constants::STATE ^ xxh64(intent.as_bytes(), 0);
        hash = hash
            .wrapping_mul(hash_constants::SEP)
            .wrapping_add(xxh64(tag.as_bytes(), 0));
        for (i, part) in payload.iter().enumerate() {
            hash = hash
                .wrapping_mul(hash_constants::SEP)
                .wrapping_add(position_marker(i) ^ xxh64(part.as_bytes(), 0));
        }
        TypeHash(hash)
    }

    /// Check if this is an empty/invalid hash.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

fn position_marker(i: usize) -> u64 {
    hash_constants::PARAM_MARKERS
        .get(i)
        .copied()
        .unwrap_or_else(|| hash_constants::PARAM_MARKERS[0].wrapping_add(i as u64))
}

impl fmt::Debug for TypeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeHash({:#018x})", self.0)
    }
}

impl fmt::Display for TypeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}

/// Well-known hashes for the builtin nominal types.
pub mod primitives {
    use super::TypeHash;

    /// Hash for `boolean`
    pub const BOOLEAN: TypeHash = TypeHash::from_name("boolean");

    /// Hash for `number` (integral)
    pub const NUMBER: TypeHash = TypeHash::from_name("number");

    /// Hash for `float`
    pub const FLOAT: TypeHash = TypeHash::from_name("float");

    /// Hash for `string`
    pub const STRING: TypeHash = TypeHash::from_name("string");

    /// Hash for `void`
    pub const VOID: TypeHash = TypeHash::from_name("void");

    /// Hash for `intent`
    pub const INTENT: TypeHash = TypeHash::from_name("intent");
}
