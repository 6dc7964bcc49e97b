//! Vocabulary and productions of a context-free grammar.

mod grammar;

pub use self::grammar::*;

pub type Map<K, V> = fnv::FnvHashMap<K, V>;
pub type BiMap<L, R> = bimap::BiMap<L, R>;
