//! Word handling: the domain alphabet, collation, processing and snapshot diffing
//!
//! Everything here is synchronous and free of I/O. The crawler feeds raw words in and
//! the output layer consumes the resulting [`WordCollection`] and [`DiffResult`].

mod alphabet;
mod collation;
mod diff;
mod processor;

pub use alphabet::{
    is_compound_separator, is_compound_word, is_script_char, Alphabet, COMPOUND_SEPARATORS,
    THAI_ALPHABET,
};
pub use collation::{CharKey, CollationKey, Collator, DEFAULT_MEMO_CAPACITY};
pub use diff::{compare, sorted, DiffResult};
pub use processor::{
    dedupe, filter, is_acceptable, normalize, ProcessingStats, WordCollection, WordSetProcessor,
};
