//! FEEL keyword and built-in function tables.

use lazy_static::lazy_static;
use std::collections::HashSet;

lazy_static! {
    /// Reserved words of the FEEL grammar. A bare word matching one of these
    /// is never a variable candidate. Declared variable names still win over
    /// this table because known-name matching runs first.
    pub static ref KEYWORDS: HashSet<&'static str> = {
        let mut set = HashSet::new();
        for kw in [
            "for", "return", "if", "then", "else", "some", "every", "satisfies",
            "instance", "of", "in", "function", "external", "or", "and",
            "between", "not", "null", "true", "false",
        ] {
            set.insert(kw);
        }
        set
    };

    /// Single-word FEEL built-in function names. Skipped as candidates so that
    /// `sum(items)` does not report `sum` as an unresolved variable; built-ins
    /// made of several words ("starts with") fall apart into keyword/word
    /// tokens and are dropped the same way.
    pub static ref BUILTIN_FUNCTIONS: HashSet<&'static str> = {
        let mut set = HashSet::new();
        for name in [
            "abs", "append", "ceiling", "concatenate", "count", "date", "decimal",
            "distinct", "duration", "even", "exp", "flatten", "floor", "log",
            "matches", "max", "mean", "median", "min", "mode", "modulo", "number",
            "odd", "product", "replace", "reverse", "sort", "split", "sqrt",
            "stddev", "string", "sublist", "substring", "sum", "time", "union",
        ] {
            set.insert(name);
        }
        set
    };
}

pub fn is_keyword(word: &str) -> bool {
    KEYWORDS.contains(word)
}

pub fn is_builtin_function(word: &str) -> bool {
    BUILTIN_FUNCTIONS.contains(word)
}
