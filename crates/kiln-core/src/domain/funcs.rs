//! Functions made available to template bodies.
//!
//! The map is engine-agnostic: the renderer adapter registers every entry
//! with whatever template engine it wraps. The standard set mirrors the
//! helpers scaffold templates have always relied on:
//!
//! | Name         | Kind      | Behaviour                                  |
//! |--------------|-----------|--------------------------------------------|
//! | `title`      | transform | upper-case the first letter of every word  |
//! | `lower`      | transform | lower-case                                 |
//! | `upper`      | transform | upper-case                                 |
//! | `isEmptyStr` | predicate | `true` for the empty string                |
//! | `hashFNV`    | transform | FNV-1a 32-bit hash as lowercase hex        |

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// A single template function.
#[derive(Clone)]
pub enum TemplateFunction {
    /// `string -> string`
    Transform(Arc<dyn Fn(&str) -> String + Send + Sync>),
    /// `string -> bool`
    Predicate(Arc<dyn Fn(&str) -> bool + Send + Sync>),
}

impl TemplateFunction {
    pub fn transform(f: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        Self::Transform(Arc::new(f))
    }

    pub fn predicate(f: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        Self::Predicate(Arc::new(f))
    }
}

impl fmt::Debug for TemplateFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transform(_) => f.write_str("Transform(..)"),
            Self::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

/// Named template functions.
#[derive(Debug, Clone, Default)]
pub struct FuncMap {
    funcs: BTreeMap<String, TemplateFunction>,
}

impl FuncMap {
    /// An empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard helper set (see module docs).
    pub fn standard() -> Self {
        Self::new()
            .with("title", TemplateFunction::transform(title_case))
            .with("lower", TemplateFunction::transform(str::to_lowercase))
            .with("upper", TemplateFunction::transform(str::to_uppercase))
            .with("isEmptyStr", TemplateFunction::predicate(str::is_empty))
            .with("hashFNV", TemplateFunction::transform(hash_fnv))
    }

    /// Add or replace a function.
    pub fn with(mut self, name: impl Into<String>, func: TemplateFunction) -> Self {
        self.insert(name, func);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, func: TemplateFunction) {
        self.funcs.insert(name.into(), func);
    }

    pub fn get(&self, name: &str) -> Option<&TemplateFunction> {
        self.funcs.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TemplateFunction)> {
        self.funcs.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.funcs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.funcs.is_empty()
    }
}

/// Upper-case the first letter of every whitespace-separated word.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if at_word_start && c.is_alphabetic() {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        at_word_start = !c.is_alphanumeric() && c != '\'';
    }
    out
}

/// FNV-1a 32-bit hash of `s`, formatted as eight lowercase hex digits.
pub fn hash_fnv(s: &str) -> String {
    const OFFSET_BASIS: u32 = 0x811c_9dc5;
    const PRIME: u32 = 0x0100_0193;

    let hash = s.bytes().fold(OFFSET_BASIS, |acc, b| {
        (acc ^ u32::from(b)).wrapping_mul(PRIME)
    });
    format!("{hash:08x}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(map: &FuncMap, name: &str, input: &str) -> String {
        match map.get(name).unwrap() {
            TemplateFunction::Transform(f) => f(input),
            TemplateFunction::Predicate(f) => f(input).to_string(),
        }
    }

    #[test]
    fn standard_set_is_complete() {
        let map = FuncMap::standard();
        let names: Vec<_> = map.iter().map(|(n, _)| n).collect();
        assert_eq!(names, ["hashFNV", "isEmptyStr", "lower", "title", "upper"]);
    }

    #[test]
    fn title_upper_cases_words() {
        assert_eq!(title_case("hello big world"), "Hello Big World");
        assert_eq!(title_case("my-operator"), "My-Operator");
        assert_eq!(title_case("don't stop"), "Don't Stop");
    }

    #[test]
    fn case_helpers() {
        let map = FuncMap::standard();
        assert_eq!(apply(&map, "lower", "CronJob"), "cronjob");
        assert_eq!(apply(&map, "upper", "CronJob"), "CRONJOB");
    }

    #[test]
    fn is_empty_predicate() {
        let map = FuncMap::standard();
        assert_eq!(apply(&map, "isEmptyStr", ""), "true");
        assert_eq!(apply(&map, "isEmptyStr", "x"), "false");
    }

    #[test]
    fn fnv_matches_reference_vectors() {
        assert_eq!(hash_fnv(""), "811c9dc5");
        assert_eq!(hash_fnv("a"), "e40c292c");
        assert_eq!(hash_fnv("foobar"), "bf9cf968");
    }

    #[test]
    fn fnv_keeps_leading_zeros() {
        assert_eq!(hash_fnv("key302"), "0f4d5cef");
    }

    #[test]
    fn insert_replaces_existing_entry() {
        let map = FuncMap::standard().with(
            "lower",
            TemplateFunction::transform(|s| format!("<{s}>")),
        );
        assert_eq!(apply(&map, "lower", "X"), "<X>");
        assert_eq!(map.len(), 5);
    }
}
