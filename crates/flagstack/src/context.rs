//! Read-side querying of resolved flag sets.

use std::time::Duration;

use crate::flag::{Flag, FlagValue};
use crate::resolver::ValueSource;
use crate::set::FlagSet;

/// A read-side view over a chain of flag sets.
///
/// A context wraps the set produced by one parse call and may borrow a
/// parent context; lookups fall through to the parent when a name is
/// absent locally. A context never owns its parent, and parents outlive
/// their children by construction.
///
/// Two query surfaces exist. [`get`](Self::get) and [`is_set`](Self::is_set)
/// make "absent" explicit. The typed accessors ([`bool`](Self::bool),
/// [`int`](Self::int), ...) return the kind's zero value when the name is
/// absent from the chain or carries a different kind; they cannot
/// distinguish "unset" from "set to zero".
#[derive(Debug)]
pub struct Context<'a> {
    set: FlagSet,
    parent: Option<&'a Context<'a>>,
}

impl<'a> Context<'a> {
    /// Wrap a parsed flag set.
    pub fn new(set: FlagSet) -> Self {
        Self { set, parent: None }
    }

    /// Wrap a parsed flag set, delegating lookups to `parent` for names
    /// absent locally.
    pub fn with_parent(set: FlagSet, parent: &'a Context<'a>) -> Self {
        Self {
            set,
            parent: Some(parent),
        }
    }

    /// The flag registered under `name`, searching local set then parents.
    pub fn lookup(&self, name: &str) -> Option<&Flag> {
        self.set
            .lookup(name)
            .or_else(|| self.parent.and_then(|parent| parent.lookup(name)))
    }

    /// The resolved value for `name`, or `None` when no set in the chain
    /// registered it. Use this when "absent" must be distinguishable from
    /// "set to zero".
    pub fn get(&self, name: &str) -> Option<&FlagValue> {
        self.lookup(name).map(Flag::value)
    }

    /// Whether `name` was set by any source, anywhere in the chain.
    pub fn is_set(&self, name: &str) -> bool {
        self.lookup(name).is_some_and(Flag::is_set)
    }

    /// The layer that supplied `name`'s value.
    pub fn source_of(&self, name: &str) -> Option<ValueSource> {
        self.lookup(name).map(Flag::source)
    }

    /// Positional arguments of the local flag set.
    pub fn args(&self) -> &[String] {
        self.set.args()
    }

    /// The boolean value of `name`, or `false` when absent or another kind.
    pub fn bool(&self, name: &str) -> bool {
        match self.get(name) {
            Some(FlagValue::Bool(value)) => *value,
            _ => false,
        }
    }

    /// The integer value of `name`, or `0` when absent or another kind.
    pub fn int(&self, name: &str) -> i64 {
        match self.get(name) {
            Some(FlagValue::Int(value)) => *value,
            _ => 0,
        }
    }

    /// The unsigned value of `name`, or `0` when absent or another kind.
    pub fn uint(&self, name: &str) -> u64 {
        match self.get(name) {
            Some(FlagValue::Uint(value)) => *value,
            _ => 0,
        }
    }

    /// The float value of `name`, or `0.0` when absent or another kind.
    pub fn float(&self, name: &str) -> f64 {
        match self.get(name) {
            Some(FlagValue::Float(value)) => *value,
            _ => 0.0,
        }
    }

    /// The duration value of `name`, or zero when absent or another kind.
    pub fn duration(&self, name: &str) -> Duration {
        match self.get(name) {
            Some(FlagValue::Duration(value)) => *value,
            _ => Duration::ZERO,
        }
    }

    /// The string value of `name`, or `""` when absent or another kind.
    pub fn string(&self, name: &str) -> &str {
        match self.get(name) {
            Some(FlagValue::Str(value)) => value,
            _ => "",
        }
    }

    /// The slice value of `name`, or empty when absent or another kind.
    pub fn uint_slice(&self, name: &str) -> &[u64] {
        match self.get(name) {
            Some(FlagValue::UintSlice(slice)) => slice.values(),
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{MockEnv, MockFs};
    use crate::parse::Parser;

    fn parsed(parser: Parser<MockEnv, MockFs>, args: &[&str]) -> FlagSet {
        parser.parse(args.iter().copied()).unwrap()
    }

    #[test]
    fn local_lookup_wins_over_parent() {
        let parent_set = parsed(
            Parser::with_readers(MockEnv::new(), MockFs::new()).flag(Flag::int("jobs")),
            &["--jobs", "2"],
        );
        let child_set = parsed(
            Parser::with_readers(MockEnv::new(), MockFs::new()).flag(Flag::int("jobs")),
            &["--jobs", "6"],
        );

        let parent = Context::new(parent_set);
        let child = Context::with_parent(child_set, &parent);
        assert_eq!(child.int("jobs"), 6);
    }

    #[test]
    fn absent_name_falls_through_to_parent() {
        let parent_set = parsed(
            Parser::with_readers(MockEnv::new(), MockFs::new()).flag(Flag::bool("verbose")),
            &["--verbose"],
        );
        let child_set = parsed(
            Parser::with_readers(MockEnv::new(), MockFs::new()).flag(Flag::int("jobs")),
            &[],
        );

        let parent = Context::new(parent_set);
        let child = Context::with_parent(child_set, &parent);
        assert!(child.bool("verbose"));
        assert!(child.is_set("verbose"));
    }

    #[test]
    fn absent_everywhere_returns_zero_values() {
        let ctx = Context::new(FlagSet::new());

        assert!(!ctx.bool("missing"));
        assert_eq!(ctx.int("missing"), 0);
        assert_eq!(ctx.uint("missing"), 0);
        assert_eq!(ctx.float("missing"), 0.0);
        assert_eq!(ctx.duration("missing"), Duration::ZERO);
        assert_eq!(ctx.string("missing"), "");
        assert_eq!(ctx.uint_slice("missing"), &[] as &[u64]);
        assert_eq!(ctx.get("missing"), None);
    }

    #[test]
    fn kind_mismatch_returns_zero_value() {
        let set = parsed(
            Parser::with_readers(MockEnv::new(), MockFs::new()).flag(Flag::string("name")),
            &["--name", "42"],
        );
        let ctx = Context::new(set);

        assert_eq!(ctx.int("name"), 0);
        assert_eq!(ctx.string("name"), "42");
    }

    #[test]
    fn args_come_from_the_local_set() {
        let set = parsed(
            Parser::with_readers(MockEnv::new(), MockFs::new()).flag(Flag::bool("v")),
            &["-v", "build", "all"],
        );
        let ctx = Context::new(set);

        assert_eq!(ctx.args(), ["build", "all"]);
    }
}
