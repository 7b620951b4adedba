//! Flag registries and single-pass token scanning.

use std::collections::HashMap;

use indexmap::IndexMap;

use crate::error::Error;
use crate::flag::Flag;
use crate::resolver::ValueSource;

/// A registry of flags active during one parse attempt.
///
/// Names and aliases share one case-sensitive namespace; collisions are
/// registration errors, caught when the set is built rather than at parse
/// time. Registration order is preserved, so required-flag reporting and
/// set rebuilds are deterministic. After a parse the set also holds the
/// results: resolved flag values plus trailing positional arguments.
#[derive(Debug, Default)]
pub struct FlagSet {
    /// Primary name → flag, in registration order.
    flags: IndexMap<String, Flag>,
    /// Every name and alias → primary name.
    names: HashMap<String, String>,
    args: Vec<String>,
}

impl FlagSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a flag under its primary name and every alias.
    pub fn register(&mut self, flag: Flag) -> Result<(), Error> {
        for name in flag.names() {
            if self.names.contains_key(name) {
                return Err(Error::DuplicateFlag {
                    name: name.to_string(),
                });
            }
        }
        let primary = flag.name().to_string();
        for name in flag.names() {
            self.names.insert(name.to_string(), primary.clone());
        }
        self.flags.insert(primary, flag);
        Ok(())
    }

    /// Look up a flag by name or alias.
    pub fn lookup(&self, name: &str) -> Option<&Flag> {
        self.flags.get(self.names.get(name)?)
    }

    fn lookup_mut(&mut self, name: &str) -> Option<&mut Flag> {
        let primary = self.names.get(name)?.clone();
        self.flags.get_mut(&primary)
    }

    /// Whether `name` is registered, as a primary name or alias.
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    /// Registered flags in registration order.
    pub fn flags(&self) -> impl Iterator<Item = &Flag> {
        self.flags.values()
    }

    /// Whether the named flag was set by any source. `false` when the name
    /// is not registered.
    pub fn is_set(&self, name: &str) -> bool {
        self.lookup(name).is_some_and(Flag::is_set)
    }

    /// The layer that supplied the named flag's value.
    pub fn source_of(&self, name: &str) -> Option<ValueSource> {
        self.lookup(name).map(Flag::source)
    }

    /// Positional arguments left after flag scanning.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Scan tokens against the registered flags.
    ///
    /// One and two dashes are equivalent for lookups. `=`-joined values are
    /// accepted; value-taking flags otherwise consume the following token.
    /// Scanning stops at `--` (dropped) or at the first positional token;
    /// the remainder is kept as positional arguments.
    pub(crate) fn parse(&mut self, args: &[String]) -> Result<(), Error> {
        let mut i = 0;
        while i < args.len() {
            let token = &args[i];
            if token == "--" {
                self.args.extend(args[i + 1..].iter().cloned());
                return Ok(());
            }
            if token == "-" || !token.starts_with('-') {
                self.args.extend(args[i..].iter().cloned());
                return Ok(());
            }

            let body = token.strip_prefix("--").unwrap_or(&token[1..]);
            let (name, inline) = match body.split_once('=') {
                Some((name, value)) => (name, Some(value)),
                None => (body, None),
            };

            let takes_value = match self.lookup(name) {
                Some(flag) => flag.takes_value(),
                None => {
                    return Err(Error::UnknownFlag {
                        name: name.to_string(),
                    })
                }
            };

            let text = if takes_value {
                match inline {
                    Some(value) => value,
                    None => {
                        i += 1;
                        args.get(i)
                            .ok_or_else(|| Error::MissingValue {
                                flag: name.to_string(),
                            })?
                            .as_str()
                    }
                }
            } else {
                inline.unwrap_or("true")
            };

            if let Some(flag) = self.lookup_mut(name) {
                flag.set_explicit(text)?;
            }
            i += 1;
        }
        Ok(())
    }
}
