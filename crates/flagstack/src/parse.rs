//! Iterative parsing with combined short-option splitting.
//!
//! Bundled short options (`-it` for `-i -t`) cannot be told apart from
//! plain unknown flags up front. The parser instead attempts a standard
//! scan and, when it fails on an unknown name that corresponds to a
//! splittable single-dash token, rewrites the token list and retries
//! against a freshly built flag set, so partial state from a failed
//! attempt never leaks into the result.

use tracing::debug;

use crate::env::{EnvReader, FileReader, RealEnv, RealFs};
use crate::error::Error;
use crate::flag::Flag;
use crate::set::FlagSet;

/// Drives flag definitions across raw argument tokens.
///
/// A parser owns its flag definitions and two mode switches: combined
/// short-option handling and shell-completion error suppression. Each call
/// to [`parse`](Self::parse) builds a fresh [`FlagSet`] per attempt, so a
/// parser can be reused and concurrent parses never share state.
///
/// # Example
///
/// ```
/// use flagstack::{Flag, Parser};
///
/// let set = Parser::new()
///     .flag(Flag::bool("interactive").alias("i"))
///     .flag(Flag::bool("tty").alias("t"))
///     .short_options(true)
///     .parse(["-it"])?;
///
/// assert!(set.is_set("interactive") && set.is_set("tty"));
/// # Ok::<(), flagstack::Error>(())
/// ```
pub struct Parser<E: EnvReader = RealEnv, F: FileReader = RealFs> {
    flags: Vec<Flag>,
    short_options: bool,
    shell_complete: bool,
    env: E,
    fs: F,
}

impl Parser<RealEnv, RealFs> {
    /// Create a parser reading the real process environment and filesystem.
    pub fn new() -> Self {
        Self::with_readers(RealEnv, RealFs)
    }
}

impl Default for Parser<RealEnv, RealFs> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: EnvReader, F: FileReader> Parser<E, F> {
    /// Create a parser with custom environment and file readers, primarily
    /// for testing.
    pub fn with_readers(env: E, fs: F) -> Self {
        Self {
            flags: Vec::new(),
            short_options: false,
            shell_complete: false,
            env,
            fs,
        }
    }

    /// Add a flag definition.
    pub fn flag(mut self, flag: Flag) -> Self {
        self.flags.push(flag);
        self
    }

    /// Enable combined short-option handling, so `-it` parses as `-i -t`
    /// when both characters name registered flags.
    pub fn short_options(mut self, enabled: bool) -> Self {
        self.short_options = enabled;
        self
    }

    /// Suppress parse failures and keep best-effort partial state, for
    /// shell completion over possibly half-typed input. Configuration
    /// errors (duplicate registration, unparseable sourced values) still
    /// surface.
    pub fn shell_complete(mut self, enabled: bool) -> Self {
        self.shell_complete = enabled;
        self
    }

    /// Parse argument tokens, without the program name.
    ///
    /// On success the returned set holds every resolved flag plus trailing
    /// positional arguments. Required flags left unset by every source are
    /// reported after the scan completes.
    pub fn parse<I, S>(&self, args: I) -> Result<FlagSet, Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut args: Vec<String> = args.into_iter().map(Into::into).collect();

        loop {
            let mut set = self.build_set()?;
            match set.parse(&args) {
                Ok(()) => {
                    if !self.shell_complete {
                        check_required(&set)?;
                    }
                    return Ok(set);
                }
                Err(_) if self.shell_complete => return Ok(set),
                Err(Error::UnknownFlag { name }) if self.short_options => {
                    match rewrite_with_split(&set, &args, &name) {
                        Some(rewritten) => {
                            debug!(token = %name, "split bundled short options, retrying");
                            args = rewritten;
                        }
                        // Not explained by bundling; the failure was real.
                        None => return Err(Error::UnknownFlag { name }),
                    }
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Build a fresh set from the definitions, resolving each flag from
    /// environment variables and fallback files.
    fn build_set(&self) -> Result<FlagSet, Error> {
        let mut set = FlagSet::new();
        for flag in &self.flags {
            let mut flag = flag.clone();
            flag.apply(&self.env, &self.fs)?;
            set.register(flag)?;
        }
        Ok(set)
    }
}

fn check_required(set: &FlagSet) -> Result<(), Error> {
    let names: Vec<String> = set
        .flags()
        .filter(|flag| flag.is_required() && !flag.is_set())
        .map(|flag| flag.name().to_string())
        .collect();
    if names.is_empty() {
        Ok(())
    } else {
        Err(Error::RequiredMissing { names })
    }
}

/// Replace the token the unknown name came from with one token per bundled
/// character. `None` means the failure was not caused by bundling: no
/// matching single-dash token exists, or the token is not splittable.
fn rewrite_with_split(set: &FlagSet, args: &[String], name: &str) -> Option<Vec<String>> {
    let position = args
        .iter()
        .position(|token| token.strip_prefix('-') == Some(name))?;
    let pieces = split_short_options(set, &args[position])?;

    let mut rewritten = Vec::with_capacity(args.len() + pieces.len());
    rewritten.extend(args[..position].iter().cloned());
    rewritten.extend(pieces);
    rewritten.extend(args[position + 1..].iter().cloned());
    Some(rewritten)
}

/// Decompose `-it` into `["-i", "-t"]`.
///
/// Only single-dash tokens longer than two characters qualify, and only
/// when every character names a registered flag; anything else would risk
/// silently misreading option-like values, so the token is left alone.
fn split_short_options(set: &FlagSet, token: &str) -> Option<Vec<String>> {
    let body = token.strip_prefix('-')?;
    if body.starts_with('-') || body.chars().count() <= 1 {
        return None;
    }
    if !body.chars().all(|c| set.contains(c.encode_utf8(&mut [0; 4]))) {
        return None;
    }
    Some(body.chars().map(|c| format!("-{c}")).collect())
}
