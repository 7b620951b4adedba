//! Layered command-line flag resolution for CLI applications.
//!
//! `flagstack` binds command-line tokens, environment variables, and
//! fallback files to typed program options. Each flag resolves through a
//! fixed precedence (explicit command-line text, then environment
//! variables, then a fallback file, then the static default), and bundled
//! short options (`-it` for `-i -t`) are recovered through an iterative
//! reparse rather than a lookahead grammar.
//!
//! # Quick Start
//!
//! ```
//! use flagstack::{Context, Flag, Parser};
//!
//! let set = Parser::new()
//!     .flag(Flag::bool("interactive").alias("i"))
//!     .flag(Flag::bool("tty").alias("t"))
//!     .flag(Flag::int("jobs").env("FLAGSTACK_JOBS").default_int(1))
//!     .short_options(true)
//!     .parse(["-it", "build"])?;
//!
//! let ctx = Context::new(set);
//! assert!(ctx.bool("interactive") && ctx.bool("tty"));
//! assert_eq!(ctx.args(), ["build"]);
//! # Ok::<(), flagstack::Error>(())
//! ```
//!
//! # Resolution order
//!
//! ```text
//! command line    → explicit text always wins
//! environment     → first declared variable that is set and non-empty
//! fallback file   → trimmed file contents
//! default         → (nothing else supplied a value)
//! ```
//!
//! Which layer won is recorded per flag and queryable via
//! [`FlagSet::source_of`] / [`Context::source_of`].
//!
//! # Testing
//!
//! All resolution runs through the [`EnvReader`] and [`FileReader`]
//! abstractions. Inject [`MockEnv`] / [`MockFs`] to exercise precedence
//! without touching real process state:
//!
//! ```
//! use flagstack::{Flag, MockEnv, MockFs, Parser};
//!
//! let env = MockEnv::new().with_var("APP_JOBS", "8");
//! let set = Parser::with_readers(env, MockFs::new())
//!     .flag(Flag::int("jobs").env("APP_JOBS"))
//!     .parse(Vec::<String>::new())?;
//! assert!(set.is_set("jobs"));
//! # Ok::<(), flagstack::Error>(())
//! ```

mod context;
pub mod env;
mod error;
mod flag;
mod parse;
mod resolver;
mod set;
mod slice;

pub use context::Context;
pub use error::Error;
pub use flag::{Flag, FlagKind, FlagValue};
pub use parse::Parser;
pub use resolver::ValueSource;
pub use set::FlagSet;
pub use slice::UintSlice;

// Re-export reader abstractions and mocks at crate root for convenience
pub use env::{EnvReader, FileReader, MockEnv, MockFs, RealEnv, RealFs};
