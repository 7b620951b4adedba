//! Integration tests for flagstack.
//!
//! End-to-end coverage of layered resolution, short-option splitting, and
//! context chains. Mock readers keep results independent of the process
//! environment; the few tests against the real environment are serialized.

use std::time::Duration;

use flagstack::{Context, Error, Flag, FlagValue, MockEnv, MockFs, Parser, UintSlice, ValueSource};
use serial_test::serial;

fn no_args() -> Vec<String> {
    Vec::new()
}

// ============================================================================
// Layered precedence
// ============================================================================

#[test]
fn command_line_beats_env_and_file() {
    let env = MockEnv::new().with_var("APP_JOBS", "8");
    let fs = MockFs::new().with_file("/etc/app/jobs", "16");

    let set = Parser::with_readers(env, fs)
        .flag(
            Flag::int("jobs")
                .env("APP_JOBS")
                .file_path("/etc/app/jobs")
                .default_int(1),
        )
        .parse(["--jobs", "2"])
        .unwrap();

    assert_eq!(set.lookup("jobs").unwrap().value(), &FlagValue::Int(2));
    assert_eq!(set.source_of("jobs"), Some(ValueSource::CommandLine));
}

#[test]
fn env_beats_file() {
    let env = MockEnv::new().with_var("APP_JOBS", "8");
    let fs = MockFs::new().with_file("/etc/app/jobs", "16");

    let set = Parser::with_readers(env, fs)
        .flag(Flag::int("jobs").env("APP_JOBS").file_path("/etc/app/jobs"))
        .parse(no_args())
        .unwrap();

    assert_eq!(set.lookup("jobs").unwrap().value(), &FlagValue::Int(8));
    assert_eq!(set.source_of("jobs"), Some(ValueSource::Env));
}

#[test]
fn file_supplies_value_when_env_is_silent() {
    let fs = MockFs::new().with_file("/etc/app/jobs", "16\n");

    let set = Parser::with_readers(MockEnv::new(), fs)
        .flag(Flag::int("jobs").env("APP_JOBS").file_path("/etc/app/jobs"))
        .parse(no_args())
        .unwrap();

    assert_eq!(set.lookup("jobs").unwrap().value(), &FlagValue::Int(16));
    assert_eq!(set.source_of("jobs"), Some(ValueSource::File));
}

#[test]
fn default_survives_when_no_source_speaks() {
    let set = Parser::with_readers(MockEnv::new(), MockFs::new())
        .flag(Flag::int("jobs").env("APP_JOBS").default_int(1))
        .parse(no_args())
        .unwrap();

    assert!(!set.is_set("jobs"));
    assert_eq!(set.lookup("jobs").unwrap().value(), &FlagValue::Int(1));
    assert_eq!(set.source_of("jobs"), Some(ValueSource::Default));
}

#[test]
fn env_vars_are_consulted_in_declaration_order() {
    let env = MockEnv::new()
        .with_var("APP_REGION", "")
        .with_var("REGION", "eu-west-1")
        .with_var("DEFAULT_REGION", "us-east-1");

    let set = Parser::with_readers(env, MockFs::new())
        .flag(
            Flag::string("region")
                .env("APP_REGION")
                .env("REGION")
                .env("DEFAULT_REGION"),
        )
        .parse(no_args())
        .unwrap();

    assert_eq!(
        set.lookup("region").unwrap().value(),
        &FlagValue::Str("eu-west-1".to_string())
    );
}

#[test]
fn invalid_env_text_reports_flag_and_raw_value() {
    let env = MockEnv::new().with_var("APP_TIMEOUT", "soon");

    let err = Parser::with_readers(env, MockFs::new())
        .flag(Flag::duration("timeout").env("APP_TIMEOUT"))
        .parse(no_args())
        .unwrap_err();

    match err {
        Error::Conversion { flag, raw, .. } => {
            assert_eq!(flag, "timeout");
            assert_eq!(raw, "soon");
        }
        other => panic!("unexpected error: {other}"),
    }
}

// ============================================================================
// Short-option splitting: the "docker run -it" pattern
// ============================================================================

#[test]
fn bundled_aliases_set_both_long_flags() {
    let set = Parser::with_readers(MockEnv::new(), MockFs::new())
        .flag(Flag::bool("interactive").alias("i"))
        .flag(Flag::bool("tty").alias("t"))
        .short_options(true)
        .parse(["-it", "ubuntu", "bash"])
        .unwrap();

    assert!(set.is_set("interactive"));
    assert!(set.is_set("tty"));
    assert_eq!(set.args(), ["ubuntu", "bash"]);
}

#[test]
fn partial_bundle_is_refused_outright() {
    let err = Parser::with_readers(MockEnv::new(), MockFs::new())
        .flag(Flag::bool("interactive").alias("i"))
        .short_options(true)
        .parse(["-it"])
        .unwrap_err();

    // "t" is unknown, so nothing is split and the original error surfaces.
    match err {
        Error::UnknownFlag { name } => assert_eq!(name, "it"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn tokens_after_the_bundle_keep_their_positions() {
    let set = Parser::with_readers(MockEnv::new(), MockFs::new())
        .flag(Flag::bool("i"))
        .flag(Flag::bool("t"))
        .flag(Flag::int("jobs"))
        .short_options(true)
        .parse(["--jobs", "4", "-it", "build"])
        .unwrap();

    assert_eq!(set.lookup("jobs").unwrap().value(), &FlagValue::Int(4));
    assert!(set.is_set("i") && set.is_set("t"));
    assert_eq!(set.args(), ["build"]);
}

// ============================================================================
// Slice transport: append vs overwrite
// ============================================================================

#[test]
fn repeated_cli_occurrences_accumulate() {
    let set = Parser::with_readers(MockEnv::new(), MockFs::new())
        .flag(Flag::uint_slice("port"))
        .parse(["--port", "80", "--port", "443"])
        .unwrap();

    match set.lookup("port").unwrap().value() {
        FlagValue::UintSlice(slice) => assert_eq!(slice.values(), [80, 443]),
        other => panic!("unexpected value: {other:?}"),
    }
}

#[test]
fn env_comma_list_replaces_defaults() {
    let env = MockEnv::new().with_var("APP_PORTS", "80, 443");

    let set = Parser::with_readers(env, MockFs::new())
        .flag(Flag::uint_slice("port").env("APP_PORTS").default_uints([9000]))
        .parse(no_args())
        .unwrap();

    match set.lookup("port").unwrap().value() {
        FlagValue::UintSlice(slice) => assert_eq!(slice.values(), [80, 443]),
        other => panic!("unexpected value: {other:?}"),
    }
}

#[test]
fn serialized_payload_through_env_overwrites() {
    let payload = UintSlice::from_values([1, 2, 3]).serialize();
    let env = MockEnv::new().with_var("APP_PORTS", payload);

    let set = Parser::with_readers(env, MockFs::new())
        .flag(Flag::uint_slice("port").env("APP_PORTS").default_uints([9000]))
        .parse(no_args())
        .unwrap();

    match set.lookup("port").unwrap().value() {
        FlagValue::UintSlice(slice) => assert_eq!(slice.values(), [1, 2, 3]),
        other => panic!("unexpected value: {other:?}"),
    }
}

#[test]
fn cli_occurrence_discards_env_contents_then_accumulates() {
    let env = MockEnv::new().with_var("APP_PORTS", "1,2,3");

    let set = Parser::with_readers(env, MockFs::new())
        .flag(Flag::uint_slice("port").env("APP_PORTS"))
        .parse(["--port", "80", "--port", "443"])
        .unwrap();

    match set.lookup("port").unwrap().value() {
        FlagValue::UintSlice(slice) => assert_eq!(slice.values(), [80, 443]),
        other => panic!("unexpected value: {other:?}"),
    }
}

// ============================================================================
// Context chains
// ============================================================================

#[test]
fn child_context_resolves_parent_only_names() {
    let parent_set = Parser::with_readers(MockEnv::new(), MockFs::new())
        .flag(Flag::bool("verbose"))
        .flag(Flag::duration("timeout").default_duration(Duration::from_secs(30)))
        .parse(["--verbose"])
        .unwrap();
    let child_set = Parser::with_readers(MockEnv::new(), MockFs::new())
        .flag(Flag::int("jobs"))
        .parse(["--jobs", "4"])
        .unwrap();

    let parent = Context::new(parent_set);
    let child = Context::with_parent(child_set, &parent);

    assert!(child.bool("verbose"));
    assert_eq!(child.duration("timeout"), Duration::from_secs(30));
    assert_eq!(child.int("jobs"), 4);
    assert_eq!(child.int("absent"), 0);
    assert_eq!(child.get("absent"), None);
}

// ============================================================================
// Required flags
// ============================================================================

#[test]
fn required_flag_satisfied_by_file() {
    let fs = MockFs::new().with_file("/etc/app/token", "secret\n");

    let set = Parser::with_readers(MockEnv::new(), fs)
        .flag(Flag::string("token").file_path("/etc/app/token").required())
        .parse(no_args())
        .unwrap();

    assert_eq!(
        set.lookup("token").unwrap().value(),
        &FlagValue::Str("secret".to_string())
    );
}

#[test]
fn required_flags_reported_in_registration_order() {
    let err = Parser::with_readers(MockEnv::new(), MockFs::new())
        .flag(Flag::string("token").required())
        .flag(Flag::bool("verbose"))
        .flag(Flag::string("region").required())
        .parse(no_args())
        .unwrap_err();

    match err {
        Error::RequiredMissing { names } => assert_eq!(names, ["token", "region"]),
        other => panic!("unexpected error: {other}"),
    }
}

// ============================================================================
// Real environment and real files
// ============================================================================

#[test]
#[serial]
fn real_process_environment_resolves() {
    std::env::set_var("FLAGSTACK_TEST_JOBS", "8");

    let set = Parser::new()
        .flag(Flag::int("jobs").env("FLAGSTACK_TEST_JOBS"))
        .parse(no_args())
        .unwrap();

    std::env::remove_var("FLAGSTACK_TEST_JOBS");

    assert_eq!(set.lookup("jobs").unwrap().value(), &FlagValue::Int(8));
    assert_eq!(set.source_of("jobs"), Some(ValueSource::Env));
}

#[test]
#[serial]
fn unset_real_variable_leaves_the_default() {
    std::env::remove_var("FLAGSTACK_TEST_JOBS");

    let set = Parser::new()
        .flag(Flag::int("jobs").env("FLAGSTACK_TEST_JOBS").default_int(1))
        .parse(no_args())
        .unwrap();

    assert_eq!(set.lookup("jobs").unwrap().value(), &FlagValue::Int(1));
}

#[test]
fn real_fallback_file_resolves() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("timeout");
    std::fs::write(&path, "2m\n").unwrap();

    let set = Parser::new()
        .flag(Flag::duration("timeout").file_path(&path))
        .parse(no_args())
        .unwrap();

    assert_eq!(
        set.lookup("timeout").unwrap().value(),
        &FlagValue::Duration(Duration::from_secs(120))
    );
    assert_eq!(set.source_of("timeout"), Some(ValueSource::File));
}

// ============================================================================
// Properties
// ============================================================================

mod properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn serialized_slices_round_trip(values in proptest::collection::vec(any::<u64>(), 0..8)) {
            let mut fresh = UintSlice::new();
            fresh.set(&UintSlice::from_values(values.clone()).serialize()).unwrap();
            prop_assert_eq!(fresh.values(), values.as_slice());
        }

        #[test]
        fn double_dash_tokens_never_split(body in "[a-e]{3,6}") {
            let mut parser = Parser::with_readers(MockEnv::new(), MockFs::new()).short_options(true);
            for name in ["a", "b", "c", "d", "e"] {
                parser = parser.flag(Flag::bool(name));
            }

            let result = parser.parse([format!("--{body}")]);
            let is_unknown_flag = matches!(result, Err(Error::UnknownFlag { .. }));
            prop_assert!(is_unknown_flag);
        }

        #[test]
        fn fully_registered_bundles_always_split(body in "[a-e]{3,6}") {
            let mut parser = Parser::with_readers(MockEnv::new(), MockFs::new()).short_options(true);
            for name in ["a", "b", "c", "d", "e"] {
                parser = parser.flag(Flag::bool(name));
            }

            let set = parser.parse([format!("-{body}")]).unwrap();
            for c in body.chars() {
                prop_assert!(set.is_set(&c.to_string()));
            }
        }
    }
}
