use argbind_core::{
    Arguments, CommandLine, CommandLineError, ExitReason, ParseOutcome, Parsed, RegistryBuilder,
    Syntax, UsageMode, Violation,
};

/// One member of every supported kind under every policy that suits it.
#[derive(Debug, Default, PartialEq)]
struct Everything {
    verbose: bool,
    color: Option<String>,
    name: String,
    level: char,
    count: i32,
    size: i64,
    ports: Vec<i32>,
    offsets: Vec<i64>,
    labels: Vec<String>,
}

impl Arguments for Everything {
    fn declare(builder: &mut RegistryBuilder<Self>) {
        builder
            .flag('v', "verbose", "print progress", |e: &mut Self| &mut e.verbose)
            .flag_with_optional_value('c', "color", "colorize output", |e: &mut Self| {
                &mut e.color
            })
            .required_value('n', "name", "job name", |e: &mut Self| &mut e.name)
            .optional_value('l', "level", "grade letter", |e: &mut Self| &mut e.level)
            .optional_value('k', "count", "repeat count", |e: &mut Self| &mut e.count)
            .optional_value('s', "size", "size in bytes", |e: &mut Self| &mut e.size)
            .optional_value('p', "ports", "ports to open", |e: &mut Self| &mut e.ports)
            .optional_value('o', "offsets", "seek offsets", |e: &mut Self| &mut e.offsets)
            .optional_value('t', "labels", "labels to attach", |e: &mut Self| &mut e.labels)
            .prolog("Runs a job.")
            .epilog("Exit status is 2 on usage errors.")
            .positional("input");
    }
}

/// Target for the colon-only grammar.
#[derive(Debug, Default, PartialEq)]
struct Colon {
    required: String,
    optional: Vec<String>,
    flag: bool,
}

impl Arguments for Colon {
    fn declare(builder: &mut RegistryBuilder<Self>) {
        builder
            .required_value('r', "required", "this is required", |c: &mut Self| {
                &mut c.required
            })
            .optional_value('o', "optional", "this is optional", |c: &mut Self| {
                &mut c.optional
            })
            .flag('f', "flag", "this is a flag", |c: &mut Self| &mut c.flag);
    }
}

fn command_line() -> CommandLine {
    CommandLine::new().with_program_name("job")
}

fn parse<T: Arguments>(args: &[&str]) -> Result<Parsed<T>, CommandLineError> {
    command_line()
        .parse::<T, _, _>(args.iter().copied(), UsageMode::Throwing)
        .map(|outcome| match outcome {
            ParseOutcome::Bound(parsed) => parsed,
            ParseOutcome::Exit(_) => panic!("throwing mode never exits"),
        })
}

fn parse_with_syntax<T: Arguments>(
    syntax: Syntax,
    args: &[&str],
) -> Result<Parsed<T>, CommandLineError> {
    command_line()
        .with_syntax(syntax)
        .parse::<T, _, _>(args.iter().copied(), UsageMode::Throwing)
        .map(|outcome| outcome.bound().expect("throwing mode never exits"))
}

fn violations(err: &CommandLineError) -> Vec<(&str, Violation)> {
    err.invalid()
        .iter()
        .map(|entry| (entry.spec.long_name.as_str(), entry.violation))
        .collect()
}

// ---------------------------------------------------------------------------
// Required values
// ---------------------------------------------------------------------------

#[test]
fn required_value_missing_names_the_argument() {
    let err = parse::<Everything>(&["-v"]).unwrap_err();
    assert_eq!(violations(&err), vec![("name", Violation::Missing)]);
}

#[test]
fn required_value_long_and_short_forms() {
    for args in [
        &["--name=build"][..],
        &["--name:build"][..],
        &["--NAME", "build"][..],
        &["-n", "build"][..],
        &["-n:build"][..],
        &["-N=build"][..],
    ] {
        let parsed = parse::<Everything>(args).unwrap();
        assert_eq!(parsed.value.name, "build", "args: {args:?}");
    }
}

#[test]
fn required_value_empty_value_is_a_value() {
    let parsed = parse::<Everything>(&["--name="]).unwrap();
    assert_eq!(parsed.value.name, "");
}

#[test]
fn required_value_without_value_is_invalid() {
    let err = parse::<Everything>(&["--name"]).unwrap_err();
    assert_eq!(violations(&err), vec![("name", Violation::MissingValue)]);
}

#[test]
fn value_keeps_later_separators() {
    let parsed = parse::<Everything>(&["--name=a=b:c"]).unwrap();
    assert_eq!(parsed.value.name, "a=b:c");
}

// ---------------------------------------------------------------------------
// Flags
// ---------------------------------------------------------------------------

#[test]
fn flag_binds_true_and_rejects_values() {
    let parsed = parse::<Everything>(&["-n:x", "--verbose"]).unwrap();
    assert!(parsed.value.verbose);

    let parsed = parse::<Everything>(&["-n:x"]).unwrap();
    assert!(!parsed.value.verbose);

    for value_form in ["--verbose=true", "--verbose:", "-v:x"] {
        let err = parse::<Everything>(&["-n:x", value_form]).unwrap_err();
        assert_eq!(violations(&err), vec![("verbose", Violation::UnexpectedValue)]);
    }
}

#[test]
fn repeated_flag_is_not_merged() {
    let err = parse::<Everything>(&["-n:x", "-v", "-v"]).unwrap_err();
    assert_eq!(violations(&err), vec![("verbose", Violation::Repeated)]);
}

#[test]
fn flag_with_optional_value_accepts_both_forms() {
    let parsed = parse::<Everything>(&["-n:x", "--color=always"]).unwrap();
    assert_eq!(parsed.value.color.as_deref(), Some("always"));

    // A bare flag-with-optional-value never takes the next token.
    let parsed = parse::<Everything>(&["-n:x", "-c", "always"]).unwrap();
    assert_eq!(parsed.value.color.as_deref(), Some(""));
    assert_eq!(parsed.extra_arguments, vec!["always"]);
}

#[test]
fn flag_with_optional_value_presence_is_observable() {
    let present = parse::<Everything>(&["-n:x", "--color"]).unwrap();
    let absent = parse::<Everything>(&["-n:x"]).unwrap();

    assert_eq!(present.value.color, Some(String::new()));
    assert_eq!(absent.value.color, None);
    assert_ne!(present.value, absent.value);
}

#[test]
fn optional_members_of_every_kind() {
    #[derive(Debug, Default)]
    struct Maybe {
        quiet: Option<bool>,
        grade: Option<char>,
        depth: Option<i32>,
        limit: Option<i64>,
        ids: Option<Vec<i64>>,
    }

    impl Arguments for Maybe {
        fn declare(builder: &mut RegistryBuilder<Self>) {
            builder
                .flag('q', "quiet", "", |m: &mut Self| &mut m.quiet)
                .flag_with_optional_value('g', "grade", "", |m: &mut Self| &mut m.grade)
                .optional_value('d', "depth", "", |m: &mut Self| &mut m.depth)
                .optional_value('l', "limit", "", |m: &mut Self| &mut m.limit)
                .optional_value('i', "ids", "", |m: &mut Self| &mut m.ids);
        }
    }

    let parsed = parse::<Maybe>(&["-q", "-g", "--depth=0", "--ids=4,5"]).unwrap();
    assert_eq!(parsed.value.quiet, Some(true));
    assert_eq!(parsed.value.grade, Some('\0'));
    assert_eq!(parsed.value.depth, Some(0));
    assert_eq!(parsed.value.limit, None);
    assert_eq!(parsed.value.ids, Some(vec![4, 5]));

    let parsed = parse::<Maybe>(&[]).unwrap();
    assert_eq!(parsed.value.quiet, None);
    assert_eq!(parsed.value.grade, None);
    assert_eq!(parsed.value.depth, None);
}

// ---------------------------------------------------------------------------
// Optional values and type coercion
// ---------------------------------------------------------------------------

#[test]
fn optional_values_default_when_omitted() {
    let parsed = parse::<Everything>(&["-n:x"]).unwrap();
    let expected = Everything {
        name: "x".to_string(),
        ..Everything::default()
    };
    assert_eq!(parsed.value, expected);
}

#[test]
fn optional_value_present_without_value_is_invalid() {
    let err = parse::<Everything>(&["-n:x", "--count"]).unwrap_err();
    assert_eq!(violations(&err), vec![("count", Violation::MissingValue)]);
}

#[test]
fn scalars_are_coerced() {
    let parsed = parse::<Everything>(&[
        "-n:x",
        "--level=B",
        "--count=-12",
        "--size",
        "9000000000",
    ])
    .unwrap();
    assert_eq!(parsed.value.level, 'B');
    assert_eq!(parsed.value.count, -12);
    assert_eq!(parsed.value.size, 9_000_000_000);
}

#[test]
fn arrays_split_on_commas() {
    let parsed = parse::<Everything>(&[
        "-n:x",
        "--ports=80,443",
        "-o:-1,2",
        "--labels=a,,c",
    ])
    .unwrap();
    assert_eq!(parsed.value.ports, vec![80, 443]);
    assert_eq!(parsed.value.offsets, vec![-1, 2]);
    assert_eq!(parsed.value.labels, vec!["a", "", "c"]);
}

#[test]
fn empty_string_array_value_is_one_empty_element() {
    let parsed = parse::<Everything>(&["-n:x", "--labels="]).unwrap();
    assert_eq!(parsed.value.labels, vec![String::new()]);
}

#[test]
fn empty_numeric_array_value_fails_binding() {
    let err = parse::<Everything>(&["-n:x", "--ports="]).unwrap_err();
    let CommandLineError::Binding(binding) = err else {
        panic!("expected binding error");
    };
    assert_eq!(binding.member, "ports");
    assert_eq!(binding.raw, "");
}

#[test]
fn coercion_failures_name_member_kind_and_text() {
    let cases = [
        ("--level=AB", "level", "char", "AB"),
        ("--count=ten", "count", "i32", "ten"),
        ("--count=2147483648", "count", "i32", "2147483648"),
        ("--size=1.5", "size", "i64", "1.5"),
        ("--ports=80,x", "ports", "i32[]", "80,x"),
    ];
    for (arg, member, kind, raw) in cases {
        let err = parse::<Everything>(&["-n:x", arg]).unwrap_err();
        let CommandLineError::Binding(binding) = err else {
            panic!("expected binding error for {arg}");
        };
        assert_eq!(binding.member, member);
        assert_eq!(binding.kind.name(), kind);
        assert_eq!(binding.raw, raw);
    }
}

// ---------------------------------------------------------------------------
// Extras and the terminator
// ---------------------------------------------------------------------------

#[test]
fn extras_are_captured_in_order_without_bound_tokens() {
    let parsed = parse::<Everything>(&[
        "first", "-x", "-n", "job", "--unknown=1", "second", "-v", "--other",
    ])
    .unwrap();
    assert_eq!(parsed.value.name, "job");
    assert!(parsed.value.verbose);
    assert_eq!(parsed.extra_arguments, vec!["first", "second"]);
    assert_eq!(parsed.extra_options, vec!["-x", "--unknown=1", "--other"]);
}

#[test]
fn terminator_sends_everything_after_it_to_extra_arguments() {
    let parsed = parse::<Everything>(&["-n:x", "one", "--", "-v", "--name=y", "two"]).unwrap();
    assert!(!parsed.value.verbose);
    assert_eq!(parsed.value.name, "x");
    assert_eq!(parsed.extra_arguments, vec!["one", "-v", "--name=y", "two"]);
    assert!(parsed.extra_options.is_empty());
}

#[test]
fn combined_short_options_are_a_parsing_error() {
    let err = parse::<Everything>(&["-n:x", "-vc"]).unwrap_err();
    assert!(matches!(err, CommandLineError::Parsing(_)));
}

// ---------------------------------------------------------------------------
// Aggregation and help
// ---------------------------------------------------------------------------

#[test]
fn validation_reports_every_offender() {
    let err = parse::<Everything>(&["--verbose=1", "--count", "--color", "--color"]).unwrap_err();
    assert_eq!(
        violations(&err),
        vec![
            ("verbose", Violation::UnexpectedValue),
            ("color", Violation::Repeated),
            ("name", Violation::Missing),
            ("count", Violation::MissingValue),
        ]
    );
}

#[test]
fn help_wins_over_every_failure() {
    for args in [
        &["--help"][..],
        &["-h", "--count"][..],
        &["--ports=x", "--help"][..],
        &["-n:x", "--", "--help"][..],
    ] {
        let err = parse::<Everything>(args).unwrap_err();
        assert!(
            matches!(err, CommandLineError::HelpRequested { .. }),
            "args: {args:?}"
        );
    }
}

#[test]
fn help_usage_text_is_complete() {
    let err = parse::<Everything>(&["-h"]).unwrap_err();
    let expected = "Runs a job.

usage:  job [-v] [-c[:value]] -n value [-l value] [-k value] [-s value] [-p value] [-o value] [-t value] input

-v,--verbose    print progress
-c,--color      colorize output
-n,--name       job name
-l,--level      grade letter
-k,--count      repeat count
-s,--size       size in bytes
-p,--ports      ports to open
-o,--offsets    seek offsets
-t,--labels     labels to attach

Exit status is 2 on usage errors.
";
    assert_eq!(err.usage(), Some(expected));
}

#[test]
fn automating_mode_exits_with_status_two_on_failure() {
    let outcome = command_line()
        .parse::<Everything, _, _>(["--count=ten"], UsageMode::Automating)
        .unwrap();
    let ParseOutcome::Exit(exit) = outcome else {
        panic!("expected usage exit");
    };
    assert_eq!(exit.status(), 2);
    assert!(exit.usage.contains("usage:  job "));
    // Validation runs before binding, so the missing --name is what is reported.
    let ExitReason::Failed(err) = exit.reason else {
        panic!("expected failure reason");
    };
    assert_eq!(violations(&err), vec![("name", Violation::Missing)]);
}

// ---------------------------------------------------------------------------
// Grammar selection
// ---------------------------------------------------------------------------

#[test]
fn inline_syntax_requires_attached_values() {
    let parsed = parse_with_syntax::<Colon>(Syntax::inline(), &["--required:hello", "-o:a,b"]).unwrap();
    assert_eq!(parsed.value.required, "hello");
    assert_eq!(parsed.value.optional, vec!["a", "b"]);

    let err = parse_with_syntax::<Colon>(Syntax::inline(), &["-r", "hello"]).unwrap_err();
    assert_eq!(violations(&err), vec![("required", Violation::MissingValue)]);
}

#[test]
fn inline_syntax_usage_shows_colon_forms() {
    let usage = command_line()
        .with_syntax(Syntax::inline())
        .usage::<Colon>(&["one", "two", "three"])
        .unwrap();
    assert!(usage.starts_with("usage:  job -r:value [-o:value] [-f] one two three\n\n"));
}

#[test]
fn next_token_syntax_takes_following_value() {
    let parsed =
        parse_with_syntax::<Colon>(Syntax::next_token(), &["--required", "x", "-o=a"]).unwrap();
    assert_eq!(parsed.value.required, "x");
    assert_eq!(parsed.value.optional, vec!["a"]);
}

#[test]
fn slash_prefix_when_enabled() {
    let parsed = parse_with_syntax::<Colon>(
        Syntax::mixed().with_slash_prefix(),
        &["/r:x", "//flag", "/tmp/file"],
    );
    // "/tmp/file" is option-shaped under the slash prefix and bundles short options.
    assert!(matches!(parsed, Err(CommandLineError::Parsing(_))));

    let parsed =
        parse_with_syntax::<Colon>(Syntax::mixed().with_slash_prefix(), &["/r:x", "//flag"])
            .unwrap();
    assert_eq!(parsed.value.required, "x");
    assert!(parsed.value.flag);
}
