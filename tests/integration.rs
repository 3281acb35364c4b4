use shpipe::parse::ErrorKind;
use shpipe::{Pipeline, Redirection, RedirectionKind, parse};

fn pipeline_for(line: &str) -> Pipeline {
    match parse(line) {
        Ok(pipeline) => pipeline,
        Err(e) => panic!("line {line:?} should parse: {e}"),
    }
}

fn programs(line: &str) -> Vec<String> {
    pipeline_for(line)
        .iter()
        .map(|p| p.command().program().to_string())
        .collect()
}

/// A single-process line: program and arguments in order.
macro_rules! command_test {
    ($name:ident, $line:expr, $program:expr, [$($arg:expr),*]) => {
        #[test]
        fn $name() {
            let pipeline = pipeline_for($line);
            assert_eq!(pipeline.len(), 1, "line: {}", $line);
            let command = pipeline.processes()[0].command();
            assert_eq!(command.program(), $program, "line: {}", $line);
            let expected: Vec<&str> = vec![$($arg),*];
            assert_eq!(command.args(), expected.as_slice(), "line: {}", $line);
        }
    };
}

/// Program names of every process, in pipeline order.
macro_rules! pipeline_test {
    ($name:ident, $line:expr, [$($program:expr),+]) => {
        #[test]
        fn $name() {
            let expected: Vec<String> = vec![$($program.to_string()),+];
            assert_eq!(programs($line), expected, "line: {}", $line);
        }
    };
}

/// The line is rejected, never partially parsed.
macro_rules! error_test {
    ($name:ident, $line:expr, $kind:ident, $offset:expr) => {
        #[test]
        fn $name() {
            match parse($line) {
                Ok(p) => panic!("line {:?} should not parse, got {p:?}", $line),
                Err(e) => {
                    assert_eq!(e.kind, ErrorKind::$kind, "line: {:?}: {e}", $line);
                    assert_eq!(e.offset, $offset, "line: {:?}: {e}", $line);
                }
            }
        }
    };
}

// ── Commands ──

command_test!(bare_program, "ls", "ls", []);
command_test!(program_with_args, "ls -la /tmp", "ls", ["-la", "/tmp"]);
command_test!(leading_and_trailing_blanks, "  \tls  -la \t", "ls", ["-la"]);
command_test!(duplicate_args_kept, "echo a a b a", "echo", ["a", "a", "b", "a"]);
command_test!(path_program, "tata/toto x", "tata/toto", ["x"]);
command_test!(quoted_arg, r#"echo "hello world""#, "echo", [r#""hello world""#]);
command_test!(
    concatenated_quoted_arg,
    r#"echo foo"bar baz"qux"#,
    "echo",
    [r#"foo"bar baz"qux"#]
);
command_test!(quoted_operators_stay_in_arg, r#"echo "a | b > c""#, "echo", [r#""a | b > c""#]);
command_test!(pipe_inside_argument_is_literal, "echo b|c", "echo", ["b|c"]);
command_test!(escaped_operator_in_program, r"my\>prog arg", r"my\>prog", ["arg"]);
command_test!(unicode_args, "grep café ünïcode", "grep", ["café", "ünïcode"]);

// ── Pipelines ──

pipeline_test!(two_stages, "cat f | wc -l", ["cat", "wc"]);
pipeline_test!(three_stages, "a | b | c", ["a", "b", "c"]);
pipeline_test!(tight_pipes, "a|b|c", ["a", "b", "c"]);
pipeline_test!(
    pipes_after_redirections,
    "a > x| b < y |c",
    ["a", "b", "c"]
);

// ── Errors ──

error_test!(empty_input, "", Syntax, 0);
error_test!(blank_input, "   ", Syntax, 3);
error_test!(lone_pipe, "|", Syntax, 0);
error_test!(leading_pipe, "| a", Syntax, 0);
error_test!(trailing_pipe, "a |", Syntax, 3);
error_test!(empty_stage, "a | | b", Syntax, 4);
error_test!(redirection_without_command, "> x", Syntax, 0);
error_test!(input_without_command, "< x", Syntax, 0);
error_test!(dangling_redirection, "a >", Syntax, 3);
error_test!(dangling_here, "a <<", Syntax, 4);
error_test!(redirection_target_is_operator, "a > > x", Syntax, 4);
error_test!(unterminated_quote, r#"echo "abc"#, Lex, 5);
error_test!(argument_after_redirection, "a > x y", Syntax, 6);
error_test!(quoted_here_keyword, "cat << \"EOF\"", Syntax, 7);
error_test!(word_after_here_keyword, "cat << EOF trailing", Syntax, 11);
error_test!(redirect_operator_cannot_start_program, "2>x", Syntax, 0);

#[test]
fn trailing_input_reports_whole_word() {
    for (line, found) in [
        ("a > x y", "`y`"),
        ("cat << EOF trailing", "`trailing`"),
        ("sort < in extra words", "`extra`"),
        ("cat << \"EOF\"", "`\"EOF\"`"),
    ] {
        let err = parse(line).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Syntax, "line: {line:?}");
        assert_eq!(err.found, found, "line: {line:?}");
    }
}

#[test]
fn errors_report_found_and_expected() {
    let err = parse("a | | b").unwrap_err();
    assert_eq!(err.found, "`|`");
    assert_eq!(err.expected, "a program name");
    assert_eq!(
        err.to_string(),
        "syntax error at offset 4: expected a program name, found `|`"
    );
}

// ── Redirections ──

#[test]
fn first_redirection_of_a_kind_wins() {
    let pipeline = pipeline_for("a > x > y");
    let redirs = pipeline.processes()[0].redirections();
    assert_eq!(redirs.len(), 1);
    assert_eq!(redirs.output(), Some(&Redirection::output("x", false)));
}

#[test]
fn first_wins_ignores_flags() {
    let pipeline = pipeline_for("a >> x > y 2> e 2>> f < i << EOF");
    let redirs = pipeline.processes()[0].redirections();
    assert_eq!(redirs.output(), Some(&Redirection::output("x", true)));
    assert_eq!(redirs.error(), Some(&Redirection::error("e", false)));
    assert_eq!(redirs.input(), Some(&Redirection::input("i", false)));
}

#[test]
fn kinds_are_independent() {
    let pipeline = pipeline_for("a > out < in 2> err");
    let redirs = pipeline.processes()[0].redirections();
    assert_eq!(redirs.len(), 3);
    assert_eq!(redirs.get(RedirectionKind::Output).map(|r| r.filespec()), Some("out"));
    assert_eq!(redirs.get(RedirectionKind::Input).map(|r| r.filespec()), Some("in"));
    assert_eq!(redirs.get(RedirectionKind::Error).map(|r| r.filespec()), Some("err"));
}

#[test]
fn append_and_here_flags() {
    let pipeline = pipeline_for("a >> o << EOF | b > o < i | c 2>> e | d 2> e");
    let procs = pipeline.processes();
    let out = |i: usize| procs[i].redirections().output().unwrap().clone();
    let inp = |i: usize| procs[i].redirections().input().unwrap().clone();
    let err = |i: usize| procs[i].redirections().error().unwrap().clone();
    assert!(out(0).is_append());
    assert!(inp(0).is_here());
    assert!(!out(1).is_append());
    assert!(!inp(1).is_here());
    assert!(err(2).is_append());
    assert!(!err(3).is_append());
}

#[test]
fn exactly_one_classification_per_redirection() {
    let pipeline = pipeline_for("a > o 2> e < i | b >> o 2>> e << K");
    for process in &pipeline {
        for r in process.redirections() {
            let flags = [r.is_output(), r.is_input(), r.is_error()];
            assert_eq!(flags.iter().filter(|f| **f).count(), 1, "{r}");
        }
    }
}

#[test]
fn tight_redirections() {
    let pipeline = pipeline_for("sort<in>out 2>>err");
    let process = &pipeline.processes()[0];
    assert!(process.command().args().is_empty());
    let redirs = process.redirections();
    assert_eq!(redirs.input().map(|r| r.filespec()), Some("in"));
    assert_eq!(redirs.output().map(|r| r.filespec()), Some("out"));
    assert_eq!(redirs.error().map(|r| r.filespec()), Some("err"));
}

#[test]
fn processes_without_redirections_have_empty_sets() {
    let pipeline = pipeline_for("a | b");
    assert!(pipeline.iter().all(|p| p.redirections().is_empty()));
}

// ── End to end ──

#[test]
fn full_example() {
    let pipeline = pipeline_for(
        "foo toto > bar 2>> baz | fizz >> fuzzz << EOF | goo > gooo < gaa 2> ga | dummy",
    );
    assert_eq!(pipeline.len(), 4);
    let procs = pipeline.processes();

    assert_eq!(procs[0].command().program(), "foo");
    assert_eq!(procs[0].command().args(), ["toto"]);
    let r = procs[0].redirections();
    assert_eq!(r.len(), 2);
    assert_eq!(r.output(), Some(&Redirection::output("bar", false)));
    assert_eq!(r.error(), Some(&Redirection::error("baz", true)));

    assert_eq!(procs[1].command().program(), "fizz");
    assert!(procs[1].command().args().is_empty());
    let r = procs[1].redirections();
    assert_eq!(r.len(), 2);
    assert_eq!(r.output(), Some(&Redirection::output("fuzzz", true)));
    assert_eq!(r.input(), Some(&Redirection::input("EOF", true)));

    assert_eq!(procs[2].command().program(), "goo");
    let r = procs[2].redirections();
    assert_eq!(r.len(), 3);
    assert_eq!(r.output(), Some(&Redirection::output("gooo", false)));
    assert_eq!(r.input(), Some(&Redirection::input("gaa", false)));
    assert_eq!(r.error(), Some(&Redirection::error("ga", false)));

    assert_eq!(procs[3].command().program(), "dummy");
    assert!(procs[3].command().args().is_empty());
    assert!(procs[3].redirections().is_empty());
}

#[test]
fn mixed_example() {
    let pipeline = pipeline_for(
        "toto titi tata/toto >> abc/def < toto > tutu << discard| titi > abcdef 2>> errappend| truc 2> err | bidule << EOF",
    );
    assert_eq!(pipeline.len(), 4);
    let first = &pipeline.processes()[0];
    assert_eq!(first.command().args(), ["titi", "tata/toto"]);
    // `> tutu` and `<< discard` repeat kinds already set
    assert_eq!(
        first.redirections().output(),
        Some(&Redirection::output("abc/def", true))
    );
    assert_eq!(
        first.redirections().input(),
        Some(&Redirection::input("toto", false))
    );
    assert_eq!(first.redirections().len(), 2);
}

#[test]
fn display_matches_text_view() {
    let pipeline = pipeline_for("foo toto > bar 2>> baz");
    assert_eq!(
        pipeline.processes()[0].to_string(),
        "Proc(cmd=foo [toto], redirs=[Output(bar), Error(baz,append=true)])"
    );
}

#[test]
fn pipe_glued_to_quoted_argument_stays_in_argument() {
    let pipeline = pipeline_for(r#"echo "a  b"c|tr a-z A-Z>out"#);
    assert_eq!(pipeline.len(), 1);
    let process = &pipeline.processes()[0];
    assert_eq!(process.command().args(), [r#""a  b"c|tr"#, "a-z", "A-Z"]);
    assert_eq!(process.redirections().output().map(|r| r.filespec()), Some("out"));
}

#[test]
fn escaped_operators_in_redirection_targets() {
    let pipeline = pipeline_for(r"a > x\|y < in\>put");
    let redirs = pipeline.processes()[0].redirections();
    assert_eq!(redirs.output().map(|r| r.filespec()), Some(r"x\|y"));
    assert_eq!(redirs.input().map(|r| r.filespec()), Some(r"in\>put"));
}

#[test]
fn rendered_line_reparses_equal() {
    for line in [
        "foo toto > bar 2>> baz | fizz >> fuzzz << EOF | goo > gooo < gaa 2> ga | dummy",
        r#"echo "a  b" c | tr a-z A-Z>out"#,
        r"a > x\|y",
        "x",
    ] {
        let pipeline = pipeline_for(line);
        assert_eq!(pipeline_for(&pipeline.to_line()), pipeline, "line: {line}");
    }
}

#[test]
fn parse_is_deterministic() {
    let line = "a b > c | d << E";
    assert_eq!(parse(line), parse(line));
}
