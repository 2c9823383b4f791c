use super::*;

use lex::{scan, LexErrorKind, Position};
use pretty_assertions::assert_eq;

fn parse_source(source: &str) -> Result<(), SyntaxError> {
    let tokens = scan(source).unwrap();
    parse(&tokens)
}

fn productions(source: &str) -> Vec<String> {
    let tokens = scan(source).unwrap();
    let mut trace: Vec<String> = Vec::new();
    parse_with_trace(&tokens, &mut trace).unwrap();
    trace
}

fn unexpected(found: &str, expected: &str) -> SyntaxErrorKind {
    SyntaxErrorKind::UnexpectedToken {
        found: found.to_string(),
        expected: expected.to_string(),
    }
}

#[test]
fn variable_definition() {
    assert_eq!(parse_source("var x : integer;"), Ok(()));
    assert_eq!(parse_source("var x : integer"), Ok(()));
}

#[test]
fn variable_definition_trace() {
    assert_eq!(productions("var x : integer;"), vec![
        "definitions -> definition definitions2",
        "definition -> variable_definition",
        "variable_definition -> var identifier : type",
        "type -> integer",
        "definitions2 -> ; definitions3",
        "definitions3 -> ε",
    ]);
}

#[test]
fn array_type_trace() {
    assert_eq!(productions("typ T : arr[5] arr[2] logical; var x : T"), vec![
        "definitions -> definition definitions2",
        "definition -> type_definition",
        "type_definition -> typ identifier : type",
        "type -> arr [ int_const ] type",
        "type -> arr [ int_const ] type",
        "type -> logical",
        "definitions2 -> ; definitions3",
        "definitions3 -> definitions",
        "definitions -> definition definitions2",
        "definition -> variable_definition",
        "variable_definition -> var identifier : type",
        "type -> identifier",
        "definitions2 -> ε",
    ]);
}

#[test]
fn named_array_type() {
    assert_eq!(parse_source("typ T : arr[5] integer; var x : T;"), Ok(()));
}

#[test]
fn function_definitions() {
    let sources = [
        "fun id(x : integer) : integer = x",
        "fun add(a : integer, b : integer) : integer = a + b",
        "fun name(s : string, t : T) : string = 'it''s'",
        "fun first(a : arr[3] integer) : integer = a[0]",
        "fun not(b : logical) : logical = !b",
        "fun neg(x : integer) : integer = - - + x",
    ];

    for source in sources {
        assert_eq!(parse_source(source), Ok(()), "{}", source);
    }
}

#[test]
fn missing_parameter_identifier() {
    let err = parse_source("fun f(: integer) = 1").unwrap_err();
    assert_eq!(err.position, Position::new(1, 7, 1, 8));
    assert_eq!(err.kind, unexpected("`:`", "identifier"));
}

#[test]
fn parameters_are_required() {
    let err = parse_source("fun f() : integer = 1").unwrap_err();
    assert_eq!(err.position, Position::new(1, 7, 1, 8));
    assert_eq!(err.kind, unexpected("`)`", "identifier"));
}

#[test]
fn chained_comparison_is_rejected() {
    let err = parse_source("fun f(x : integer) : logical = 1 < 2 < 3").unwrap_err();
    assert_eq!(err.position, Position::new(1, 38, 1, 39));
    assert_eq!(err.kind, SyntaxErrorKind::TrailingInput { found: "`<`".to_string() });
}

#[test]
fn chained_comparison_in_standalone_expression() {
    let tokens = scan("1 < 2 < 3").unwrap();
    let err = parse_expression(&tokens).unwrap_err();
    assert_eq!(err.position, Position::new(1, 7, 1, 8));
    assert!(matches!(err.kind, SyntaxErrorKind::TrailingInput { .. }));

    let tokens = scan("1 < 2").unwrap();
    assert_eq!(parse_expression(&tokens), Ok(()));
}

#[test]
fn precedence_levels() {
    let expressions = [
        "a | b & c",
        "a & b | !c",
        "a == b & c != d",
        "1 + 2 * 3 <= 4 % 5 - 6 / 7",
        "x >= 1 | x > 2 | x < 3",
        "-a[1][2 + 3] * +b",
        "(1 + 2) * 3",
        "(1, 2, 3)",
        "f(1, g(2), h(x)[3])",
        "'s' == t",
        "true | false",
    ];

    for source in expressions {
        let tokens = scan(source).unwrap();
        assert_eq!(parse_expression(&tokens), Ok(()), "{}", source);
    }
}

#[test]
fn braced_expressions() {
    let expressions = [
        "{ while i < 10 : { i = i + 1 } }",
        "{ for i = 1, 10, 1 : { s = s + a[i] } }",
        "{ if x then y }",
        "{ if x > 0 then 1 else -1 }",
        "{ x }",
        "{ a[1] = 2 }",
        "{ f(x) where fun f(y : integer) : integer = y * 2; var z : string }",
        "{ x where var x : integer; }",
        "{ { x } }",
    ];

    for source in expressions {
        let tokens = scan(source).unwrap();
        assert_eq!(parse_expression(&tokens), Ok(()), "{}", source);
    }
}

#[test]
fn nested_where_blocks() {
    let source = "
        # computes the sum of the first n numbers
        fun sum(n : integer) : integer = {
            ({ for i = 1, n, 1 : { s = s + i } }, s)
            where var s : integer; var i : integer
        };
        var total : integer
    ";
    assert_eq!(parse_source(source), Ok(()));
}

#[test]
fn broken_braced_expressions() {
    let cases = [
        ("{ while x }", Position::new(1, 11, 1, 12), unexpected("`}`", "`:`")),
        ("{ for 1 = 2, 3, 4 : 5 }", Position::new(1, 7, 1, 8), unexpected("`1`", "identifier")),
        ("{ if x y }", Position::new(1, 8, 1, 9), unexpected("`y`", "`then`")),
        ("{ if x then y else z", Position::new(1, 21, 1, 21), unexpected("end of input", "`}`")),
        ("{ if x then y z }", Position::new(1, 15, 1, 16), unexpected("`z`", "`else` or `}`")),
        ("{ x = 1 = 2 }", Position::new(1, 9, 1, 10), unexpected("`=`", "`}`")),
        ("{ x y }", Position::new(1, 5, 1, 6), unexpected("`y`", "`=`, `where` or `}`")),
        ("{ x where }", Position::new(1, 11, 1, 12), unexpected("`}`", "a definition (`typ`, `var` or `fun`)")),
    ];

    for (source, position, kind) in cases {
        let tokens = scan(source).unwrap();
        let err = parse_expression(&tokens).unwrap_err();
        assert_eq!((err.position, err.kind), (position, kind), "{}", source);
    }
}

#[test]
fn calls_need_arguments() {
    let tokens = scan("f()").unwrap();
    let err = parse_expression(&tokens).unwrap_err();
    assert_eq!(err.kind, unexpected("`)`", "an expression"));
}

#[test]
fn empty_program() {
    let err = parse_source("").unwrap_err();
    assert_eq!(err.position, Position::new(1, 1, 1, 1));
    assert_eq!(err.kind, unexpected("end of input", "a definition (`typ`, `var` or `fun`)"));
}

#[test]
fn semicolons() {
    assert_eq!(parse_source("var a : integer; var b : string;"), Ok(()));

    let err = parse_source("var a : integer;;").unwrap_err();
    assert_eq!(err.kind, SyntaxErrorKind::TrailingInput { found: "`;`".to_string() });

    let err = parse_source("; var a : integer").unwrap_err();
    assert_eq!(err.position, Position::new(1, 1, 1, 2));
}

#[test]
fn missing_separator() {
    let err = parse_source("var a : integer var b : integer").unwrap_err();
    assert_eq!(err.position, Position::new(1, 17, 1, 20));
    assert_eq!(err.kind, SyntaxErrorKind::TrailingInput { found: "`var`".to_string() });
}

#[test]
fn bad_types() {
    let cases = [
        ("var x : 5", unexpected("`5`", "a type")),
        ("var x : arr[n] integer", unexpected("`n`", "integer constant")),
        ("var x : arr 5 integer", unexpected("`5`", "`[`")),
        ("typ t = integer", unexpected("`=`", "`:`")),
    ];

    for (source, kind) in cases {
        assert_eq!(parse_source(source).unwrap_err().kind, kind, "{}", source);
    }
}

#[test]
fn string_constant_in_diagnostic() {
    let err = parse_source("var x : 'abc'").unwrap_err();
    assert_eq!(err.kind, unexpected("string constant 'abc'", "a type"));
}

#[test]
fn rejects_token_sequence_without_eof() {
    let mut tokens = scan("var x : integer").unwrap();
    tokens.pop();

    let err = parse(&tokens).unwrap_err();
    assert_eq!(err.kind, SyntaxErrorKind::MissingEndOfInput);
}

#[test]
fn trace_is_independent_of_result() {
    let tokens = scan("var x : integer; var").unwrap();
    let mut trace: Vec<String> = Vec::new();

    let err = parse_with_trace(&tokens, &mut trace).unwrap_err();
    assert_eq!(err.position, Position::new(1, 21, 1, 21));
    assert_eq!(trace.first().map(String::as_str), Some("definitions -> definition definitions2"));
    assert_eq!(trace.last().map(String::as_str), Some("variable_definition -> var identifier : type"));
}

#[test]
fn trace_writer_output() {
    let tokens = scan("var x : string").unwrap();
    let mut writer = TraceWriter::new(Vec::new());
    parse_with_trace(&tokens, &mut writer).unwrap();

    let output = String::from_utf8(writer.finish().unwrap()).unwrap();
    assert_eq!(output, concat!(
        "definitions -> definition definitions2\n",
        "definition -> variable_definition\n",
        "variable_definition -> var identifier : type\n",
        "type -> string\n",
        "definitions2 -> ε\n",
    ));
}

#[test]
fn check_reports_both_phases() {
    assert_eq!(check("var x : integer", None), Ok(()));

    let err = check("var x : integer; var y ? integer", None).unwrap_err();
    assert!(matches!(err, Error::Lexical(ref err) if err.kind == LexErrorKind::UnexpectedCharacter('?')));
    assert_eq!(err.position(), Position::new(1, 24, 1, 25));

    let err = check("var x integer", None).unwrap_err();
    assert!(matches!(err, Error::Syntax(_)));
    assert_eq!(err.position(), Position::new(1, 7, 1, 14));
    assert_eq!(err.message(), "unexpected `integer`, expected `:`");
}

#[test]
fn check_with_trace() {
    let mut trace: Vec<String> = Vec::new();
    check("typ t : integer", Some(&mut trace as &mut dyn Trace)).unwrap();
    assert_eq!(trace.len(), 5);
}

#[test]
fn error_display() {
    let err = check("var x integer", None).unwrap_err();
    assert_eq!(err.to_string(), "syntax error: unexpected `integer`, expected `:` (at 1:7-1:14)");
}

#[test]
fn many_definitions() {
    let source = "var x : integer;\n".repeat(50_000);
    assert_eq!(parse_source(&source), Ok(()));

    let source = format!("{}fun", "typ t : arr[1] integer; ".repeat(50_000));
    let err = parse_source(&source).unwrap_err();
    assert_eq!(err.kind, unexpected("end of input", "identifier"));
}

#[test]
fn long_operator_chains() {
    let terms = vec!["1"; 50_000];
    let source = format!("fun f(x : integer) : integer = {}", terms.join(" + "));
    assert_eq!(parse_source(&source), Ok(()));

    for separator in [" * ", " - ", " & ", " | ", ", "] {
        let source = format!("f({})", terms.join(separator));
        let tokens = scan(&source).unwrap();
        assert_eq!(parse_expression(&tokens), Ok(()), "{:?}", separator);
    }
}

#[test]
fn long_prefix_and_type_chains() {
    let source = format!("{}x", "- ! + ".repeat(20_000));
    let tokens = scan(&source).unwrap();
    assert_eq!(parse_expression(&tokens), Ok(()));

    let source = format!("var x : {}integer", "arr[2] ".repeat(20_000));
    assert_eq!(parse_source(&source), Ok(()));

    let parameters = (0..20_000).map(|i| format!("p{} : integer", i)).collect::<Vec<_>>();
    let source = format!("fun f({}) : integer = 1", parameters.join(", "));
    assert_eq!(parse_source(&source), Ok(()));
}

#[test]
fn repeated_rules_trace_as_right_recursion() {
    let mut expected = vec![
        "definitions -> definition definitions2",
        "definition -> function_definition",
        "function_definition -> fun identifier ( parameters ) : type = expression",
        "parameters -> parameter parameters2",
        "parameter -> identifier : type",
        "type -> integer",
        "parameters2 -> , parameters",
        "parameters -> parameter parameters2",
        "parameter -> identifier : type",
        "type -> logical",
        "parameters2 -> ε",
        "type -> integer",
        "expression -> logical_or_expression",
    ];
    let operand = [
        "logical_or_expression -> logical_and_expression logical_or_expression2",
        "logical_and_expression -> compare_expression logical_and_expression2",
        "compare_expression -> additive_expression compare_expression2",
        "additive_expression -> multiplicative_expression additive_expression2",
        "multiplicative_expression -> prefix_expression multiplicative_expression2",
        "prefix_expression -> postfix_expression",
        "postfix_expression -> atom_expression postfix_expression2",
        "atom_expression -> identifier atom_expression2",
        "atom_expression2 -> ε",
        "postfix_expression2 -> ε",
        "multiplicative_expression2 -> ε",
        "additive_expression2 -> ε",
        "compare_expression2 -> ε",
        "logical_and_expression2 -> ε",
    ];
    expected.extend(operand);
    expected.push("logical_or_expression2 -> | logical_or_expression");
    expected.extend(operand);
    expected.push("logical_or_expression2 -> ε");
    expected.push("definitions2 -> ε");

    assert_eq!(productions("fun f(a : integer, b : logical) : integer = a | b"), expected);
}
