#[cfg(test)]
mod ast_printer_tests {
    use std::io;

    use pretty_assertions::assert_eq;

    use rox::ast_printer::{read_expr, AstPrinter};
    use rox::lox::Lox;
    use rox::value::Value;

    const SETUP: &str = r#"
        var a = 2;
        var s = "str";
        var calls = 0;
        fun sq(x) { calls = calls + 1; return x * x; }
        fun add(x, y) { return x + y; }
        class P { init() { this.v = 3; } twice() { return this.v * 2; } }
        var p = P();
    "#;

    fn session() -> Lox {
        let mut lox = Lox::with_output(io::sink());

        if let Err(e) = lox.run(SETUP) {
            panic!("setup failed: {}", e);
        }

        lox
    }

    fn print(source: &str) -> String {
        let mut lox = Lox::with_output(io::sink());

        match lox.parse_expression(source) {
            Ok(expr) => AstPrinter::print(&expr),
            Err(e) => panic!("parse failed: {}", e),
        }
    }

    /// Evaluate `source` directly and through print → read in two
    /// independent sessions; both must agree.
    fn assert_round_trip(source: &str) {
        let mut direct = session();
        let expected: Value = match direct.evaluate(source) {
            Ok(value) => value,
            Err(e) => panic!("direct evaluation of {:?} failed: {}", source, e),
        };

        let printed: String = print(source);

        let mut reread = session();
        let expr = match reread.read_expression(&printed) {
            Ok(expr) => expr,
            Err(e) => panic!("reading {:?} failed: {}", printed, e),
        };

        assert_eq!(AstPrinter::print(&expr), printed, "printing is stable");

        let actual: Value = match reread.interpreter_mut().evaluate(&expr) {
            Ok(value) => value,
            Err(e) => panic!("re-read evaluation of {:?} failed: {}", printed, e),
        };

        assert_eq!(actual, expected, "round trip of {:?} via {:?}", source, printed);
    }

    #[test]
    fn test_prints_prefix_form() {
        assert_eq!(print("1 + 2 * 3"), "(+ 1.0 (* 2.0 3.0))");
        assert_eq!(print("-(1.5)"), "(- (group 1.5))");
        assert_eq!(print("!nil == true"), "(== (! nil) true)");
        assert_eq!(print("a and b or c"), "(or (and a b) c)");
        assert_eq!(print("a ? 1 : 2"), "(?: a 1.0 2.0)");
        assert_eq!(print("(1, 2, 3)"), "(group (, 1.0 2.0 3.0))");
        assert_eq!(print("x = \"s\""), "(= x \"s\")");
        assert_eq!(print("p.v = 4"), "(= (. p v) 4.0)");
        assert_eq!(print("f(1, g())"), "(call f 1.0 (call g))");
        assert_eq!(print("this.m"), "(. this m)");
        assert_eq!(print("super.m"), "(super m)");
    }

    #[test]
    fn test_round_trip_arithmetic_and_logic() {
        for source in [
            "1 + 2 * 3",
            "(1 + 2) * 3",
            "10 / 4 - -a",
            "!(a > 1) == false",
            "nil or \"x\"",
            "a >= 2 and a <= 2",
            "a != 3 ? \"yes\" : \"no\"",
            "false ? 1 : nil ? 2 : 3",
            "s + a",
            "(1, 2, a)",
        ] {
            assert_round_trip(source);
        }
    }

    #[test]
    fn test_round_trip_calls_properties_and_assignment() {
        for source in [
            "sq(a) + add(1, 2)",
            "add(sq(2), add(3, 4))",
            "p.v",
            "p.twice()",
            "p.v = 10",
            "a = a + 1",
            "calls = sq(3), calls",
        ] {
            assert_round_trip(source);
        }
    }

    #[test]
    fn test_reader_distinguishes_negation_from_subtraction() {
        let negation = read_expr("(- 3.0)").expect("reads");
        let subtraction = read_expr("(- 3.0 1.0)").expect("reads");

        assert_eq!(AstPrinter::print(&negation), "(- 3.0)");
        assert_eq!(AstPrinter::print(&subtraction), "(- 3.0 1.0)");
    }

    #[test]
    fn test_reader_rejects_malformed_forms() {
        let cases: &[(&str, &str)] = &[
            ("(+ 1.0", "[line 1] Error at end: Unexpected end of form"),
            ("(+ 1.0 2.0 3.0)", "[line 1] Error at '3.0': Expected ')' after form"),
            ("(frob 1.0)", "[line 1] Error at 'frob': Unknown form"),
            ("(= 1.0 2.0)", "[line 1] Error at '=': Invalid assignment target"),
            ("1.0 2.0", "[line 1] Error at '2.0': Expected end of expression"),
        ];

        for (source, expected) in cases {
            match read_expr(source) {
                Ok(expr) => panic!("{:?} should not read, got {:?}", source, expr),
                Err(e) => assert_eq!(e.to_string(), *expected, "source: {}", source),
            }
        }
    }
}
