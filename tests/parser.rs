#[cfg(test)]
mod parser_tests {
    use pretty_assertions::assert_eq;

    use rox::ast_printer::AstPrinter;
    use rox::error::{ErrorKind, LoxError};
    use rox::expr::Expr;
    use rox::parser::Parser;
    use rox::scanner::Scanner;
    use rox::stmt::Stmt;

    fn parse_expr(source: &str) -> Result<Expr, Vec<LoxError>> {
        let (tokens, errors) = Scanner::new(source).scan_tokens();
        assert!(errors.is_empty(), "scan errors: {:?}", errors);

        Parser::new(&tokens).parse_expression()
    }

    fn printed(source: &str) -> String {
        match parse_expr(source) {
            Ok(expr) => AstPrinter::print(&expr),
            Err(errors) => panic!("parse failed: {:?}", errors),
        }
    }

    fn parse_program(source: &str) -> Result<Vec<Stmt>, Vec<LoxError>> {
        let (tokens, errors) = Scanner::new(source).scan_tokens();
        assert!(errors.is_empty(), "scan errors: {:?}", errors);

        Parser::new(&tokens).parse()
    }

    fn error_lines(source: &str) -> Vec<String> {
        match parse_program(source) {
            Ok(_) => panic!("expected a syntax error in {:?}", source),
            Err(errors) => errors.iter().map(ToString::to_string).collect(),
        }
    }

    #[test]
    fn test_precedence() {
        assert_eq!(printed("1 + 2 * 3"), "(+ 1.0 (* 2.0 3.0))");
        assert_eq!(printed("(1 + 2) * 3"), "(* (group (+ 1.0 2.0)) 3.0)");
        assert_eq!(printed("-a - -b"), "(- (- a) (- b))");
        assert_eq!(printed("!true == false"), "(== (! true) false)");
        assert_eq!(printed("1 < 2 == 3 >= 4"), "(== (< 1.0 2.0) (>= 3.0 4.0))");
    }

    #[test]
    fn test_left_associativity() {
        assert_eq!(printed("1 - 2 - 3"), "(- (- 1.0 2.0) 3.0)");
        assert_eq!(printed("8 / 4 / 2"), "(/ (/ 8.0 4.0) 2.0)");
    }

    #[test]
    fn test_logical_binds_looser_than_equality() {
        assert_eq!(
            printed("a == 1 or b and c"),
            "(or (== a 1.0) (and b c))"
        );
    }

    #[test]
    fn test_ternary_is_right_associative() {
        assert_eq!(printed("a ? b : c ? d : e"), "(?: a b (?: c d e))");
        assert_eq!(printed("a or b ? 1 : 2"), "(?: (or a b) 1.0 2.0)");
    }

    #[test]
    fn test_comma_is_loosest_but_separates_arguments() {
        assert_eq!(printed("a = 1, b = 2"), "(, (= a 1.0) (= b 2.0))");
        assert_eq!(printed("f(1, 2)(3)"), "(call (call f 1.0 2.0) 3.0)");
        assert_eq!(printed("f((1, 2))"), "(call f (group (, 1.0 2.0)))");
    }

    #[test]
    fn test_assignment_targets() {
        assert_eq!(printed("a = b = 3"), "(= a (= b 3.0))");
        assert_eq!(printed("a.b.c = 1"), "(= (. (. a b) c) 1.0)");
        assert_eq!(printed("this.x"), "(. this x)");
        assert_eq!(printed("super.m()"), "(call (super m))");
        assert_eq!(printed("\"hi\" + 1"), "(+ \"hi\" 1.0)");
    }

    #[test]
    fn test_invalid_assignment_target_is_reported() {
        let errors = parse_expr("1 + 2 = 3").expect_err("should fail");

        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].to_string(),
            "[line 1] Error at '=': Invalid assignment target"
        );
    }

    #[test]
    fn test_expression_must_consume_all_input() {
        let errors = parse_expr("1 2").expect_err("should fail");

        assert_eq!(
            errors[0].to_string(),
            "[line 1] Error at '2': Expected end of expression"
        );
    }

    #[test]
    fn test_missing_operand_at_end() {
        let errors = parse_expr("1 +").expect_err("should fail");

        assert_eq!(
            errors[0].to_string(),
            "[line 1] Error at end: Expected expression"
        );
        assert_eq!(errors[0].kind(), ErrorKind::Syntactic);
    }

    #[test]
    fn test_multiple_syntax_errors_are_reported_with_lines() {
        let lines = error_lines("var a = 1\nvar b = 2;\nprint a\nprint b;");

        assert_eq!(
            lines,
            vec![
                "[line 2] Error at 'var': Expected ';' after variable declaration",
                "[line 4] Error at 'print': Expected ';' after value",
            ]
        );
    }

    #[test]
    fn test_recovery_inside_block_keeps_going() {
        let lines = error_lines("{ var = 1; print 2; }\nfun (a) {}");

        assert_eq!(
            lines,
            vec![
                "[line 1] Error at '=': Expected variable name",
                "[line 2] Error at '(': Expected function name",
            ]
        );
    }

    #[test]
    fn test_for_is_desugared_into_while() {
        let statements = parse_program("for (var i = 0; i < 3; i = i + 1) print i;")
            .expect("program parses");

        assert_eq!(statements.len(), 1);

        let Stmt::Block(outer) = &statements[0] else {
            panic!("expected outer block, got {:?}", statements[0]);
        };

        assert!(matches!(outer[0], Stmt::Var { .. }));

        let Stmt::While { body, .. } = &outer[1] else {
            panic!("expected while, got {:?}", outer[1]);
        };

        let Stmt::Block(inner) = body.as_ref() else {
            panic!("expected body block, got {:?}", body);
        };

        assert!(matches!(inner[0], Stmt::Print(_)));
        assert!(matches!(inner[1], Stmt::Expression(Expr::Assign { .. })));
    }

    #[test]
    fn test_for_without_clauses_loops_on_true() {
        let statements = parse_program("for (;;) print 1;").expect("program parses");

        assert!(matches!(
            &statements[0],
            Stmt::While {
                condition: Expr::Literal(rox::expr::LiteralValue::True),
                ..
            }
        ));
    }

    #[test]
    fn test_class_declaration_shape() {
        let statements = parse_program("class B < A { init(x) { this.x = x; } get() { return this.x; } }")
            .expect("program parses");

        let Stmt::Class {
            name,
            superclass,
            methods,
        } = &statements[0]
        else {
            panic!("expected class, got {:?}", statements[0]);
        };

        assert_eq!(name.lexeme, "B");
        assert!(matches!(superclass, Some(Expr::Variable { name, .. }) if name.lexeme == "A"));

        let names: Vec<&str> = methods.iter().map(|m| m.name.lexeme.as_str()).collect();
        assert_eq!(names, vec!["init", "get"]);
        assert_eq!(methods[0].params.len(), 1);
    }

    #[test]
    fn test_too_many_arguments_is_not_fatal() {
        let args: Vec<String> = (0..256).map(|i| i.to_string()).collect();
        let source = format!("f({});", args.join(", "));

        let lines = error_lines(&source);

        assert_eq!(lines.len(), 1);
        assert!(lines[0].ends_with("Cannot have more than 255 arguments"));
    }

    #[test]
    fn test_node_ids_are_unique_and_continue() {
        let (tokens, _) = Scanner::new("a; a; a = 1;").scan_tokens();
        let mut parser = Parser::with_first_id(&tokens, 10);
        let statements = parser.parse().expect("program parses");

        let ids: Vec<usize> = statements
            .iter()
            .filter_map(|stmt| match stmt {
                Stmt::Expression(Expr::Variable { id, .. })
                | Stmt::Expression(Expr::Assign { id, .. }) => Some(id.0),
                _ => None,
            })
            .collect();

        assert_eq!(ids, vec![10, 11, 12]);
        assert_eq!(parser.next_expr_id(), 13);
    }
}
