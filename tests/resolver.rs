#[cfg(test)]
mod resolver_tests {
    use pretty_assertions::assert_eq;

    use rox::error::{ErrorKind, LoxError};
    use rox::expr::{Expr, ExprId};
    use rox::parser::Parser;
    use rox::resolver::{Locals, Resolver};
    use rox::scanner::Scanner;
    use rox::stmt::Stmt;

    fn parse(source: &str) -> Vec<Stmt> {
        let (tokens, errors) = Scanner::new(source).scan_tokens();
        assert!(errors.is_empty(), "scan errors: {:?}", errors);

        match Parser::new(&tokens).parse() {
            Ok(statements) => statements,
            Err(errors) => panic!("parse errors: {:?}", errors),
        }
    }

    fn resolve(source: &str) -> Result<Locals, Vec<LoxError>> {
        let statements = parse(source);
        Resolver::new().resolve(&statements)
    }

    fn errors(source: &str) -> Vec<String> {
        match resolve(source) {
            Ok(_) => panic!("expected a resolve error in {:?}", source),
            Err(errors) => {
                assert!(errors.iter().all(|e| e.kind() == ErrorKind::StaticScoping));
                errors.iter().map(ToString::to_string).collect()
            }
        }
    }

    /// Id of every `Variable` expression statement, in source order.
    fn variable_ids(statements: &[Stmt]) -> Vec<ExprId> {
        let mut ids = Vec::new();

        for stmt in statements {
            match stmt {
                Stmt::Expression(Expr::Variable { id, .. }) => ids.push(*id),
                Stmt::Block(inner) => ids.extend(variable_ids(inner)),
                Stmt::Function(function) => ids.extend(variable_ids(&function.body)),
                _ => {}
            }
        }

        ids
    }

    #[test]
    fn test_globals_are_not_recorded() {
        let locals = resolve("var a = 1; a; print a;").expect("resolves");

        assert!(locals.is_empty());
    }

    #[test]
    fn test_distances_count_enclosing_scopes() {
        let source = "{ var a = 1; { var b = 2; { a; b; } } }";
        let statements = parse(source);
        let locals = Resolver::new().resolve(&statements).expect("resolves");

        let ids = variable_ids(&statements);
        assert_eq!(ids.len(), 2);

        assert_eq!(locals.get(&ids[0]), Some(&2)); // a
        assert_eq!(locals.get(&ids[1]), Some(&1)); // b
    }

    #[test]
    fn test_closure_sees_enclosing_function_scope() {
        let source = "fun outer() { var x = 1; fun inner() { x; } }";
        let statements = parse(source);
        let locals = Resolver::new().resolve(&statements).expect("resolves");

        let ids = variable_ids(&statements);
        assert_eq!(ids.len(), 1);

        // inner's body scope → outer's body scope
        assert_eq!(locals.get(&ids[0]), Some(&1));
    }

    #[test]
    fn test_later_shadowing_does_not_change_binding() {
        // `a` inside `show` must stay bound to the global even after a
        // local `a` is declared in the same block.
        let source = "var a = 1; { fun show() { a; } var a = 2; }";
        let statements = parse(source);
        let locals = Resolver::new().resolve(&statements).expect("resolves");

        let ids = variable_ids(&statements);
        assert_eq!(ids.len(), 1);
        assert_eq!(locals.get(&ids[0]), None);
    }

    #[test]
    fn test_read_in_own_initializer() {
        assert_eq!(
            errors("var a = 1; { var a = a + 1; print a; }"),
            vec!["[line 1] Error at 'a': Cannot read local variable in its own initializer"]
        );
    }

    #[test]
    fn test_global_self_reference_is_allowed() {
        assert!(resolve("var a = 1; var a = a + 1;").is_ok());
    }

    #[test]
    fn test_redeclaration_in_local_scope() {
        assert_eq!(
            errors("{ var a = 1;\nvar a = 2; }"),
            vec!["[line 2] Error at 'a': Variable already declared in this scope"]
        );
    }

    #[test]
    fn test_duplicate_parameters() {
        assert_eq!(
            errors("fun f(a, a) {}"),
            vec!["[line 1] Error at 'a': Variable already declared in this scope"]
        );
    }

    #[test]
    fn test_invalid_returns() {
        assert_eq!(
            errors("return 1;\nclass C { init() { return 2; } }"),
            vec![
                "[line 1] Error at 'return': Cannot return from top-level code",
                "[line 2] Error at 'return': Cannot return a value from an initializer",
            ]
        );

        assert!(resolve("class C { init() { return; } }").is_ok());
    }

    #[test]
    fn test_this_and_super_outside_their_context() {
        assert_eq!(
            errors("print this;\nfun f() { super.m(); }\nclass A { m() { super.m(); } }"),
            vec![
                "[line 1] Error at 'this': Cannot use 'this' outside of a class",
                "[line 2] Error at 'super': Cannot use 'super' outside of a class",
                "[line 3] Error at 'super': Cannot use 'super' in a class with no superclass",
            ]
        );
    }

    #[test]
    fn test_class_cannot_inherit_from_itself() {
        assert_eq!(
            errors("class A < A {}"),
            vec!["[line 1] Error at 'A': A class cannot inherit from itself"]
        );
    }

    #[test]
    fn test_this_and_super_resolve_to_class_scopes() {
        let source = "class A { m() {} } class B < A { m() { this; super.m; } }";
        let statements = parse(source);
        let locals = Resolver::new().resolve(&statements).expect("resolves");

        let Stmt::Class { methods, .. } = &statements[1] else {
            panic!("expected class");
        };

        let distance_of = |stmt: &Stmt| -> Option<usize> {
            match stmt {
                Stmt::Expression(Expr::This { id, .. })
                | Stmt::Expression(Expr::Super { id, .. }) => locals.get(id).copied(),
                _ => None,
            }
        };

        // method body → `this` scope → `super` scope
        assert_eq!(distance_of(&methods[0].body[0]), Some(1));
        assert_eq!(distance_of(&methods[0].body[1]), Some(2));
    }

    #[test]
    fn test_all_errors_are_collected() {
        let found = errors("{ var a; var a; }\nreturn;\nprint this;");

        assert_eq!(found.len(), 3);
    }
}
