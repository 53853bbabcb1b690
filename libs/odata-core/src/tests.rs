#[cfg(test)]
#[allow(clippy::module_inception)]
mod tests {
    use crate::ast::{quote_string, CompareOperator, Expr, Value};
    use crate::{Error, OrderKey, SortDir};

    fn cmp(field: &str, value: impl Into<Value>) -> Expr {
        Expr::Compare(
            Box::new(Expr::Identifier(field.to_string())),
            CompareOperator::Eq,
            Box::new(Expr::Value(value.into())),
        )
    }

    #[test]
    fn test_render_compare_operators() {
        let ops = [
            (CompareOperator::Eq, "eq"),
            (CompareOperator::Ne, "ne"),
            (CompareOperator::Gt, "gt"),
            (CompareOperator::Ge, "ge"),
            (CompareOperator::Lt, "lt"),
            (CompareOperator::Le, "le"),
        ];
        for (op, s) in ops {
            let e = Expr::Compare(
                Box::new(Expr::Identifier("age".into())),
                op,
                Box::new(Expr::Value(Value::from(18))),
            );
            assert_eq!(e.to_string(), format!("age {s} 18"));
        }
    }

    #[test]
    fn test_render_or_chain_is_flattened() {
        let e = cmp("a", 1).or(cmp("b", 2)).or(cmp("c", 3));
        assert_eq!(e.to_string(), "(a eq 1 or b eq 2 or c eq 3)");

        // right-leaning chains flatten too
        let e = cmp("a", 1).or(cmp("b", 2).or(cmp("c", 3)));
        assert_eq!(e.to_string(), "(a eq 1 or b eq 2 or c eq 3)");
    }

    #[test]
    fn test_render_and_with_or_group() {
        let search = cmp("id", "x").or(Expr::Function(
            "contains".into(),
            vec![
                Expr::Identifier("email".into()),
                Expr::Value(Value::from("x")),
            ],
        ));
        let e = search.and(cmp("enabled", true)).and(cmp("tier", 2));
        assert_eq!(
            e.to_string(),
            "(id eq 'x' or contains(email,'x')) and enabled eq true and tier eq 2"
        );
    }

    #[test]
    fn test_render_and_inside_or_keeps_precedence() {
        let e = cmp("a", 1).and(cmp("b", 2)).or(cmp("c", 3));
        assert_eq!(e.to_string(), "(a eq 1 and b eq 2 or c eq 3)");
    }

    #[test]
    fn test_render_not() {
        assert_eq!(cmp("a", 1).not().to_string(), "not (a eq 1)");
        assert_eq!(
            (!cmp("a", 1).or(cmp("b", 2))).to_string(),
            "not (a eq 1 or b eq 2)"
        );
    }

    #[test]
    fn test_any_of_and_all_of() {
        assert!(Expr::any_of(Vec::new()).is_none());
        assert!(Expr::all_of(Vec::new()).is_none());

        let single = Expr::any_of(vec![cmp("a", 1)]).unwrap();
        assert_eq!(single, cmp("a", 1));

        let all = Expr::all_of(vec![cmp("a", 1), cmp("b", 2)]).unwrap();
        assert_eq!(all.to_string(), "a eq 1 and b eq 2");
    }

    #[test]
    fn test_value_kinds() {
        assert_eq!(Value::Null.kind(), "null");
        assert_eq!(Value::from(true).kind(), "bool");
        assert_eq!(Value::from(1u64).kind(), "number");
        assert_eq!(Value::from("s").kind(), "string");
    }

    #[test]
    fn test_quote_string() {
        assert_eq!(quote_string("plain"), "'plain'");
        assert_eq!(quote_string("it's"), "'it''s'");
        assert_eq!(quote_string(""), "''");
    }

    #[test]
    fn test_sort_dir_helpers() {
        assert_eq!(SortDir::Asc.reverse(), SortDir::Desc);
        assert_eq!(SortDir::from_desc_flag(true), SortDir::Desc);
        assert_eq!(SortDir::from_desc_flag(false), SortDir::Asc);
        assert_eq!(SortDir::Desc.as_str(), "desc");
    }

    #[test]
    fn test_order_key_display() {
        assert_eq!(
            OrderKey::new("createdAt", SortDir::Desc).to_string(),
            "createdAt desc"
        );
        assert_eq!(OrderKey::new("name", SortDir::Asc).to_string(), "name asc");
    }

    #[test]
    fn test_sort_dir_serde() {
        let key: OrderKey = serde_json::from_str(r#"{"field":"name","dir":"desc"}"#).unwrap();
        assert_eq!(key, OrderKey::new("name", SortDir::Desc));
        assert!(serde_json::from_str::<SortDir>(r#""sideways""#).is_err());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            Error::InvalidField(String::new()).to_string(),
            "invalid field name: ''"
        );
        assert_eq!(Error::InvalidLimit.to_string(), "INVALID_LIMIT");
        assert_eq!(
            Error::UnknownEntity("widgets".into()).to_string(),
            "unknown entity: widgets"
        );
        assert_eq!(
            Error::QueryBuild("top without skip".into()).to_string(),
            "invalid query: top without skip"
        );
    }
}
