//! SELECT generation tests

#[cfg(test)]
mod tests {
    use crate::descriptor::ModelDescriptor;
    use crate::errors::OrmError;
    use crate::fields;
    use crate::query_builder::{or_, JoinDescriptor, Pagination, QueryBuilder, Selection, SqlGenerator};
    use serde_json::json;

    fn descriptor() -> ModelDescriptor {
        ModelDescriptor::new("test_orm", ["id", "name", "content", "type"]).unwrap()
    }

    // ========================================
    // Single and multi-row selects
    // ========================================

    #[test]
    fn test_select_one_without_filters() {
        let stmt = SqlGenerator::select_one(&descriptor(), &QueryBuilder::new()).unwrap();
        assert_eq!(
            stmt.sql,
            "SELECT `id`,`name`,`content`,`type` FROM `test_orm` LIMIT 1"
        );
        assert!(stmt.values.is_empty());
    }

    #[test]
    fn test_select_with_filters_order_and_limit() {
        let query = QueryBuilder::new()
            .filter("name", "test0")
            .filter("type__gt", 1)
            .order_by("id DESC")
            .limit(5);
        let stmt = SqlGenerator::select(&descriptor(), &query).unwrap();

        assert_eq!(
            stmt.sql,
            "SELECT `id`,`name`,`content`,`type` FROM `test_orm` \
             WHERE (`name` = %s AND `type` > %s) ORDER BY id DESC LIMIT 5"
        );
        assert_eq!(stmt.values, vec![json!("test0"), json!(1)]);
    }

    #[test]
    fn test_select_explicit_columns() {
        let query = QueryBuilder::new().columns(["id", "name"]);
        assert!(!query.returns_records());

        let stmt = SqlGenerator::select(&descriptor(), &query).unwrap();
        assert_eq!(stmt.sql, "SELECT `id`,`name` FROM `test_orm`");
    }

    #[test]
    fn test_select_unknown_column_fails() {
        let query = QueryBuilder::new().filter("colour", "red");
        let err = SqlGenerator::select(&descriptor(), &query).unwrap_err();
        assert!(matches!(err, OrmError::SchemaMismatch { .. }));
    }

    #[test]
    fn test_multi_value_filter_is_or_group() {
        let query = QueryBuilder::new().filter("type", json!([1, 2, 3]));
        let stmt = SqlGenerator::select(&descriptor(), &query).unwrap();

        assert!(stmt
            .sql
            .ends_with("WHERE (`type` = %s OR `type` = %s OR `type` = %s)"));
        assert_eq!(stmt.values, vec![json!(1), json!(2), json!(3)]);
    }

    #[test]
    fn test_empty_value_list_fails() {
        let query = QueryBuilder::new().filter("type", json!([]));
        let err = SqlGenerator::select(&descriptor(), &query).unwrap_err();
        assert!(matches!(err, OrmError::EmptyValueList(key) if key == "type"));
    }

    #[test]
    fn test_extra_predicate_follows_filters() {
        let extra = or_(&fields! { "type" => 1, "content__like" => "abc" }, None).unwrap();
        let query = QueryBuilder::new().filter("name", "a").extra(extra);
        let stmt = SqlGenerator::select(&descriptor(), &query).unwrap();

        assert!(stmt
            .sql
            .ends_with("WHERE (`name` = %s AND (`type` = %s OR `content` LIKE %s))"));
        assert_eq!(stmt.values, vec![json!("a"), json!(1), json!("%abc%")]);
    }

    // ========================================
    // Joins
    // ========================================

    #[test]
    fn test_join_qualifies_base_filters() {
        let join = JoinDescriptor::inner(
            "items",
            "items.id = test_orm.id",
            &fields! { "status" => 1 },
        )
        .unwrap();
        let query = QueryBuilder::new()
            .filter("type", 2)
            .join(join)
            .raw_columns("items.*");
        let stmt = SqlGenerator::select(&descriptor(), &query).unwrap();

        assert_eq!(
            stmt.sql,
            "SELECT items.* FROM `test_orm` INNER JOIN `items` ON items.id = test_orm.id \
             WHERE (`test_orm`.`type` = %s) AND (`items`.`status` = %s)"
        );
        assert_eq!(stmt.values, vec![json!(2), json!(1)]);
        assert_eq!(query.selection(), &Selection::Raw("items.*".to_string()));
    }

    #[test]
    fn test_join_is_conjunctive_with_or_extra() {
        let join =
            JoinDescriptor::inner("items", "items.id = test_orm.id", &fields! { "status" => 1 })
                .unwrap();
        let extra = or_(&fields! { "type" => 1, "name" => "x" }, None).unwrap();
        let query = QueryBuilder::new().extra(extra).join(join);
        let stmt = SqlGenerator::select(&descriptor(), &query).unwrap();

        assert!(stmt.sql.starts_with(
            "SELECT `test_orm`.`id`,`test_orm`.`name`,`test_orm`.`content`,`test_orm`.`type` FROM"
        ));
        // The OR fragment was built unqualified; only keyword filters get the table prefix
        assert!(stmt
            .sql
            .ends_with("WHERE (`type` = %s OR `name` = %s) AND (`items`.`status` = %s)"));
        assert_eq!(stmt.values, vec![json!(1), json!("x"), json!(1)]);
    }

    #[test]
    fn test_join_without_base_filters() {
        let join =
            JoinDescriptor::inner("items", "items.id = test_orm.id", &fields! { "status" => 1 })
                .unwrap();
        let query = QueryBuilder::new().join(join);
        let pred = SqlGenerator::where_predicate(&descriptor(), &query).unwrap();
        assert_eq!(pred.expr, "(`items`.`status` = %s)");
    }

    // ========================================
    // Pagination, count, exists, scan
    // ========================================

    #[test]
    fn test_page_statement() {
        let query = QueryBuilder::new().order_by("id").limit(99);
        let stmt = SqlGenerator::page(&descriptor(), &query, Pagination::new(2, 6)).unwrap();
        assert_eq!(
            stmt.sql,
            "SELECT `id`,`name`,`content`,`type` FROM `test_orm` ORDER BY id LIMIT 6 OFFSET 6"
        );

        let first = SqlGenerator::page(&descriptor(), &query, Pagination::new(0, 6)).unwrap();
        assert!(first.sql.ends_with("LIMIT 6 OFFSET 0"));
    }

    #[test]
    fn test_count_statement() {
        let stmt = SqlGenerator::count(&descriptor(), &QueryBuilder::new()).unwrap();
        assert_eq!(stmt.sql, "SELECT COUNT(*) AS total FROM `test_orm`");

        let query = QueryBuilder::new().filter("type__le", 3);
        let stmt = SqlGenerator::count(&descriptor(), &query).unwrap();
        assert_eq!(
            stmt.sql,
            "SELECT COUNT(*) AS total FROM `test_orm` WHERE (`type` <= %s)"
        );
        assert_eq!(stmt.values, vec![json!(3)]);
    }

    #[test]
    fn test_exists_statement() {
        let query = QueryBuilder::new().filter("name", "a");
        let stmt = SqlGenerator::exists(&descriptor(), &query).unwrap();
        assert_eq!(
            stmt.sql,
            "SELECT `id` FROM `test_orm` WHERE (`name` = %s) LIMIT 1"
        );
    }

    #[test]
    fn test_scan_statement() {
        let stmt = SqlGenerator::scan(&descriptor(), &Selection::Model, Some("id"), Some(5));
        assert_eq!(
            stmt.sql,
            "SELECT `id`,`name`,`content`,`type` FROM `test_orm` ORDER BY id LIMIT 5"
        );
        assert!(stmt.values.is_empty());
    }
}
