mod common;

#[cfg(test)]
mod tests {
    use crate::common::{MockExecutor, init_logs};
    use quarry::{Conversion, Entity, MappingError, PropertyKind, Result, Value};

    #[derive(Entity, Default, Debug, PartialEq)]
    struct EntityName {
        pub id: i64,
        pub name: String,
        pub flags: i32,
    }

    #[derive(Entity, Default, Debug)]
    #[quarry(name = "entity")]
    struct Point {
        #[quarry(identity)]
        pub id: i64,
        pub x: i32,
        pub y: i32,
    }

    #[derive(Entity, Default)]
    #[quarry(name = "entity")]
    struct Keyed {
        pub id: i64,
        #[quarry(identity)]
        pub x: i32,
    }

    #[derive(Entity, Default)]
    struct Tag {
        pub label: String,
    }

    #[derive(Entity, Default)]
    struct Counter {
        pub id: i64,
    }

    #[derive(Entity, Default)]
    struct Session {
        pub id: i64,
        pub token: String,
        #[quarry(ignore)]
        pub cache: Vec<String>,
        secret: String,
    }

    #[derive(Entity, Default)]
    struct Broken {
        pub id: i64,
        pub tags: Vec<String>,
    }

    #[derive(Debug, Default, PartialEq)]
    pub struct Flags(i32);

    struct FlagsAsText;
    impl Conversion for FlagsAsText {
        type Target = Flags;
        type Bridge = String;
        fn to_bridge(value: &Flags) -> String {
            value.0.to_string()
        }
        fn from_bridge(bridge: String) -> Result<Flags> {
            if bridge.is_empty() {
                return Ok(Flags::default());
            }
            Ok(Flags(bridge.parse()?))
        }
    }

    #[derive(Entity, Default, Debug, PartialEq)]
    struct Flagged {
        pub id: i64,
        pub name: String,
        #[quarry(convert = FlagsAsText)]
        pub flags: Flags,
    }

    fn mapping_error(error: &quarry::Error) -> Option<&MappingError> {
        error.downcast_ref::<MappingError>()
    }

    #[test]
    fn select_uses_snake_case_table_name() {
        init_logs();
        let mut executor = MockExecutor::new();
        let rows = EntityName::select(&mut executor)
            .expect("Could not build the select")
            .collect::<Result<Vec<_>>>()
            .expect("Could not run the select");
        assert!(rows.is_empty());
        assert_eq!(executor.statements, ["SELECT id,name,flags FROM entity_name"]);
    }

    #[test]
    fn insert_skips_identity_and_assigns_generated_id() {
        init_logs();
        let mut executor = MockExecutor::new().with_generated_id(2);
        let mut point = Point::default();
        let result = point.insert(&mut executor).expect("Could not insert");
        assert_eq!(result.rows_affected, 1);
        assert_eq!(executor.statements, ["INSERT INTO entity(x,y) VALUES (0,0)"]);
        assert_eq!(point.id, 2);
        assert_eq!((point.x, point.y), (0, 0));
    }

    #[test]
    fn insert_without_generated_id_keeps_identity() {
        init_logs();
        let mut executor = MockExecutor::new();
        let mut point = Point {
            id: 0,
            x: -3,
            y: 4,
        };
        point.insert(&mut executor).expect("Could not insert");
        assert_eq!(executor.statements, ["INSERT INTO entity(x,y) VALUES (-3,4)"]);
        assert_eq!(point.id, 0);
    }

    #[test]
    fn insert_without_identity_ignores_generated_id() {
        init_logs();
        let mut executor = MockExecutor::new().with_generated_id(12);
        let mut tag = Tag {
            label: "it's".into(),
        };
        tag.insert(&mut executor).expect("Could not insert");
        assert_eq!(executor.statements, ["INSERT INTO tag(label) VALUES ('it''s')"]);
        assert_eq!(tag.label, "it's");
    }

    #[test]
    fn insert_only_identity_uses_default_values() {
        init_logs();
        let mut executor = MockExecutor::new().with_generated_id(9);
        let mut counter = Counter::default();
        counter.insert(&mut executor).expect("Could not insert");
        assert_eq!(executor.statements, ["INSERT INTO counter DEFAULT VALUES"]);
        assert_eq!(counter.id, 9);
    }

    #[test]
    fn update_sets_non_identity_fields() {
        init_logs();
        let mut executor = MockExecutor::new();
        let keyed = Keyed { id: 5, x: 7 };
        keyed.update(&mut executor).expect("Could not update");
        assert_eq!(executor.statements, ["UPDATE entity SET id=5 WHERE x=7"]);
    }

    #[test]
    fn update_errors_are_definition_errors() {
        init_logs();
        let mut executor = MockExecutor::new();
        let error = Tag::default()
            .update(&mut executor)
            .expect_err("Tag has no identity");
        assert_eq!(
            mapping_error(&error),
            Some(&MappingError::MissingIdentity {
                entity: "Tag",
                statement: "UPDATE",
            })
        );
        let error = Counter { id: 1 }
            .update(&mut executor)
            .expect_err("Counter has only its identity");
        let error = mapping_error(&error).expect("Expected a mapping error");
        assert_eq!(error, &MappingError::NothingToUpdate { entity: "Counter" });
        assert!(error.is_definition());
        assert!(executor.statements.is_empty());
    }

    #[test]
    fn delete_by_id() {
        init_logs();
        let mut executor = MockExecutor::new();
        let entity = EntityName {
            id: 3,
            name: "three".into(),
            flags: 0,
        };
        let result = entity.delete(&mut executor).expect("Could not delete");
        assert_eq!(result.rows_affected, 1);
        assert_eq!(executor.statements, ["DELETE FROM entity_name WHERE id=3"]);

        executor.rows_affected = 0;
        let result = entity.delete(&mut executor).expect("Missing rows only warn");
        assert_eq!(result.rows_affected, 0);
    }

    #[test]
    fn delete_requires_id_field() {
        init_logs();
        let mut executor = MockExecutor::new();
        let error = Tag::default()
            .delete(&mut executor)
            .expect_err("Tag has no id");
        assert_eq!(
            mapping_error(&error),
            Some(&MappingError::MissingIdField { entity: "Tag" })
        );
    }

    #[test]
    fn find_by_id() {
        init_logs();
        let mut executor = MockExecutor::new().with_rows(
            ["id", "name", "flags"],
            [[
                Value::Int64(Some(4)),
                Value::Varchar(Some("four".into())),
                Value::Int32(Some(1)),
            ]],
        );
        let found = EntityName::find_by_id(&mut executor, 4i64).expect("Could not find");
        assert_eq!(
            found,
            Some(EntityName {
                id: 4,
                name: "four".into(),
                flags: 1,
            })
        );
        assert_eq!(
            executor.statements,
            ["SELECT id,name,flags FROM entity_name WHERE id=4"]
        );
        assert_eq!(executor.closes(), 1);

        let missing = EntityName::find_by_id(&mut executor, 5i64).expect("Could not find");
        assert_eq!(missing, None);
        assert_eq!(
            executor.last_statement(),
            "SELECT id,name,flags FROM entity_name WHERE id=5"
        );
    }

    #[test]
    fn save_inserts_then_updates() {
        init_logs();
        let mut executor = MockExecutor::new().with_generated_id(11);
        let mut entity = EntityName {
            id: 0,
            name: "new".into(),
            flags: 2,
        };
        entity.save(&mut executor).expect("Could not save");
        assert_eq!(entity.id, 11);
        entity.flags = 3;
        entity.save(&mut executor).expect("Could not save");
        assert_eq!(
            executor.statements,
            [
                "INSERT INTO entity_name(name,flags) VALUES ('new',2)",
                "UPDATE entity_name SET name='new',flags=3 WHERE id=11",
            ]
        );
    }

    #[test]
    fn ignored_and_private_fields_are_not_mapped() {
        init_logs();
        let meta = Session::meta().expect("Could not register Session");
        let names: Vec<_> = meta.fields().iter().map(|f| f.name).collect();
        assert_eq!(names, ["id", "token"]);
        let mut executor = MockExecutor::new();
        let sql = Session::select(&mut executor)
            .expect("Could not build the select")
            .sql();
        assert_eq!(sql, "SELECT id,token FROM session");
        let session = Session {
            secret: "hidden".into(),
            cache: vec!["a".into()],
            ..Default::default()
        };
        assert_eq!(session.secret, "hidden");
        assert_eq!(session.cache.len(), 1);
    }

    #[test]
    fn unsupported_field_fails_registration_every_time() {
        init_logs();
        for _ in 0..2 {
            let error = Broken::meta().expect_err("Vec<String> cannot be mapped");
            let Some(MappingError::UnsupportedField { entity, field, .. }) = mapping_error(&error)
            else {
                panic!("Unexpected error: {error:#}");
            };
            assert_eq!((*entity, *field), ("Broken", "tags"));
            assert!(format!("{error:#}").contains("While registering entity"));
        }
        let mut executor = MockExecutor::new();
        assert!(Broken::select(&mut executor).is_err());
        assert!(executor.statements.is_empty());
    }

    #[test]
    fn converted_field_goes_through_bridge() {
        init_logs();
        let meta = Flagged::meta().expect("Could not register Flagged");
        let flags = meta.field("flags").expect("Missing field flags");
        assert_eq!(flags.kind, PropertyKind::STRING_CONVERTIBLE);
        assert!(flags.adapter.is_some_and(|v| v.ends_with("FlagsAsText")));

        let mut executor = MockExecutor::new().with_rows(
            ["id", "name", "flags"],
            [[
                Value::Int64(Some(1)),
                Value::Varchar(Some("one".into())),
                Value::Varchar(Some("5".into())),
            ]],
        );
        let rows = Flagged::select(&mut executor)
            .expect("Could not build the select")
            .collect::<Result<Vec<_>>>()
            .expect("Could not run the select");
        assert_eq!(executor.statements, ["SELECT id,name,flags FROM flagged"]);
        assert_eq!(
            rows,
            [Flagged {
                id: 1,
                name: "one".into(),
                flags: Flags(5),
            }]
        );

        let mut entity = Flagged {
            id: 0,
            name: "two".into(),
            flags: Flags(6),
        };
        entity.insert(&mut executor).expect("Could not insert");
        assert_eq!(
            executor.last_statement(),
            "INSERT INTO flagged(name,flags) VALUES ('two','6')"
        );
    }

    #[test]
    fn executor_errors_carry_the_statement() {
        init_logs();
        let mut executor = MockExecutor::new().failing("connection lost");
        let error = Counter::default()
            .insert(&mut executor)
            .expect_err("The executor fails");
        let message = format!("{error:#}");
        assert!(message.contains("INSERT INTO counter DEFAULT VALUES"));
        assert!(message.contains("connection lost"));
        assert!(mapping_error(&error).is_none());
    }
}
