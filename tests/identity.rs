mod common;

#[cfg(test)]
mod tests {
    use crate::common::{MockExecutor, init_logs};
    use quarry::{Entity, MappingError};

    #[derive(Entity, Default)]
    struct Account {
        pub id: i64,
        #[quarry(identity)]
        pub code: String,
    }

    #[derive(Entity, Default)]
    struct Badge {
        #[quarry(ignore)]
        pub id: i64,
        #[quarry(identity, name = "key")]
        pub x: i32,
        pub label: String,
    }

    #[derive(Entity, Default)]
    struct Member {
        #[quarry(name = "id")]
        pub uid: i64,
        pub name: String,
    }

    #[derive(Entity, Default)]
    struct Ambiguous {
        #[quarry(name = "id")]
        pub a: i64,
        #[quarry(name = "id")]
        pub b: i64,
    }

    #[derive(Entity, Default)]
    struct Plain {
        pub id: i64,
        pub name: String,
    }

    #[derive(Entity, Default)]
    struct Message {
        pub body: String,
    }

    #[derive(Entity, Default)]
    struct Pair {
        #[quarry(identity)]
        pub a: i64,
        #[quarry(identity)]
        pub b: i64,
        pub value: String,
    }

    fn identity<E: Entity>() -> Vec<&'static str> {
        E::meta()
            .expect("Could not register the entity")
            .identity_fields()
            .map(|f| f.name)
            .collect()
    }

    #[test]
    fn explicit_marker_beats_field_named_id() {
        init_logs();
        assert_eq!(identity::<Account>(), ["code"]);
        let mut executor = MockExecutor::new();
        Account {
            id: 1,
            code: "A1".into(),
        }
        .update(&mut executor)
        .expect("Could not update");
        assert_eq!(executor.statements, ["UPDATE account SET id=1 WHERE code='A1'"]);
    }

    #[test]
    fn ignored_id_and_marker_with_column_name() {
        init_logs();
        assert_eq!(identity::<Badge>(), ["x"]);
        let meta = Badge::meta().expect("Could not register Badge");
        let x = meta.field("x").expect("Missing field x");
        assert_eq!(&*x.column, "key");
        assert!(meta.field("id").is_none());

        let mut executor = MockExecutor::new();
        let mut badge = Badge {
            id: 10,
            x: 2,
            label: "gold".into(),
        };
        badge.update(&mut executor).expect("Could not update");
        let error = badge.delete(&mut executor).expect_err("The id field is ignored");
        assert_eq!(
            error.downcast_ref::<MappingError>(),
            Some(&MappingError::MissingIdField { entity: "Badge" })
        );
        badge.save(&mut executor).expect("Could not save");
        assert_eq!(
            executor.statements,
            [
                "UPDATE badge SET label='gold' WHERE key=2",
                "UPDATE badge SET label='gold' WHERE key=2",
            ]
        );
        assert_eq!(badge.id, 10);
    }

    #[test]
    fn single_column_named_id() {
        init_logs();
        assert_eq!(identity::<Member>(), ["uid"]);
        let mut executor = MockExecutor::new().with_generated_id(3);
        let mut member = Member {
            uid: 0,
            name: "Ada".into(),
        };
        member.insert(&mut executor).expect("Could not insert");
        assert_eq!(member.uid, 3);
        assert_eq!(executor.statements, ["INSERT INTO member(name) VALUES ('Ada')"]);
    }

    #[test]
    fn several_columns_named_id_resolve_to_nothing() {
        init_logs();
        assert!(identity::<Ambiguous>().is_empty());
    }

    #[test]
    fn field_named_id() {
        init_logs();
        assert_eq!(identity::<Plain>(), ["id"]);
    }

    #[test]
    fn no_identity() {
        init_logs();
        assert!(identity::<Message>().is_empty());
        let mut executor = MockExecutor::new().with_generated_id(1);
        let mut message = Message {
            body: "hello".into(),
        };
        message.save(&mut executor).expect("Append only entities insert");
        message.save(&mut executor).expect("Append only entities insert");
        assert_eq!(
            executor.statements,
            [
                "INSERT INTO message(body) VALUES ('hello')",
                "INSERT INTO message(body) VALUES ('hello')",
            ]
        );
    }

    #[test]
    fn composite_identity() {
        init_logs();
        assert_eq!(identity::<Pair>(), ["a", "b"]);
        let mut executor = MockExecutor::new();
        let mut pair = Pair {
            a: 1,
            b: 2,
            value: "x".into(),
        };
        pair.save(&mut executor).expect("Could not save");
        pair.a = 0;
        pair.save(&mut executor).expect("Could not save");
        assert_eq!(
            executor.statements,
            [
                "UPDATE pair SET value='x' WHERE a=1,b=2",
                "INSERT INTO pair(value) VALUES ('x')",
            ]
        );
    }
}
