// Integration tests for the people repository against in-memory SQLite

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{beale_street, dob, john_smith, office, row_count, setup_test_db};
use peopledb_core::errors::{OrmError, OrmErrorKind};
use peopledb_core::model::{Person, Region};
use peopledb_store::{PeopleRepository, SqliteStore};
use rust_decimal::Decimal;
use std::str::FromStr;

#[test]
fn test_save_one_person_assigns_positive_id() {
    let conn = setup_test_db();
    let store = SqliteStore::new(&conn);
    let repo = PeopleRepository::new(&store).unwrap();

    let saved = repo.save(john_smith()).unwrap();
    assert!(saved.id().unwrap() > 0);
}

#[test]
fn test_save_two_people_gets_distinct_ids() {
    let conn = setup_test_db();
    let store = SqliteStore::new(&conn);
    let repo = PeopleRepository::new(&store).unwrap();

    let john = repo.save(john_smith()).unwrap();
    let bobby = repo
        .save(Person::new("Bobby", "Horse", dob("1985-11-25T15:15:12-06:00")))
        .unwrap();
    assert_ne!(john.id(), bobby.id());
}

#[test]
fn test_find_by_id_equals_saved_person() {
    let conn = setup_test_db();
    let store = SqliteStore::new(&conn);
    let repo = PeopleRepository::new(&store).unwrap();

    let saved = repo
        .save(john_smith().with_salary(Decimal::from_str("73000.34").unwrap()))
        .unwrap();
    let found = repo.find_by_id(saved.id().unwrap()).unwrap().unwrap();

    assert_eq!(found, saved);
    assert_eq!(found.dob.offset().local_minus_utc(), 0);
    assert_eq!(found.salary, Some(Decimal::from_str("73000.34").unwrap()));
}

#[test]
fn test_find_by_id_equals_saved_person_without_salary() {
    let conn = setup_test_db();
    let store = SqliteStore::new(&conn);
    let repo = PeopleRepository::new(&store).unwrap();

    let saved = repo.save(john_smith()).unwrap();
    let found = repo.find_by_id(saved.id().unwrap()).unwrap().unwrap();

    assert_eq!(found, saved);
    assert_eq!(found.salary, None);
    assert_eq!(found.email, None);
}

#[test]
fn test_find_by_unissued_id_is_none() {
    let conn = setup_test_db();
    let store = SqliteStore::new(&conn);
    let repo = PeopleRepository::new(&store).unwrap();

    repo.save(john_smith()).unwrap();
    assert_eq!(repo.find_by_id(-1).unwrap(), None);
    assert_eq!(repo.find_by_id(999_999).unwrap(), None);
}

#[test]
fn test_home_address_round_trip() {
    let conn = setup_test_db();
    let store = SqliteStore::new(&conn);
    let repo = PeopleRepository::new(&store).unwrap();

    let saved = repo
        .save(john_smith().with_home_address(beale_street()))
        .unwrap();
    let home_id = saved.home_address.as_ref().unwrap().id().unwrap();
    assert!(home_id > 0);
    assert_ne!(Some(home_id), saved.id());

    let found = repo.find_by_id(saved.id().unwrap()).unwrap().unwrap();
    let home = found.home_address.expect("home address should be loaded");
    assert_eq!(home.id(), Some(home_id));
    assert_eq!(home.street_address, "123 Beale St.");
    assert_eq!(home.state, "WA");
    assert_eq!(home.region, Region::West);
    assert_eq!(home.county.as_deref(), Some("Fulton County"));
    assert!(found.business_address.is_none());
}

#[test]
fn test_business_address_round_trip() {
    let conn = setup_test_db();
    let store = SqliteStore::new(&conn);
    let repo = PeopleRepository::new(&store).unwrap();

    let saved = repo
        .save(
            john_smith()
                .with_home_address(beale_street())
                .with_business_address(office()),
        )
        .unwrap();
    let found = repo.find_by_id(saved.id().unwrap()).unwrap().unwrap();

    let business = found.business_address.unwrap();
    assert_eq!(business.city, "Chicago");
    assert_eq!(business.region, Region::Central);
    assert_ne!(
        business.id(),
        found.home_address.as_ref().and_then(|a| a.id())
    );
    assert_eq!(row_count(&conn, "ADDRESSES"), 2);
}

#[test]
fn test_identified_address_is_inserted_again() {
    let conn = setup_test_db();
    let store = SqliteStore::new(&conn);
    let repo = PeopleRepository::new(&store).unwrap();

    let first = repo
        .save(john_smith().with_home_address(beale_street()))
        .unwrap();
    let shared = first.home_address.clone().unwrap();

    let second = repo
        .save(
            Person::new("Jane", "Smith", dob("1982-02-02T00:00:00Z")).with_home_address(shared),
        )
        .unwrap();

    assert_eq!(row_count(&conn, "ADDRESSES"), 2);
    assert_ne!(
        first.home_address.unwrap().id(),
        second.home_address.unwrap().id()
    );
}

#[test]
fn test_children_are_saved_after_parent() {
    let conn = setup_test_db();
    let store = SqliteStore::new(&conn);
    let repo = PeopleRepository::new(&store).unwrap();

    let parent = john_smith()
        .with_child(Person::new("Johnny", "Smith", dob("2010-10-01T17:00:00-06:00")))
        .with_child(Person::new("Sarah", "Smith", dob("2012-03-01T17:00:00-06:00")))
        .with_child(Person::new("Jenny", "Smith", dob("2014-05-01T17:00:00-06:00")));
    let saved = repo.save(parent).unwrap();
    let parent_id = saved.id().unwrap();

    assert_eq!(saved.children.len(), 3);
    for child in &saved.children {
        assert!(child.id().unwrap() > parent_id);
        assert_eq!(child.parent_id, Some(parent_id));
    }
    assert_eq!(repo.find_children(parent_id).unwrap().len(), 3);
    assert_eq!(repo.count().unwrap(), 4);
}

#[test]
fn test_find_by_id_loads_children_recursively() {
    let conn = setup_test_db();
    let store = SqliteStore::new(&conn);
    let repo = PeopleRepository::new(&store).unwrap();

    let grandchild = Person::new("Baby", "Smith", dob("2040-01-01T00:00:00Z"));
    let child =
        Person::new("Johnny", "Smith", dob("2010-10-01T17:00:00-06:00")).with_child(grandchild);
    let saved = repo.save(john_smith().with_child(child)).unwrap();

    let found = repo.find_by_id(saved.id().unwrap()).unwrap().unwrap();
    assert_eq!(found.children, saved.children);
    assert_eq!(found.children[0].children.len(), 1);
    assert_eq!(found.children[0].children[0].first_name, "Baby");
}

#[test]
fn test_find_by_id_tolerates_parent_cycle() {
    let conn = setup_test_db();
    let store = SqliteStore::new(&conn);
    let repo = PeopleRepository::new(&store).unwrap();

    let a = repo.save(john_smith()).unwrap();
    let b = repo
        .save(Person::new("Jane", "Smith", dob("1982-02-02T00:00:00Z")))
        .unwrap();
    conn.execute(
        "UPDATE PEOPLE SET PARENT_ID = ?1 WHERE ID = ?2",
        [a.id().unwrap(), b.id().unwrap()],
    )
    .unwrap();
    conn.execute(
        "UPDATE PEOPLE SET PARENT_ID = ?1 WHERE ID = ?2",
        [b.id().unwrap(), a.id().unwrap()],
    )
    .unwrap();

    let found = repo.find_by_id(a.id().unwrap()).unwrap().unwrap();
    assert_eq!(found.children.len(), 1);
    assert_eq!(found.children[0].children.len(), 1);
    assert!(found.children[0].children[0].children.is_empty());
}

#[test]
fn test_new_spouse_is_saved_and_linked() {
    let conn = setup_test_db();
    let store = SqliteStore::new(&conn);
    let repo = PeopleRepository::new(&store).unwrap();

    let jane = Person::new("Jane", "Smith", dob("1982-02-02T08:00:00+01:00"))
        .with_home_address(beale_street())
        .with_business_address(office());
    let saved = repo.save(john_smith().with_spouse(jane)).unwrap();

    let spouse_id = saved.spouse.as_ref().unwrap().id().unwrap();
    assert!(spouse_id > 0);
    assert_eq!(repo.count().unwrap(), 2);

    let found = repo.find_by_id(saved.id().unwrap()).unwrap().unwrap();
    let spouse = found.spouse.expect("spouse should be loaded");
    assert_eq!(spouse.id(), Some(spouse_id));
    assert_eq!(spouse.first_name, "Jane");
    assert_eq!(spouse.home_address.unwrap().state, "WA");
    assert_eq!(spouse.business_address.unwrap().city, "Chicago");
    assert!(found.home_address.is_none());
}

#[test]
fn test_identified_spouse_is_linked_not_saved() {
    let conn = setup_test_db();
    let store = SqliteStore::new(&conn);
    let repo = PeopleRepository::new(&store).unwrap();

    let jane = repo
        .save(Person::new("Jane", "Smith", dob("1982-02-02T00:00:00Z")))
        .unwrap();
    let john = repo.save(john_smith().with_spouse(jane.clone())).unwrap();

    assert_eq!(repo.count().unwrap(), 2);
    let found = repo.find_by_id(john.id().unwrap()).unwrap().unwrap();
    assert_eq!(found.spouse.as_deref(), Some(&jane));
}

#[test]
fn test_find_all_returns_every_row() {
    let conn = setup_test_db();
    let store = SqliteStore::new(&conn);
    let repo = PeopleRepository::new(&store).unwrap();

    for i in 0..5 {
        repo.save(Person::new(
            format!("Person{i}"),
            "Test",
            dob("1990-01-01T00:00:00Z"),
        ))
        .unwrap();
    }

    let all = repo.find_all().unwrap();
    assert_eq!(all.len(), 5);
    let names: Vec<_> = all.iter().map(|p| p.first_name.as_str()).collect();
    assert_eq!(names, ["Person0", "Person1", "Person2", "Person3", "Person4"]);
}

#[test]
fn test_count_on_empty_table() {
    let conn = setup_test_db();
    let store = SqliteStore::new(&conn);
    let repo = PeopleRepository::new(&store).unwrap();
    assert_eq!(repo.count().unwrap(), 0);
}

#[test]
fn test_delete_one_decrements_count() {
    let conn = setup_test_db();
    let store = SqliteStore::new(&conn);
    let repo = PeopleRepository::new(&store).unwrap();

    let saved = repo.save(john_smith()).unwrap();
    let before = repo.count().unwrap();

    assert_eq!(repo.delete(&saved).unwrap(), 1);
    assert_eq!(repo.count().unwrap(), before - 1);
    assert_eq!(repo.find_by_id(saved.id().unwrap()).unwrap(), None);
}

#[test]
fn test_delete_many_decrements_count_by_k() {
    let conn = setup_test_db();
    let store = SqliteStore::new(&conn);
    let repo = PeopleRepository::new(&store).unwrap();

    let people: Vec<Person> = (0..4)
        .map(|i| {
            repo.save(Person::new(format!("P{i}"), "X", dob("1990-01-01T00:00:00Z")))
                .unwrap()
        })
        .collect();
    let before = repo.count().unwrap();

    assert_eq!(repo.delete_many(&people[..3]).unwrap(), 3);
    assert_eq!(repo.count().unwrap(), before - 3);
    assert!(repo.find_by_id(people[3].id().unwrap()).unwrap().is_some());
}

#[test]
fn test_delete_many_with_no_entities_is_noop() {
    let conn = setup_test_db();
    let store = SqliteStore::new(&conn);
    let repo = PeopleRepository::new(&store).unwrap();

    repo.save(john_smith()).unwrap();
    assert_eq!(repo.delete_many(&[]).unwrap(), 0);
    assert_eq!(repo.count().unwrap(), 1);
}

#[test]
fn test_delete_parent_clears_child_link() {
    let conn = setup_test_db();
    let store = SqliteStore::new(&conn);
    let repo = PeopleRepository::new(&store).unwrap();

    let saved = repo
        .save(john_smith().with_child(Person::new("Kid", "Smith", dob("2010-01-01T00:00:00Z"))))
        .unwrap();
    repo.delete(&saved).unwrap();

    let orphan = repo
        .find_by_id(saved.children[0].id().unwrap())
        .unwrap()
        .unwrap();
    assert_eq!(orphan.parent_id, None);
}

#[test]
fn test_update_salary_round_trip() {
    let conn = setup_test_db();
    let store = SqliteStore::new(&conn);
    let repo = PeopleRepository::new(&store).unwrap();

    let saved = repo
        .save(john_smith().with_salary(Decimal::from_str("73000.28").unwrap()))
        .unwrap();
    let mut loaded = repo.find_by_id(saved.id().unwrap()).unwrap().unwrap();
    loaded.salary = Some(Decimal::from_str("83000.28").unwrap());

    assert_eq!(repo.update(&loaded).unwrap(), 1);

    let reloaded = repo.find_by_id(saved.id().unwrap()).unwrap().unwrap();
    assert_eq!(reloaded.salary, Some(Decimal::from_str("83000.28").unwrap()));
    assert_eq!(reloaded, saved);
}

#[test]
fn test_update_leaves_email_untouched() {
    let conn = setup_test_db();
    let store = SqliteStore::new(&conn);
    let repo = PeopleRepository::new(&store).unwrap();

    let saved = repo.save(john_smith().with_email("john@example.com")).unwrap();
    let mut edited = saved.clone();
    edited.first_name = "Jonathan".to_string();
    edited.email = Some("ignored@example.com".to_string());
    repo.update(&edited).unwrap();

    let reloaded = repo.find_by_id(saved.id().unwrap()).unwrap().unwrap();
    assert_eq!(reloaded.first_name, "Jonathan");
    assert_eq!(reloaded.email.as_deref(), Some("john@example.com"));
}

#[test]
fn test_update_missing_row_affects_nothing() {
    let conn = setup_test_db();
    let store = SqliteStore::new(&conn);
    let repo = PeopleRepository::new(&store).unwrap();

    let saved = repo.save(john_smith()).unwrap();
    repo.delete(&saved).unwrap();
    assert_eq!(repo.update(&saved).unwrap(), 0);
}

#[test]
fn test_resaving_identified_person_is_persistence_error() {
    let conn = setup_test_db();
    let store = SqliteStore::new(&conn);
    let repo = PeopleRepository::new(&store).unwrap();

    let saved = repo.save(john_smith()).unwrap();
    let err = repo.save(saved.clone()).unwrap_err();

    assert_eq!(err.kind(), OrmErrorKind::Persistence);
    assert_eq!(
        err.root_cause(),
        &OrmError::AlreadyPersisted {
            entity_type: "Person",
            id: saved.id().unwrap()
        }
    );
    assert_eq!(repo.count().unwrap(), 1);
}

#[test]
fn test_save_without_schema_is_persistence_error() {
    let conn = peopledb_store::db::open_in_memory().unwrap();
    let store = SqliteStore::new(&conn);
    let repo = PeopleRepository::new(&store).unwrap();

    let err = repo.save(john_smith().with_home_address(beale_street())).unwrap_err();
    assert_eq!(err.code(), "ERR_PERSISTENCE");
    assert_eq!(err.root_cause().kind(), OrmErrorKind::Store);
    assert!(err.to_string().starts_with("Tried to save Person{id=null, first_name=John"));
}

#[test]
fn test_read_without_schema_is_store_error() {
    let conn = peopledb_store::db::open_in_memory().unwrap();
    let store = SqliteStore::new(&conn);
    let repo = PeopleRepository::new(&store).unwrap();

    assert_eq!(repo.find_all().unwrap_err().kind(), OrmErrorKind::Store);
    assert_eq!(repo.count().unwrap_err().kind(), OrmErrorKind::Store);
}

#[test]
fn test_rolled_back_transaction_discards_cascade() {
    let mut conn = setup_test_db();
    let tx = conn.transaction().unwrap();
    {
        let store = SqliteStore::new(&tx);
        let repo = PeopleRepository::new(&store).unwrap();
        repo.save(
            john_smith()
                .with_home_address(beale_street())
                .with_child(Person::new("Kid", "Smith", dob("2010-01-01T00:00:00Z"))),
        )
        .unwrap();
        assert_eq!(repo.count().unwrap(), 2);
    }
    tx.rollback().unwrap();

    assert_eq!(row_count(&conn, "PEOPLE"), 0);
    assert_eq!(row_count(&conn, "ADDRESSES"), 0);
}

#[test]
fn test_dob_beyond_year_9999_utc_is_refused_before_any_write() {
    let conn = setup_test_db();
    let store = SqliteStore::new(&conn);
    let repo = PeopleRepository::new(&store).unwrap();
    repo.save(john_smith()).unwrap();

    let far_future = Person::new("Far", "Future", dob("9999-12-31T23:00:00-06:00"))
        .with_home_address(beale_street());
    let err = repo.save(far_future).unwrap_err();

    assert_eq!(err.code(), "ERR_PERSISTENCE");
    assert!(matches!(
        err.root_cause(),
        OrmError::TimestampOutOfRange { value } if value == "+10000-01-01T05:00:00Z"
    ));
    assert_eq!(row_count(&conn, "PEOPLE"), 1);
    assert_eq!(row_count(&conn, "ADDRESSES"), 0);
    assert_eq!(repo.find_all().unwrap().len(), 1);
}

#[test]
fn test_update_to_unstorable_dob_is_refused() {
    let conn = setup_test_db();
    let store = SqliteStore::new(&conn);
    let repo = PeopleRepository::new(&store).unwrap();

    let mut saved = repo.save(john_smith()).unwrap();
    saved.dob = dob("9999-12-31T23:00:00-06:00");

    let err = repo.update(&saved).unwrap_err();
    assert_eq!(err.kind(), OrmErrorKind::Binding);
    let found = repo.find_by_id(saved.id().unwrap()).unwrap().unwrap();
    assert_eq!(found.dob_utc(), john_smith().dob_utc());
}

#[test]
fn test_identified_child_is_refused_before_parent_row() {
    let conn = setup_test_db();
    let store = SqliteStore::new(&conn);
    let repo = PeopleRepository::new(&store).unwrap();

    let kid = repo
        .save(Person::new("Kid", "Smith", dob("2010-01-01T00:00:00Z")))
        .unwrap();
    let err = repo
        .save(john_smith().with_home_address(beale_street()).with_child(kid.clone()))
        .unwrap_err();

    assert_eq!(
        err.root_cause(),
        &OrmError::AlreadyPersisted {
            entity_type: "Person",
            id: kid.id().unwrap()
        }
    );
    assert_eq!(row_count(&conn, "PEOPLE"), 1);
    assert_eq!(row_count(&conn, "ADDRESSES"), 0);
}

#[test]
fn test_unstorable_grandchild_dob_writes_nothing() {
    let conn = setup_test_db();
    let store = SqliteStore::new(&conn);
    let repo = PeopleRepository::new(&store).unwrap();

    let grandchild = Person::new("Far", "Smith", dob("9999-12-31T23:00:00-06:00"));
    let child = Person::new("Kid", "Smith", dob("2010-01-01T00:00:00Z")).with_child(grandchild);
    assert!(repo.save(john_smith().with_child(child)).is_err());

    assert_eq!(row_count(&conn, "PEOPLE"), 0);
}
