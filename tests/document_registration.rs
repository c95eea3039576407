mod fixtures;

use anyhow::Result;
use fixtures::{client, kit, rocket_with};
use rocket::error::ErrorKind;
use rocket::local::asynchronous::Client;
use rocket_mongokit::{Document, KitError, MongoKit, MongoRegistry};
use rstest::rstest;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize)]
struct Foo {
    name: String,
}

impl Document for Foo {
    const COLLECTION: &'static str = "foo";
}

#[derive(Serialize, Deserialize)]
struct Bar {
    count: i64,
}

impl Document for Bar {
    const COLLECTION: &'static str = "bar";
}

#[derive(Serialize, Deserialize)]
struct Impostor {
    name: String,
}

impl Document for Impostor {
    const COLLECTION: &'static str = "foo";
}

#[derive(Serialize, Deserialize)]
struct Dollar {
    name: String,
}

impl Document for Dollar {
    const COLLECTION: &'static str = "bad$name";
}

#[rstest]
#[tokio::test]
async fn fairing_registrations_are_retrievable_by_collection(kit: MongoKit) -> Result<()> {
    let client = client(kit.register::<Foo>().register::<Bar>()).await?;
    let registry = client
        .rocket()
        .state::<MongoRegistry>()
        .expect("registry is managed");

    let foo = registry.document("foo").expect("foo is registered");
    assert!(foo.is::<Foo>());
    assert!(!foo.is::<Bar>());

    let names: Vec<_> = registry
        .documents()
        .into_iter()
        .map(|registration| registration.collection)
        .collect();
    assert_eq!(names, ["bar", "foo"]);

    let collection = registry.collection::<Bar>(&registry.database())?;
    assert_eq!(collection.name(), "bar");
    assert_eq!(collection.namespace().db, "pyramid_mongokit");

    Ok(())
}

#[rstest]
#[tokio::test]
async fn registering_after_launch_is_additive(kit: MongoKit) -> Result<()> {
    let client = client(kit).await?;
    let registry = client
        .rocket()
        .state::<MongoRegistry>()
        .expect("registry is managed");

    assert!(registry.document("foo").is_none());
    registry.register_document::<Foo>()?;
    assert!(registry.document("foo").is_some());

    let err = registry.register_document::<Impostor>().unwrap_err();
    assert!(matches!(
        err,
        KitError::DuplicateDocument { ref collection, .. } if collection == "foo"
    ));
    assert!(registry.document("foo").is_some_and(|r| r.is::<Foo>()));

    Ok(())
}

#[rstest]
#[tokio::test]
async fn invalid_registration_aborts_launch(kit: MongoKit) {
    let rocket = rocket_with(kit.register::<Foo>().register::<Dollar>());

    match Client::tracked(rocket).await {
        Ok(_) => panic!("launch should have failed"),
        Err(e) => assert!(matches!(e.kind(), ErrorKind::FailedFairings(_))),
    }
}

#[rstest]
#[tokio::test]
async fn conflicting_registration_aborts_launch(kit: MongoKit) {
    let rocket = rocket_with(kit.register::<Foo>().register::<Impostor>());

    match Client::tracked(rocket).await {
        Ok(_) => panic!("launch should have failed"),
        Err(e) => assert!(matches!(e.kind(), ErrorKind::FailedFairings(_))),
    }
}
