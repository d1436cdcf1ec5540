use car_seeder::{
    cars,
    firestore::{batch::DocumentStore, collection},
    seeder,
};

#[tokio::test]
#[ignore = "needs FIREBASE_* credentials and a reachable Firestore (or emulator)"]
async fn seed_against_firestore() -> Result<(), Box<dyn std::error::Error>> {
    let mut client = car_seeder::firestore::test_helpers::initialise().await?;

    let report = seeder::seed(&mut client, &cars::fleet()).await?;

    assert_eq!(report.documents.len(), 5);
    assert!(report.commit_time.is_some());

    Ok(())
}

#[tokio::test]
#[ignore = "needs FIREBASE_* credentials and a reachable Firestore (or emulator)"]
async fn commit_batch_in_nested_collection() -> Result<(), Box<dyn std::error::Error>> {
    let mut client = car_seeder::firestore::test_helpers::initialise().await?;

    let fleet = collection("fleets")
        .doc(format!("depot-{}", ulid::Ulid::new()))
        .collection("cars");

    let mut batch = client.batch();
    for car in cars::fleet() {
        batch.set(&fleet.new_doc(), &car)?;
    }

    let receipt = client.commit(batch).await?;
    assert_eq!(receipt.write_count, 5);

    Ok(())
}
