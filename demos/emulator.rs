use car_seeder::{
    firestore::client::FirestoreClientOptions,
    seeder::{self, SeederOptions},
};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().init();

    // This assumes that a local Firebase emulator is running with a config
    // similar to this:
    // {
    //   "emulators": {
    //     "firestore": {
    //       "port": 8081
    //     }
    //   }
    // }
    // Important note: you must use 127.0.0.1 instead of localhost.
    let client_options = FirestoreClientOptions::default().host_url("http://127.0.0.1:8081");

    let options = SeederOptions::default()
        .credential_path("./serviceAccountKey.json")
        .client_options(client_options);

    match seeder::run(options).await {
        Some(report) => {
            for doc_ref in &report.documents {
                println!("{doc_ref}");
            }
        }
        None => println!("Nothing was written, see the log above"),
    }
}
