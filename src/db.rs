use mongodb::error::Error;
use mongodb::{options::ClientOptions, Client};

use crate::models::user::User;
use crate::services::user_store::MongoUserStore;

pub async fn init_db(uri: &str) -> Result<Client, Error> {
    let mut client_options = ClientOptions::parse(uri).await?;
    client_options.app_name = Some("QHRMS".to_string());
    Client::with_options(client_options)
}

/// Opens the `users` collection and makes sure its indexes exist.
pub async fn init_user_store(client: &Client, db_name: &str) -> Result<MongoUserStore, Error> {
    let collection = client.database(db_name).collection::<User>("users");
    let store = MongoUserStore::new(collection);
    store.ensure_indexes().await?;
    Ok(store)
}
