//! MongoDB database wrapper.

use mongodb::bson::{doc, Document};
use mongodb::options::{ClientOptions, IndexOptions};
use mongodb::{Client, Collection, IndexModel};
use tracing::info;

/// Database wrapper for MongoDB operations.
#[derive(Debug, Clone)]
pub struct Database {
    db: mongodb::Database,
}

impl Database {
    /// Connect to MongoDB with the given URI and database name.
    ///
    /// # Arguments
    /// * `uri` - MongoDB connection string
    /// * `db_name` - Database name to use
    ///
    /// # Errors
    /// Returns error if connection fails.
    pub async fn connect(uri: &str, db_name: &str) -> anyhow::Result<Self> {
        let options = ClientOptions::parse(uri).await?;
        let client = Client::with_options(options)?;

        // Ping the database to verify connection
        client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await?;

        info!("Successfully connected to MongoDB");

        Ok(Self {
            db: client.database(db_name),
        })
    }

    /// Get a typed collection from the database.
    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }

    /// Ensure a unique ascending index on `field` exists.
    pub async fn ensure_unique_index<T: Send + Sync>(
        &self,
        collection: &str,
        field: &str,
    ) -> anyhow::Result<()> {
        let mut keys = Document::new();
        keys.insert(field, 1);

        let model = IndexModel::builder()
            .keys(keys)
            .options(IndexOptions::builder().unique(true).build())
            .build();

        self.collection::<T>(collection).create_index(model).await?;
        info!("Index on {}.{} ready", collection, field);
        Ok(())
    }
}
