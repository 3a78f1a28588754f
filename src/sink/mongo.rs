//! MongoDB time-series adapter.

use mongodb::bson::{doc, DateTime as BsonDateTime, Document};
use mongodb::options::{
    ClientOptions, CreateCollectionOptions, TimeseriesGranularity, TimeseriesOptions,
};
use mongodb::{Client, Database};
use tracing::{debug, info};

use crate::buffer::Entry;
use crate::config::Config;
use crate::error::{Result, TemplogError};
use crate::sink::RemoteSink;
use crate::{COLLECTION_NAME, DATABASE_NAME};

/// Sink backed by a MongoDB time-series collection.
///
/// Readings land in [`crate::COLLECTION_NAME`] keyed by the configured
/// sensor identity (meta field) and the capture timestamp (time field).
pub struct MongoSink {
    database: Database,
    sensor_id: String,
}

impl MongoSink {
    /// Connect to the store and verify it is actually reachable.
    ///
    /// The driver connects lazily, so without the explicit ping an
    /// unreachable host would only surface mid-drain as an insert failure.
    pub async fn connect(config: &Config) -> Result<Self> {
        let options = ClientOptions::parse(config.mongo_uri())
            .await
            .map_err(|e| TemplogError::remote_connect_error(e.to_string()))?;
        let client = Client::with_options(options)
            .map_err(|e| TemplogError::remote_connect_error(e.to_string()))?;
        let database = client.database(DATABASE_NAME);

        database
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| TemplogError::remote_connect_error(e.to_string()))?;
        debug!("connected to remote store at {}", config.mongo_host);

        Ok(Self {
            database,
            sensor_id: config.sensor_id.clone(),
        })
    }
}

impl RemoteSink for MongoSink {
    async fn ensure_schema(&self) -> Result<()> {
        let existing = self
            .database
            .list_collection_names(None)
            .await
            .map_err(|e| TemplogError::remote_connect_error(e.to_string()))?;
        if existing.iter().any(|name| name == COLLECTION_NAME) {
            return Ok(());
        }

        let timeseries = TimeseriesOptions::builder()
            .time_field("timestamp".to_string())
            .meta_field(Some("sensor_id".to_string()))
            .granularity(Some(TimeseriesGranularity::Minutes))
            .build();
        let options = CreateCollectionOptions::builder()
            .timeseries(timeseries)
            .build();
        self.database
            .create_collection(COLLECTION_NAME, options)
            .await
            .map_err(|e| TemplogError::remote_connect_error(e.to_string()))?;
        info!("created time-series collection `{}`", COLLECTION_NAME);

        Ok(())
    }

    async fn insert_one(&self, entry: &Entry) -> Result<()> {
        let document = doc! {
            "sensor_id": &self.sensor_id,
            "timestamp": BsonDateTime::from_millis(entry.timestamp.timestamp_millis()),
            "temperature": entry.temperature,
        };

        self.database
            .collection::<Document>(COLLECTION_NAME)
            .insert_one(document, None)
            .await
            .map_err(|e| TemplogError::remote_insert_error(e.to_string()))?;

        Ok(())
    }
}
