use std::collections::HashMap;

use async_trait::async_trait;
use rusoto_core::Region;
use rusoto_dynamodb::{
    AttributeValue, DynamoDb, DynamoDbClient, GetItemInput, PutItemInput, UpdateItemInput,
};
use tracing::debug;

use crate::config::CounterConfig;
use crate::error::{CounterError, Result};
use crate::models::counter::CounterRecord;
use crate::store::CounterStore;

const ID_ATTR: &str = "id";
const VIEWS_ATTR: &str = "views";

/// Counter store backed by a DynamoDB table.
///
/// Items have the shape `{ id: S, views: N }`, keyed on `id`.
pub struct DynamoStore {
    client: DynamoDbClient,
    table: String,
}

impl DynamoStore {
    pub fn new(client: DynamoDbClient, table: impl Into<String>) -> Self {
        Self {
            client,
            table: table.into(),
        }
    }

    /// Region comes from `AWS_DEFAULT_REGION` / `AWS_REGION`; a configured
    /// endpoint overrides it (DynamoDB Local).
    pub fn from_config(config: &CounterConfig) -> Self {
        let region = match &config.dynamodb_endpoint {
            Some(endpoint) => Region::Custom {
                name: Region::default().name().to_string(),
                endpoint: endpoint.clone(),
            },
            None => Region::default(),
        };

        debug!(table = %config.table, region = region.name(), "creating dynamodb client");
        Self::new(DynamoDbClient::new(region), config.table.clone())
    }

    fn key(id: &str) -> HashMap<String, AttributeValue> {
        let mut key = HashMap::new();
        key.insert(ID_ATTR.to_string(), string_value(id));
        key
    }
}

#[async_trait]
impl CounterStore for DynamoStore {
    async fn get(&self, key: &str) -> Result<Option<CounterRecord>> {
        let output = self
            .client
            .get_item(GetItemInput {
                table_name: self.table.clone(),
                key: Self::key(key),
                consistent_read: Some(true),
                ..Default::default()
            })
            .await
            .map_err(CounterError::store)?;

        match output.item {
            Some(item) => Ok(Some(CounterRecord::new(key, views_from_item(&item)?))),
            None => Ok(None),
        }
    }

    async fn put(&self, record: &CounterRecord) -> Result<()> {
        self.client
            .put_item(PutItemInput {
                table_name: self.table.clone(),
                item: item_from_record(record),
                ..Default::default()
            })
            .await
            .map_err(CounterError::store)?;
        Ok(())
    }

    async fn increment(&self, key: &str) -> Result<u64> {
        let mut names = HashMap::new();
        names.insert("#views".to_string(), VIEWS_ATTR.to_string());
        let mut values = HashMap::new();
        values.insert(":one".to_string(), number_value(1));

        let output = self
            .client
            .update_item(UpdateItemInput {
                table_name: self.table.clone(),
                key: Self::key(key),
                update_expression: Some("ADD #views :one".to_string()),
                expression_attribute_names: Some(names),
                expression_attribute_values: Some(values),
                return_values: Some("UPDATED_NEW".to_string()),
                ..Default::default()
            })
            .await
            .map_err(CounterError::store)?;

        let attributes = output
            .attributes
            .ok_or_else(|| CounterError::MalformedRecord("update returned no attributes".to_string()))?;
        views_from_item(&attributes)
    }

    fn backend(&self) -> &'static str {
        "dynamodb"
    }
}

fn string_value(s: &str) -> AttributeValue {
    AttributeValue {
        s: Some(s.to_string()),
        ..Default::default()
    }
}

fn number_value(n: u64) -> AttributeValue {
    AttributeValue {
        n: Some(n.to_string()),
        ..Default::default()
    }
}

fn item_from_record(record: &CounterRecord) -> HashMap<String, AttributeValue> {
    let mut item = HashMap::new();
    item.insert(ID_ATTR.to_string(), string_value(&record.id));
    item.insert(VIEWS_ATTR.to_string(), number_value(record.views));
    item
}

/// Reads `views` from an item. Numbers written by other tools may arrive as
/// strings or with a zero fraction (`"5.0"`); both are accepted.
fn views_from_item(item: &HashMap<String, AttributeValue>) -> Result<u64> {
    let attr = item
        .get(VIEWS_ATTR)
        .ok_or_else(|| CounterError::MalformedRecord(format!("missing '{VIEWS_ATTR}' attribute")))?;
    let raw = attr
        .n
        .as_deref()
        .or(attr.s.as_deref())
        .ok_or_else(|| CounterError::MalformedRecord(format!("'{VIEWS_ATTR}' is not a number")))?;

    parse_views(raw)
}

fn parse_views(raw: &str) -> Result<u64> {
    let raw = raw.trim();
    let integral = match raw.split_once('.') {
        Some((whole, fraction)) if fraction.chars().all(|c| c == '0') => whole,
        _ => raw,
    };
    integral
        .parse::<u64>()
        .map_err(|_| CounterError::MalformedRecord(format!("'{VIEWS_ATTR}' has invalid value '{raw}'")))
}
