use std::collections::BTreeMap;

use serde::{Serialize, Deserialize};

/// Named fields pulled out of a page, keyed by field name.
pub type FieldMap = BTreeMap<String, String>;

/// One archived page: the extracted fields plus where and when they came
/// from. The fields are flattened into the top level of the JSON artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapedRecord {
    pub id: String,
    pub url: String,
    pub scraped_at: String,
    #[serde(flatten)]
    pub fields: FieldMap,
}

impl ScrapedRecord {
    pub fn new(id: &str, url: &str, fields: FieldMap) -> Self {
        Self {
            id: id.to_string(),
            url: url.to_string(),
            scraped_at: chrono::Utc::now().to_rfc3339(),
            fields,
        }
    }
}
