use super::{connect, lookup_error, print_json, print_record};
use crate::error::Result;
use crate::gateway::{Gateway, Resource};

/// Display a single record
pub async fn cmd_show(resource: Resource, id: &str, json: bool) -> Result<()> {
    let (_, gateway) = connect()?;
    let record = gateway
        .get(resource, id)
        .await
        .map_err(|e| lookup_error(e, id))?;

    if json {
        print_json(&serde_json::to_value(&record)?)
    } else {
        print_record(&record);
        Ok(())
    }
}
