//! Collections command handler: describe the registered schemas

use crate::cli::CollectionsArgs;
use crate::error::Result;
use crate::output::OutputWriter;
use contentkit_schemas::validation::SchemaDescription;
use contentkit_schemas::{content_collections, CollectionRegistry};
use tracing::debug;

/// Handle the collections command
pub async fn handle_collections(args: CollectionsArgs, output: &mut OutputWriter) -> Result<()> {
    let registry = content_collections();
    let descriptions = describe(&registry, args.name.as_deref())?;
    debug!(count = descriptions.len(), "Describing collections");

    if !output.is_human() {
        return output.data(&descriptions);
    }

    for description in &descriptions {
        output.section(&format!("Collection: {}", description.name))?;
        output.table(&["Field", "Type", "Required", "Default", "Constraints"], rows(description))?;
    }
    Ok(())
}

/// Describe one named collection or all of them
fn describe(registry: &CollectionRegistry, name: Option<&str>) -> Result<Vec<SchemaDescription>> {
    match name {
        Some(name) => Ok(vec![registry.lookup(name)?.schema().describe()]),
        None => Ok(registry
            .iter()
            .map(|(_, collection)| collection.schema().describe())
            .collect()),
    }
}

fn rows(description: &SchemaDescription) -> Vec<Vec<String>> {
    description
        .fields
        .iter()
        .map(|field| {
            vec![
                field.name.clone(),
                field.kind.clone(),
                if field.required { "yes" } else { "no" }.to_string(),
                field
                    .default
                    .as_ref()
                    .map(ToString::to_string)
                    .unwrap_or_else(|| "-".to_string()),
                if field.constraints.is_empty() {
                    "-".to_string()
                } else {
                    field.constraints.join(", ")
                },
            ]
        })
        .collect()
}
