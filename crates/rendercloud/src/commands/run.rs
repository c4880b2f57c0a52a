//! Run command - execute one resource operation per input item.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result, anyhow, bail};
use clap::Args;
use rendercloud_node::{Parameters, RenderCloudNode, Resource};
use serde_json::{Map, Value};
use tracing::info;

use super::Context;

/// Arguments for the run command.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Resource (e.g. service, deploy, postgres)
    pub resource: String,

    /// Operation (e.g. list, get, create)
    pub operation: String,

    /// Parameter as key=value. Values are parsed as JSON when possible;
    /// dotted keys (filters.name=api) build nested objects.
    #[arg(short = 'p', long = "param", value_name = "KEY=VALUE")]
    pub params: Vec<String>,

    /// JSON file with an object or an array of objects, one item each
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Record per-item failures as {"error": ...} and keep going
    #[arg(long)]
    pub continue_on_fail: bool,
}

/// Run the run command.
pub async fn run(args: RunArgs, ctx: &Context) -> Result<()> {
    let resource: Resource = args.resource.parse()?;

    let mut overrides = Map::new();
    for pair in &args.params {
        let (key, value) = parse_pair(pair)?;
        insert_path(&mut overrides, &key, value);
    }
    overrides.insert("operation".to_string(), Value::String(args.operation.clone()));

    let items = match &args.input {
        Some(path) => read_items(path)?,
        None => vec![Map::new()],
    };
    let items: Vec<Parameters> = items
        .into_iter()
        .map(|mut item| {
            merge(&mut item, overrides.clone());
            Parameters::from(item)
        })
        .collect();

    let loaded = ctx.load_config()?;
    let node = RenderCloudNode::new(ctx.client(&loaded.config)?);

    info!(%resource, operation = %args.operation, items = items.len(), "running");
    let output = node.execute(resource, items, args.continue_on_fail).await?;

    if ctx.json_output {
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!("{}", serde_json::to_string_pretty(&output)?);
    }
    Ok(())
}

/// Split `key=value`, parsing the value as JSON and falling back to a string.
fn parse_pair(pair: &str) -> Result<(String, Value)> {
    let (key, raw) = pair
        .split_once('=')
        .ok_or_else(|| anyhow!("invalid parameter '{}', expected KEY=VALUE", pair))?;
    let key = key.trim();
    if key.is_empty() {
        bail!("invalid parameter '{}', empty key", pair);
    }
    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok((key.to_string(), value))
}

/// Insert at a dotted path, creating intermediate objects.
fn insert_path(map: &mut Map<String, Value>, key: &str, value: Value) {
    match key.split_once('.') {
        None => {
            map.insert(key.to_string(), value);
        }
        Some((head, rest)) => {
            let entry = map
                .entry(head.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            if let Value::Object(inner) = entry {
                insert_path(inner, rest, value);
            }
        }
    }
}

/// Deep-merge `overlay` into `base`; objects merge, everything else replaces.
fn merge(base: &mut Map<String, Value>, overlay: Map<String, Value>) {
    for (key, value) in overlay {
        match value {
            Value::Object(incoming) if base.get(&key).is_some_and(Value::is_object) => {
                if let Some(Value::Object(existing)) = base.get_mut(&key) {
                    merge(existing, incoming);
                }
            }
            value => {
                base.insert(key, value);
            }
        }
    }
}

fn read_items(path: &Path) -> Result<Vec<Map<String, Value>>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let value: Value = serde_json::from_str(&text)
        .with_context(|| format!("{} is not valid JSON", path.display()))?;
    match value {
        Value::Object(item) => Ok(vec![item]),
        Value::Array(values) => values
            .into_iter()
            .enumerate()
            .map(|(i, v)| match v {
                Value::Object(item) => Ok(item),
                other => Err(anyhow!("input item {} is not an object: {}", i, other)),
            })
            .collect(),
        other => bail!("input must be an object or an array of objects, got {}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_pair_values() {
        assert_eq!(parse_pair("limit=5").unwrap(), ("limit".into(), json!(5)));
        assert_eq!(parse_pair("returnAll=true").unwrap(), ("returnAll".into(), json!(true)));
        assert_eq!(
            parse_pair("serviceId=srv-123").unwrap(),
            ("serviceId".into(), json!("srv-123"))
        );
        assert_eq!(parse_pair("value=a=b").unwrap(), ("value".into(), json!("a=b")));
        assert!(parse_pair("novalue").is_err());
        assert!(parse_pair("=x").is_err());
    }

    #[test]
    fn test_insert_dotted_path() {
        let mut map = Map::new();
        insert_path(&mut map, "filters.name", json!("api"));
        insert_path(&mut map, "filters.region", json!("oregon"));
        insert_path(&mut map, "limit", json!(2));
        assert_eq!(
            Value::Object(map),
            json!({"filters": {"name": "api", "region": "oregon"}, "limit": 2})
        );
    }

    #[test]
    fn test_merge_overrides_and_nests() {
        let mut base = json!({"serviceId": "srv-1", "filters": {"name": "a"}})
            .as_object()
            .cloned()
            .unwrap();
        let overlay = json!({"filters": {"region": "ohio"}, "serviceId": "srv-2"})
            .as_object()
            .cloned()
            .unwrap();
        merge(&mut base, overlay);
        assert_eq!(
            Value::Object(base),
            json!({"serviceId": "srv-2", "filters": {"name": "a", "region": "ohio"}})
        );
    }

    #[test]
    fn test_read_items() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("items.json");

        std::fs::write(&path, r#"[{"serviceId": "srv-1"}, {"serviceId": "srv-2"}]"#).unwrap();
        assert_eq!(read_items(&path).unwrap().len(), 2);

        std::fs::write(&path, r#"{"serviceId": "srv-1"}"#).unwrap();
        assert_eq!(read_items(&path).unwrap().len(), 1);

        std::fs::write(&path, r#"[1, 2]"#).unwrap();
        assert!(read_items(&path).is_err());
    }
}
