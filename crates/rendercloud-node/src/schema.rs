//! Declarative field schema.
//!
//! Every resource describes its operations and input fields with these
//! types. The host renders them as a form; [`ResourceDescriptor::to_json`]
//! produces the JSON it consumes.

use serde_json::{Map, Value, json};

use crate::resource::Resource;

/// Input widget kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Number,
    Boolean,
    Options,
    MultiOptions,
    Collection,
    FixedCollection,
    DateTime,
}

impl FieldKind {
    /// Type name as the host spells it.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Number => "number",
            FieldKind::Boolean => "boolean",
            FieldKind::Options => "options",
            FieldKind::MultiOptions => "multiOptions",
            FieldKind::Collection => "collection",
            FieldKind::FixedCollection => "fixedCollection",
            FieldKind::DateTime => "dateTime",
        }
    }

    fn empty_default(&self) -> Value {
        match self {
            FieldKind::String | FieldKind::DateTime | FieldKind::Options => json!(""),
            FieldKind::Number => json!(0),
            FieldKind::Boolean => json!(false),
            FieldKind::MultiOptions => json!([]),
            FieldKind::Collection | FieldKind::FixedCollection => json!({}),
        }
    }
}

/// One choice of an options field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldOption {
    pub name: &'static str,
    pub value: &'static str,
    pub description: Option<&'static str>,
}

/// Shorthand for a [`FieldOption`] without description.
pub fn opt(name: &'static str, value: &'static str) -> FieldOption {
    FieldOption {
        name,
        value,
        description: None,
    }
}

/// One input field.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: &'static str,
    pub display_name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub default: Value,
    pub description: &'static str,
    /// Operation ids the field is shown for. Empty means every operation.
    pub show_for: Vec<&'static str>,
    /// Only shown when another parameter has this value.
    pub show_if: Option<(&'static str, Value)>,
    pub options: Vec<FieldOption>,
    /// Nested fields of a collection. For a fixed collection these are the
    /// fields of one row in [`FieldSpec::group`].
    pub children: Vec<FieldSpec>,
    pub group: Option<&'static str>,
}

impl FieldSpec {
    fn new(name: &'static str, display_name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            display_name,
            kind,
            required: false,
            default: kind.empty_default(),
            description: "",
            show_for: Vec::new(),
            show_if: None,
            options: Vec::new(),
            children: Vec::new(),
            group: None,
        }
    }

    pub fn string(name: &'static str, display_name: &'static str) -> Self {
        Self::new(name, display_name, FieldKind::String)
    }

    pub fn number(name: &'static str, display_name: &'static str) -> Self {
        Self::new(name, display_name, FieldKind::Number)
    }

    pub fn boolean(name: &'static str, display_name: &'static str) -> Self {
        Self::new(name, display_name, FieldKind::Boolean)
    }

    pub fn date_time(name: &'static str, display_name: &'static str) -> Self {
        Self::new(name, display_name, FieldKind::DateTime)
    }

    pub fn options(
        name: &'static str,
        display_name: &'static str,
        options: Vec<FieldOption>,
    ) -> Self {
        let mut field = Self::new(name, display_name, FieldKind::Options);
        if let Some(first) = options.first() {
            field.default = json!(first.value);
        }
        field.options = options;
        field
    }

    pub fn multi_options(
        name: &'static str,
        display_name: &'static str,
        options: Vec<FieldOption>,
    ) -> Self {
        let mut field = Self::new(name, display_name, FieldKind::MultiOptions);
        field.options = options;
        field
    }

    pub fn collection(
        name: &'static str,
        display_name: &'static str,
        children: Vec<FieldSpec>,
    ) -> Self {
        let mut field = Self::new(name, display_name, FieldKind::Collection);
        field.children = children;
        field
    }

    pub fn fixed_collection(
        name: &'static str,
        display_name: &'static str,
        group: &'static str,
        children: Vec<FieldSpec>,
    ) -> Self {
        let mut field = Self::new(name, display_name, FieldKind::FixedCollection);
        field.group = Some(group);
        field.children = children;
        field
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = value.into();
        self
    }

    pub fn description(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    pub fn show_for(mut self, operations: &[&'static str]) -> Self {
        self.show_for = operations.to_vec();
        self
    }

    pub fn show_if(mut self, parameter: &'static str, value: impl Into<Value>) -> Self {
        self.show_if = Some((parameter, value.into()));
        self
    }

    /// Whether the field applies to an operation.
    pub fn applies_to(&self, operation: &str) -> bool {
        self.show_for.is_empty() || self.show_for.contains(&operation)
    }

    /// Render in the host's property format.
    pub fn to_json(&self, resource: &str) -> Value {
        let mut out = Map::new();
        out.insert("displayName".into(), json!(self.display_name));
        out.insert("name".into(), json!(self.name));
        out.insert("type".into(), json!(self.kind.as_str()));
        if self.required {
            out.insert("required".into(), json!(true));
        }
        out.insert("default".into(), self.default.clone());
        if !self.description.is_empty() {
            out.insert("description".into(), json!(self.description));
        }

        if !resource.is_empty() {
            let mut show = Map::new();
            show.insert("resource".into(), json!([resource]));
            if !self.show_for.is_empty() {
                show.insert("operation".into(), json!(self.show_for));
            }
            if let Some((param, value)) = &self.show_if {
                show.insert((*param).into(), json!([value]));
            }
            out.insert("displayOptions".into(), json!({ "show": show }));
        }

        if !self.options.is_empty() {
            let options: Vec<Value> = self
                .options
                .iter()
                .map(|o| {
                    let mut v = json!({ "name": o.name, "value": o.value });
                    if let Some(d) = o.description {
                        v["description"] = json!(d);
                    }
                    v
                })
                .collect();
            out.insert("options".into(), Value::Array(options));
        }

        match (self.kind, self.group) {
            (FieldKind::FixedCollection, Some(group)) => {
                let values: Vec<Value> = self.children.iter().map(|c| c.to_json("")).collect();
                out.insert("typeOptions".into(), json!({ "multipleValues": true }));
                out.insert(
                    "options".into(),
                    json!([{ "name": group, "displayName": self.display_name, "values": values }]),
                );
            }
            _ if !self.children.is_empty() => {
                let children: Vec<Value> = self.children.iter().map(|c| c.to_json("")).collect();
                out.insert("placeholder".into(), json!("Add Field"));
                out.insert("options".into(), Value::Array(children));
            }
            _ => {}
        }

        Value::Object(out)
    }
}

/// One operation of a resource.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationSpec {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub action: &'static str,
}

/// Shorthand for an [`OperationSpec`].
pub fn op(
    id: &'static str,
    name: &'static str,
    description: &'static str,
    action: &'static str,
) -> OperationSpec {
    OperationSpec {
        id,
        name,
        description,
        action,
    }
}

/// Everything the host needs to know about one resource.
#[derive(Debug, Clone)]
pub struct ResourceDescriptor {
    pub resource: Resource,
    pub display_name: &'static str,
    pub description: &'static str,
    pub default_operation: &'static str,
    pub operations: Vec<OperationSpec>,
    pub fields: Vec<FieldSpec>,
}

impl ResourceDescriptor {
    pub fn operation(&self, id: &str) -> Option<&OperationSpec> {
        self.operations.iter().find(|o| o.id == id)
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Fields shown for one operation, in declaration order.
    pub fn fields_for<'a>(&'a self, operation: &'a str) -> impl Iterator<Item = &'a FieldSpec> + 'a {
        self.fields.iter().filter(move |f| f.applies_to(operation))
    }

    /// Render the operation selector followed by every field.
    pub fn to_json(&self) -> Vec<Value> {
        let resource = self.resource.id();
        let operations: Vec<Value> = self
            .operations
            .iter()
            .map(|o| {
                json!({
                    "name": o.name,
                    "value": o.id,
                    "description": o.description,
                    "action": o.action,
                })
            })
            .collect();

        let mut properties = vec![json!({
            "displayName": "Operation",
            "name": "operation",
            "type": "options",
            "noDataExpression": true,
            "displayOptions": { "show": { "resource": [resource] } },
            "options": operations,
            "default": self.default_operation,
        })];
        properties.extend(self.fields.iter().map(|f| f.to_json(resource)));
        properties
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Shared fields
// ─────────────────────────────────────────────────────────────────────────────

pub(crate) fn return_all(operations: &[&'static str]) -> FieldSpec {
    FieldSpec::boolean("returnAll", "Return All")
        .default(false)
        .description("Whether to return all results or only up to a given limit")
        .show_for(operations)
}

pub(crate) fn limit(operations: &[&'static str], default: u32) -> FieldSpec {
    FieldSpec::number("limit", "Limit")
        .default(default)
        .description("Max number of results to return")
        .show_for(operations)
        .show_if("returnAll", false)
}

pub(crate) fn region_options() -> Vec<FieldOption> {
    vec![
        opt("Frankfurt", "frankfurt"),
        opt("Ohio", "ohio"),
        opt("Oregon", "oregon"),
        opt("Singapore", "singapore"),
        opt("Virginia", "virginia"),
    ]
}

pub(crate) fn plan_options(with_free: bool) -> Vec<FieldOption> {
    let mut plans = Vec::with_capacity(5);
    if with_free {
        plans.push(opt("Free", "free"));
    }
    plans.extend([
        opt("Starter", "starter"),
        opt("Standard", "standard"),
        opt("Pro", "pro"),
        opt("Pro Plus", "pro_plus"),
    ]);
    plans
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_follow_kind() {
        assert_eq!(FieldSpec::string("a", "A").default, json!(""));
        assert_eq!(FieldSpec::boolean("a", "A").default, json!(false));
        assert_eq!(FieldSpec::collection("a", "A", vec![]).default, json!({}));
        let field = FieldSpec::options("region", "Region", region_options());
        assert_eq!(field.default, json!("frankfurt"));
        let field = field.default("oregon");
        assert_eq!(field.default, json!("oregon"));
    }

    #[test]
    fn test_applies_to() {
        let field = FieldSpec::string("serviceId", "Service ID").show_for(&["get", "delete"]);
        assert!(field.applies_to("get"));
        assert!(!field.applies_to("list"));
        assert!(FieldSpec::string("x", "X").applies_to("anything"));
    }

    #[test]
    fn test_field_json_carries_display_options() {
        let field = limit(&["list"], 20);
        let value = field.to_json("service");
        assert_eq!(value["type"], "number");
        assert_eq!(value["default"], 20);
        assert_eq!(value["displayOptions"]["show"]["resource"], json!(["service"]));
        assert_eq!(value["displayOptions"]["show"]["operation"], json!(["list"]));
        assert_eq!(value["displayOptions"]["show"]["returnAll"], json!([false]));
    }

    #[test]
    fn test_fixed_collection_json_nests_group() {
        let field = FieldSpec::fixed_collection(
            "envVars",
            "Environment Variables",
            "envVarValues",
            vec![FieldSpec::string("key", "Key")],
        );
        let value = field.to_json("environmentVariable");
        assert_eq!(value["type"], "fixedCollection");
        assert_eq!(value["options"][0]["name"], "envVarValues");
        assert_eq!(value["options"][0]["values"][0]["name"], "key");
        assert!(value["options"][0]["values"][0].get("displayOptions").is_none());
    }

    #[test]
    fn test_plan_options() {
        assert_eq!(plan_options(true).len(), 5);
        assert_eq!(plan_options(false)[0].value, "starter");
    }
}
