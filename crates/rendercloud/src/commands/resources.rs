//! Resources command - browse the node's resources and operations.

use anyhow::Result;
use clap::Args;
use console::{Style, style};
use rendercloud_node::{Resource, ResourceDescriptor, node_description, registry};
use serde_json::Value;

use super::Context;

/// Arguments for the resources command.
#[derive(Args, Debug)]
pub struct ResourcesArgs {
    /// Show operations and fields of one resource (e.g. service, keyValue)
    pub resource: Option<String>,

    /// Only list fields used by this operation
    #[arg(short, long, requires = "resource")]
    pub operation: Option<String>,
}

/// Run the resources command.
pub async fn run(args: ResourcesArgs, ctx: &Context) -> Result<()> {
    match args.resource {
        None if ctx.json_output => {
            println!("{}", serde_json::to_string_pretty(&node_description())?);
        }
        None => print_overview(),
        Some(name) => {
            let resource: Resource = name.parse()?;
            let descriptor = resource.descriptor();
            if let Some(op) = &args.operation
                && descriptor.operation(op).is_none()
            {
                anyhow::bail!("Unknown operation: {} for resource {}", op, resource);
            }
            if ctx.json_output {
                let properties = Value::Array(descriptor.to_json());
                println!("{}", serde_json::to_string_pretty(&properties)?);
            } else {
                print_resource(descriptor, args.operation.as_deref());
            }
        }
    }
    Ok(())
}

fn print_overview() {
    let dim = Style::new().dim();

    println!();
    println!("{}", style("Render Cloud Resources").bold());
    println!("{}", dim.apply_to("─".repeat(40)));
    for descriptor in registry() {
        let ops: Vec<&str> = descriptor.operations.iter().map(|o| o.id).collect();
        println!(
            "  {:<22} {}",
            style(descriptor.resource.id()).cyan(),
            descriptor.display_name
        );
        println!("  {:<22} {}", "", dim.apply_to(ops.join(", ")));
    }
    println!();
}

fn print_resource(descriptor: &ResourceDescriptor, operation: Option<&str>) {
    let dim = Style::new().dim();
    let yellow = Style::new().yellow();

    println!();
    println!(
        "{} {}",
        style(descriptor.display_name).bold(),
        dim.apply_to(format!("({})", descriptor.resource))
    );
    println!("{}", dim.apply_to(descriptor.description));
    println!();

    for op in &descriptor.operations {
        if operation.is_some_and(|o| o != op.id) {
            continue;
        }
        let default = if op.id == descriptor.default_operation {
            " (default)"
        } else {
            ""
        };
        println!(
            "  {}{}  {}",
            style(op.id).cyan(),
            dim.apply_to(default),
            op.description
        );
        for field in descriptor.fields_for(op.id) {
            let required = if field.required {
                yellow.apply_to(" required").to_string()
            } else {
                String::new()
            };
            println!(
                "      {:<22} {}{}",
                field.name,
                dim.apply_to(field.kind.as_str()),
                required
            );
        }
    }
    println!();
}
