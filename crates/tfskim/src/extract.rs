//! Block extraction.
//!
//! Turns a parsed file body into [Config] entries. Only `module`, `resource`
//! and `locals` blocks are recognized; every other block kind (and top-level
//! attributes) is left alone, so files can mix in `terraform`, `provider` or
//! `output` blocks freely.

use crate::config::{Config, Local, Module, Resource};
use crate::diagnostics::{Diagnostics, Warning};
use crate::eval::Evaluator;
use crate::value::Value;
use hcl_edit::structure::{Block, Body};
use indexmap::IndexMap;

/// A `module` block whose `source` attribute is not a string.
///
/// The source is the one attribute later stages depend on, so this is the
/// single extraction error that aborts a run instead of degrading.
#[derive(thiserror::Error, Debug)]
#[error("module {labels:?} has a source that is not a string")]
pub struct ModuleSourceError {
    labels: Vec<String>,
}

/// Extracts all recognized blocks from one file body, in declaration order.
pub fn extract_body(
    body: &Body,
    diagnostics: &mut Diagnostics,
) -> Result<Config, ModuleSourceError> {
    let mut config = Config::default();

    for block in body.blocks() {
        match block.ident.value().as_str() {
            "module" => config.modules.push(extract_module(block, diagnostics)?),
            "resource" => {
                if let Some(resource) = extract_resource(block, diagnostics) {
                    config.resources.push(resource);
                }
            }
            "locals" => config.locals.push(extract_locals(block, diagnostics)),
            other => tracing::trace!(kind = other, "ignoring block"),
        }
    }

    Ok(config)
}

fn extract_module(
    block: &Block,
    diagnostics: &mut Diagnostics,
) -> Result<Module, ModuleSourceError> {
    let labels = block_labels(block);
    let mut source = String::new();
    let mut attributes = IndexMap::new();

    let mut evaluator = Evaluator::new(diagnostics);
    for attribute in block.body.attributes() {
        let name = attribute.key.value().as_str();
        let expression: hcl::Expression = attribute.value.clone().into();
        let value = evaluator.evaluate(&expression);

        if name == "source" {
            match &value {
                Value::Text(text) => source = text.clone(),
                Value::Object(_) => {
                    return Err(ModuleSourceError {
                        labels: labels.clone(),
                    })
                }
            }
        }

        attributes.insert(name.to_string(), value);
    }

    Ok(Module {
        source,
        labels,
        attributes,
    })
}

fn extract_resource(block: &Block, diagnostics: &mut Diagnostics) -> Option<Resource> {
    let labels = block_labels(block);

    // Two labels carry type and name; a resource without both is unusable.
    if labels.len() < 2 {
        diagnostics.record(Warning::ResourceLabelsMissing(labels));
        return None;
    }

    let mut attributes = IndexMap::new();

    let mut evaluator = Evaluator::new(diagnostics);
    for attribute in block.body.attributes() {
        let expression: hcl::Expression = attribute.value.clone().into();
        attributes.insert(
            attribute.key.value().as_str().to_string(),
            evaluator.evaluate(&expression),
        );
    }

    for nested in block.body.blocks() {
        fold_nested_block(nested, &mut attributes, diagnostics);
    }

    Some(Resource {
        resource_type: labels[0].clone(),
        name: labels[1].clone(),
        labels,
        attributes,
    })
}

/// Folds a nested block (`environment { ... }`) into its parent's attributes
/// as an object member named after the block.
///
/// Repeated blocks of the same name merge into one object. A plain attribute
/// of the same name is replaced, and the replacement recorded. Blocks nested
/// a level deeper are not descended into.
fn fold_nested_block(
    block: &Block,
    attributes: &mut IndexMap<String, Value>,
    diagnostics: &mut Diagnostics,
) {
    let mut members = IndexMap::new();

    let mut evaluator = Evaluator::new(diagnostics);
    for attribute in block.body.attributes() {
        let expression: hcl::Expression = attribute.value.clone().into();
        members.insert(
            attribute.key.value().as_str().to_string(),
            evaluator.evaluate(&expression),
        );
    }

    let name = block.ident.value().as_str();

    if let Some(Value::Object(existing)) = attributes.get_mut(name) {
        existing.extend(members);
        return;
    }

    if attributes.contains_key(name) {
        diagnostics.record(Warning::NestedBlockShadowsAttribute(name.to_string()));
    }

    attributes.insert(name.to_string(), Value::Object(members));
}

fn extract_locals(block: &Block, diagnostics: &mut Diagnostics) -> Local {
    let mut attributes = IndexMap::new();

    let mut evaluator = Evaluator::new(diagnostics);
    for attribute in block.body.attributes() {
        let expression: hcl::Expression = attribute.value.clone().into();
        attributes.insert(
            attribute.key.value().as_str().to_string(),
            evaluator.evaluate(&expression),
        );
    }

    Local { attributes }
}

fn block_labels(block: &Block) -> Vec<String> {
    block
        .labels
        .iter()
        .map(|label| label.as_str().to_string())
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    fn body(input: &str) -> Body {
        hcl_edit::parser::parse_body(input).expect("body must parse")
    }

    fn extract(input: &str) -> (Config, Vec<Warning>) {
        let mut diagnostics = Diagnostics::default();
        let config = extract_body(&body(input), &mut diagnostics).expect("extraction must succeed");
        (config, diagnostics.warnings().to_vec())
    }

    fn text(value: &str) -> Value {
        Value::Text(value.to_string())
    }

    #[test]
    fn resource_labels_and_attributes() {
        let (config, warnings) = extract(
            r#"
            resource "aws_lambda_function" "handler" {
              function_name = "svc-handler"
              timeout       = 30
              tags          = { team = "platform" }
            }
            "#,
        );

        assert_eq!(config.resources.len(), 1);
        let resource = &config.resources[0];
        assert_eq!(resource.resource_type, "aws_lambda_function");
        assert_eq!(resource.name, "handler");
        assert_eq!(
            resource.labels,
            vec!["aws_lambda_function".to_string(), "handler".to_string()]
        );
        assert_eq!(resource.attributes["function_name"], text("svc-handler"));
        assert_eq!(resource.attributes["timeout"], text("30"));
        assert_eq!(
            resource.attributes["tags"],
            Value::Object(IndexMap::from([("team".to_string(), text("platform"))]))
        );
        assert_eq!(warnings, vec![]);
    }

    #[test]
    fn resource_without_both_labels_is_skipped() {
        let (config, warnings) = extract(r#"resource "aws_s3_bucket" {}"#);

        assert!(config.resources.is_empty());
        assert_eq!(
            warnings,
            vec![Warning::ResourceLabelsMissing(vec![
                "aws_s3_bucket".to_string()
            ])]
        );
    }

    #[test]
    fn nested_block_folds_into_object_member() {
        let (config, warnings) = extract(
            r#"
            resource "aws_lambda_function" "handler" {
              handler = "index.main"

              environment {
                variables = { STAGE = "prod" }
              }
            }
            "#,
        );

        let resource = &config.resources[0];
        assert_eq!(resource.attributes["handler"], text("index.main"));
        assert_eq!(
            resource.attributes["environment"],
            Value::Object(IndexMap::from([(
                "variables".to_string(),
                Value::Object(IndexMap::from([("STAGE".to_string(), text("prod"))])),
            )]))
        );
        assert_eq!(warnings, vec![]);
    }

    #[test]
    fn repeated_nested_blocks_merge() {
        let (config, _) = extract(
            r#"
            resource "aws_instance" "web" {
              ebs_block_device {
                device_name = "/dev/sdf"
              }

              ebs_block_device {
                volume_size = 100
              }
            }
            "#,
        );

        let devices = &config.resources[0].attributes["ebs_block_device"];
        assert_eq!(
            devices,
            &Value::Object(IndexMap::from([
                ("device_name".to_string(), text("/dev/sdf")),
                ("volume_size".to_string(), text("100")),
            ]))
        );
    }

    #[test]
    fn nested_block_replaces_scalar_attribute() {
        let (config, warnings) = extract(
            r#"
            resource "aws_instance" "web" {
              lifecycle = "keep"

              lifecycle {
                create_before_destroy = "true"
              }
            }
            "#,
        );

        assert_eq!(
            config.resources[0].attributes["lifecycle"],
            Value::Object(IndexMap::from([(
                "create_before_destroy".to_string(),
                text("true"),
            )]))
        );
        assert_eq!(
            warnings,
            vec![Warning::NestedBlockShadowsAttribute("lifecycle".to_string())]
        );
    }

    #[test]
    fn blocks_nested_two_levels_down_are_not_descended() {
        let (config, _) = extract(
            r#"
            resource "aws_instance" "web" {
              root_block_device {
                volume_size = 20

                tuning {
                  iops = 3000
                }
              }
            }
            "#,
        );

        let device = &config.resources[0].attributes["root_block_device"];
        assert_eq!(
            device,
            &Value::Object(IndexMap::from([("volume_size".to_string(), text("20"))]))
        );
    }

    #[test]
    fn module_source_and_attributes() {
        let (config, warnings) = extract(
            r#"
            module "network" {
              source = "./modules/network"
              cidr   = "10.0.0.0/16"
            }
            "#,
        );

        assert_eq!(config.modules.len(), 1);
        let module = &config.modules[0];
        assert_eq!(module.source, "./modules/network");
        assert_eq!(module.labels, vec!["network".to_string()]);
        assert_eq!(module.attributes["source"], text("./modules/network"));
        assert_eq!(module.attributes["cidr"], text("10.0.0.0/16"));
        assert_eq!(warnings, vec![]);
    }

    #[test]
    fn module_without_source_has_empty_source() {
        let (config, _) = extract(r#"module "bare" { stage = "dev" }"#);

        assert_eq!(config.modules[0].source, "");
    }

    #[test]
    fn module_with_non_text_source_is_an_error() {
        let mut diagnostics = Diagnostics::default();
        let result = extract_body(
            &body(r#"module "bad" { source = { a = "b" } }"#),
            &mut diagnostics,
        );

        let error = result.expect_err("object source must be rejected");
        assert!(error.to_string().contains("bad"));
    }

    #[test]
    fn locals_collected_per_block() {
        let (config, warnings) = extract(
            r#"
            locals {
              service = "billing"
              port    = 8080
            }

            locals {
              owner = "core"
            }
            "#,
        );

        assert_eq!(config.locals.len(), 2);
        assert_eq!(
            config.locals[0].attributes,
            IndexMap::from([
                ("service".to_string(), text("billing")),
                ("port".to_string(), text("8080")),
            ])
        );
        assert_eq!(config.locals[1].attributes["owner"], text("core"));
        assert_eq!(warnings, vec![]);
    }

    #[test]
    fn unrecognized_blocks_and_root_attributes_are_ignored() {
        let (config, warnings) = extract(
            r#"
            skipped = "top-level"

            terraform {
              required_version = ">= 1.0"
            }

            provider "aws" {
              region = "eu-central-1"
            }

            variable "stage" {
              default = "dev"
            }

            output "arn" {
              value = aws_lambda_function.handler.arn
            }
            "#,
        );

        assert!(config.is_empty());
        assert_eq!(warnings, vec![]);
    }

    #[test]
    fn declaration_order_is_kept_per_kind() {
        let (config, _) = extract(
            r#"
            resource "aws_sqs_queue" "a" {}
            module "m" { source = "./m" }
            resource "aws_sqs_queue" "b" {}
            "#,
        );

        let names: Vec<_> = config.resources.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(config.modules.len(), 1);
    }
}
