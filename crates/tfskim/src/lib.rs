//! # tfskim - terraform configuration skimming
//!
//! For CLI usage see the README.
//!
//! ## Introduction for developers
//!
//! Read this to understand how `tfskim` works internally.
//!
//! ### HCL Terms
//!
//! Quick introduction to terms used to describe elements of HCL documents.
//!
//! In hcl terms...
//! - a file gets parsed as a `body`
//! - ...which is just a list of `structures`
//! - ...where there are two kinds:
//!   - `attribute`: a "key = value" pair
//!   - or `block`:
//!     - 1 `identifier`
//!     - followed by 0 or more `labels`
//!     - and a `body` enclosed in `{` and `}`
//!
//! A terraform file is plain HCL with well-known block identifiers:
//!
//! ```hcl
//! resource "aws_sqs_queue" "events" {
//!   name = "${var.stage}-events"
//! }
//!
//! module "network" {
//!   source = "./modules/network"
//! }
//!
//! locals {
//!   stage = "dev"
//! }
//! ```
//!
//! ### Loading files
//!
//! A [loader::Loader] collects files from explicit paths and from recursive
//! directory walks. Only files with the `tf` extension are read, and
//! anything under a `.terraform` directory (the tooling's own cache) is
//! skipped. Each file is parsed into an [hcl_edit::structure::Body]; a file
//! only has to be valid HCL to be accepted.
//!
//! ### Extraction
//!
//! [extract::extract_body] walks the root blocks of each body and picks out
//! the kinds that make up the model: `resource`, `module` and `locals`.
//! Other blocks (`terraform`, `provider`, `output`, ...) are ignored, so the
//! model stays small. Blocks nested inside a resource fold into the
//! resource's attributes as objects named after the block.
//!
//! ### Evaluation
//!
//! Attribute expressions are reduced without evaluating anything for real:
//! there is no variable scope and no function table. References keep their
//! textual shape (`var.stage` stays `var.stage`), templates concatenate
//! their parts, tuples join into comma-separated text and objects keep their
//! structure. The result is a [value::Value]: either text or an object.
//!
//! Whatever cannot be expressed that way reduces to empty text and leaves a
//! warning in the run's [diagnostics::Diagnostics], so a single odd
//! expression never sinks a whole directory.
//!
//! ### Output
//!
//! The extracted [config::Config] serializes via [serde] as JSON or YAML.
//!
pub mod config;
pub mod diagnostics;
mod eval;
pub mod extract;
pub mod loader;
pub mod value;
