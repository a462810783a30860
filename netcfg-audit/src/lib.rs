//! Command-line front end for auditing Cisco-style device configurations.
//!
//! The rule engine lives in `netcfg-audit-core`. This crate supplies the
//! pieces around it:
//!
//! - [`inventory`]: connection inventory YAML and credential prompts
//! - [`session`]: device session traits and platform paging commands
//! - [`ssh`]: blocking SSH transport built on `ssh2`
//! - [`provider`]: target providers for config directories and live devices
//! - [`report`]: colored table rendering of run results
//! - [`sink`]: forwards engine events to `tracing`
//!
//! # Examples
//!
//! ```ignore
//! use netcfg_audit::provider::{list_config_files, FileProvider};
//! use netcfg_audit::sink::TracingSink;
//! use netcfg_audit_core::{evaluate_run, load_file, EvalOptions, TargetSource};
//!
//! let baseline = load_file("baseline.yaml".as_ref())?;
//! let targets = list_config_files("configs".as_ref())?;
//! let mut provider = FileProvider::new("configs");
//! let run = evaluate_run(
//!     TargetSource::File,
//!     targets,
//!     &mut provider,
//!     &baseline,
//!     EvalOptions::default(),
//!     &mut TracingSink,
//! );
//! ```

pub mod inventory;
pub mod provider;
pub mod report;
pub mod session;
pub mod sink;
pub mod ssh;
