//! jbuild-lib: Core types and logic for jbuild
//!
//! This crate implements a Maven-style build pipeline for multi-module Java
//! source trees:
//! - `config`: project configuration discovery with default fallback
//! - `scan`: source file enumeration per module
//! - `toolchain`: external compiler/archiver/runtime invocation
//! - `compile`: per-module compilation and result aggregation
//! - `testing`: test compilation, execution and reporting
//! - `repository`: the local artifact repository used by `install`
//! - `pipeline`: the clean/compile/test/package/install lifecycle

pub mod compile;
pub mod config;
pub mod consts;
pub mod context;
pub mod pipeline;
pub mod platform;
pub mod repository;
pub mod scan;
pub mod testing;
pub mod toolchain;
pub mod util;
