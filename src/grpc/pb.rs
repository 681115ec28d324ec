//! Generated `tei.v1` wire types and stubs, compiled by `build.rs`.
//!
//! Uses protoc-bin-vendored at build time to avoid requiring a protoc
//! installation. Server stubs are generated too; integration tests run the
//! client against an in-process fixture server.

#![allow(clippy::all)]

tonic::include_proto!("tei.v1");
