//! npm Package Documentation MCP Service
//!
//! This crate provides an MCP (model context protocol) service for fetching
//! README documentation of published npm packages. Given a package name, the
//! service looks up the package's registry metadata, tries to fetch its README
//! from the linked GitHub repository, and falls back to downloading and
//! unpacking the published tarball.
//!
//! # Features
//!
//! - Registry metadata lookup against registry.npmjs.org
//! - README resolution from GitHub across common branches (master, main, develop)
//! - Tarball download-and-extract fallback with guaranteed temp-dir cleanup
//! - MCP server over stdio or SSE transport
//!
//! # Modules
//!
//! - [`registry`]: registry client, domain types and the shared error enum
//! - [`repo_url`]: GitHub repository URL parsing
//! - [`tarball`]: tarball download, extraction and README probing
//! - [`pipeline`]: README resolution orchestration
//! - [`mcp`]: MCP tool endpoint and server handler

pub mod mcp;
pub mod pipeline;
pub mod registry;
pub mod repo_url;
pub mod tarball;
