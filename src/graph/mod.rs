//! Graph construction and representation
//!
//! This module indexes caller-supplied node and link lists into a
//! directed CSR graph with both outgoing and incoming adjacency.

pub mod builder;
pub mod csr;
