//! I/O utilities for byte source access
//!
//! This module provides the byte order strategies and the field reader
//! used to pull fixed-width values out of a TIFF byte source.

pub mod byte_order;
pub mod field_reader;
