//! Unit tests for the TIFF decoding modules

#![cfg(test)]

mod document_tests;
