//! Cross-module collision behaviour tests
