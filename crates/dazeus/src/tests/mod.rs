//! Connection-level tests driven by scripted core traffic.

mod commands;
mod support;
