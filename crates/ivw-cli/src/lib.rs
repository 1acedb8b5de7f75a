//! Library side of the `ivw` command line tool: logging setup, the built-in
//! version converters, workspace summaries and in-place upgrades.

pub mod inspect;
pub mod logging;
pub mod modules;
pub mod upgrade;
