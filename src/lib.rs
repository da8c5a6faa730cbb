// Library root
// -----------
// This crate exposes the pieces of the RiskGo analyzer CLI. The binary
// (`main.rs`) wires them together for one interactive session.
//
// Module responsibilities:
// - `config`: prompt defaults, scenario grid and gateway location.
// - `error`: the error taxonomy shared by every module.
// - `api`: wire types, request assembly and the blocking gateway client.
// - `prompt`: typed prompts with defaults and retry over a line source.
// - `report`: scenario ordering and the fixed-width risk table.
// - `ui`: the session flow that collects a position and prints the report.
pub mod api;
pub mod config;
pub mod error;
pub mod prompt;
pub mod report;
pub mod ui;
