// Library root
// -----------
// The binary (`main.rs`) only parses flags, sets up logging and hands the
// selected command to `app::App`.
//
// Module responsibilities:
// - `config`: resolves the credential path and the Pinata base URLs.
// - `credentials`: reads and writes the stored JWT.
// - `api`: blocking HTTP client for the Pinata files API.
// - `ui`: tables, status lines and prompts.
// - `cli`: flag definitions, command selection, update-argument parsing.
// - `app`: the operations themselves, wiring the pieces together.
pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod credentials;
pub mod ui;
