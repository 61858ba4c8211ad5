//! Integration tests for the playground project API and session

mod cli_parsing;
mod http_routes;
mod session_flow;
mod support;
