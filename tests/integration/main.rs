//! Integration tests for the Talkie server.

mod auth_test;
mod helpers;
mod presence_test;
mod ws_test;
