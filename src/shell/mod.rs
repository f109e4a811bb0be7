// Composition root.
//
// - Read options from the config file and settings from the environment.
// - Instantiate the file stores, the Teamweek client and the system clock.
// - Wire them into the use case handlers and expose them over HTTP and GraphQL.

pub mod config;
pub mod graphql;
pub mod http;
pub mod state;
