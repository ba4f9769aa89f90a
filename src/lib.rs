pub mod base;
pub mod block;
pub mod canonicity;
pub mod cli;
pub mod client;
pub mod command;
pub mod constants;
pub mod observer;
pub mod pipeline;
pub mod snapshot;
pub mod stake;
pub mod store;
pub mod tally;
pub mod utility;
pub mod vote;
