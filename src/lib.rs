pub mod config;
pub mod error;
pub mod net;
pub mod report;
pub mod routing;
pub mod sim;
pub mod topo;

#[cfg(test)]
mod test;
